//! Per-translation state.
//!
//! A [`TranslationContext`] is created at the start of every translation and
//! dropped at its end. It owns the symbol table, the indentation depth, the
//! warnings and the capability flags; nothing here outlives one call.

use crate::ast::{BinaryOp, Expr, Literal, SourceType, UnaryOp};
use crate::config::TranslateConfig;
use crate::traits::Target;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

// ============================================================================
// Symbols
// ============================================================================

/// What the translator knows about a declared name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub source_name: String,
    /// Identifier used in the output; differs from `source_name` only when
    /// the source name collides with a reserved word of the target or with
    /// another symbol's output identifier.
    pub target_name: String,
    /// Declared type; for arrays, the element type.
    pub source_type: SourceType,
    /// Rendered target type once a generator has declared the symbol.
    pub target_type: Option<String>,
    pub is_array: bool,
    pub element_type: Option<SourceType>,
    /// Outer extent when known from a literal or a constant allocation.
    pub array_size: Option<usize>,
    pub dimensions: usize,
    /// Array this name aliases (`int[] b = a;`).
    pub alias_of: Option<String>,
}

impl Symbol {
    pub fn scalar(name: impl Into<String>, ty: SourceType) -> Self {
        let name = name.into();
        Self {
            target_name: name.clone(),
            source_name: name,
            source_type: ty,
            target_type: None,
            is_array: false,
            element_type: None,
            array_size: None,
            dimensions: 0,
            alias_of: None,
        }
    }

    pub fn array(
        name: impl Into<String>,
        element: SourceType,
        dimensions: usize,
        size: Option<usize>,
    ) -> Self {
        Self {
            is_array: true,
            element_type: Some(element),
            array_size: size,
            dimensions,
            ..Self::scalar(name, element)
        }
    }
}

/// Lexically scoped symbol table.
///
/// Reads fall through from the innermost scope to the root; writes land in
/// the innermost scope and disappear with it.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, Symbol>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Discard the innermost scope. The root scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Insert or replace a symbol in the innermost scope.
    pub fn declare(&mut self, symbol: Symbol) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(symbol.source_name.clone(), symbol);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Whether `name` is visible as either a source or a target identifier.
    pub fn is_taken(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| {
            scope.contains_key(name) || scope.values().any(|s| s.target_name == name)
        })
    }

    /// Whether a different source name already renders as `name`.
    pub fn is_target_of_other(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| {
            scope
                .values()
                .any(|s| s.target_name == name && s.source_name != name)
        })
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Capabilities
// ============================================================================

/// Optional features the generated unit relies on. C maps each onto an
/// include; Python onto an import where one is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Bool,
    Math,
    StdLib,
    String,
    Limits,
}

// ============================================================================
// Context
// ============================================================================

pub struct TranslationContext {
    pub target: Target,
    pub config: TranslateConfig,
    pub symbols: SymbolTable,
    indent: usize,
    warnings: Vec<String>,
    capabilities: BTreeSet<Capability>,
}

impl TranslationContext {
    pub fn new(target: Target, config: TranslateConfig) -> Self {
        Self {
            target,
            config,
            symbols: SymbolTable::new(),
            indent: 0,
            warnings: Vec::new(),
            capabilities: BTreeSet::new(),
        }
    }

    // ------------------------------------------------------------------
    // Warnings
    // ------------------------------------------------------------------

    /// Record a warning. Identical messages are kept once.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.warnings.contains(&message) {
            tracing::warn!(language = %self.target, "{message}");
            self.warnings.push(message);
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    // ------------------------------------------------------------------
    // Capabilities
    // ------------------------------------------------------------------

    pub fn require(&mut self, capability: Capability) {
        self.capabilities.insert(capability);
    }

    pub fn uses(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Capabilities in a stable order.
    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.capabilities.iter().copied()
    }

    // ------------------------------------------------------------------
    // Indentation
    // ------------------------------------------------------------------

    pub fn indent_level(&self) -> usize {
        self.indent
    }

    pub fn set_indent(&mut self, level: usize) {
        self.indent = level;
    }

    /// `text` prefixed with the current indentation.
    pub fn line(&self, text: impl AsRef<str>) -> String {
        format!(
            "{}{}",
            " ".repeat(self.indent * self.config.indent_width),
            text.as_ref()
        )
    }

    /// Run `f` one indentation level deeper.
    pub fn indented<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.indent += 1;
        let result = f(self);
        self.indent -= 1;
        result
    }

    /// Run `f` in a child scope whose declarations are discarded afterwards.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.symbols.push_scope();
        let result = f(self);
        self.symbols.pop_scope();
        result
    }

    // ------------------------------------------------------------------
    // Symbols
    // ------------------------------------------------------------------

    pub fn declare(&mut self, symbol: Symbol) {
        self.symbols.declare(symbol);
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.lookup(name)
    }

    /// Output identifier for a source name.
    pub fn target_name(&self, name: &str) -> String {
        self.lookup(name)
            .map(|s| s.target_name.clone())
            .unwrap_or_else(|| name.to_string())
    }

    /// Pick the output identifier for a new declaration, suffixing names that
    /// collide with `reserved` or with an earlier rename.
    pub fn choose_name(&mut self, name: &str, reserved: &[&str]) -> String {
        let is_reserved = reserved.contains(&name);
        if !is_reserved && !self.symbols.is_target_of_other(name) {
            return name.to_string();
        }
        let mut candidate = format!("{name}_var");
        let mut n = 2;
        while self.symbols.is_taken(&candidate) || reserved.contains(&candidate.as_str()) {
            candidate = format!("{name}_var{n}");
            n += 1;
        }
        let reason = if is_reserved {
            format!("`{name}` is reserved in {}", self.target)
        } else {
            format!("`{name}` is already used for a renamed variable")
        };
        self.warn(format!("{reason}; renamed to `{candidate}`"));
        candidate
    }

    /// An identifier not visible in any scope, preferring `i`, `j`, `k`.
    pub fn fresh_name(&self, base: &str) -> String {
        let preferred: &[&str] = if base == "i" { &["i", "j", "k"] } else { &[] };
        if let Some(name) = preferred
            .iter()
            .chain(std::iter::once(&base))
            .find(|name| !self.symbols.is_taken(name))
        {
            return (*name).to_string();
        }
        (2..)
            .map(|n| format!("{base}{n}"))
            .find(|name| !self.symbols.is_taken(name))
            .unwrap_or_else(|| format!("{base}_"))
    }

    // ------------------------------------------------------------------
    // Type inference
    // ------------------------------------------------------------------

    /// Static Java type of an expression, as far as the symbol table tells.
    pub fn type_of(&self, expr: &Expr) -> SourceType {
        match expr {
            Expr::Literal(lit) => lit.source_type(),
            Expr::Ident(name) => match self.lookup(name) {
                Some(symbol) if !symbol.is_array => symbol.source_type,
                _ => SourceType::Unknown,
            },
            Expr::Binary { left, op, right } => {
                let l = self.type_of(left);
                let r = self.type_of(right);
                match op {
                    BinaryOp::Add if l == SourceType::String || r == SourceType::String => {
                        SourceType::String
                    }
                    BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => l.promote_unary(),
                    _ => l.promote(r),
                }
            }
            Expr::Unary { op, operand } => match op {
                UnaryOp::Not => SourceType::Boolean,
                _ => self.type_of(operand).promote_unary(),
            },
            Expr::Logical { .. } | Expr::Comparison { .. } => SourceType::Boolean,
            Expr::Assign { target, .. } | Expr::Update { target, .. } => self.type_of(target),
            Expr::ArrayAccess { .. } => {
                let Some(symbol) = expr.root_ident().and_then(|name| self.lookup(name)) else {
                    return SourceType::Unknown;
                };
                if symbol.is_array && expr.access_depth() >= symbol.dimensions {
                    symbol.element_type.unwrap_or(SourceType::Unknown)
                } else if symbol.source_type == SourceType::String {
                    SourceType::Char
                } else {
                    SourceType::Unknown
                }
            }
            Expr::FieldAccess { object, field } => match (object.as_ident(), field.as_str()) {
                (_, "length") => SourceType::Int,
                (Some("Integer"), "MAX_VALUE" | "MIN_VALUE") => SourceType::Int,
                (Some("Long"), "MAX_VALUE" | "MIN_VALUE") => SourceType::Long,
                (Some("Math"), "PI" | "E") => SourceType::Double,
                _ => SourceType::Unknown,
            },
            Expr::ArrayLiteral(_) => SourceType::Unknown,
            Expr::Ternary {
                then_expr,
                else_expr,
                ..
            } => {
                let a = self.type_of(then_expr);
                let b = self.type_of(else_expr);
                if a == b {
                    a
                } else if a.is_numeric() && b.is_numeric() {
                    a.promote(b)
                } else {
                    SourceType::Unknown
                }
            }
            Expr::Cast { ty, .. } => *ty,
            Expr::Call {
                receiver,
                method,
                args,
            } => self.call_type(receiver.as_deref(), method, args),
        }
    }

    fn call_type(&self, receiver: Option<&Expr>, method: &str, args: &[Expr]) -> SourceType {
        match (receiver.and_then(Expr::as_ident), method) {
            (Some("Math"), "abs" | "max" | "min") => args
                .iter()
                .map(|arg| self.type_of(arg).promote_unary())
                .reduce(SourceType::promote)
                .unwrap_or(SourceType::Unknown),
            (Some("Math"), "round") => SourceType::Long,
            (Some("Math"), _) => SourceType::Double,
            (Some("Integer"), "parseInt") => SourceType::Int,
            (Some("Double"), "parseDouble") => SourceType::Double,
            (Some("String"), "valueOf") => SourceType::String,
            (_, "length") => SourceType::Int,
            (_, "equals") => SourceType::Boolean,
            (_, "charAt") => SourceType::Char,
            (_, "toUpperCase" | "toLowerCase" | "trim" | "substring") => SourceType::String,
            _ => SourceType::Unknown,
        }
    }

    /// Whether `expr` evaluates to a `String` built with `+`.
    pub fn is_concatenation(&self, expr: &Expr) -> bool {
        matches!(
            expr,
            Expr::Binary {
                op: BinaryOp::Add,
                ..
            }
        ) && self.type_of(expr) == SourceType::String
    }

    /// Flatten a string concatenation into its parts in evaluation order.
    /// Non-string sub-sums (`1 + 2` in `1 + 2 + "x"`) stay whole.
    pub fn concat_parts<'e>(&self, expr: &'e Expr) -> Vec<&'e Expr> {
        let mut parts = Vec::new();
        self.collect_concat(expr, &mut parts);
        parts
    }

    fn collect_concat<'e>(&self, expr: &'e Expr, parts: &mut Vec<&'e Expr>) {
        match expr {
            Expr::Binary {
                left,
                op: BinaryOp::Add,
                right,
            } if self.is_concatenation(expr) => {
                self.collect_concat(left, parts);
                self.collect_concat(right, parts);
            }
            _ => parts.push(expr),
        }
    }
}

/// A literal's value if it is an integer literal.
pub fn literal_integer(expr: &Expr) -> Option<i64> {
    match expr {
        Expr::Literal(lit @ (Literal::Int(_) | Literal::Long(_))) => lit.as_integer(),
        Expr::Unary {
            op: UnaryOp::Neg,
            operand,
        } => literal_integer(operand).map(|v| -v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cx() -> TranslationContext {
        TranslationContext::new(Target::C, TranslateConfig::default())
    }

    #[test]
    fn test_child_scope_discards_writes() {
        let mut cx = cx();
        cx.declare(Symbol::scalar("x", SourceType::Int));
        cx.scoped(|cx| {
            cx.declare(Symbol::scalar("y", SourceType::Double));
            assert!(cx.lookup("x").is_some());
            assert!(cx.lookup("y").is_some());
        });
        assert!(cx.lookup("y").is_none());
        assert_eq!(cx.lookup("x").unwrap().source_type, SourceType::Int);
    }

    #[test]
    fn test_child_scope_shadows_parent() {
        let mut cx = cx();
        cx.declare(Symbol::scalar("v", SourceType::Int));
        cx.scoped(|cx| {
            cx.declare(Symbol::scalar("v", SourceType::String));
            assert_eq!(cx.lookup("v").unwrap().source_type, SourceType::String);
        });
        assert_eq!(cx.lookup("v").unwrap().source_type, SourceType::Int);
    }

    #[test]
    fn test_choose_name_renames_reserved() {
        let mut cx = cx();
        assert_eq!(cx.choose_name("count", &["bool"]), "count");
        assert_eq!(cx.choose_name("bool", &["bool"]), "bool_var");
        assert_eq!(cx.warnings().len(), 1);
    }

    #[test]
    fn test_choose_name_avoids_earlier_rename() {
        let mut cx = cx();
        let renamed = cx.choose_name("bool", &["bool"]);
        let mut symbol = Symbol::scalar("bool", SourceType::Int);
        symbol.target_name = renamed.clone();
        cx.declare(symbol);

        let next = cx.choose_name("bool_var", &["bool"]);
        assert_ne!(next, renamed);
        assert_eq!(next, "bool_var_var");
        assert_eq!(cx.target_name("bool"), "bool_var");
        assert_eq!(cx.warnings().len(), 2);
    }

    #[test]
    fn test_fresh_name_skips_taken() {
        let mut cx = cx();
        assert_eq!(cx.fresh_name("i"), "i");
        cx.declare(Symbol::scalar("i", SourceType::Int));
        assert_eq!(cx.fresh_name("i"), "j");
        cx.declare(Symbol::scalar("j", SourceType::Int));
        cx.declare(Symbol::scalar("k", SourceType::Int));
        assert_eq!(cx.fresh_name("i"), "i2");
    }

    #[test]
    fn test_type_of_concatenation() {
        let mut cx = cx();
        cx.declare(Symbol::scalar("n", SourceType::Int));
        let expr = Expr::binary(Expr::string("n = "), BinaryOp::Add, Expr::ident("n"));
        assert_eq!(cx.type_of(&expr), SourceType::String);
        assert!(cx.is_concatenation(&expr));

        // 1 + 2 + "x": the numeric prefix stays one part.
        let expr = Expr::binary(
            Expr::binary(Expr::int(1), BinaryOp::Add, Expr::int(2)),
            BinaryOp::Add,
            Expr::string("x"),
        );
        assert_eq!(cx.concat_parts(&expr).len(), 2);
    }

    #[test]
    fn test_type_of_array_element() {
        let mut cx = cx();
        cx.declare(Symbol::array("grid", SourceType::Double, 2, Some(3)));
        let row = Expr::index(Expr::ident("grid"), Expr::int(0));
        let cell = Expr::index(row.clone(), Expr::int(1));
        assert_eq!(cx.type_of(&row), SourceType::Unknown);
        assert_eq!(cx.type_of(&cell), SourceType::Double);
    }

    #[test]
    fn test_warnings_deduplicated() {
        let mut cx = cx();
        cx.warn("same");
        cx.warn("same");
        assert_eq!(cx.warnings(), ["same".to_string()]);
    }
}
