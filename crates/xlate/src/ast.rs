//! Target-independent AST for the supported Java subset.
//!
//! Every construct the lowering parsers understand maps onto one variant of
//! [`Stmt`] or [`Expr`]. Generators match on these exhaustively, so adding a
//! variant is a compile error in every backend until it is handled.
//!
//! Expressions only ever contain other expressions. Blocks keep their
//! statements in source order.

use serde::{Deserialize, Serialize};

// ============================================================================
// Types
// ============================================================================

/// Primitive (or primitive-like) Java type of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Char,
    String,
    /// A type the translator does not model (class types, `var` without a
    /// usable initializer, ...).
    Unknown,
}

impl SourceType {
    /// Map a Java type spelling onto a source type. Boxed types collapse onto
    /// their primitive.
    pub fn from_java(name: &str) -> Self {
        match name.trim() {
            "byte" | "Byte" => SourceType::Byte,
            "short" | "Short" => SourceType::Short,
            "int" | "Integer" => SourceType::Int,
            "long" | "Long" => SourceType::Long,
            "float" | "Float" => SourceType::Float,
            "double" | "Double" => SourceType::Double,
            "boolean" | "Boolean" => SourceType::Boolean,
            "char" | "Character" => SourceType::Char,
            "String" | "java.lang.String" => SourceType::String,
            _ => SourceType::Unknown,
        }
    }

    pub fn java_name(self) -> &'static str {
        match self {
            SourceType::Byte => "byte",
            SourceType::Short => "short",
            SourceType::Int => "int",
            SourceType::Long => "long",
            SourceType::Float => "float",
            SourceType::Double => "double",
            SourceType::Boolean => "boolean",
            SourceType::Char => "char",
            SourceType::String => "String",
            SourceType::Unknown => "?",
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            SourceType::Byte
                | SourceType::Short
                | SourceType::Int
                | SourceType::Long
                | SourceType::Char
        )
    }

    pub fn is_floating(self) -> bool {
        matches!(self, SourceType::Float | SourceType::Double)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integral() || self.is_floating()
    }

    /// Binary numeric promotion (JLS 5.6.2), with `Unknown` absorbing.
    pub fn promote(self, other: SourceType) -> SourceType {
        use SourceType::*;
        match (self, other) {
            (Unknown, _) | (_, Unknown) => Unknown,
            (Double, _) | (_, Double) => Double,
            (Float, _) | (_, Float) => Float,
            (Long, _) | (_, Long) => Long,
            (a, b) if a.is_integral() && b.is_integral() => Int,
            _ => Unknown,
        }
    }

    /// Unary numeric promotion: narrow integers widen to `int`.
    pub fn promote_unary(self) -> SourceType {
        match self {
            SourceType::Byte | SourceType::Short | SourceType::Char => SourceType::Int,
            other => other,
        }
    }
}

// ============================================================================
// Literals and operators
// ============================================================================

/// A literal with its Java suffixes and quotes already stripped.
///
/// Numeric text is kept verbatim (hex, octal and exponent forms included) so
/// generators can decide how to respell it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Int(String),
    Long(String),
    Float(String),
    Double(String),
    Bool(bool),
    /// Contents between the single quotes, escapes preserved.
    Char(String),
    /// Contents between the double quotes, escapes preserved.
    String(String),
    Null,
}

impl Literal {
    pub fn source_type(&self) -> SourceType {
        match self {
            Literal::Int(_) => SourceType::Int,
            Literal::Long(_) => SourceType::Long,
            Literal::Float(_) => SourceType::Float,
            Literal::Double(_) => SourceType::Double,
            Literal::Bool(_) => SourceType::Boolean,
            Literal::Char(_) => SourceType::Char,
            Literal::String(_) => SourceType::String,
            Literal::Null => SourceType::Unknown,
        }
    }

    /// Integer value of an `int`/`long` literal, if it is written in a radix
    /// the translator understands.
    pub fn as_integer(&self) -> Option<i64> {
        let text = match self {
            Literal::Int(text) | Literal::Long(text) => text,
            _ => return None,
        };
        parse_integer(text)
    }
}

fn parse_integer(text: &str) -> Option<i64> {
    let lower = text.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()
    } else if lower.len() > 1 && lower.starts_with('0') {
        i64::from_str_radix(&lower[1..], 8).ok()
    } else {
        lower.parse().ok()
    }
}

/// Arithmetic and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
}

impl BinaryOp {
    pub fn from_java(op: &str) -> Option<Self> {
        Some(match op {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "&" => BinaryOp::BitAnd,
            "|" => BinaryOp::BitOr,
            "^" => BinaryOp::BitXor,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::Shr,
            ">>>" => BinaryOp::UShr,
            _ => return None,
        })
    }

    /// Java spelling, shared by both targets except where noted by them.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CompareOp {
    pub fn from_java(op: &str) -> Option<Self> {
        Some(match op {
            "<" => CompareOp::Lt,
            "<=" => CompareOp::Le,
            ">" => CompareOp::Gt,
            ">=" => CompareOp::Ge,
            "==" => CompareOp::Eq,
            "!=" => CompareOp::Ne,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }

    /// The operator that holds exactly when `self` does not.
    pub fn inverse(self) -> Self {
        match self {
            CompareOp::Lt => CompareOp::Ge,
            CompareOp::Le => CompareOp::Gt,
            CompareOp::Gt => CompareOp::Le,
            CompareOp::Ge => CompareOp::Lt,
            CompareOp::Eq => CompareOp::Ne,
            CompareOp::Ne => CompareOp::Eq,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
}

impl UnaryOp {
    pub fn from_java(op: &str) -> Option<Self> {
        Some(match op {
            "-" => UnaryOp::Neg,
            "+" => UnaryOp::Plus,
            "!" => UnaryOp::Not,
            "~" => UnaryOp::BitNot,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
        }
    }
}

/// `=` or a compound assignment operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOp {
    Assign,
    Compound(BinaryOp),
}

impl AssignOp {
    pub fn from_java(op: &str) -> Option<Self> {
        if op == "=" {
            return Some(AssignOp::Assign);
        }
        let binary = op.strip_suffix('=')?;
        BinaryOp::from_java(binary).map(AssignOp::Compound)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Literal(Literal),
    Ident(String),
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
    },
    Comparison {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        op: AssignOp,
        value: Box<Expr>,
    },
    Update {
        target: Box<Expr>,
        op: UpdateOp,
        prefix: bool,
    },
    ArrayAccess {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    /// `object.field`; mostly the `array.length` idiom.
    FieldAccess {
        object: Box<Expr>,
        field: String,
    },
    ArrayLiteral(Vec<Expr>),
    Ternary {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    Cast {
        ty: SourceType,
        expr: Box<Expr>,
    },
    /// A method call such as `Math.max(a, b)` or `name.length()`.
    Call {
        receiver: Option<Box<Expr>>,
        method: String,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn int(value: i64) -> Self {
        Expr::Literal(Literal::Int(value.to_string()))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        Expr::Literal(Literal::Bool(value))
    }

    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn comparison(left: Expr, op: CompareOp, right: Expr) -> Self {
        Expr::Comparison {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn logical(left: Expr, op: LogicalOp, right: Expr) -> Self {
        Expr::Logical {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn assign(target: Expr, op: AssignOp, value: Expr) -> Self {
        Expr::Assign {
            target: Box::new(target),
            op,
            value: Box::new(value),
        }
    }

    pub fn update(target: Expr, op: UpdateOp, prefix: bool) -> Self {
        Expr::Update {
            target: Box::new(target),
            op,
            prefix,
        }
    }

    pub fn index(array: Expr, index: Expr) -> Self {
        Expr::ArrayAccess {
            array: Box::new(array),
            index: Box::new(index),
        }
    }

    pub fn field(object: Expr, field: impl Into<String>) -> Self {
        Expr::FieldAccess {
            object: Box::new(object),
            field: field.into(),
        }
    }

    /// Compound expressions get parenthesized when they appear as operands.
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            Expr::Binary { .. }
                | Expr::Unary { .. }
                | Expr::Logical { .. }
                | Expr::Comparison { .. }
                | Expr::Assign { .. }
                | Expr::Ternary { .. }
        )
    }

    /// `Some(array)` when this is the `array.length` idiom.
    pub fn length_of(&self) -> Option<&Expr> {
        match self {
            Expr::FieldAccess { object, field } if field == "length" => Some(object),
            _ => None,
        }
    }

    pub fn as_string_literal(&self) -> Option<&str> {
        match self {
            Expr::Literal(Literal::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Identifier at the root of an access chain (`a` in `a[i][j]`).
    pub fn root_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(name) => Some(name),
            Expr::ArrayAccess { array, .. } => array.root_ident(),
            _ => None,
        }
    }

    /// Number of `[...]` applied on top of the root identifier.
    pub fn access_depth(&self) -> usize {
        match self {
            Expr::ArrayAccess { array, .. } => 1 + array.access_depth(),
            _ => 0,
        }
    }

    /// Whether `name` is assigned or updated anywhere inside this expression.
    pub fn writes(&self, name: &str) -> bool {
        match self {
            Expr::Assign { target, value, .. } => {
                target.as_ident() == Some(name) || value.writes(name)
            }
            Expr::Update { target, .. } => target.as_ident() == Some(name),
            Expr::Binary { left, right, .. }
            | Expr::Logical { left, right, .. }
            | Expr::Comparison { left, right, .. } => left.writes(name) || right.writes(name),
            Expr::Unary { operand, .. } => operand.writes(name),
            Expr::ArrayAccess { array, index } => array.writes(name) || index.writes(name),
            Expr::FieldAccess { object, .. } => object.writes(name),
            Expr::ArrayLiteral(items) => items.iter().any(|item| item.writes(name)),
            Expr::Ternary {
                condition,
                then_expr,
                else_expr,
            } => condition.writes(name) || then_expr.writes(name) || else_expr.writes(name),
            Expr::Cast { expr, .. } => expr.writes(name),
            Expr::Call { receiver, args, .. } => {
                receiver.as_ref().is_some_and(|r| r.writes(name))
                    || args.iter().any(|arg| arg.writes(name))
            }
            Expr::Literal(_) | Expr::Ident(_) => false,
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Insertion-ordered list of statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

impl Block {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Whether the block's last statement leaves it unconditionally.
    pub fn ends_with_jump(&self) -> bool {
        matches!(
            self.statements.last(),
            Some(Stmt::Break | Stmt::Continue | Stmt::Return(_))
        )
    }

    /// Whether `name` is written by any statement of the block, nested
    /// blocks included.
    pub fn writes(&self, name: &str) -> bool {
        self.statements.iter().any(|stmt| stmt.writes(name))
    }

    /// Whether a `continue` in this block would target the enclosing loop.
    pub fn has_own_continue(&self) -> bool {
        self.statements.iter().any(Stmt::has_own_continue)
    }
}

/// `System.out.print`, `println` or `printf`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Print {
    pub args: Vec<Expr>,
    pub newline: bool,
    /// `printf`: the first argument is a format string.
    pub formatted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    /// `/* ... */` rather than `// ...`.
    pub block: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElifBranch {
    pub condition: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchLabel {
    Case(Expr),
    Default,
}

/// One `case` group: its labels in source order and the statements after
/// the last label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub labels: Vec<SwitchLabel>,
    pub body: Block,
}

/// Loop shape. Each kind carries exactly the fields it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopKind {
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        update: Vec<Expr>,
    },
    While {
        condition: Expr,
    },
    DoWhile {
        condition: Expr,
    },
    ForEach {
        var_type: SourceType,
        var_name: String,
        iterable: Expr,
    },
}

impl LoopKind {
    pub fn tag(&self) -> &'static str {
        match self {
            LoopKind::For { .. } => "for",
            LoopKind::While { .. } => "while",
            LoopKind::DoWhile { .. } => "do_while",
            LoopKind::ForEach { .. } => "for_each",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loop {
    pub kind: LoopKind,
    pub body: Block,
}

/// How an array declaration gets its contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayInit {
    /// `int[] a;`
    Default,
    /// `{1, 2, 3}`; nested arrays are [`Expr::ArrayLiteral`].
    Literal(Vec<Expr>),
    /// `source.clone()`: copy semantics.
    Clone(Expr),
    /// `new int[n]` / `new int[r][c]`.
    Allocate(Vec<Expr>),
    /// `int[] b = a;`: both names refer to the same array.
    Alias(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    VariableDeclaration {
        name: String,
        ty: SourceType,
        init: Option<Expr>,
    },
    ArrayDeclaration {
        name: String,
        element_type: SourceType,
        dimensions: usize,
        init: ArrayInit,
    },
    Expr(Expr),
    Print(Print),
    Conditional {
        condition: Expr,
        then_branch: Block,
        elif_branches: Vec<ElifBranch>,
        else_branch: Option<Block>,
    },
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    Loop(Loop),
    Break,
    Continue,
    Return(Option<Expr>),
    Comment(Comment),
    Block(Block),
    /// Several declarations written as one source statement.
    Sequence(Vec<Stmt>),
    /// A statement no lowering parser claimed.
    Unsupported {
        kind: String,
        text: String,
    },
}

impl Stmt {
    pub fn declaration(name: impl Into<String>, ty: SourceType, init: Option<Expr>) -> Self {
        Stmt::VariableDeclaration {
            name: name.into(),
            ty,
            init,
        }
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }

    pub fn println(args: Vec<Expr>) -> Self {
        Stmt::Print(Print {
            args,
            newline: true,
            formatted: false,
        })
    }

    /// Short name used in placeholders and warnings.
    pub fn construct(&self) -> &str {
        match self {
            Stmt::VariableDeclaration { .. } => "variable declaration",
            Stmt::ArrayDeclaration { .. } => "array declaration",
            Stmt::Expr(_) => "expression",
            Stmt::Print(_) => "print",
            Stmt::Conditional { .. } => "if",
            Stmt::Switch { .. } => "switch",
            Stmt::Loop(l) => l.kind.tag(),
            Stmt::Break => "break",
            Stmt::Continue => "continue",
            Stmt::Return(_) => "return",
            Stmt::Comment(_) => "comment",
            Stmt::Block(_) => "block",
            Stmt::Sequence(_) => "declarations",
            Stmt::Unsupported { kind, .. } => kind,
        }
    }

    pub fn writes(&self, name: &str) -> bool {
        match self {
            Stmt::VariableDeclaration { init, .. } => init.as_ref().is_some_and(|e| e.writes(name)),
            Stmt::ArrayDeclaration { .. } => false,
            Stmt::Expr(expr) => expr.writes(name),
            Stmt::Print(print) => print.args.iter().any(|arg| arg.writes(name)),
            Stmt::Conditional {
                condition,
                then_branch,
                elif_branches,
                else_branch,
            } => {
                condition.writes(name)
                    || then_branch.writes(name)
                    || elif_branches
                        .iter()
                        .any(|b| b.condition.writes(name) || b.body.writes(name))
                    || else_branch.as_ref().is_some_and(|b| b.writes(name))
            }
            Stmt::Switch {
                discriminant,
                cases,
            } => discriminant.writes(name) || cases.iter().any(|c| c.body.writes(name)),
            Stmt::Loop(l) => {
                let header = match &l.kind {
                    LoopKind::For {
                        init,
                        condition,
                        update,
                    } => {
                        init.as_ref().is_some_and(|s| s.writes(name))
                            || condition.as_ref().is_some_and(|c| c.writes(name))
                            || update.iter().any(|u| u.writes(name))
                    }
                    LoopKind::While { condition } | LoopKind::DoWhile { condition } => {
                        condition.writes(name)
                    }
                    LoopKind::ForEach { var_name, .. } => var_name == name,
                };
                header || l.body.writes(name)
            }
            Stmt::Block(block) => block.writes(name),
            Stmt::Sequence(stmts) => stmts.iter().any(|s| s.writes(name)),
            Stmt::Return(_)
            | Stmt::Break
            | Stmt::Continue
            | Stmt::Comment(_)
            | Stmt::Unsupported { .. } => false,
        }
    }

    fn has_own_continue(&self) -> bool {
        match self {
            Stmt::Continue => true,
            Stmt::Conditional {
                then_branch,
                elif_branches,
                else_branch,
                ..
            } => {
                then_branch.has_own_continue()
                    || elif_branches.iter().any(|b| b.body.has_own_continue())
                    || else_branch.as_ref().is_some_and(Block::has_own_continue)
            }
            Stmt::Switch { cases, .. } => cases.iter().any(|c| c.body.has_own_continue()),
            Stmt::Block(block) => block.has_own_continue(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_comparisons() {
        assert_eq!(CompareOp::Lt.inverse(), CompareOp::Ge);
        assert_eq!(CompareOp::Ge.inverse(), CompareOp::Lt);
        assert_eq!(CompareOp::Eq.inverse(), CompareOp::Ne);
        for op in [
            CompareOp::Lt,
            CompareOp::Le,
            CompareOp::Gt,
            CompareOp::Ge,
            CompareOp::Eq,
            CompareOp::Ne,
        ] {
            assert_eq!(op.inverse().inverse(), op);
        }
    }

    #[test]
    fn test_numeric_promotion() {
        assert_eq!(SourceType::Int.promote(SourceType::Double), SourceType::Double);
        assert_eq!(SourceType::Char.promote(SourceType::Short), SourceType::Int);
        assert_eq!(SourceType::Long.promote(SourceType::Int), SourceType::Long);
        assert_eq!(SourceType::String.promote(SourceType::Int), SourceType::Unknown);
    }

    #[test]
    fn test_compound_assign_ops() {
        assert_eq!(AssignOp::from_java("="), Some(AssignOp::Assign));
        assert_eq!(
            AssignOp::from_java("+="),
            Some(AssignOp::Compound(BinaryOp::Add))
        );
        assert_eq!(
            AssignOp::from_java(">>>="),
            Some(AssignOp::Compound(BinaryOp::UShr))
        );
        assert_eq!(AssignOp::from_java("=="), None);
    }

    #[test]
    fn test_integer_literal_radix() {
        assert_eq!(Literal::Int("0x1F".into()).as_integer(), Some(31));
        assert_eq!(Literal::Int("017".into()).as_integer(), Some(15));
        assert_eq!(Literal::Long("0b101".into()).as_integer(), Some(5));
        assert_eq!(Literal::Int("0".into()).as_integer(), Some(0));
    }

    #[test]
    fn test_writes_detects_updates() {
        let block = Block::new(vec![Stmt::expr(Expr::update(
            Expr::ident("i"),
            UpdateOp::Increment,
            false,
        ))]);
        assert!(block.writes("i"));
        assert!(!block.writes("j"));
    }
}
