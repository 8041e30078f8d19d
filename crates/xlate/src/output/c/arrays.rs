//! Array declarations.
//!
//! Literals become fixed-size arrays sized from the initializer. A clone gets
//! its own storage sized with `sizeof` and is filled element by element (or
//! with `memcpy` when it has more than one dimension). Aliases are plain
//! pointers that remember which array they measure.

use super::CGenerator;
use super::types::{RESERVED, c_type};
use crate::ast::{ArrayInit, Expr, SourceType};
use crate::context::{Capability, Symbol, TranslationContext, literal_integer};
use crate::traits::GenerateError;

impl CGenerator {
    pub(super) fn array_declaration(
        &self,
        name: &str,
        element: SourceType,
        dimensions: usize,
        init: &ArrayInit,
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError> {
        let c_ty = c_type(element, cx)?;
        match init {
            ArrayInit::Literal(items) => {
                if items.is_empty() {
                    return Err(GenerateError::invalid("array", "empty array literal"));
                }
                let extents = literal_extents(items, dimensions);
                let values = self.initializer(items, cx)?;
                let target = declare_array(
                    name,
                    element,
                    dimensions,
                    Some(extents[0]),
                    array_of(c_ty),
                    None,
                    cx,
                );
                let dims: String = extents.iter().map(|e| format!("[{e}]")).collect();
                Ok(vec![cx.line(format!("{c_ty} {target}{dims} = {values};"))])
            }

            ArrayInit::Clone(source) => self.clone_array(name, element, dimensions, source, cx),

            ArrayInit::Allocate(extents) => {
                if extents.len() < dimensions {
                    return Err(GenerateError::Unsupported(
                        "array allocation without every extent".into(),
                    ));
                }
                if extents.iter().filter_map(literal_integer).any(|n| n <= 0) {
                    // ISO C has no zero-length arrays.
                    return Err(GenerateError::Unsupported("zero-length array".into()));
                }
                let constant = extents.iter().all(|e| literal_integer(e).is_some());
                let size = extents
                    .first()
                    .and_then(literal_integer)
                    .and_then(|n| usize::try_from(n).ok());
                let dims = extents
                    .iter()
                    .map(|e| self.expr(e, cx).map(|e| format!("[{e}]")))
                    .collect::<Result<String, _>>()?;
                let target = declare_array(name, element, dimensions, size, array_of(c_ty), None, cx);
                if constant {
                    Ok(vec![cx.line(format!("{c_ty} {target}{dims} = {{0}};"))])
                } else {
                    // Variable-length arrays cannot take an initializer.
                    cx.require(Capability::String);
                    Ok(vec![
                        cx.line(format!("{c_ty} {target}{dims};")),
                        cx.line(format!("memset({target}, 0, sizeof({target}));")),
                    ])
                }
            }

            ArrayInit::Alias(source) => {
                if dimensions > 1 {
                    return Err(GenerateError::Unsupported(
                        "alias of a multi-dimensional array".into(),
                    ));
                }
                let text = self.expr(source, cx)?;
                let measured = source
                    .as_ident()
                    .and_then(|n| cx.lookup(n))
                    .and_then(|s| s.alias_of.clone())
                    .unwrap_or_else(|| text.clone());
                let pointer = pointer_to(c_ty);
                let target =
                    declare_array(name, element, dimensions, None, pointer, Some(measured), cx);
                Ok(vec![cx.line(format!("{} = {text};", pointer_decl(c_ty, &target)))])
            }

            ArrayInit::Default => {
                if dimensions > 1 {
                    return Err(GenerateError::Unsupported(
                        "multi-dimensional array without an initializer".into(),
                    ));
                }
                cx.warn(format!("array `{name}` has no size; declared as a null pointer"));
                let pointer = pointer_to(c_ty);
                let target = declare_array(name, element, dimensions, None, pointer, None, cx);
                Ok(vec![cx.line(format!("{} = NULL;", pointer_decl(c_ty, &target)))])
            }
        }
    }

    fn clone_array(
        &self,
        name: &str,
        element: SourceType,
        dimensions: usize,
        source: &Expr,
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError> {
        let c_ty = c_type(element, cx)?;
        let src = self.expr(source, cx)?;
        let count = self.length(source, cx)?;
        let size = source
            .as_ident()
            .and_then(|n| cx.lookup(n))
            .and_then(|s| s.array_size);

        if dimensions <= 1 {
            let target = declare_array(name, element, dimensions, size, array_of(c_ty), None, cx);
            let i = cx.fresh_name("i");
            let indent = cx.config.indent_unit();
            return Ok(vec![
                cx.line(format!("{c_ty} {target}[{count}];")),
                cx.line(format!("for (int {i} = 0; {i} < {count}; {i}++) {{")),
                cx.line(format!("{indent}{target}[{i}] = {src}[{i}];")),
                cx.line("}"),
            ]);
        }

        // Extent of each level: sizeof(a) / sizeof(a[0]), sizeof(a[0]) / sizeof(a[0][0]), ...
        let measured = source
            .as_ident()
            .and_then(|n| cx.lookup(n))
            .and_then(|s| s.alias_of.clone())
            .unwrap_or_else(|| src.clone());
        let dims: String = (0..dimensions)
            .map(|level| {
                let outer = format!("{measured}{}", "[0]".repeat(level));
                format!("[sizeof({outer}) / sizeof({outer}[0])]")
            })
            .collect();
        let target = declare_array(name, element, dimensions, size, array_of(c_ty), None, cx);
        cx.require(Capability::String);
        Ok(vec![
            cx.line(format!("{c_ty} {target}{dims};")),
            cx.line(format!("memcpy({target}, {src}, sizeof({target}));")),
        ])
    }

    /// Brace initializer, nested for nested literals.
    fn initializer(
        &self,
        items: &[Expr],
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        let rendered = items
            .iter()
            .map(|item| match item {
                Expr::ArrayLiteral(inner) => self.initializer(inner, cx),
                other => self.expr(other, cx),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("{{{}}}", rendered.join(", ")))
    }
}

pub(super) fn declare_array(
    name: &str,
    element: SourceType,
    dimensions: usize,
    size: Option<usize>,
    target_type: String,
    alias_of: Option<String>,
    cx: &mut TranslationContext,
) -> String {
    let target = cx.choose_name(name, RESERVED);
    let mut symbol = Symbol::array(name, element, dimensions, size);
    symbol.target_name = target.clone();
    symbol.target_type = Some(target_type);
    symbol.alias_of = alias_of;
    cx.declare(symbol);
    target
}

/// Recorded type of real array storage, as opposed to a `T*` pointer.
fn array_of(c_ty: &str) -> String {
    format!("{c_ty}[]")
}

pub(super) fn pointer_to(c_ty: &str) -> String {
    format!("{c_ty}*")
}

/// `int *p` / `char **p`.
pub(super) fn pointer_decl(c_ty: &str, name: &str) -> String {
    match c_ty.strip_suffix('*') {
        Some(base) => format!("{base} **{name}"),
        None => format!("{c_ty} *{name}"),
    }
}

/// Extent of each dimension of a literal: the outer length, then the
/// longest row at every deeper level.
fn literal_extents(items: &[Expr], dimensions: usize) -> Vec<usize> {
    fn visit(items: &[Expr], depth: usize, extents: &mut [usize]) {
        if let Some(extent) = extents.get_mut(depth) {
            *extent = (*extent).max(items.len());
        }
        for item in items {
            if let Expr::ArrayLiteral(inner) = item {
                visit(inner, depth + 1, extents);
            }
        }
    }
    let mut extents = vec![0; dimensions.max(1)];
    visit(items, 0, &mut extents);
    extents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Stmt;
    use crate::config::TranslateConfig;
    use crate::traits::{Generator, Target};

    fn cx() -> TranslationContext {
        TranslationContext::new(Target::C, TranslateConfig::default())
    }

    fn array(name: &str, element: SourceType, dimensions: usize, init: ArrayInit) -> Stmt {
        Stmt::ArrayDeclaration {
            name: name.into(),
            element_type: element,
            dimensions,
            init,
        }
    }

    #[test]
    fn test_literal_array() {
        let mut cx = cx();
        let stmt = array(
            "nums",
            SourceType::Int,
            1,
            ArrayInit::Literal(vec![Expr::int(1), Expr::int(2), Expr::int(3)]),
        );
        assert_eq!(
            CGenerator.statement(&stmt, &mut cx).unwrap(),
            vec!["int nums[3] = {1, 2, 3};".to_string()]
        );
        assert_eq!(cx.lookup("nums").unwrap().array_size, Some(3));
    }

    #[test]
    fn test_string_array() {
        let mut cx = cx();
        let stmt = array(
            "names",
            SourceType::String,
            1,
            ArrayInit::Literal(vec![Expr::string("a"), Expr::string("b")]),
        );
        assert_eq!(
            CGenerator.statement(&stmt, &mut cx).unwrap(),
            vec!["char* names[2] = {\"a\", \"b\"};".to_string()]
        );
    }

    #[test]
    fn test_ragged_literal_uses_longest_row() {
        let mut cx = cx();
        let stmt = array(
            "grid",
            SourceType::Int,
            2,
            ArrayInit::Literal(vec![
                Expr::ArrayLiteral(vec![Expr::int(1)]),
                Expr::ArrayLiteral(vec![Expr::int(2), Expr::int(3), Expr::int(4)]),
            ]),
        );
        assert_eq!(
            CGenerator.statement(&stmt, &mut cx).unwrap(),
            vec!["int grid[2][3] = {{1}, {2, 3, 4}};".to_string()]
        );
    }

    #[test]
    fn test_clone_copies_elementwise() {
        let mut cx = cx();
        cx.declare(Symbol::array("a", SourceType::Int, 1, Some(3)));
        let stmt = array("b", SourceType::Int, 1, ArrayInit::Clone(Expr::ident("a")));
        assert_eq!(
            CGenerator.statement(&stmt, &mut cx).unwrap(),
            vec![
                "int b[sizeof(a) / sizeof(a[0])];".to_string(),
                "for (int i = 0; i < sizeof(a) / sizeof(a[0]); i++) {".to_string(),
                "    b[i] = a[i];".to_string(),
                "}".to_string(),
            ]
        );
    }

    #[test]
    fn test_two_dimensional_clone_uses_memcpy() {
        let mut cx = cx();
        cx.declare(Symbol::array("m", SourceType::Double, 2, Some(2)));
        let stmt = array("c", SourceType::Double, 2, ArrayInit::Clone(Expr::ident("m")));
        let lines = CGenerator.statement(&stmt, &mut cx).unwrap();
        assert_eq!(
            lines[0],
            "double c[sizeof(m) / sizeof(m[0])][sizeof(m[0]) / sizeof(m[0][0])];"
        );
        assert_eq!(lines[1], "memcpy(c, m, sizeof(c));");
        assert!(cx.uses(Capability::String));
    }

    #[test]
    fn test_allocation() {
        let mut cx = cx();
        let stmt = array("z", SourceType::Int, 1, ArrayInit::Allocate(vec![Expr::int(5)]));
        assert_eq!(
            CGenerator.statement(&stmt, &mut cx).unwrap(),
            vec!["int z[5] = {0};".to_string()]
        );
        let stmt = array("v", SourceType::Int, 1, ArrayInit::Allocate(vec![Expr::ident("n")]));
        assert_eq!(
            CGenerator.statement(&stmt, &mut cx).unwrap(),
            vec!["int v[n];".to_string(), "memset(v, 0, sizeof(v));".to_string()]
        );
    }

    #[test]
    fn test_zero_length_allocation_is_unsupported() {
        let mut cx = cx();
        let stmt = array("z", SourceType::Int, 1, ArrayInit::Allocate(vec![Expr::int(0)]));
        assert!(matches!(
            CGenerator.statement(&stmt, &mut cx),
            Err(GenerateError::Unsupported(_))
        ));
        assert!(cx.lookup("z").is_none());
    }

    #[test]
    fn test_alias_measures_source() {
        let mut cx = cx();
        cx.declare(Symbol::array("a", SourceType::Int, 1, Some(2)));
        let stmt = array("p", SourceType::Int, 1, ArrayInit::Alias(Expr::ident("a")));
        assert_eq!(
            CGenerator.statement(&stmt, &mut cx).unwrap(),
            vec!["int *p = a;".to_string()]
        );
        let len = CGenerator
            .length(&Expr::ident("p"), &mut cx)
            .unwrap();
        assert_eq!(len, "sizeof(a) / sizeof(a[0])");
    }

    #[test]
    fn test_literal_extents() {
        let items = vec![
            Expr::ArrayLiteral(vec![Expr::int(1), Expr::int(2)]),
            Expr::ArrayLiteral(vec![Expr::int(3)]),
            Expr::ArrayLiteral(vec![]),
        ];
        assert_eq!(literal_extents(&items, 2), vec![3, 2]);
    }
}
