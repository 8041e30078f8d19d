//! Array declarations: literals, allocations, clones and aliases.

use super::operators::is_comment;
use super::variables::count_dimensions;
use super::{JavaLowerer, field};
use crate::ast::{ArrayInit, Expr, SourceType, Stmt};
use crate::context::{Symbol, TranslationContext, literal_integer};
use crate::traits::LowerError;
use tree_sitter::Node;

impl<'a> JavaLowerer<'a> {
    pub(super) fn lower_array_declarator(
        &self,
        name: &str,
        element_type: SourceType,
        dimensions: usize,
        value: Option<Node>,
        cx: &mut TranslationContext,
    ) -> Result<Stmt, LowerError> {
        if element_type == SourceType::Unknown {
            cx.warn(format!("element type of array `{name}` is not supported"));
        }

        let (init, size, alias_of) = match value {
            None => (ArrayInit::Default, None, None),
            Some(value) => self.lower_array_value(value, cx)?,
        };

        let mut symbol = Symbol::array(name, element_type, dimensions, size);
        symbol.alias_of = alias_of;
        cx.declare(symbol);

        Ok(Stmt::ArrayDeclaration {
            name: name.to_string(),
            element_type,
            dimensions,
            init,
        })
    }

    /// Classify an array initializer. Returns the init, the outer extent when
    /// it is known, and the aliased array's name.
    fn lower_array_value(
        &self,
        value: Node,
        cx: &mut TranslationContext,
    ) -> Result<(ArrayInit, Option<usize>, Option<String>), LowerError> {
        match value.kind() {
            "array_initializer" => {
                let items = self.literal_items(value, cx)?;
                let size = items.len();
                Ok((ArrayInit::Literal(items), Some(size), None))
            }

            "array_creation_expression" => {
                if let Some(literal) = value.child_by_field_name("value") {
                    let items = self.literal_items(literal, cx)?;
                    let size = items.len();
                    return Ok((ArrayInit::Literal(items), Some(size), None));
                }
                let mut extents = Vec::new();
                let mut cursor = value.walk();
                for child in value.named_children(&mut cursor) {
                    if child.kind() == "dimensions_expr" {
                        let inner = child.named_child(0).ok_or_else(|| {
                            LowerError::Parse("dimensions_expr missing size".into())
                        })?;
                        extents.push(self.lower_expr(inner, cx)?);
                    }
                }
                let size = extents
                    .first()
                    .and_then(literal_integer)
                    .and_then(|n| usize::try_from(n).ok());
                Ok((ArrayInit::Allocate(extents), size, None))
            }

            "method_invocation" if self.is_clone_call(value) => {
                let source = self.lower_expr(field(value, "object")?, cx)?;
                let size = source
                    .as_ident()
                    .and_then(|n| cx.lookup(n))
                    .and_then(|s| s.array_size);
                Ok((ArrayInit::Clone(source), size, None))
            }

            _ => {
                let source = self.lower_expr(value, cx)?;
                let (size, alias_of) = match source.as_ident().and_then(|n| cx.lookup(n)) {
                    Some(symbol) if symbol.is_array => {
                        (symbol.array_size, Some(symbol.source_name.clone()))
                    }
                    _ => {
                        cx.warn(format!(
                            "array initializer `{}` is not an array variable",
                            self.node_text(value)
                        ));
                        (None, None)
                    }
                };
                Ok((ArrayInit::Alias(source), size, alias_of))
            }
        }
    }

    fn literal_items(
        &self,
        node: Node,
        cx: &mut TranslationContext,
    ) -> Result<Vec<Expr>, LowerError> {
        match self.lower_array_initializer(node, cx)? {
            Expr::ArrayLiteral(items) => Ok(items),
            _ => Err(LowerError::UnexpectedNode {
                expected: "array_initializer".into(),
                got: node.kind().to_string(),
            }),
        }
    }

    /// `x.clone()` with no arguments.
    fn is_clone_call(&self, node: Node) -> bool {
        let named_clone = node
            .child_by_field_name("name")
            .is_some_and(|n| self.node_text(n) == "clone");
        let no_args = node.child_by_field_name("arguments").is_none_or(|args| {
            let mut cursor = args.walk();
            args.named_children(&mut cursor).all(is_comment)
        });
        named_clone && no_args && node.child_by_field_name("object").is_some()
    }

    /// Total rank of `new T[a][b][]`: sized and unsized brackets together.
    pub(super) fn creation_dimensions(&self, node: Node) -> usize {
        let mut dims = 0;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "dimensions_expr" => dims += 1,
                "dimensions" => dims += count_dimensions(self.node_text(child)),
                _ => {}
            }
        }
        dims
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::lower_body;
    use super::*;

    #[test]
    fn test_literal_array_registers_size() {
        let (stmts, cx) = lower_body("int[] nums = {1, 2, 3};");
        assert_eq!(
            stmts[0],
            Stmt::ArrayDeclaration {
                name: "nums".into(),
                element_type: SourceType::Int,
                dimensions: 1,
                init: ArrayInit::Literal(vec![Expr::int(1), Expr::int(2), Expr::int(3)]),
            }
        );
        let symbol = cx.lookup("nums").unwrap();
        assert!(symbol.is_array);
        assert_eq!(symbol.array_size, Some(3));
    }

    #[test]
    fn test_c_style_brackets() {
        let (stmts, _) = lower_body("int nums[] = {4, 5};");
        assert!(matches!(
            &stmts[0],
            Stmt::ArrayDeclaration { dimensions: 1, .. }
        ));
    }

    #[test]
    fn test_nested_literal() {
        let (stmts, cx) = lower_body("int[][] grid = {{1, 2}, {3, 4}, {5, 6}};");
        match &stmts[0] {
            Stmt::ArrayDeclaration {
                dimensions, init, ..
            } => {
                assert_eq!(*dimensions, 2);
                let ArrayInit::Literal(rows) = init else {
                    panic!("expected literal rows");
                };
                assert_eq!(rows.len(), 3);
                assert!(matches!(&rows[0], Expr::ArrayLiteral(cells) if cells.len() == 2));
            }
            other => panic!("expected array declaration, got {other:?}"),
        }
        assert_eq!(cx.lookup("grid").unwrap().dimensions, 2);
    }

    #[test]
    fn test_clone_is_marked() {
        let (stmts, cx) = lower_body("int[] a = {1, 2};\nint[] b = a.clone();");
        assert!(matches!(
            &stmts[1],
            Stmt::ArrayDeclaration {
                init: ArrayInit::Clone(Expr::Ident(src)),
                ..
            } if src == "a"
        ));
        assert_eq!(cx.lookup("b").unwrap().array_size, Some(2));
    }

    #[test]
    fn test_allocation() {
        let (stmts, cx) = lower_body("double[] vals = new double[4];");
        assert!(matches!(
            &stmts[0],
            Stmt::ArrayDeclaration {
                init: ArrayInit::Allocate(extents),
                ..
            } if extents == &vec![Expr::int(4)]
        ));
        assert_eq!(cx.lookup("vals").unwrap().array_size, Some(4));
    }

    #[test]
    fn test_alias_records_source() {
        let (stmts, cx) = lower_body("int[] a = {1};\nint[] b = a;");
        assert!(matches!(
            &stmts[1],
            Stmt::ArrayDeclaration {
                init: ArrayInit::Alias(_),
                ..
            }
        ));
        assert_eq!(cx.lookup("b").unwrap().alias_of.as_deref(), Some("a"));
    }

    #[test]
    fn test_var_with_array_creation() {
        let (stmts, _) = lower_body("var xs = new long[2][3];");
        assert!(matches!(
            &stmts[0],
            Stmt::ArrayDeclaration {
                element_type: SourceType::Long,
                dimensions: 2,
                ..
            }
        ));
    }
}
