//! `for`, enhanced `for`, `while` and `do ... while`.

use super::operators::is_comment;
use super::{JavaLowerer, field};
use crate::ast::{Loop, LoopKind, SourceType, Stmt};
use crate::context::{Symbol, TranslationContext};
use crate::traits::LowerError;
use tree_sitter::Node;

pub(super) fn can_lower(kind: &str) -> bool {
    matches!(
        kind,
        "for_statement" | "enhanced_for_statement" | "while_statement" | "do_statement"
    )
}

impl<'a> JavaLowerer<'a> {
    /// Classic `for`. Header declarations live in the loop's own scope.
    pub fn lower_for(&self, node: Node, cx: &mut TranslationContext) -> Result<Stmt, LowerError> {
        cx.scoped(|cx| -> Result<Stmt, LowerError> {
            let mut cursor = node.walk();
            let inits: Vec<Node> = node.children_by_field_name("init", &mut cursor).collect();
            let mut cursor = node.walk();
            let updates: Vec<Node> = node.children_by_field_name("update", &mut cursor).collect();

            let init = match inits.as_slice() {
                [] => None,
                [decl] if decl.kind() == "local_variable_declaration" => {
                    Some(self.lower_local_declaration(*decl, cx)?)
                }
                [single] => Some(Stmt::expr(self.lower_expr(*single, cx)?)),
                many => {
                    let mut stmts = Vec::with_capacity(many.len());
                    for init in many {
                        stmts.push(Stmt::expr(self.lower_expr(*init, cx)?));
                    }
                    Some(Stmt::Sequence(stmts))
                }
            };

            let condition = node
                .child_by_field_name("condition")
                .map(|c| self.lower_expr(c, cx))
                .transpose()?;

            let mut update = Vec::with_capacity(updates.len());
            for u in updates {
                update.push(self.lower_expr(u, cx)?);
            }

            let body = self.lower_body(field(node, "body")?, cx)?;
            Ok(Stmt::Loop(Loop {
                kind: LoopKind::For {
                    init: init.map(Box::new),
                    condition,
                    update,
                },
                body,
            }))
        })
    }

    /// Enhanced `for`. The parts are read by position: type, name, iterable,
    /// body (with optional modifiers in front).
    pub fn lower_for_each(
        &self,
        node: Node,
        cx: &mut TranslationContext,
    ) -> Result<Stmt, LowerError> {
        let mut cursor = node.walk();
        let parts: Vec<Node> = node
            .named_children(&mut cursor)
            .filter(|n| n.kind() != "modifiers" && !is_comment(*n))
            .collect();
        let [type_node, name_node, .., iterable_node, body_node] = parts.as_slice() else {
            return Err(LowerError::Parse(
                "enhanced_for_statement has too few parts".into(),
            ));
        };

        let iterable = self.lower_expr(*iterable_node, cx)?;
        let var_name = self.node_text(*name_node).to_string();
        let source = iterable
            .as_ident()
            .and_then(|n| cx.lookup(n))
            .filter(|s| s.is_array)
            .cloned();

        let type_text = self.node_text(*type_node);
        let var_type = match (type_text, &source) {
            ("var", Some(s)) => s.element_type.unwrap_or(SourceType::Unknown),
            (text, _) if type_node.kind() == "array_type" => {
                SourceType::from_java(text.trim_end_matches(['[', ']', ' ']))
            }
            (text, _) => SourceType::from_java(text),
        };

        let body = cx.scoped(|cx| {
            // Iterating a 2-D array binds each row.
            let symbol = match &source {
                Some(s) if s.dimensions > 1 => {
                    Symbol::array(&var_name, var_type, s.dimensions - 1, None)
                }
                _ => Symbol::scalar(&var_name, var_type),
            };
            cx.declare(symbol);
            self.lower_body(*body_node, cx)
        })?;

        Ok(Stmt::Loop(Loop {
            kind: LoopKind::ForEach {
                var_type,
                var_name,
                iterable,
            },
            body,
        }))
    }

    pub fn lower_while(&self, node: Node, cx: &mut TranslationContext) -> Result<Stmt, LowerError> {
        let condition = self.lower_expr(field(node, "condition")?, cx)?;
        let body = self.lower_body(field(node, "body")?, cx)?;
        Ok(Stmt::Loop(Loop {
            kind: LoopKind::While { condition },
            body,
        }))
    }

    pub fn lower_do_while(
        &self,
        node: Node,
        cx: &mut TranslationContext,
    ) -> Result<Stmt, LowerError> {
        let body = self.lower_body(field(node, "body")?, cx)?;
        let condition = self.lower_expr(field(node, "condition")?, cx)?;
        Ok(Stmt::Loop(Loop {
            kind: LoopKind::DoWhile { condition },
            body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::lower_body;
    use super::*;
    use crate::ast::{CompareOp, Expr};

    fn loop_of(stmt: &Stmt) -> &Loop {
        match stmt {
            Stmt::Loop(l) => l,
            other => panic!("expected loop, got {other:?}"),
        }
    }

    #[test]
    fn test_for_shape() {
        let (stmts, cx) = lower_body("for (int i = 0; i < 10; i++) { sum += i; }");
        let l = loop_of(&stmts[0]);
        match &l.kind {
            LoopKind::For {
                init,
                condition,
                update,
            } => {
                assert!(matches!(
                    init.as_deref(),
                    Some(Stmt::VariableDeclaration { .. })
                ));
                assert!(matches!(
                    condition,
                    Some(Expr::Comparison {
                        op: CompareOp::Lt,
                        ..
                    })
                ));
                assert_eq!(update.len(), 1);
            }
            other => panic!("expected for, got {other:?}"),
        }
        assert_eq!(l.body.statements.len(), 1);
        // The header variable does not leak.
        assert!(cx.lookup("i").is_none());
    }

    #[test]
    fn test_for_with_empty_header() {
        let (stmts, _) = lower_body("for (;;) { break; }");
        match &loop_of(&stmts[0]).kind {
            LoopKind::For {
                init,
                condition,
                update,
            } => {
                assert!(init.is_none());
                assert!(condition.is_none());
                assert!(update.is_empty());
            }
            other => panic!("expected for, got {other:?}"),
        }
    }

    #[test]
    fn test_for_each_positional_parts() {
        let (stmts, cx) = lower_body("int[] xs = {1, 2};\nfor (int x : xs) { total += x; }");
        match &loop_of(&stmts[1]).kind {
            LoopKind::ForEach {
                var_type,
                var_name,
                iterable,
            } => {
                assert_eq!(*var_type, SourceType::Int);
                assert_eq!(var_name, "x");
                assert_eq!(iterable, &Expr::ident("xs"));
            }
            other => panic!("expected for_each, got {other:?}"),
        }
        assert!(cx.lookup("x").is_none());
    }

    #[test]
    fn test_for_each_final_modifier_and_var() {
        let (stmts, _) = lower_body("char[] cs = {'a'};\nfor (final var c : cs) { }");
        assert!(matches!(
            &loop_of(&stmts[1]).kind,
            LoopKind::ForEach {
                var_type: SourceType::Char,
                ..
            }
        ));
    }

    #[test]
    fn test_do_while() {
        let (stmts, _) = lower_body("do { i++; } while (i < 3);");
        let l = loop_of(&stmts[0]);
        assert_eq!(l.kind.tag(), "do_while");
        assert_eq!(l.body.statements.len(), 1);
    }

    #[test]
    fn test_while() {
        let (stmts, _) = lower_body("while (n > 0) n--;");
        assert_eq!(loop_of(&stmts[0]).kind.tag(), "while");
    }
}
