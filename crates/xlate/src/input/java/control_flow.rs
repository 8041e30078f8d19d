//! `if` chains and `switch`.

use super::operators::is_comment;
use super::{JavaLowerer, field};
use crate::ast::{Block, ElifBranch, Stmt, SwitchCase, SwitchLabel};
use crate::context::TranslationContext;
use crate::traits::LowerError;
use tree_sitter::Node;

pub(super) fn can_lower(kind: &str) -> bool {
    matches!(
        kind,
        "if_statement"
            | "switch_expression"
            | "switch_statement"
            | "break_statement"
            | "continue_statement"
            | "return_statement"
            | "block"
    )
}

impl<'a> JavaLowerer<'a> {
    /// Lower an `if`, flattening `else if` into elif branches.
    pub fn lower_if(&self, node: Node, cx: &mut TranslationContext) -> Result<Stmt, LowerError> {
        let condition = self.lower_expr(field(node, "condition")?, cx)?;
        let then_branch = self.lower_body(field(node, "consequence")?, cx)?;

        let mut elif_branches = Vec::new();
        let mut else_branch = None;
        let mut alternative = node.child_by_field_name("alternative");
        while let Some(alt) = alternative {
            if alt.kind() == "if_statement" {
                elif_branches.push(ElifBranch {
                    condition: self.lower_expr(field(alt, "condition")?, cx)?,
                    body: self.lower_body(field(alt, "consequence")?, cx)?,
                });
                alternative = alt.child_by_field_name("alternative");
            } else {
                else_branch = Some(self.lower_body(alt, cx)?);
                alternative = None;
            }
        }

        Ok(Stmt::Conditional {
            condition,
            then_branch,
            elif_branches,
            else_branch,
        })
    }

    /// Lower a `switch` in either colon or arrow form. Arrow rules never fall
    /// through, so each one ends in an explicit `break`. A colon group with no
    /// statements (`case 1: case 2: ...`) shares the next group's body.
    pub fn lower_switch(&self, node: Node, cx: &mut TranslationContext) -> Result<Stmt, LowerError> {
        let discriminant = self.lower_expr(field(node, "condition")?, cx)?;
        let body = field(node, "body")?;

        let cases = cx.scoped(|cx| -> Result<Vec<SwitchCase>, LowerError> {
            let mut cases: Vec<SwitchCase> = Vec::new();
            let mut pending = SwitchCase::default();
            let mut cursor = body.walk();
            for child in body.named_children(&mut cursor) {
                match child.kind() {
                    "switch_block_statement_group" => {
                        let mut case = self.lower_switch_group(child, cx)?;
                        pending.labels.append(&mut case.labels);
                        pending.body.statements.append(&mut case.body.statements);
                        let has_code = pending
                            .body
                            .statements
                            .iter()
                            .any(|s| !matches!(s, Stmt::Comment(_)));
                        if has_code {
                            cases.push(std::mem::take(&mut pending));
                        }
                    }
                    "switch_rule" => cases.push(self.lower_switch_rule(child, cx)?),
                    _ if is_comment(child) && !pending.labels.is_empty() => {
                        pending
                            .body
                            .statements
                            .push(Stmt::Comment(self.lower_comment(child)));
                    }
                    _ if is_comment(child) => {
                        // Comments between groups stay with the preceding case.
                        if let Some(last) = cases.last_mut() {
                            last.body
                                .statements
                                .push(Stmt::Comment(self.lower_comment(child)));
                        }
                    }
                    kind => {
                        return Err(LowerError::UnexpectedNode {
                            expected: "switch case".into(),
                            got: kind.to_string(),
                        });
                    }
                }
            }
            if !pending.labels.is_empty() {
                cases.push(pending);
            }
            Ok(cases)
        })?;

        Ok(Stmt::Switch {
            discriminant,
            cases,
        })
    }

    fn lower_switch_group(
        &self,
        node: Node,
        cx: &mut TranslationContext,
    ) -> Result<SwitchCase, LowerError> {
        let mut labels = Vec::new();
        let mut statements = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "switch_label" {
                labels.extend(self.lower_switch_label(child, cx)?);
            } else if let Some(stmt) = self.lower_one(child, cx) {
                statements.push(stmt);
            }
        }
        Ok(SwitchCase {
            labels,
            body: Block::new(statements),
        })
    }

    fn lower_switch_rule(
        &self,
        node: Node,
        cx: &mut TranslationContext,
    ) -> Result<SwitchCase, LowerError> {
        let mut labels = Vec::new();
        let mut body = Block::default();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "switch_label" => labels.extend(self.lower_switch_label(child, cx)?),
                _ if is_comment(child) => {
                    body.statements
                        .push(Stmt::Comment(self.lower_comment(child)));
                }
                _ => body = self.lower_body(child, cx)?,
            }
        }
        if !body.ends_with_jump() {
            body.statements.push(Stmt::Break);
        }
        Ok(SwitchCase { labels, body })
    }

    /// `case A, B` yields one label per constant.
    fn lower_switch_label(
        &self,
        node: Node,
        cx: &mut TranslationContext,
    ) -> Result<Vec<SwitchLabel>, LowerError> {
        if self.node_text(node).trim_start().starts_with("default") {
            return Ok(vec![SwitchLabel::Default]);
        }
        let mut labels = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "guard" | "pattern" | "record_pattern" | "type_pattern" => {
                    return Err(LowerError::Unsupported("pattern matching case".into()));
                }
                _ if is_comment(child) => {}
                _ => labels.push(SwitchLabel::Case(self.lower_expr(child, cx)?)),
            }
        }
        Ok(labels)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::lower_body;
    use super::*;
    use crate::ast::{CompareOp, Expr};

    #[test]
    fn test_else_if_chain_flattened() {
        let (stmts, _) = lower_body(
            "if (x < 0) { y = 1; } else if (x == 0) { y = 2; } else if (x > 9) { y = 3; } else { y = 4; }",
        );
        match &stmts[0] {
            Stmt::Conditional {
                condition,
                elif_branches,
                else_branch,
                ..
            } => {
                assert!(matches!(
                    condition,
                    Expr::Comparison {
                        op: CompareOp::Lt,
                        ..
                    }
                ));
                assert_eq!(elif_branches.len(), 2);
                assert!(else_branch.is_some());
            }
            other => panic!("expected conditional, got {other:?}"),
        }
    }

    #[test]
    fn test_unbraced_branch_is_block() {
        let (stmts, _) = lower_body("if (ok) x = 1;");
        match &stmts[0] {
            Stmt::Conditional { then_branch, .. } => assert_eq!(then_branch.statements.len(), 1),
            other => panic!("expected conditional, got {other:?}"),
        }
    }

    #[test]
    fn test_branch_declarations_are_scoped() {
        let (_, cx) = lower_body("if (ok) { int inner = 1; }");
        assert!(cx.lookup("inner").is_none());
    }

    #[test]
    fn test_switch_groups_and_labels() {
        let (stmts, _) = lower_body(
            "switch (day) {\n case 1:\n case 2:\n  x = 1;\n  break;\n default:\n  x = 0;\n}",
        );
        match &stmts[0] {
            Stmt::Switch { cases, .. } => {
                assert_eq!(cases.len(), 2);
                assert_eq!(cases[0].labels.len(), 2);
                assert!(cases[0].body.ends_with_jump());
                assert_eq!(cases[1].labels, vec![SwitchLabel::Default]);
            }
            other => panic!("expected switch, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_groups_join_next_labels() {
        let (stmts, _) = lower_body(
            "switch (day) {\n case 1:\n // weekend\n case 7:\n  x = 1;\n  break;\n case 2:\n  x = 2;\n  break;\n case 3:\n}",
        );
        match &stmts[0] {
            Stmt::Switch { cases, .. } => {
                assert_eq!(cases.len(), 3);
                assert_eq!(cases[0].labels.len(), 2);
                assert!(matches!(cases[0].body.statements[0], Stmt::Comment(_)));
                assert_eq!(cases[1].labels.len(), 1);
                // A trailing label with no body is kept as an empty case.
                assert_eq!(cases[2].labels.len(), 1);
                assert!(cases[2].body.statements.is_empty());
            }
            other => panic!("expected switch, got {other:?}"),
        }
    }

    #[test]
    fn test_arrow_rules_get_break() {
        let (stmts, _) = lower_body("switch (n) {\n case 1 -> x = 1;\n case 2, 3 -> { x = 2; }\n}");
        match &stmts[0] {
            Stmt::Switch { cases, .. } => {
                assert_eq!(cases.len(), 2);
                assert_eq!(cases[1].labels.len(), 2);
                assert!(cases.iter().all(|c| c.body.ends_with_jump()));
            }
            other => panic!("expected switch, got {other:?}"),
        }
    }
}
