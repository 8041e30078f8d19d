//! `if` chains and `switch`.

use super::CGenerator;
use crate::ast::{Block, ElifBranch, Expr, SourceType, Stmt, SwitchCase, SwitchLabel};
use crate::context::{Capability, TranslationContext};
use crate::output::{block_lines, case_body, warn_fallthrough};
use crate::traits::GenerateError;

impl CGenerator {
    pub(super) fn conditional(
        &self,
        condition: &Expr,
        then_branch: &Block,
        elif_branches: &[ElifBranch],
        else_branch: Option<&Block>,
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError> {
        let c = self.expr(condition, cx)?;
        let mut lines = vec![cx.line(format!("if ({c}) {{"))];
        lines.extend(block_lines(self, then_branch, cx));

        for branch in elif_branches {
            let c = self.expr(&branch.condition, cx)?;
            lines.push(cx.line(format!("}} else if ({c}) {{")));
            lines.extend(block_lines(self, &branch.body, cx));
        }

        if let Some(block) = else_branch {
            lines.push(cx.line("} else {"));
            lines.extend(block_lines(self, block, cx));
        }
        lines.push(cx.line("}"));
        Ok(lines)
    }

    /// Native `switch`; C falls through exactly like Java. Strings cannot be
    /// switched on and become a `strcmp` chain.
    pub(super) fn switch(
        &self,
        discriminant: &Expr,
        cases: &[SwitchCase],
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError> {
        if cx.type_of(discriminant) == SourceType::String {
            return self.string_switch(discriminant, cases, cx);
        }

        let d = self.expr(discriminant, cx)?;
        let mut lines = vec![cx.line(format!("switch ({d}) {{"))];
        for case in cases {
            let labels = case
                .labels
                .iter()
                .map(|label| match label {
                    SwitchLabel::Case(value) => self.expr(value, cx).map(|v| format!("case {v}:")),
                    SwitchLabel::Default => Ok("default:".to_string()),
                })
                .collect::<Result<Vec<_>, _>>()?;

            // A declaration cannot directly follow a label before C23.
            let declares = case.body.statements.iter().any(|s| {
                matches!(
                    s,
                    Stmt::VariableDeclaration { .. }
                        | Stmt::ArrayDeclaration { .. }
                        | Stmt::Sequence(_)
                )
            });

            cx.indented(|cx| {
                let last = labels.len().saturating_sub(1);
                for (i, label) in labels.iter().enumerate() {
                    if declares && i == last {
                        lines.push(cx.line(format!("{label} {{")));
                    } else {
                        lines.push(cx.line(label));
                    }
                }
                lines.extend(block_lines(self, &case.body, cx));
                if declares {
                    lines.push(cx.line("}"));
                }
            });
        }
        lines.push(cx.line("}"));
        Ok(lines)
    }

    fn string_switch(
        &self,
        discriminant: &Expr,
        cases: &[SwitchCase],
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError> {
        warn_fallthrough(cases, cx);
        cx.require(Capability::String);
        let d = self.expr(discriminant, cx)?;

        let mut lines = Vec::new();
        let mut default = None;
        for case in cases {
            if case.labels.contains(&SwitchLabel::Default) {
                default = Some(case);
                continue;
            }
            let tests = case
                .labels
                .iter()
                .filter_map(|label| match label {
                    SwitchLabel::Case(value) => Some(value),
                    SwitchLabel::Default => None,
                })
                .map(|value| {
                    self.expr(value, cx)
                        .map(|v| format!("strcmp({d}, {v}) == 0"))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let keyword = if lines.is_empty() { "if" } else { "} else if" };
            lines.push(cx.line(format!("{keyword} ({}) {{", tests.join(" || "))));
            lines.extend(block_lines(self, &case_body(case), cx));
        }

        if let Some(case) = default {
            if lines.is_empty() {
                lines.push(cx.line("{"));
            } else {
                lines.push(cx.line("} else {"));
            }
            lines.extend(block_lines(self, &case_body(case), cx));
        }
        if !lines.is_empty() {
            lines.push(cx.line("}"));
        }
        Ok(lines)
    }
}
