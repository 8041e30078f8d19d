//! `if` chains, and `switch` lowered onto them.

use super::PythonGenerator;
use crate::ast::{Block, ElifBranch, Expr, SwitchCase, SwitchLabel};
use crate::context::TranslationContext;
use crate::output::{case_body, warn_fallthrough};
use crate::traits::GenerateError;

impl PythonGenerator {
    pub(super) fn conditional(
        &self,
        condition: &Expr,
        then_branch: &Block,
        elif_branches: &[ElifBranch],
        else_branch: Option<&Block>,
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError> {
        let c = self.expr(condition, cx)?;
        let mut lines = self.suite(format!("if {c}:"), then_branch, cx);
        for branch in elif_branches {
            let c = self.expr(&branch.condition, cx)?;
            lines.extend(self.suite(format!("elif {c}:"), &branch.body, cx));
        }
        if let Some(block) = else_branch {
            lines.extend(self.suite("else:".to_string(), block, cx));
        }
        Ok(lines)
    }

    /// One branch per case in source order, each ending where the case's
    /// `break` was. The default branch always comes last, as a no-op
    /// `else` when the switch has none.
    pub(super) fn switch(
        &self,
        discriminant: &Expr,
        cases: &[SwitchCase],
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError> {
        warn_fallthrough(cases, cx);
        let d = self.operand(discriminant, cx)?;

        let mut lines = Vec::new();
        let mut default = None;
        for case in cases {
            if case.labels.contains(&SwitchLabel::Default) {
                default = Some(case_body(case));
                continue;
            }
            let tests = case
                .labels
                .iter()
                .filter_map(|label| match label {
                    SwitchLabel::Case(value) => Some(value),
                    SwitchLabel::Default => None,
                })
                .map(|value| self.operand(value, cx).map(|v| format!("{d} == {v}")))
                .collect::<Result<Vec<_>, _>>()?;
            let keyword = if lines.is_empty() { "if" } else { "elif" };
            lines.extend(self.suite(
                format!("{keyword} {}:", tests.join(" or ")),
                &case_body(case),
                cx,
            ));
        }

        let default = default.unwrap_or_default();
        if lines.is_empty() {
            // Only a default: its body runs unconditionally.
            lines.extend(self.suite("if True:".to_string(), &default, cx));
        } else {
            lines.extend(self.suite("else:".to_string(), &default, cx));
        }
        Ok(lines)
    }
}
