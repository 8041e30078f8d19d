//! Target generators.
//!
//! Each target has one generator family; the per-construct modules inside it
//! add methods to the family's generator type. Shared here is the policy for
//! statements a generator cannot render: try the degraded text path, then
//! leave a placeholder comment.

#[cfg(feature = "write-c")]
pub mod c;
#[cfg(feature = "write-python")]
pub mod python;

#[cfg(feature = "write-c")]
pub use c::{C_GENERATOR, CGenerator};
#[cfg(feature = "write-python")]
pub use python::{PYTHON_GENERATOR, PythonGenerator};

use crate::ast::{Block, Stmt, SwitchCase};
use crate::context::TranslationContext;
use crate::traits::Generator;

/// Render a statement, degrading instead of failing.
///
/// `source` is the statement's original text when the caller has it;
/// [`Stmt::Unsupported`] carries its own.
pub fn render_statement<G: Generator + ?Sized>(
    generator: &G,
    stmt: &Stmt,
    source: Option<&str>,
    cx: &mut TranslationContext,
) -> Vec<String> {
    let failure = match generator.statement(stmt, cx) {
        Ok(lines) if !lines.is_empty() || may_be_empty(stmt, cx) => return lines,
        Ok(_) => format!("{} produced no output", stmt.construct()),
        Err(err) => err.to_string(),
    };

    let text = match stmt {
        Stmt::Unsupported { text, .. } => Some(text.as_str()),
        _ => source,
    };
    if let Some(line) = text.and_then(|t| generator.fallback(t, cx)) {
        cx.warn(format!("{failure}; used degraded translation: {line}"));
        return vec![cx.line(line)];
    }

    cx.warn(format!("{failure}; left a placeholder"));
    vec![cx.line(generator.placeholder(stmt.construct()))]
}

fn may_be_empty(stmt: &Stmt, cx: &TranslationContext) -> bool {
    match stmt {
        Stmt::Comment(_) => !cx.config.preserve_comments,
        Stmt::Block(block) => block.is_empty(),
        Stmt::Sequence(stmts) => stmts.is_empty(),
        _ => false,
    }
}

/// Lines of a nested block, one level deeper and in a child scope.
pub fn block_lines<G: Generator + ?Sized>(
    generator: &G,
    block: &Block,
    cx: &mut TranslationContext,
) -> Vec<String> {
    cx.indented(|cx| {
        cx.scoped(|cx| {
            block
                .statements
                .iter()
                .flat_map(|stmt| render_statement(generator, stmt, None, cx))
                .collect()
        })
    })
}

/// Comment lines with `prefix`, one per source line.
pub(crate) fn comment_lines(prefix: &str, text: &str, cx: &TranslationContext) -> Vec<String> {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                cx.line(prefix)
            } else {
                cx.line(format!("{prefix} {line}"))
            }
        })
        .collect()
}

/// A case body without its trailing `break`, for targets that lower a
/// switch to an if/else chain.
pub(crate) fn case_body(case: &SwitchCase) -> Block {
    let mut statements = case.body.statements.clone();
    if matches!(statements.last(), Some(Stmt::Break)) {
        statements.pop();
    }
    Block::new(statements)
}

/// Warn about the cases of a switch lowered to an if/else chain whose
/// bodies run into the next case.
pub(crate) fn warn_fallthrough(cases: &[SwitchCase], cx: &mut TranslationContext) {
    let Some((_, init)) = cases.split_last() else {
        return;
    };
    for (index, case) in init.iter().enumerate() {
        if !case.body.ends_with_jump() {
            cx.warn(format!(
                "switch case {} falls through; the next case is not run",
                index + 1
            ));
        }
    }
    if cases.iter().any(|case| case_body(case).statements.iter().any(breaks_out)) {
        cx.warn("`break` nested inside a switch case now applies to the enclosing loop");
    }
}

/// Whether a statement contains a `break` aimed at an enclosing switch.
fn breaks_out(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Break => true,
        Stmt::Conditional {
            then_branch,
            elif_branches,
            else_branch,
            ..
        } => {
            then_branch.statements.iter().any(breaks_out)
                || elif_branches
                    .iter()
                    .any(|b| b.body.statements.iter().any(breaks_out))
                || else_branch
                    .as_ref()
                    .is_some_and(|b| b.statements.iter().any(breaks_out))
        }
        Stmt::Block(block) => block.statements.iter().any(breaks_out),
        _ => false,
    }
}

/// Floating literal text with an explicit fractional part (`5` → `5.0`,
/// `.5` → `0.5`, `5.` → `5.0`). Exponent and hex forms are kept.
pub(crate) fn decimal_text(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    if lower.starts_with("0x") || lower.contains('e') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 2);
    if text.starts_with('.') {
        out.push('0');
    }
    out.push_str(text);
    if !text.contains('.') {
        out.push_str(".0");
    } else if text.ends_with('.') {
        out.push('0');
    }
    out
}
