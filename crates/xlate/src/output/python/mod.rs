//! Python generator.
//!
//! Emits Python 3 with no wrapper: top-level statements stay at column
//! zero. Imports are added for the modules a translation actually used.

mod control_flow;
mod expressions;
mod loops;
mod print;
mod variables;

use super::{comment_lines, render_statement};
use crate::ast::{Block, Comment, Stmt};
use crate::config::TranslateConfig;
use crate::context::{Capability, TranslationContext};
use crate::traits::{GenerateError, Generator, Target};

/// Static instance of the Python generator for the registry.
pub static PYTHON_GENERATOR: PythonGenerator = PythonGenerator;

/// Python generator implementing the [`Generator`] trait.
pub struct PythonGenerator;

/// Keywords, plus the builtins and modules generated code calls.
pub const RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "class", "def", "del",
    "elif", "except", "finally", "from", "global", "import", "in", "is", "lambda", "nonlocal",
    "not", "or", "pass", "raise", "try", "with", "yield", "abs", "chr", "float", "int", "len",
    "math", "max", "min", "ord", "print", "random", "range", "str",
];

impl Generator for PythonGenerator {
    fn target(&self) -> Target {
        Target::Python
    }

    fn base_indent(&self, _config: &TranslateConfig) -> usize {
        0
    }

    fn statement(
        &self,
        stmt: &Stmt,
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError> {
        match stmt {
            Stmt::VariableDeclaration { name, ty, init } => {
                let text = self.variable_declaration(name, *ty, init.as_ref(), cx)?;
                Ok(vec![cx.line(text)])
            }
            Stmt::ArrayDeclaration {
                name,
                element_type,
                dimensions,
                init,
            } => {
                let text = self.array_declaration(name, *element_type, *dimensions, init, cx)?;
                Ok(vec![cx.line(text)])
            }
            Stmt::Expr(expr) => {
                let text = self.expr_statement(expr, cx)?;
                Ok(vec![cx.line(text)])
            }
            Stmt::Print(print) => {
                let text = self.print(print, cx)?;
                Ok(vec![cx.line(text)])
            }
            Stmt::Conditional {
                condition,
                then_branch,
                elif_branches,
                else_branch,
            } => self.conditional(condition, then_branch, elif_branches, else_branch.as_ref(), cx),
            Stmt::Switch {
                discriminant,
                cases,
            } => self.switch(discriminant, cases, cx),
            Stmt::Loop(l) => self.loop_statement(l, cx),
            Stmt::Break => Ok(vec![cx.line("break")]),
            Stmt::Continue => Ok(vec![cx.line("continue")]),
            Stmt::Return(value) => {
                if value.is_some() {
                    cx.warn("return value dropped: the script exits instead");
                }
                Ok(vec![cx.line("raise SystemExit")])
            }
            Stmt::Comment(comment) => Ok(self.comment(comment, cx)),
            // No block statement in Python; the contents keep their own scope.
            Stmt::Block(block) => Ok(self.flattened(block, cx)),
            Stmt::Sequence(stmts) => Ok(stmts
                .iter()
                .flat_map(|s| render_statement(self, s, None, cx))
                .collect()),
            Stmt::Unsupported { kind, .. } => Err(GenerateError::Unsupported(kind.clone())),
        }
    }

    fn fallback(&self, text: &str, cx: &mut TranslationContext) -> Option<String> {
        crate::fallback::python_line(text, cx)
    }

    fn trailing_comment(&self, text: &str) -> String {
        format!("  # {text}")
    }

    fn assemble(&self, body: Vec<String>, cx: &TranslationContext) -> String {
        let imports: Vec<String> = cx
            .capabilities()
            .filter_map(module)
            .map(|m| format!("import {m}"))
            .collect();

        let mut out = Vec::with_capacity(imports.len() + body.len() + 1);
        if !imports.is_empty() {
            out.extend(imports);
            out.push(String::new());
        }
        out.extend(body);

        let mut code = out.join("\n");
        code.push('\n');
        code
    }
}

fn module(capability: Capability) -> Option<&'static str> {
    match capability {
        Capability::Math => Some("math"),
        Capability::StdLib => Some("random"),
        Capability::Bool | Capability::String | Capability::Limits => None,
    }
}

impl PythonGenerator {
    fn comment(&self, comment: &Comment, cx: &TranslationContext) -> Vec<String> {
        if !cx.config.preserve_comments {
            return Vec::new();
        }
        if comment.text.is_empty() {
            return vec![cx.line("#")];
        }
        comment_lines("#", &comment.text, cx)
    }

    fn flattened(&self, block: &Block, cx: &mut TranslationContext) -> Vec<String> {
        cx.scoped(|cx| {
            block
                .statements
                .iter()
                .flat_map(|stmt| render_statement(self, stmt, None, cx))
                .collect()
        })
    }

    /// `header:` followed by the block one level deeper. A suite with no
    /// statement of its own (empty, or comments only) gets `pass`.
    fn suite(&self, header: String, block: &Block, cx: &mut TranslationContext) -> Vec<String> {
        let mut lines = vec![cx.line(header)];
        let body = super::block_lines(self, block, cx);
        let needs_pass = has_no_statement(&body);
        lines.extend(body);
        if needs_pass {
            lines.push(cx.indented(|cx| cx.line("pass")));
        }
        lines
    }
}

/// Whether every line is blank or a comment.
fn has_no_statement(lines: &[String]) -> bool {
    lines.iter().all(|line| {
        let line = line.trim_start();
        line.is_empty() || line.starts_with('#')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, SourceType};

    fn cx() -> TranslationContext {
        TranslationContext::new(Target::Python, TranslateConfig::default())
    }

    #[test]
    fn test_block_comment_lines() {
        let cx = cx();
        let comment = Comment {
            text: "first\n\nsecond".into(),
            block: true,
        };
        assert_eq!(
            PythonGenerator.comment(&comment, &cx),
            vec!["# first", "#", "# second"]
        );
    }

    #[test]
    fn test_return_exits() {
        let mut cx = cx();
        assert_eq!(
            PythonGenerator.statement(&Stmt::Return(None), &mut cx).unwrap(),
            vec!["raise SystemExit"]
        );
    }

    #[test]
    fn test_imports_follow_capabilities() {
        let mut cx = cx();
        cx.require(Capability::Bool);
        assert_eq!(
            PythonGenerator.assemble(vec!["x = 1".into()], &cx),
            "x = 1\n"
        );
        cx.require(Capability::Math);
        assert_eq!(
            PythonGenerator.assemble(vec!["x = 1".into()], &cx),
            "import math\n\nx = 1\n"
        );
    }

    #[test]
    fn test_nested_block_flattened() {
        let mut cx = cx();
        let stmt = Stmt::Block(Block::new(vec![Stmt::declaration(
            "t",
            SourceType::Int,
            Some(Expr::int(1)),
        )]));
        assert_eq!(
            PythonGenerator.statement(&stmt, &mut cx).unwrap(),
            vec!["t = 1"]
        );
        assert!(cx.lookup("t").is_none());
    }
}
