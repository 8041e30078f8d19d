//! C generator.
//!
//! Emits C99: fixed-size arrays, `printf` output and a `main` wrapper. Headers
//! beyond `stdio.h` are added only when a statement of this translation
//! needs them.

mod arrays;
mod control_flow;
mod expressions;
mod loops;
mod print;
pub mod types;
mod variables;

use super::{block_lines, render_statement};
use crate::ast::{Block, Comment, Stmt};
use crate::config::TranslateConfig;
use crate::context::{Capability, TranslationContext};
use crate::traits::{GenerateError, Generator, Target};

/// Static instance of the C generator for the registry.
pub static C_GENERATOR: CGenerator = CGenerator;

/// C generator implementing the [`Generator`] trait.
pub struct CGenerator;

impl Generator for CGenerator {
    fn target(&self) -> Target {
        Target::C
    }

    fn base_indent(&self, config: &TranslateConfig) -> usize {
        usize::from(config.emit_main_wrapper)
    }

    fn statement(
        &self,
        stmt: &Stmt,
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError> {
        match stmt {
            Stmt::VariableDeclaration { name, ty, init } => {
                self.variable_declaration(name, *ty, init.as_ref(), cx)
            }
            Stmt::ArrayDeclaration {
                name,
                element_type,
                dimensions,
                init,
            } => self.array_declaration(name, *element_type, *dimensions, init, cx),
            Stmt::Expr(expr) => {
                let text = self.expr(expr, cx)?;
                Ok(vec![cx.line(format!("{text};"))])
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
            Stmt::Break => Ok(vec![cx.line("break;")]),
            Stmt::Continue => Ok(vec![cx.line("continue;")]),
            Stmt::Return(value) => {
                if value.is_some() {
                    cx.warn("return value dropped: main returns 0");
                }
                Ok(vec![cx.line("return 0;")])
            }
            Stmt::Comment(comment) => Ok(self.comment(comment, cx)),
            Stmt::Block(block) => Ok(self.braced(block, cx)),
            Stmt::Sequence(stmts) => Ok(stmts
                .iter()
                .flat_map(|s| render_statement(self, s, None, cx))
                .collect()),
            Stmt::Unsupported { kind, .. } => Err(GenerateError::Unsupported(kind.clone())),
        }
    }

    fn fallback(&self, text: &str, cx: &mut TranslationContext) -> Option<String> {
        crate::fallback::c_line(text, cx)
    }

    fn trailing_comment(&self, text: &str) -> String {
        format!(" // {text}")
    }

    fn assemble(&self, body: Vec<String>, cx: &TranslationContext) -> String {
        let mut out = vec!["#include <stdio.h>".to_string()];
        for capability in cx.capabilities() {
            out.push(format!("#include <{}>", header(capability)));
        }
        out.push(String::new());

        if cx.config.emit_main_wrapper {
            out.push("int main() {".to_string());
            out.extend(body);
            out.push(format!("{}return 0;", cx.config.indent_unit()));
            out.push("}".to_string());
        } else {
            out.extend(body);
        }

        let mut code = out.join("\n");
        code.push('\n');
        code
    }
}

fn header(capability: Capability) -> &'static str {
    match capability {
        Capability::Bool => "stdbool.h",
        Capability::Math => "math.h",
        Capability::StdLib => "stdlib.h",
        Capability::String => "string.h",
        Capability::Limits => "limits.h",
    }
}

impl CGenerator {
    /// `{ ... }` around a nested block, with the closing brace on its own
    /// line.
    fn braced(&self, block: &Block, cx: &mut TranslationContext) -> Vec<String> {
        let mut lines = vec![cx.line("{")];
        lines.extend(block_lines(self, block, cx));
        lines.push(cx.line("}"));
        lines
    }

    /// Lines of `block` between an opening line ending in `{` and `}`.
    fn body(&self, header: String, block: &Block, cx: &mut TranslationContext) -> Vec<String> {
        let mut lines = vec![cx.line(header)];
        lines.extend(block_lines(self, block, cx));
        lines.push(cx.line("}"));
        lines
    }

    fn comment(&self, comment: &Comment, cx: &TranslationContext) -> Vec<String> {
        if !cx.config.preserve_comments {
            return Vec::new();
        }
        let lines: Vec<&str> = comment.text.lines().collect();
        match (comment.block, lines.as_slice()) {
            (_, []) => vec![cx.line("//")],
            (false, _) => super::comment_lines("//", &comment.text, cx),
            (true, [single]) => vec![cx.line(format!("/* {single} */"))],
            (true, many) => {
                let mut out = vec![cx.line("/*")];
                for line in many {
                    if line.is_empty() {
                        out.push(cx.line(" *"));
                    } else {
                        out.push(cx.line(format!(" * {line}")));
                    }
                }
                out.push(cx.line(" */"));
                out
            }
        }
    }
}
