//! Loops.

use super::CGenerator;
use super::arrays::{declare_array, pointer_decl, pointer_to};
use super::types::c_type;
use crate::ast::{Block, Expr, Loop, LoopKind, SourceType, Stmt};
use crate::context::{Symbol, TranslationContext};
use crate::output::block_lines;
use crate::traits::GenerateError;

impl CGenerator {
    pub(super) fn loop_statement(
        &self,
        l: &Loop,
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError> {
        match &l.kind {
            LoopKind::For {
                init,
                condition,
                update,
            } => cx.scoped(|cx| {
                let init = match init {
                    Some(stmt) => self.for_init(stmt, cx)?,
                    None => String::new(),
                };
                let condition = match condition {
                    Some(c) => format!(" {}", self.expr(c, cx)?),
                    None => String::new(),
                };
                let update = update
                    .iter()
                    .map(|u| self.expr(u, cx))
                    .collect::<Result<Vec<_>, _>>()?;
                let update = if update.is_empty() {
                    String::new()
                } else {
                    format!(" {}", update.join(", "))
                };
                Ok(self.body(format!("for ({init};{condition};{update}) {{"), &l.body, cx))
            }),

            LoopKind::ForEach {
                var_type,
                var_name,
                iterable,
            } => self.for_each(*var_type, var_name, iterable, &l.body, cx),

            LoopKind::While { condition } => {
                let c = self.expr(condition, cx)?;
                Ok(self.body(format!("while ({c}) {{"), &l.body, cx))
            }

            LoopKind::DoWhile { condition } => {
                let mut lines = vec![cx.line("do {")];
                lines.extend(block_lines(self, &l.body, cx));
                let c = self.expr(condition, cx)?;
                lines.push(cx.line(format!("}} while ({c});")));
                Ok(lines)
            }
        }
    }

    /// The first clause of a `for` header.
    fn for_init(&self, stmt: &Stmt, cx: &mut TranslationContext) -> Result<String, GenerateError> {
        match stmt {
            Stmt::VariableDeclaration { name, ty, init } => {
                self.declarator(name, *ty, init.as_ref(), cx)
            }
            Stmt::Expr(expr) => self.expr(expr, cx),
            Stmt::Sequence(stmts) => {
                let mut parts = Vec::with_capacity(stmts.len());
                let mut decl_type = None;
                for stmt in stmts {
                    match stmt {
                        Stmt::VariableDeclaration { name, ty, init } => {
                            let c_ty = c_type(*ty, cx)?;
                            let text = self.declarator(name, *ty, init.as_ref(), cx)?;
                            // `int i = 0, j = 9`: the type is written once.
                            match decl_type {
                                None => {
                                    decl_type = Some(c_ty);
                                    parts.push(text);
                                }
                                Some(_) => parts.push(
                                    text.strip_prefix(&format!("{c_ty} "))
                                        .unwrap_or(&text)
                                        .to_string(),
                                ),
                            }
                        }
                        Stmt::Expr(expr) if decl_type.is_none() => parts.push(self.expr(expr, cx)?),
                        _ => {
                            return Err(GenerateError::invalid(
                                "for",
                                "initializer mixes declarations and expressions",
                            ));
                        }
                    }
                }
                Ok(parts.join(", "))
            }
            other => Err(GenerateError::invalid(
                "for",
                format!("{} in loop initializer", other.construct()),
            )),
        }
    }

    /// Index loop over an array, binding the element as the body's first
    /// statement.
    fn for_each(
        &self,
        var_type: SourceType,
        var_name: &str,
        iterable: &Expr,
        body: &Block,
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError> {
        let source = iterable
            .as_ident()
            .and_then(|name| cx.lookup(name))
            .filter(|s| s.is_array)
            .cloned()
            .ok_or_else(|| GenerateError::Unsupported("for-each over a non-array value".into()))?;
        let array = self.expr(iterable, cx)?;
        let count = self.length(iterable, cx)?;

        cx.scoped(|cx| {
            let mut index = cx.fresh_name("i");
            if index == var_name {
                cx.declare(Symbol::scalar(&index, SourceType::Int));
                index = cx.fresh_name("i");
            }
            cx.declare(Symbol::scalar(&index, SourceType::Int));

            let header = format!("for (int {index} = 0; {index} < {count}; {index}++) {{");
            let element = format!("{array}[{index}]");

            let binding = cx.indented(|cx| -> Result<String, GenerateError> {
                let c_ty = c_type(var_type, cx)?;
                if source.dimensions > 1 {
                    // Rows of a 2-D array are bound through a pointer.
                    let measured = format!("{}[0]", source.alias_of.as_deref().unwrap_or(&array));
                    let target = declare_array(
                        var_name,
                        var_type,
                        source.dimensions - 1,
                        None,
                        pointer_to(c_ty),
                        Some(measured),
                        cx,
                    );
                    Ok(cx.line(format!("{} = {element};", pointer_decl(c_ty, &target))))
                } else {
                    let target = self.declare_scalar(var_name, var_type, c_ty, cx);
                    Ok(cx.line(format!("{c_ty} {target} = {element};")))
                }
            })?;

            let mut lines = vec![cx.line(header), binding];
            lines.extend(block_lines(self, body, cx));
            lines.push(cx.line("}"));
            Ok(lines)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AssignOp, BinaryOp, CompareOp, UpdateOp};
    use crate::config::TranslateConfig;
    use crate::traits::{Generator, Target};

    fn cx() -> TranslationContext {
        TranslationContext::new(Target::C, TranslateConfig::default())
    }

    fn add_to_total(value: Expr) -> Stmt {
        Stmt::expr(Expr::assign(
            Expr::ident("total"),
            AssignOp::Compound(BinaryOp::Add),
            value,
        ))
    }

    #[test]
    fn test_counting_for() {
        let mut cx = cx();
        let stmt = Stmt::Loop(Loop {
            kind: LoopKind::For {
                init: Some(Box::new(Stmt::declaration(
                    "i",
                    SourceType::Int,
                    Some(Expr::int(0)),
                ))),
                condition: Some(Expr::comparison(
                    Expr::ident("i"),
                    CompareOp::Lt,
                    Expr::int(10),
                )),
                update: vec![Expr::update(Expr::ident("i"), UpdateOp::Increment, false)],
            },
            body: Block::new(vec![add_to_total(Expr::ident("i"))]),
        });
        assert_eq!(
            CGenerator.statement(&stmt, &mut cx).unwrap(),
            vec![
                "for (int i = 0; i < 10; i++) {",
                "    total += i;",
                "}"
            ]
        );
        assert!(cx.lookup("i").is_none());
    }

    #[test]
    fn test_infinite_for() {
        let mut cx = cx();
        let stmt = Stmt::Loop(Loop {
            kind: LoopKind::For {
                init: None,
                condition: None,
                update: vec![],
            },
            body: Block::new(vec![Stmt::Break]),
        });
        assert_eq!(
            CGenerator.statement(&stmt, &mut cx).unwrap()[0],
            "for (;;) {"
        );
    }

    #[test]
    fn test_for_each_binds_element_first() {
        let mut cx = cx();
        cx.declare(Symbol::array("nums", SourceType::Int, 1, Some(3)));
        let stmt = Stmt::Loop(Loop {
            kind: LoopKind::ForEach {
                var_type: SourceType::Int,
                var_name: "n".into(),
                iterable: Expr::ident("nums"),
            },
            body: Block::new(vec![add_to_total(Expr::ident("n"))]),
        });
        assert_eq!(
            CGenerator.statement(&stmt, &mut cx).unwrap(),
            vec![
                "for (int i = 0; i < sizeof(nums) / sizeof(nums[0]); i++) {",
                "    int n = nums[i];",
                "    total += n;",
                "}"
            ]
        );
        assert!(cx.lookup("n").is_none());
    }

    #[test]
    fn test_for_each_index_avoids_loop_variable() {
        let mut cx = cx();
        cx.declare(Symbol::array("xs", SourceType::Int, 1, Some(2)));
        let stmt = Stmt::Loop(Loop {
            kind: LoopKind::ForEach {
                var_type: SourceType::Int,
                var_name: "i".into(),
                iterable: Expr::ident("xs"),
            },
            body: Block::default(),
        });
        let lines = CGenerator.statement(&stmt, &mut cx).unwrap();
        assert_eq!(lines[0], "for (int j = 0; j < sizeof(xs) / sizeof(xs[0]); j++) {");
        assert_eq!(lines[1], "    int i = xs[j];");
    }

    #[test]
    fn test_do_while() {
        let mut cx = cx();
        let stmt = Stmt::Loop(Loop {
            kind: LoopKind::DoWhile {
                condition: Expr::comparison(Expr::ident("i"), CompareOp::Lt, Expr::int(3)),
            },
            body: Block::new(vec![Stmt::expr(Expr::update(
                Expr::ident("i"),
                UpdateOp::Increment,
                false,
            ))]),
        });
        assert_eq!(
            CGenerator.statement(&stmt, &mut cx).unwrap(),
            vec!["do {", "    i++;", "} while (i < 3);"]
        );
    }

    #[test]
    fn test_for_each_over_scalar_fails() {
        let mut cx = cx();
        cx.declare(Symbol::scalar("n", SourceType::Int));
        let stmt = Stmt::Loop(Loop {
            kind: LoopKind::ForEach {
                var_type: SourceType::Int,
                var_name: "x".into(),
                iterable: Expr::ident("n"),
            },
            body: Block::default(),
        });
        assert!(CGenerator.statement(&stmt, &mut cx).is_err());
    }
}
