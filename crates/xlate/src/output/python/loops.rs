//! Loops.
//!
//! Counting `for` loops become `range()` iteration. Other `for` shapes are
//! unrolled into their initializer, a `while` and the update at the end of
//! the body. `do { } while (c)` runs as `while True:` with a break on the
//! negated condition.

use super::{PythonGenerator, has_no_statement};
use crate::ast::{AssignOp, BinaryOp, Block, CompareOp, Expr, Loop, LoopKind, SourceType, Stmt, UpdateOp};
use crate::context::{Symbol, TranslationContext, literal_integer};
use crate::output::{block_lines, render_statement};
use crate::traits::GenerateError;

/// A `for` header `range()` can express.
struct Counting<'a> {
    var: &'a str,
    ty: SourceType,
    start: &'a Expr,
    op: CompareOp,
    end: &'a Expr,
    step: i64,
}

impl PythonGenerator {
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
            } => {
                if let Some(counting) = counting(init.as_deref(), condition.as_ref(), update, &l.body)
                {
                    return self.range_loop(&counting, &l.body, cx);
                }
                self.while_from_for(init.as_deref(), condition.as_ref(), update, &l.body, cx)
            }

            LoopKind::ForEach {
                var_type,
                var_name,
                iterable,
            } => {
                let source = iterable
                    .as_ident()
                    .and_then(|n| cx.lookup(n))
                    .filter(|s| s.is_array)
                    .cloned();
                let seq = self.expr(iterable, cx)?;
                cx.scoped(|cx| {
                    let target = match source {
                        Some(s) if s.dimensions > 1 => {
                            let target = cx.choose_name(var_name, super::RESERVED);
                            let mut symbol =
                                Symbol::array(var_name.as_str(), *var_type, s.dimensions - 1, None);
                            symbol.target_name = target.clone();
                            cx.declare(symbol);
                            target
                        }
                        _ => self.declare_scalar(var_name, *var_type, cx),
                    };
                    Ok(self.suite(format!("for {target} in {seq}:"), &l.body, cx))
                })
            }

            LoopKind::While { condition } => {
                let c = self.expr(condition, cx)?;
                Ok(self.suite(format!("while {c}:"), &l.body, cx))
            }

            LoopKind::DoWhile { condition } => {
                if l.body.has_own_continue() {
                    cx.warn("`continue` in a do-while body now skips the loop condition");
                }
                let exit = self.negated(condition, cx)?;
                let mut lines = vec![cx.line("while True:")];
                lines.extend(block_lines(self, &l.body, cx));
                cx.indented(|cx| {
                    lines.push(cx.line(format!("if {exit}:")));
                    lines.push(cx.indented(|cx| cx.line("break")));
                });
                Ok(lines)
            }
        }
    }

    fn range_loop(
        &self,
        counting: &Counting<'_>,
        body: &Block,
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError> {
        let start = self.expr(counting.start, cx)?;
        let end = match (counting.op, literal_integer(counting.end)) {
            (CompareOp::Le, Some(n)) => (n + 1).to_string(),
            (CompareOp::Ge, Some(n)) => (n - 1).to_string(),
            (CompareOp::Le, None) => format!("{} + 1", self.operand(counting.end, cx)?),
            (CompareOp::Ge, None) => format!("{} - 1", self.operand(counting.end, cx)?),
            _ => self.expr(counting.end, cx)?,
        };
        let args = match (counting.step, literal_integer(counting.start)) {
            (1, Some(0)) => end,
            (1, _) => format!("{start}, {end}"),
            (step, _) => format!("{start}, {end}, {step}"),
        };
        cx.scoped(|cx| {
            let var = self.declare_scalar(counting.var, counting.ty, cx);
            Ok(self.suite(format!("for {var} in range({args}):"), body, cx))
        })
    }

    /// `for (init; cond; update)` as `init` + `while cond:` with the update
    /// appended to the body.
    fn while_from_for(
        &self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        update: &[Expr],
        body: &Block,
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError> {
        if !update.is_empty() && body.has_own_continue() {
            cx.warn("`continue` in a for loop rewritten as while skips the loop update");
        }
        cx.scoped(|cx| {
            let mut lines = Vec::new();
            if let Some(stmt) = init {
                lines.extend(render_statement(self, stmt, None, cx));
            }
            let c = match condition {
                Some(c) => self.expr(c, cx)?,
                None => "True".to_string(),
            };
            lines.push(cx.line(format!("while {c}:")));

            let mut inner = block_lines(self, body, cx);
            cx.indented(|cx| -> Result<(), GenerateError> {
                for u in update {
                    let text = self.expr_statement(u, cx)?;
                    inner.push(cx.line(text));
                }
                if has_no_statement(&inner) {
                    inner.push(cx.line("pass"));
                }
                Ok(())
            })?;
            lines.extend(inner);
            Ok(lines)
        })
    }

    /// The exit test of a do-while: comparisons flip their operator, other
    /// conditions are wrapped in `not`.
    fn negated(&self, condition: &Expr, cx: &mut TranslationContext) -> Result<String, GenerateError> {
        match condition {
            Expr::Comparison { left, op, right } => {
                let inverted = Expr::Comparison {
                    left: left.clone(),
                    op: op.inverse(),
                    right: right.clone(),
                };
                self.expr(&inverted, cx)
            }
            other => Ok(format!("not {}", self.operand(other, cx)?)),
        }
    }
}

/// Recognize `for (T i = s; i < e; i++)` and its `<=`, `>`, `>=` and
/// `+= k` / `-= k` variants. The body must leave `i` and a variable bound
/// alone.
fn counting<'a>(
    init: Option<&'a Stmt>,
    condition: Option<&'a Expr>,
    update: &'a [Expr],
    body: &Block,
) -> Option<Counting<'a>> {
    let Some(Stmt::VariableDeclaration {
        name,
        ty,
        init: Some(start),
    }) = init
    else {
        return None;
    };
    if !ty.is_integral() || *ty == SourceType::Char {
        return None;
    }
    let Some(Expr::Comparison { left, op, right }) = condition else {
        return None;
    };
    if left.as_ident() != Some(name.as_str()) {
        return None;
    }
    let [step] = update else {
        return None;
    };
    let step = step_of(step, name)?;
    let ascending = matches!(op, CompareOp::Lt | CompareOp::Le);
    let descending = matches!(op, CompareOp::Gt | CompareOp::Ge);
    if !(ascending && step > 0 || descending && step < 0) {
        return None;
    }
    if body.writes(name) || right.as_ident().is_some_and(|bound| body.writes(bound)) {
        return None;
    }
    Some(Counting {
        var: name,
        ty: *ty,
        start,
        op: *op,
        end: right,
        step,
    })
}

/// Signed step of `i++`, `i--`, `i += k` or `i -= k`.
fn step_of(update: &Expr, var: &str) -> Option<i64> {
    match update {
        Expr::Update { target, op, .. } if target.as_ident() == Some(var) => Some(match op {
            UpdateOp::Increment => 1,
            UpdateOp::Decrement => -1,
        }),
        Expr::Assign {
            target,
            op: AssignOp::Compound(op),
            value,
        } if target.as_ident() == Some(var) => {
            let k = literal_integer(value).filter(|k| *k > 0)?;
            match op {
                BinaryOp::Add => Some(k),
                BinaryOp::Sub => Some(-k),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslateConfig;
    use crate::traits::{Generator, Target};

    fn cx() -> TranslationContext {
        let mut cx = TranslationContext::new(Target::Python, TranslateConfig::default());
        cx.declare(Symbol::scalar("total", SourceType::Int));
        cx.declare(Symbol::array("nums", SourceType::Int, 1, Some(3)));
        cx
    }

    fn for_loop(start: i64, op: CompareOp, end: Expr, update: Expr, body: Vec<Stmt>) -> Stmt {
        Stmt::Loop(Loop {
            kind: LoopKind::For {
                init: Some(Box::new(Stmt::declaration(
                    "i",
                    SourceType::Int,
                    Some(Expr::int(start)),
                ))),
                condition: Some(Expr::comparison(Expr::ident("i"), op, end)),
                update: vec![update],
            },
            body: Block::new(body),
        })
    }

    fn add_i() -> Stmt {
        Stmt::expr(Expr::assign(
            Expr::ident("total"),
            AssignOp::Compound(BinaryOp::Add),
            Expr::ident("i"),
        ))
    }

    fn inc() -> Expr {
        Expr::update(Expr::ident("i"), UpdateOp::Increment, false)
    }

    #[test]
    fn test_range_from_zero() {
        let mut cx = cx();
        let stmt = for_loop(
            0,
            CompareOp::Lt,
            Expr::field(Expr::ident("nums"), "length"),
            inc(),
            vec![add_i()],
        );
        assert_eq!(
            PythonGenerator.statement(&stmt, &mut cx).unwrap(),
            vec!["for i in range(len(nums)):", "    total += i"]
        );
        assert!(cx.lookup("i").is_none());
    }

    #[test]
    fn test_range_variants() {
        let mut cx = cx();
        let stmt = for_loop(1, CompareOp::Le, Expr::int(10), inc(), vec![add_i()]);
        assert_eq!(
            PythonGenerator.statement(&stmt, &mut cx).unwrap()[0],
            "for i in range(1, 11):"
        );

        let down = Expr::update(Expr::ident("i"), UpdateOp::Decrement, false);
        let stmt = for_loop(10, CompareOp::Ge, Expr::int(0), down, vec![add_i()]);
        assert_eq!(
            PythonGenerator.statement(&stmt, &mut cx).unwrap()[0],
            "for i in range(10, -1, -1):"
        );

        let by_two = Expr::assign(
            Expr::ident("i"),
            AssignOp::Compound(BinaryOp::Add),
            Expr::int(2),
        );
        let stmt = for_loop(0, CompareOp::Lt, Expr::int(9), by_two, vec![add_i()]);
        assert_eq!(
            PythonGenerator.statement(&stmt, &mut cx).unwrap()[0],
            "for i in range(0, 9, 2):"
        );
    }

    #[test]
    fn test_body_writing_counter_becomes_while() {
        let mut cx = cx();
        let skip = Stmt::expr(inc());
        let stmt = for_loop(0, CompareOp::Lt, Expr::int(5), inc(), vec![skip]);
        assert_eq!(
            PythonGenerator.statement(&stmt, &mut cx).unwrap(),
            vec!["i = 0", "while i < 5:", "    i += 1", "    i += 1"]
        );
    }

    #[test]
    fn test_for_each() {
        let mut cx = cx();
        let stmt = Stmt::Loop(Loop {
            kind: LoopKind::ForEach {
                var_type: SourceType::Int,
                var_name: "n".into(),
                iterable: Expr::ident("nums"),
            },
            body: Block::new(vec![Stmt::expr(Expr::assign(
                Expr::ident("total"),
                AssignOp::Compound(BinaryOp::Add),
                Expr::ident("n"),
            ))]),
        });
        assert_eq!(
            PythonGenerator.statement(&stmt, &mut cx).unwrap(),
            vec!["for n in nums:", "    total += n"]
        );
    }

    #[test]
    fn test_do_while_breaks_on_inverted_condition() {
        let mut cx = cx();
        let stmt = Stmt::Loop(Loop {
            kind: LoopKind::DoWhile {
                condition: Expr::comparison(Expr::ident("i"), CompareOp::Lt, Expr::int(3)),
            },
            body: Block::new(vec![Stmt::expr(inc())]),
        });
        assert_eq!(
            PythonGenerator.statement(&stmt, &mut cx).unwrap(),
            vec!["while True:", "    i += 1", "    if i >= 3:", "        break"]
        );
    }

    #[test]
    fn test_do_while_negates_other_conditions() {
        let mut cx = cx();
        cx.declare(Symbol::scalar("more", SourceType::Boolean));
        let stmt = Stmt::Loop(Loop {
            kind: LoopKind::DoWhile {
                condition: Expr::ident("more"),
            },
            body: Block::default(),
        });
        let lines = PythonGenerator.statement(&stmt, &mut cx).unwrap();
        assert_eq!(lines, vec!["while True:", "    if not more:", "        break"]);
    }
}
