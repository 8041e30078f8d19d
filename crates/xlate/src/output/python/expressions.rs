//! Expression rendering for Python.

use super::PythonGenerator;
use crate::ast::*;
use crate::context::{Capability, TranslationContext, literal_integer};
use crate::output::decimal_text;
use crate::traits::GenerateError;

impl PythonGenerator {
    pub(super) fn expr(
        &self,
        expr: &Expr,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        match expr {
            Expr::Literal(lit) => Ok(literal(lit)),
            Expr::Ident(name) => Ok(cx.target_name(name)),

            Expr::Binary { left, op, right } => {
                if cx.is_concatenation(expr) {
                    let parts = cx.concat_parts(expr);
                    return self.concatenation(&parts, cx);
                }
                let integral = cx.type_of(expr).is_integral();
                let l = self.numeric_operand(left, cx)?;
                let r = self.numeric_operand(right, cx)?;
                Ok(match op {
                    BinaryOp::Div if integral => format!("{l} // {r}"),
                    BinaryOp::UShr => format!("({l} & {}) >> {r}", mask(cx.type_of(left))),
                    _ => format!("{l} {} {r}", op.symbol()),
                })
            }

            Expr::Unary { op, operand } => {
                let o = self.operand(operand, cx)?;
                Ok(match op {
                    UnaryOp::Not => format!("not {o}"),
                    _ => format!("{}{o}", op.symbol()),
                })
            }

            Expr::Logical { left, op, right } => {
                let l = self.operand(left, cx)?;
                let r = self.operand(right, cx)?;
                let keyword = match op {
                    LogicalOp::And => "and",
                    LogicalOp::Or => "or",
                };
                Ok(format!("{l} {keyword} {r}"))
            }

            Expr::Comparison { left, op, right } => {
                let lt = cx.type_of(left);
                let rt = cx.type_of(right);
                if lt == SourceType::String
                    && rt == SourceType::String
                    && matches!(op, CompareOp::Eq | CompareOp::Ne)
                {
                    cx.warn("string `==` compares references; emitted a content comparison");
                }
                // `c == 65`: a char meets an int only through its code point.
                let mixed = (lt == SourceType::Char) != (rt == SourceType::Char)
                    && lt.is_integral()
                    && rt.is_integral();
                let l = if mixed {
                    self.numeric_operand(left, cx)?
                } else {
                    self.operand(left, cx)?
                };
                let r = if mixed {
                    self.numeric_operand(right, cx)?
                } else {
                    self.operand(right, cx)?
                };
                Ok(format!("{l} {} {r}", op.symbol()))
            }

            Expr::Assign { .. } => Err(GenerateError::Unsupported(
                "assignment used as a value".into(),
            )),
            Expr::Update { .. } => Err(GenerateError::Unsupported(
                "increment used as a value".into(),
            )),

            Expr::ArrayAccess { array, index } => {
                let a = self.operand(array, cx)?;
                // a[a.length - k] indexes from the end.
                if let Some(k) = from_end(array, index) {
                    return Ok(format!("{a}[-{k}]"));
                }
                let i = self.expr(index, cx)?;
                Ok(format!("{a}[{i}]"))
            }

            Expr::FieldAccess { object, field } => {
                if let Some(array) = expr.length_of() {
                    return Ok(format!("len({})", self.expr(array, cx)?));
                }
                constant(object.as_ident(), field, cx).ok_or_else(|| {
                    GenerateError::Unsupported(format!("field access `.{field}`"))
                })
            }

            Expr::ArrayLiteral(items) => {
                let rendered = items
                    .iter()
                    .map(|item| self.expr(item, cx))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("[{}]", rendered.join(", ")))
            }

            Expr::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                let c = self.operand(condition, cx)?;
                let a = self.operand(then_expr, cx)?;
                let b = self.operand(else_expr, cx)?;
                Ok(format!("{a} if {c} else {b}"))
            }

            Expr::Cast { ty, expr: inner } => self.cast(*ty, inner, cx),

            Expr::Call {
                receiver,
                method,
                args,
            } => self.call(receiver.as_deref(), method, args, cx),
        }
    }

    /// Render `expr` for use inside a larger expression.
    pub(super) fn operand(
        &self,
        expr: &Expr,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        let text = self.expr(expr, cx)?;
        if expr.is_compound() {
            Ok(format!("({text})"))
        } else {
            Ok(text)
        }
    }

    /// Operand of arithmetic: a `char` takes part as its code point.
    fn numeric_operand(
        &self,
        expr: &Expr,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        if cx.type_of(expr) == SourceType::Char {
            return Ok(format!("ord({})", self.expr(expr, cx)?));
        }
        self.operand(expr, cx)
    }

    /// Explicit `+` concatenation with every non-string part passed through
    /// `str()`.
    pub(super) fn concatenation(
        &self,
        parts: &[&Expr],
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        let rendered = parts
            .iter()
            .map(|part| self.string_value(part, cx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rendered.join(" + "))
    }

    /// A value as the text Java would print for it.
    pub(super) fn string_value(
        &self,
        expr: &Expr,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        match cx.type_of(expr) {
            SourceType::String | SourceType::Char => self.operand(expr, cx),
            SourceType::Boolean => self.boolean_text(expr, cx),
            _ => Ok(format!("str({})", self.expr(expr, cx)?)),
        }
    }

    /// Java spells booleans in lower case.
    pub(super) fn boolean_text(
        &self,
        expr: &Expr,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        match expr {
            Expr::Literal(Literal::Bool(value)) => Ok(format!("\"{value}\"")),
            _ => Ok(format!("str({}).lower()", self.expr(expr, cx)?)),
        }
    }

    /// Statement form of an expression: assignments and increments become
    /// assignment statements.
    pub(super) fn expr_statement(
        &self,
        expr: &Expr,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        match expr {
            Expr::Update { target, op, .. } => {
                let t = self.expr(target, cx)?;
                let sign = match op {
                    UpdateOp::Increment => "+",
                    UpdateOp::Decrement => "-",
                };
                if cx.type_of(target) == SourceType::Char {
                    return Ok(format!("{t} = chr(ord({t}) {sign} 1)"));
                }
                Ok(format!("{t} {sign}= 1"))
            }
            Expr::Assign { target, op, value } => self.assignment(target, *op, value, cx),
            _ => self.expr(expr, cx),
        }
    }

    fn assignment(
        &self,
        target: &Expr,
        op: AssignOp,
        value: &Expr,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        let target_ty = cx.type_of(target);
        let t = self.expr(target, cx)?;
        match op {
            AssignOp::Assign => Ok(format!("{t} = {}", self.expr(value, cx)?)),
            AssignOp::Compound(BinaryOp::Add) if target_ty == SourceType::String => {
                Ok(format!("{t} += {}", self.string_value(value, cx)?))
            }
            AssignOp::Compound(op) if target_ty == SourceType::Char => {
                let v = self.numeric_operand(value, cx)?;
                Ok(format!("{t} = chr(ord({t}) {} {v})", op.symbol()))
            }
            AssignOp::Compound(BinaryOp::Div) if target_ty.is_integral() => {
                Ok(format!("{t} //= {}", self.numeric_operand(value, cx)?))
            }
            AssignOp::Compound(BinaryOp::UShr) => Ok(format!(
                "{t} = ({t} & {}) >> {}",
                mask(target_ty),
                self.operand(value, cx)?
            )),
            AssignOp::Compound(op) => {
                Ok(format!("{t} {}= {}", op.symbol(), self.numeric_operand(value, cx)?))
            }
        }
    }

    fn cast(
        &self,
        ty: SourceType,
        inner: &Expr,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        let from = cx.type_of(inner);
        let text = self.expr(inner, cx)?;
        Ok(match ty {
            SourceType::Byte | SourceType::Short | SourceType::Int | SourceType::Long => {
                if from == SourceType::Char {
                    format!("ord({text})")
                } else if from.is_integral() {
                    text
                } else {
                    format!("int({text})")
                }
            }
            SourceType::Float | SourceType::Double => format!("float({text})"),
            SourceType::Char if from.is_integral() && from != SourceType::Char => {
                format!("chr({text})")
            }
            SourceType::Char => text,
            SourceType::String => format!("str({text})"),
            SourceType::Boolean => format!("bool({text})"),
            SourceType::Unknown => {
                return Err(GenerateError::Unsupported("cast to an unknown type".into()));
            }
        })
    }

    fn call(
        &self,
        receiver: Option<&Expr>,
        method: &str,
        args: &[Expr],
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        let rendered = args
            .iter()
            .map(|a| self.expr(a, cx))
            .collect::<Result<Vec<_>, _>>()?;
        let joined = rendered.join(", ");

        match (receiver.and_then(Expr::as_ident), method, rendered.as_slice()) {
            (Some("Math"), "abs" | "max" | "min", _) => Ok(format!("{method}({joined})")),
            (Some("Math"), "round", [x]) => {
                // Java rounds halves up; Python's round() goes to even.
                cx.require(Capability::Math);
                Ok(format!("math.floor({x} + 0.5)"))
            }
            (Some("Math"), "floor" | "ceil", [x]) => {
                cx.require(Capability::Math);
                Ok(format!("float(math.{method}({x}))"))
            }
            (Some("Math"), "random", []) => {
                cx.require(Capability::StdLib);
                Ok("random.random()".to_string())
            }
            (
                Some("Math"),
                "sqrt" | "cbrt" | "pow" | "exp" | "log" | "log10" | "sin" | "cos" | "tan"
                | "asin" | "acos" | "atan" | "atan2" | "hypot",
                _,
            ) => {
                cx.require(Capability::Math);
                Ok(format!("math.{method}({joined})"))
            }
            (Some("Integer"), "parseInt", [s]) | (Some("Long"), "parseLong", [s]) => {
                Ok(format!("int({s})"))
            }
            (Some("Double"), "parseDouble", [s]) => Ok(format!("float({s})")),
            (Some("String"), "valueOf", [_]) => self.string_value(&args[0], cx),
            (_, "length", []) => Ok(format!("len({})", self.string_receiver(receiver, method, cx)?)),
            (_, "charAt", [i]) => {
                Ok(format!("{}[{i}]", self.string_receiver(receiver, method, cx)?))
            }
            (_, "equals", [_]) => {
                let s = self.string_receiver(receiver, method, cx)?;
                let other = self.operand(&args[0], cx)?;
                Ok(format!("{s} == {other}"))
            }
            (_, "toUpperCase", []) => {
                Ok(format!("{}.upper()", self.string_receiver(receiver, method, cx)?))
            }
            (_, "toLowerCase", []) => {
                Ok(format!("{}.lower()", self.string_receiver(receiver, method, cx)?))
            }
            (_, "trim", []) => Ok(format!("{}.strip()", self.string_receiver(receiver, method, cx)?)),
            (_, "substring", [from]) => {
                Ok(format!("{}[{from}:]", self.string_receiver(receiver, method, cx)?))
            }
            (_, "substring", [from, to]) => {
                Ok(format!("{}[{from}:{to}]", self.string_receiver(receiver, method, cx)?))
            }
            _ => Err(GenerateError::Unsupported(format!("call to `{method}`"))),
        }
    }

    fn string_receiver(
        &self,
        receiver: Option<&Expr>,
        method: &str,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        match receiver {
            Some(r) if cx.type_of(r) == SourceType::String => self.operand(r, cx),
            _ => Err(GenerateError::Unsupported(format!(
                "`{method}` on a non-string value"
            ))),
        }
    }
}

/// `k` when `index` is `array.length - k` for the same array.
fn from_end(array: &Expr, index: &Expr) -> Option<i64> {
    let Expr::Binary {
        left,
        op: BinaryOp::Sub,
        right,
    } = index
    else {
        return None;
    };
    if left.length_of() != Some(array) {
        return None;
    }
    literal_integer(right).filter(|k| *k > 0)
}

/// Two's-complement mask emulating an unsigned shift.
fn mask(ty: SourceType) -> &'static str {
    if ty == SourceType::Long {
        "0xFFFFFFFFFFFFFFFF"
    } else {
        "0xFFFFFFFF"
    }
}

fn constant(class: Option<&str>, field: &str, cx: &mut TranslationContext) -> Option<String> {
    let text = match (class?, field) {
        ("Integer", "MAX_VALUE") => "2147483647",
        ("Integer", "MIN_VALUE") => "-2147483648",
        ("Long", "MAX_VALUE") => "9223372036854775807",
        ("Long", "MIN_VALUE") => "-9223372036854775808",
        ("Math", "PI") => {
            cx.require(Capability::Math);
            "math.pi"
        }
        ("Math", "E") => {
            cx.require(Capability::Math);
            "math.e"
        }
        _ => return None,
    };
    Some(text.to_string())
}

pub(super) fn literal(lit: &Literal) -> String {
    match lit {
        Literal::Int(text) | Literal::Long(text) => integer_text(text),
        Literal::Float(text) | Literal::Double(text) => decimal_text(text),
        Literal::Bool(true) => "True".to_string(),
        Literal::Bool(false) => "False".to_string(),
        Literal::Char(c) => format!("'{c}'"),
        Literal::String(s) => format!("\"{s}\""),
        Literal::Null => "None".to_string(),
    }
}

/// Java's leading-zero octal is `0o` in Python.
fn integer_text(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    if lower.len() > 1
        && lower.starts_with('0')
        && lower.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
    {
        return format!("0o{}", &text[1..]);
    }
    text.to_string()
}
