//! Expression rendering for C.

use super::CGenerator;
use super::types::c_type;
use crate::ast::*;
use crate::context::{Capability, TranslationContext};
use crate::output::decimal_text;
use crate::traits::GenerateError;

impl CGenerator {
    pub(super) fn expr(
        &self,
        expr: &Expr,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        match expr {
            Expr::Literal(lit) => Ok(literal(lit, cx)),
            Expr::Ident(name) => Ok(cx.target_name(name)),

            Expr::Binary { left, op, right } => {
                if cx.is_concatenation(expr) {
                    return Err(GenerateError::Unsupported(
                        "string concatenation outside a print or declaration".into(),
                    ));
                }
                let floating = cx.type_of(expr).is_floating();
                let l = self.operand(left, cx)?;
                let r = self.operand(right, cx)?;
                Ok(match op {
                    BinaryOp::UShr => format!("({}) {l} >> {r}", unsigned_of(cx.type_of(left))),
                    BinaryOp::Mod if floating => {
                        cx.require(Capability::Math);
                        format!("fmod({l}, {r})")
                    }
                    _ => format!("{l} {} {r}", op.symbol()),
                })
            }

            Expr::Unary { op, operand } => {
                Ok(format!("{}{}", op.symbol(), self.operand(operand, cx)?))
            }

            Expr::Logical { left, op, right } => {
                let l = self.operand(left, cx)?;
                let r = self.operand(right, cx)?;
                Ok(format!("{l} {} {r}", op.symbol()))
            }

            Expr::Comparison { left, op, right } => {
                let strings =
                    cx.type_of(left) == SourceType::String && cx.type_of(right) == SourceType::String;
                if strings && matches!(op, CompareOp::Eq | CompareOp::Ne) {
                    cx.warn("string `==` compares references; emitted a strcmp content comparison");
                    cx.require(Capability::String);
                    let l = self.expr(left, cx)?;
                    let r = self.expr(right, cx)?;
                    return Ok(format!("strcmp({l}, {r}) {} 0", op.symbol()));
                }
                let l = self.operand(left, cx)?;
                let r = self.operand(right, cx)?;
                Ok(format!("{l} {} {r}", op.symbol()))
            }

            Expr::Assign { target, op, value } => self.assignment(target, *op, value, cx),

            Expr::Update { target, op, prefix } => {
                let t = self.expr(target, cx)?;
                Ok(if *prefix {
                    format!("{}{t}", op.symbol())
                } else {
                    format!("{t}{}", op.symbol())
                })
            }

            Expr::ArrayAccess { array, index } => {
                let a = self.operand(array, cx)?;
                let i = self.expr(index, cx)?;
                Ok(format!("{a}[{i}]"))
            }

            Expr::FieldAccess { object, field } => {
                if let Some(array) = expr.length_of() {
                    return self.length(array, cx);
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
                Ok(format!("{{{}}}", rendered.join(", ")))
            }

            Expr::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                let c = self.operand(condition, cx)?;
                let a = self.operand(then_expr, cx)?;
                let b = self.operand(else_expr, cx)?;
                Ok(format!("{c} ? {a} : {b}"))
            }

            Expr::Cast { ty, expr } => {
                let ty = c_type(*ty, cx)?;
                Ok(format!("({ty}) {}", self.operand(expr, cx)?))
            }

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
        if expr.is_compound() || expr.length_of().is_some() {
            Ok(format!("({text})"))
        } else {
            Ok(text)
        }
    }

    /// Element count of an array: `sizeof(a) / sizeof(a[0])`.
    ///
    /// Pointers declared as aliases measure the array they point to.
    pub(super) fn length(
        &self,
        array: &Expr,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        let symbol = array.as_ident().and_then(|name| cx.lookup(name)).cloned();
        let text = match &symbol {
            Some(s) if s.alias_of.is_some() => s.alias_of.clone().unwrap_or_default(),
            _ => self.operand(array, cx)?,
        };
        if let Some(s) = &symbol {
            if s.source_type == SourceType::String && !s.is_array {
                return Err(GenerateError::invalid(
                    "length",
                    format!("`{}` is a string, not an array", s.source_name),
                ));
            }
            if s.target_type.as_deref().is_some_and(|t| t.ends_with('*')) && s.alias_of.is_none() {
                cx.warn(format!(
                    "`{}` is a pointer; sizeof does not give its length",
                    s.source_name
                ));
            }
        }
        Ok(format!("sizeof({text}) / sizeof({text}[0])"))
    }

    fn assignment(
        &self,
        target: &Expr,
        op: AssignOp,
        value: &Expr,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        if cx.type_of(target) == SourceType::String
            && (cx.is_concatenation(value) || op != AssignOp::Assign)
        {
            return Err(GenerateError::Unsupported(
                "string concatenation outside a print or declaration".into(),
            ));
        }
        let t = self.expr(target, cx)?;
        let v = self.expr(value, cx)?;
        Ok(match op {
            AssignOp::Assign => format!("{t} = {v}"),
            AssignOp::Compound(BinaryOp::UShr) => {
                let ty = unsigned_of(cx.type_of(target));
                format!("{t} = ({ty}) {t} >> {}", self.operand(value, cx)?)
            }
            AssignOp::Compound(BinaryOp::Mod) if cx.type_of(target).is_floating() => {
                cx.require(Capability::Math);
                format!("{t} = fmod({t}, {v})")
            }
            AssignOp::Compound(op) => format!("{t} {}= {v}", op.symbol()),
        })
    }

    fn call(
        &self,
        receiver: Option<&Expr>,
        method: &str,
        args: &[Expr],
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        let floating = args.iter().any(|a| cx.type_of(a).is_floating());
        let wide = args.iter().any(|a| cx.type_of(a) == SourceType::Long);
        let rendered = args
            .iter()
            .map(|a| self.expr(a, cx))
            .collect::<Result<Vec<_>, _>>()?;
        let joined = rendered.join(", ");

        match (receiver.and_then(Expr::as_ident), method, rendered.as_slice()) {
            (Some("Math"), "abs", [x]) => {
                if floating {
                    cx.require(Capability::Math);
                    Ok(format!("fabs({x})"))
                } else {
                    cx.require(Capability::StdLib);
                    Ok(format!("{}({x})", if wide { "llabs" } else { "abs" }))
                }
            }
            (Some("Math"), "max" | "min", [_, _]) if floating => {
                cx.require(Capability::Math);
                Ok(format!("f{method}({joined})"))
            }
            (Some("Math"), "max" | "min", [_, _]) => {
                let a = self.operand(&args[0], cx)?;
                let b = self.operand(&args[1], cx)?;
                let cmp = if method == "max" { ">" } else { "<" };
                Ok(format!("({a} {cmp} {b} ? {a} : {b})"))
            }
            (Some("Math"), "round", [x]) => {
                cx.require(Capability::Math);
                Ok(format!("llround({x})"))
            }
            (Some("Math"), "random", []) => {
                cx.require(Capability::StdLib);
                Ok("((double) rand() / RAND_MAX)".to_string())
            }
            (
                Some("Math"),
                "sqrt" | "cbrt" | "pow" | "floor" | "ceil" | "exp" | "log" | "log10" | "sin"
                | "cos" | "tan" | "asin" | "acos" | "atan" | "atan2" | "hypot",
                _,
            ) => {
                cx.require(Capability::Math);
                Ok(format!("{method}({joined})"))
            }
            (Some("Integer"), "parseInt", [s]) => {
                cx.require(Capability::StdLib);
                Ok(format!("atoi({s})"))
            }
            (Some("Long"), "parseLong", [s]) => {
                cx.require(Capability::StdLib);
                Ok(format!("atoll({s})"))
            }
            (Some("Double"), "parseDouble", [s]) => {
                cx.require(Capability::StdLib);
                Ok(format!("atof({s})"))
            }
            (_, "length", []) => {
                let s = self.string_receiver(receiver, method, cx)?;
                cx.require(Capability::String);
                Ok(format!("strlen({s})"))
            }
            (_, "charAt", [i]) => {
                let s = self.string_receiver(receiver, method, cx)?;
                Ok(format!("{s}[{i}]"))
            }
            (_, "equals", [other]) => {
                let s = self.string_receiver(receiver, method, cx)?;
                cx.require(Capability::String);
                Ok(format!("(strcmp({s}, {other}) == 0)"))
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

fn unsigned_of(ty: SourceType) -> &'static str {
    if ty == SourceType::Long {
        "unsigned long long"
    } else {
        "unsigned int"
    }
}

/// Library constants reachable through a static field.
fn constant(class: Option<&str>, field: &str, cx: &mut TranslationContext) -> Option<String> {
    let (capability, text) = match (class?, field) {
        ("Integer", "MAX_VALUE") => (Capability::Limits, "INT_MAX"),
        ("Integer", "MIN_VALUE") => (Capability::Limits, "INT_MIN"),
        ("Long", "MAX_VALUE") => (Capability::Limits, "LLONG_MAX"),
        ("Long", "MIN_VALUE") => (Capability::Limits, "LLONG_MIN"),
        ("Math", "PI") => (Capability::Math, "M_PI"),
        ("Math", "E") => (Capability::Math, "M_E"),
        _ => return None,
    };
    cx.require(capability);
    Some(text.to_string())
}

pub(super) fn literal(lit: &Literal, cx: &mut TranslationContext) -> String {
    match lit {
        Literal::Int(text) => integer_text(lit, text),
        Literal::Long(text) => format!("{}LL", integer_text(lit, text)),
        Literal::Float(text) => format!("{}f", decimal_text(text)),
        Literal::Double(text) => decimal_text(text),
        Literal::Bool(value) => {
            cx.require(Capability::Bool);
            value.to_string()
        }
        Literal::Char(c) => format!("'{c}'"),
        Literal::String(s) => format!("\"{s}\""),
        Literal::Null => "NULL".to_string(),
    }
}

/// C99 has no binary literals; those are spelled in decimal.
fn integer_text(lit: &Literal, text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    match lit.as_integer() {
        Some(value) if lower.starts_with("0b") => value.to_string(),
        _ => text.to_string(),
    }
}
