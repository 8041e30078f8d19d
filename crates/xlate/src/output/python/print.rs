//! `print()` synthesis.
//!
//! A concatenated print argument is rendered one of three ways, picked by
//! its shape:
//!
//! 1. `"Label: " + value` passes the label and the value as two arguments
//!    and lets `print`'s separator supply the space.
//! 2. Up to three values among at most five parts become an f-string.
//! 3. Anything longer is an explicit `+` chain with `str()` conversions.

use super::PythonGenerator;
use crate::ast::{Expr, Literal, Print, SourceType};
use crate::context::TranslationContext;
use crate::traits::GenerateError;

/// Most values interpolated into one f-string.
const FSTRING_MAX_VALUES: usize = 3;
/// Most parts (literals and values) interpolated into one f-string.
const FSTRING_MAX_PARTS: usize = 5;

impl PythonGenerator {
    pub(super) fn print(
        &self,
        print: &Print,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        if print.formatted {
            return self.printf(print, cx);
        }
        let end = if print.newline { "" } else { ", end=\"\"" };
        let Some(arg) = print.args.first() else {
            return Ok(format!("print({})", end.trim_start_matches(", ")));
        };
        if print.args.len() > 1 {
            return Err(GenerateError::invalid("print", "more than one argument"));
        }

        if !cx.is_concatenation(arg) {
            let value = match cx.type_of(arg) {
                SourceType::Boolean => self.boolean_text(arg, cx)?,
                _ => self.expr(arg, cx)?,
            };
            return Ok(format!("print({value}{end})"));
        }

        let parts = cx.concat_parts(arg);
        let args = match self.label_and_value(&parts, cx)? {
            Some(args) => args,
            None => match self.fstring(&parts, cx)? {
                Some(text) => text,
                None => self.concatenation(&parts, cx)?,
            },
        };
        Ok(format!("print({args}{end})"))
    }

    /// `"Total: " + n` → `"Total:", n`.
    fn label_and_value(
        &self,
        parts: &[&Expr],
        cx: &mut TranslationContext,
    ) -> Result<Option<String>, GenerateError> {
        let [label, value] = parts else {
            return Ok(None);
        };
        let Some(text) = label.as_string_literal() else {
            return Ok(None);
        };
        if value.as_string_literal().is_some() || !text.ends_with(' ') {
            return Ok(None);
        }
        let value = match cx.type_of(value) {
            SourceType::Boolean => self.boolean_text(value, cx)?,
            _ => self.expr(value, cx)?,
        };
        Ok(Some(format!("\"{}\", {value}", text.trim_end_matches(' '))))
    }

    fn fstring(
        &self,
        parts: &[&Expr],
        cx: &mut TranslationContext,
    ) -> Result<Option<String>, GenerateError> {
        let values = parts
            .iter()
            .filter(|p| p.as_string_literal().is_none())
            .count();
        if values > FSTRING_MAX_VALUES || parts.len() > FSTRING_MAX_PARTS {
            return Ok(None);
        }

        let mut text = String::from("f\"");
        for part in parts {
            if let Expr::Literal(Literal::String(s)) = part {
                text.push_str(&s.replace('{', "{{").replace('}', "}}"));
                continue;
            }
            let value = match cx.type_of(part) {
                SourceType::Boolean => format!("str({}).lower()", self.expr(part, cx)?),
                _ => self.expr(part, cx)?,
            };
            // Quotes and backslashes inside replacement fields need 3.12.
            if value.contains(['"', '\\']) {
                return Ok(None);
            }
            text.push('{');
            text.push_str(&value);
            text.push('}');
        }
        text.push('"');
        Ok(Some(text))
    }

    /// `System.out.printf` becomes %-formatting with the same format string.
    fn printf(&self, print: &Print, cx: &mut TranslationContext) -> Result<String, GenerateError> {
        let Some((first, rest)) = print.args.split_first() else {
            return Err(GenerateError::invalid("printf", "missing format string"));
        };
        let Some(format) = first.as_string_literal() else {
            return Err(GenerateError::Unsupported("printf with a computed format".into()));
        };
        let mut args = Vec::with_capacity(rest.len());
        for arg in rest {
            args.push(match cx.type_of(arg) {
                SourceType::Boolean => self.boolean_text(arg, cx)?,
                _ => self.expr(arg, cx)?,
            });
        }

        let (mut format, grouped) = convert_format(format, !args.is_empty());
        if grouped {
            cx.warn("printf `,` grouping flag dropped");
        }
        let end = match format.strip_suffix("\\n") {
            Some(stripped) => {
                format = stripped.to_string();
                ""
            }
            None => ", end=\"\"",
        };
        Ok(match args.as_slice() {
            [] => format!("print(\"{format}\"{end})"),
            [single] => format!("print(\"{format}\" % {single}{end})"),
            many => format!("print(\"{format}\" % ({}){end})", many.join(", ")),
        })
    }
}

/// Java format string as a Python %-format. Returns whether a grouping flag
/// was dropped. Without arguments the string is printed as is, so `%%` is
/// unescaped.
fn convert_format(format: &str, has_args: bool) -> (String, bool) {
    let mut out = String::with_capacity(format.len());
    let mut grouped = false;
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let mut spec = String::from("%");
        while let Some(&next) = chars.peek() {
            if next.is_ascii_alphabetic() || next == '%' {
                break;
            }
            if next == ',' {
                grouped = true;
            } else {
                spec.push(next);
            }
            chars.next();
        }
        match chars.next() {
            Some('n') => out.push_str("\\n"),
            Some('%') if has_args => out.push_str("%%"),
            Some('%') => out.push('%'),
            Some('b' | 'B' | 'S') => {
                out.push_str(&spec);
                out.push('s');
            }
            Some(conversion) => {
                out.push_str(&spec);
                out.push(conversion);
            }
            None => out.push_str(&spec),
        }
    }
    (out, grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, Stmt};
    use crate::config::TranslateConfig;
    use crate::context::Symbol;
    use crate::traits::Target;

    fn cx() -> TranslationContext {
        let mut cx = TranslationContext::new(Target::Python, TranslateConfig::default());
        cx.declare(Symbol::scalar("x", SourceType::Int));
        cx.declare(Symbol::scalar("y", SourceType::Int));
        cx.declare(Symbol::scalar("name", SourceType::String));
        cx.declare(Symbol::scalar("ok", SourceType::Boolean));
        cx
    }

    fn concat(parts: Vec<Expr>) -> Expr {
        parts
            .into_iter()
            .reduce(|acc, e| Expr::binary(acc, BinaryOp::Add, e))
            .unwrap()
    }

    fn line(args: Vec<Expr>, newline: bool, cx: &mut TranslationContext) -> String {
        let print = Print {
            args,
            newline,
            formatted: false,
        };
        PythonGenerator.print(&print, cx).unwrap()
    }

    #[test]
    fn test_single_value() {
        let mut cx = cx();
        assert_eq!(line(vec![Expr::ident("x")], true, &mut cx), "print(x)");
        assert_eq!(
            line(vec![Expr::ident("x")], false, &mut cx),
            "print(x, end=\"\")"
        );
        assert_eq!(
            line(vec![Expr::ident("ok")], true, &mut cx),
            "print(str(ok).lower())"
        );
    }

    #[test]
    fn test_label_and_value() {
        let mut cx = cx();
        let arg = concat(vec![Expr::string("Total: "), Expr::ident("x")]);
        assert_eq!(line(vec![arg], true, &mut cx), "print(\"Total:\", x)");
    }

    #[test]
    fn test_fstring() {
        let mut cx = cx();
        let arg = concat(vec![
            Expr::ident("name"),
            Expr::string(" has "),
            Expr::ident("x"),
            Expr::string(" {items}"),
        ]);
        assert_eq!(
            line(vec![arg], true, &mut cx),
            "print(f\"{name} has {x} {{items}}\")"
        );
    }

    #[test]
    fn test_long_chain_concatenates() {
        let mut cx = cx();
        let arg = concat(vec![
            Expr::string("("),
            Expr::ident("x"),
            Expr::string(", "),
            Expr::ident("y"),
            Expr::string(") "),
            Expr::ident("ok"),
        ]);
        assert_eq!(
            line(vec![arg], true, &mut cx),
            "print(\"(\" + str(x) + \", \" + str(y) + \") \" + str(ok).lower())"
        );
    }

    #[test]
    fn test_printf() {
        let mut cx = cx();
        let Stmt::Print(mut print) = Stmt::println(vec![
            Expr::string("%d of %s%n"),
            Expr::ident("x"),
            Expr::ident("name"),
        ]) else {
            unreachable!()
        };
        print.newline = false;
        print.formatted = true;
        assert_eq!(
            PythonGenerator.print(&print, &mut cx).unwrap(),
            "print(\"%d of %s\" % (x, name))"
        );
    }

    #[test]
    fn test_format_conversion() {
        assert_eq!(convert_format("100%%", false), ("100%".to_string(), false));
        assert_eq!(convert_format("%,d%%", true), ("%d%%".to_string(), true));
        assert_eq!(convert_format("%b", true), ("%s".to_string(), false));
    }
}
