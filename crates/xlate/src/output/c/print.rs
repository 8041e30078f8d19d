//! printf synthesis.
//!
//! A print's arguments are flattened into one format string: string literal
//! pieces are copied in (with `%` escaped), every other piece adds the
//! conversion for its static type and one argument.

use super::CGenerator;
use super::types::format_specifier;
use crate::ast::{Expr, Literal, Print, SourceType};
use crate::context::TranslationContext;
use crate::traits::GenerateError;

impl CGenerator {
    pub(super) fn print(
        &self,
        print: &Print,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        if print.formatted {
            return self.printf_passthrough(print, cx);
        }

        let mut parts = Vec::new();
        for arg in &print.args {
            if cx.is_concatenation(arg) {
                parts.extend(cx.concat_parts(arg));
            } else {
                parts.push(arg);
            }
        }

        let (mut format, args) = self.format_parts(&parts, cx)?;
        if print.newline {
            format.push_str("\\n");
        }
        Ok(format!("printf(\"{format}\"{});", printf_args(&args)))
    }

    /// Format string and argument list for a flattened concatenation.
    pub(super) fn format_parts(
        &self,
        parts: &[&Expr],
        cx: &mut TranslationContext,
    ) -> Result<(String, Vec<String>), GenerateError> {
        let mut format = String::new();
        let mut args = Vec::new();
        for part in parts {
            if let Expr::Literal(Literal::String(text)) = part {
                format.push_str(&text.replace('%', "%%"));
                continue;
            }
            let ty = cx.type_of(part);
            let arg = self.expr(part, cx)?;
            if ty == SourceType::Unknown {
                cx.warn(format!(
                    "type of print argument `{arg}` is unknown; printed with %d"
                ));
            }
            format.push_str(format_specifier(ty));
            args.push(arg);
        }
        Ok((format, args))
    }

    /// `System.out.printf`: the format is kept, with Java-only conversions
    /// respelled for C.
    fn printf_passthrough(
        &self,
        print: &Print,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        let Some((first, rest)) = print.args.split_first() else {
            return Err(GenerateError::invalid("printf", "missing format string"));
        };
        let Some(format) = first.as_string_literal() else {
            return Err(GenerateError::Unsupported("printf with a computed format".into()));
        };
        let types: Vec<SourceType> = rest.iter().map(|a| cx.type_of(a)).collect();
        let args = rest
            .iter()
            .map(|a| self.expr(a, cx))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!(
            "printf(\"{}\"{});",
            convert_format(format, &types),
            printf_args(&args)
        ))
    }
}

/// `, a, b` for a non-empty argument list.
pub(super) fn printf_args(args: &[String]) -> String {
    args.iter().map(|a| format!(", {a}")).collect()
}

/// Rewrite a Java format string for C's printf.
fn convert_format(format: &str, types: &[SourceType]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut chars = format.chars().peekable();
    let mut index = 0;

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
            // C has no grouping flag.
            if next != ',' {
                spec.push(next);
            }
            chars.next();
        }
        let Some(conversion) = chars.next() else {
            out.push_str(&spec);
            break;
        };
        let ty = types.get(index).copied().unwrap_or(SourceType::Unknown);
        match conversion {
            'n' => out.push_str("\\n"),
            '%' => out.push_str("%%"),
            'd' if ty == SourceType::Long => {
                out.push_str(&spec);
                out.push_str("lld");
                index += 1;
            }
            'b' | 'B' => {
                out.push_str(&spec);
                out.push('d');
                index += 1;
            }
            's' | 'S' if ty != SourceType::String && ty != SourceType::Unknown => {
                out.push_str(&spec);
                out.push_str(&format_specifier(ty)[1..]);
                index += 1;
            }
            other => {
                out.push_str(&spec);
                out.push(other);
                index += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, CompareOp, Stmt};
    use crate::config::TranslateConfig;
    use crate::context::Symbol;
    use crate::traits::Target;

    fn cx() -> TranslationContext {
        let mut cx = TranslationContext::new(Target::C, TranslateConfig::default());
        cx.declare(Symbol::scalar("n", SourceType::Int));
        cx.declare(Symbol::scalar("big", SourceType::Long));
        cx.declare(Symbol::scalar("avg", SourceType::Double));
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

    fn print_line(args: Vec<Expr>, cx: &mut TranslationContext) -> String {
        let Stmt::Print(print) = Stmt::println(args) else {
            unreachable!()
        };
        CGenerator.print(&print, cx).unwrap()
    }

    #[test]
    fn test_single_identifier() {
        let mut cx = cx();
        assert_eq!(
            print_line(vec![Expr::ident("n")], &mut cx),
            "printf(\"%d\\n\", n);"
        );
    }

    #[test]
    fn test_four_literals_one_value() {
        let mut cx = cx();
        let arg = concat(vec![
            Expr::string("a"),
            Expr::string("b"),
            Expr::ident("n"),
            Expr::string("c"),
            Expr::string("d"),
        ]);
        let line = print_line(vec![arg], &mut cx);
        assert_eq!(line, "printf(\"ab%dcd\\n\", n);");
        assert_eq!(line.matches('%').count(), 1);
    }

    #[test]
    fn test_specifiers_follow_types() {
        let mut cx = cx();
        let arg = concat(vec![
            Expr::ident("name"),
            Expr::string(": "),
            Expr::ident("big"),
            Expr::string(" "),
            Expr::ident("avg"),
            Expr::string(" "),
            Expr::ident("ok"),
        ]);
        assert_eq!(
            print_line(vec![arg], &mut cx),
            "printf(\"%s: %lld %lf %d\\n\", name, big, avg, ok);"
        );
    }

    #[test]
    fn test_percent_escaped() {
        let mut cx = cx();
        let arg = concat(vec![Expr::ident("n"), Expr::string("%")]);
        assert_eq!(
            print_line(vec![arg], &mut cx),
            "printf(\"%d%%\\n\", n);"
        );
    }

    #[test]
    fn test_arithmetic_leaf_is_one_value() {
        let mut cx = cx();
        let arg = concat(vec![
            Expr::string("sum: "),
            Expr::binary(Expr::ident("n"), BinaryOp::Add, Expr::int(1)),
        ]);
        // `"sum: " + n + 1` would concatenate; the parenthesized sum is one leaf.
        assert_eq!(
            print_line(vec![arg], &mut cx),
            "printf(\"sum: %d\\n\", n + 1);"
        );
        let arg = concat(vec![
            Expr::string("big? "),
            Expr::comparison(Expr::ident("n"), CompareOp::Gt, Expr::int(9)),
        ]);
        assert_eq!(
            print_line(vec![arg], &mut cx),
            "printf(\"big? %d\\n\", n > 9);"
        );
    }

    #[test]
    fn test_printf_conversions() {
        assert_eq!(
            convert_format("%d items%n", &[SourceType::Int]),
            "%d items\\n"
        );
        assert_eq!(convert_format("%,d", &[SourceType::Long]), "%lld");
        assert_eq!(convert_format("%b", &[SourceType::Boolean]), "%d");
        assert_eq!(convert_format("%.2f%%", &[SourceType::Double]), "%.2f%%");
        assert_eq!(convert_format("%s", &[SourceType::Int]), "%d");
    }
}
