//! Degraded text mode.
//!
//! When a statement cannot be lowered or generated, its source text is
//! matched against a few line shapes (a primitive declaration, a print of a
//! string literal, a simple assignment) and rewritten directly. This is
//! never the primary path: generators only reach it through
//! [`render_statement`](crate::output::render_statement), which tags every
//! line produced here in the warnings.

use crate::ast::SourceType;
use crate::context::{Symbol, TranslationContext};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static DECLARATION: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?:final\s+)?(byte|short|int|long|float|double|boolean|char|String)\s+([A-Za-z_$][\w$]*)\s*(?:=\s*(.+?))?\s*;\s*$",
    )
    .ok()
});

static PRINT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"^\s*System\.out\.(println|print)\s*\(\s*("(?:[^"\\]|\\.)*")?\s*\)\s*;\s*$"#).ok()
});

static ASSIGNMENT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_$][\w$]*)\s*(=|\+=|-=|\*=)\s*(.+?)\s*;\s*$").ok()
});

/// Values simple enough to carry over token by token: literals, names and
/// `+ - * %` arithmetic on them.
static SIMPLE_VALUE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"^(?:"(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)+'|[\w$.\s+\-*%()]+)$"#).ok()
});

static TOKEN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\b(\d+(?:\.\d*)?)[lLfFdD]\b|[A-Za-z_$][\w$]*").ok()
});

/// A line shape recognized in a statement's source text.
enum Shape<'t> {
    Declaration {
        ty: SourceType,
        name: &'t str,
        value: Option<&'t str>,
    },
    Print {
        text: &'t str,
        newline: bool,
    },
    Assignment {
        name: &'t str,
        op: &'t str,
        value: &'t str,
    },
}

fn shape(text: &str) -> Option<Shape<'_>> {
    let text = text.trim();
    if let Some(caps) = DECLARATION.as_ref()?.captures(text) {
        return Some(Shape::Declaration {
            ty: SourceType::from_java(caps.get(1)?.as_str()),
            name: caps.get(2)?.as_str(),
            value: caps.get(3).map(|m| m.as_str()),
        });
    }
    if let Some(caps) = PRINT.as_ref()?.captures(text) {
        let literal = caps.get(2).map_or("", |m| m.as_str());
        return Some(Shape::Print {
            text: literal
                .strip_prefix('"')
                .and_then(|l| l.strip_suffix('"'))
                .unwrap_or(""),
            newline: caps.get(1)?.as_str() == "println",
        });
    }
    if let Some(caps) = ASSIGNMENT.as_ref()?.captures(text) {
        return Some(Shape::Assignment {
            name: caps.get(1)?.as_str(),
            op: caps.get(2)?.as_str(),
            value: caps.get(3)?.as_str(),
        });
    }
    None
}

/// Rewrite a simple value, spelling literals and names for the target.
/// Returns `None` for values outside the simple subset.
fn rewrite_value(
    value: &str,
    cx: &TranslationContext,
    word: impl Fn(&str, &TranslationContext) -> String,
) -> Option<String> {
    let value = value.trim();
    if !SIMPLE_VALUE.as_ref()?.is_match(value) {
        return None;
    }
    if value.starts_with('"') || value.starts_with('\'') {
        return Some(value.to_string());
    }
    let token = TOKEN.as_ref()?;
    Some(
        token
            .replace_all(value, |caps: &Captures| match caps.get(1) {
                Some(number) => number.as_str().to_string(),
                None => word(&caps[0], cx),
            })
            .into_owned(),
    )
}

/// Whether `name` is a declared `String` scalar.
#[cfg(feature = "write-c")]
fn is_string(name: &str, cx: &TranslationContext) -> bool {
    cx.lookup(name)
        .is_some_and(|s| s.source_type == SourceType::String && !s.is_array)
}

/// Whether any name in `value` is a declared `String` scalar.
#[cfg(feature = "write-c")]
fn mentions_string(value: &str, cx: &TranslationContext) -> bool {
    if value.trim_start().starts_with('"') {
        return false;
    }
    TOKEN.as_ref().is_none_or(|token| {
        token
            .find_iter(value)
            .any(|m| is_string(m.as_str(), cx))
    })
}

/// Degraded C for one statement's source text. `String` values only pass
/// as whole literals: anything else would be `char *` arithmetic.
#[cfg(feature = "write-c")]
pub fn c_line(text: &str, cx: &mut TranslationContext) -> Option<String> {
    use crate::context::Capability;
    use crate::output::c::types::{RESERVED, c_type, default_value};

    match shape(text)? {
        Shape::Declaration { ty, name, value } => {
            if let Some(v) = value {
                let literal = v.trim_start().starts_with('"');
                if (ty == SourceType::String && !literal) || mentions_string(v, cx) {
                    return None;
                }
            }
            let c_ty = c_type(ty, cx).ok()?;
            let value = match value {
                Some(v) => rewrite_value(v, cx, c_word)?,
                None => default_value(ty).to_string(),
            };
            if value.contains("true") || value.contains("false") {
                cx.require(Capability::Bool);
            }
            let target = declare(name, ty, c_ty, RESERVED, cx);
            Some(format!("{c_ty} {target} = {value};"))
        }
        Shape::Print { text, newline } => {
            let newline = if newline { "\\n" } else { "" };
            Some(format!("printf(\"{}{newline}\");", text.replace('%', "%%")))
        }
        Shape::Assignment { name, op, value } => {
            if is_string(name, cx) || mentions_string(value, cx) {
                return None;
            }
            let value = rewrite_value(value, cx, c_word)?;
            Some(format!("{} {op} {value};", cx.target_name(name)))
        }
    }
}

#[cfg(feature = "write-c")]
fn c_word(word: &str, cx: &TranslationContext) -> String {
    match word {
        "null" => "NULL".to_string(),
        _ => cx.target_name(word),
    }
}

/// Degraded Python for one statement's source text.
#[cfg(feature = "write-python")]
pub fn python_line(text: &str, cx: &mut TranslationContext) -> Option<String> {
    use crate::output::python::RESERVED;

    match shape(text)? {
        Shape::Declaration { ty, name, value } => {
            let value = match value {
                Some(v) => rewrite_value(v, cx, python_word)?,
                None => python_default(ty).to_string(),
            };
            let target = declare(name, ty, "", RESERVED, cx);
            Some(format!("{target} = {value}"))
        }
        Shape::Print { text, newline } => {
            let end = if newline { "" } else { ", end=\"\"" };
            Some(format!("print(\"{text}\"{end})"))
        }
        Shape::Assignment { name, op, value } => {
            let value = rewrite_value(value, cx, python_word)?;
            Some(format!("{} {op} {value}", cx.target_name(name)))
        }
    }
}

#[cfg(feature = "write-python")]
fn python_word(word: &str, cx: &TranslationContext) -> String {
    match word {
        "true" => "True".to_string(),
        "false" => "False".to_string(),
        "null" => "None".to_string(),
        _ => cx.target_name(word),
    }
}

#[cfg(feature = "write-python")]
fn python_default(ty: SourceType) -> &'static str {
    match ty {
        SourceType::Float | SourceType::Double => "0.0",
        SourceType::Boolean => "False",
        SourceType::String => "\"\"",
        SourceType::Char => "'\\x00'",
        _ => "0",
    }
}

fn declare(
    name: &str,
    ty: SourceType,
    target_type: &str,
    reserved: &[&str],
    cx: &mut TranslationContext,
) -> String {
    let target = cx.choose_name(name, reserved);
    let mut symbol = Symbol::scalar(name, ty);
    symbol.target_name = target.clone();
    if !target_type.is_empty() {
        symbol.target_type = Some(target_type.to_string());
    }
    cx.declare(symbol);
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslateConfig;
    use crate::traits::Target;

    #[cfg(feature = "write-c")]
    #[test]
    fn test_c_declaration() {
        let mut cx = TranslationContext::new(Target::C, TranslateConfig::default());
        assert_eq!(
            c_line("long big = 10L;", &mut cx).as_deref(),
            Some("long long big = 10;")
        );
        assert_eq!(
            c_line("boolean done;", &mut cx).as_deref(),
            Some("bool done = false;")
        );
        assert_eq!(cx.lookup("big").map(|s| s.source_type), Some(SourceType::Long));
    }

    #[cfg(feature = "write-c")]
    #[test]
    fn test_c_print_literal() {
        let mut cx = TranslationContext::new(Target::C, TranslateConfig::default());
        assert_eq!(
            c_line("System.out.println(\"100% done\");", &mut cx).as_deref(),
            Some("printf(\"100%% done\\n\");")
        );
    }

    #[cfg(feature = "write-c")]
    #[test]
    fn test_c_string_arithmetic_is_rejected() {
        let mut cx = TranslationContext::new(Target::C, TranslateConfig::default());
        cx.declare(Symbol::scalar("t", SourceType::String));
        cx.declare(Symbol::scalar("n", SourceType::Int));
        assert_eq!(c_line("t = t + 1;", &mut cx), None);
        assert_eq!(c_line("n = n + t;", &mut cx), None);
        assert_eq!(c_line("String u = t + n;", &mut cx), None);
        assert_eq!(c_line("n = n + 1;", &mut cx).as_deref(), Some("n = n + 1;"));
    }

    #[cfg(feature = "write-python")]
    #[test]
    fn test_python_lines() {
        let mut cx = TranslationContext::new(Target::Python, TranslateConfig::default());
        assert_eq!(
            python_line("boolean ok = true;", &mut cx).as_deref(),
            Some("ok = True")
        );
        assert_eq!(
            python_line("total += 2.5f;", &mut cx).as_deref(),
            Some("total += 2.5")
        );
        assert_eq!(
            python_line("System.out.print(\"hi\");", &mut cx).as_deref(),
            Some("print(\"hi\", end=\"\")")
        );
    }

    #[test]
    fn test_complex_text_is_rejected() {
        assert!(shape("foo(bar -> baz);").is_none());
        let cx = TranslationContext::new(Target::Python, TranslateConfig::default());
        assert!(rewrite_value("a && b", &cx, |w, _| w.to_string()).is_none());
    }
}
