//! Type mapping, default values and printf specifiers.

use crate::ast::SourceType;
use crate::context::{Capability, TranslationContext};
use crate::traits::GenerateError;

/// C spelling of a source type. `boolean` pulls in `stdbool.h`.
pub fn c_type(ty: SourceType, cx: &mut TranslationContext) -> Result<&'static str, GenerateError> {
    Ok(match ty {
        SourceType::Byte => "signed char",
        SourceType::Short => "short",
        SourceType::Int => "int",
        SourceType::Long => "long long",
        SourceType::Float => "float",
        SourceType::Double => "double",
        SourceType::Boolean => {
            cx.require(Capability::Bool);
            "bool"
        }
        SourceType::Char => "char",
        SourceType::String => "char*",
        SourceType::Unknown => {
            return Err(GenerateError::Unsupported("a value of unknown type".into()));
        }
    })
}

/// Zero value used when a declaration has no initializer.
pub fn default_value(ty: SourceType) -> &'static str {
    match ty {
        SourceType::Float | SourceType::Double => "0.0",
        SourceType::Boolean => "false",
        SourceType::Char => "'\\0'",
        SourceType::String => "\"\"",
        _ => "0",
    }
}

/// printf conversion for a value of type `ty`.
pub fn format_specifier(ty: SourceType) -> &'static str {
    match ty {
        SourceType::String => "%s",
        SourceType::Long => "%lld",
        SourceType::Float => "%f",
        SourceType::Double => "%lf",
        SourceType::Char => "%c",
        // Booleans print as 0/1.
        _ => "%d",
    }
}

/// Identifiers C reserves or the generated program depends on.
pub const RESERVED: &[&str] = &[
    "auto", "bool", "break", "case", "char", "const", "continue", "default", "do", "double",
    "else", "enum", "extern", "false", "float", "for", "goto", "if", "inline", "int", "long",
    "main", "memcpy", "memset", "printf", "register", "restrict", "return", "short", "signed",
    "sizeof", "snprintf", "static", "strcmp", "strlen", "struct", "switch", "true", "typedef",
    "union", "unsigned", "void", "volatile", "while", "NULL",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TranslateConfig;
    use crate::traits::Target;

    #[test]
    fn test_boolean_requires_capability() {
        let mut cx = TranslationContext::new(Target::C, TranslateConfig::default());
        assert_eq!(c_type(SourceType::Int, &mut cx).unwrap(), "int");
        assert!(!cx.uses(Capability::Bool));
        assert_eq!(c_type(SourceType::Boolean, &mut cx).unwrap(), "bool");
        assert!(cx.uses(Capability::Bool));
    }

    #[test]
    fn test_integer_widths() {
        let mut cx = TranslationContext::new(Target::C, TranslateConfig::default());
        assert_eq!(c_type(SourceType::Byte, &mut cx).unwrap(), "signed char");
        assert_eq!(c_type(SourceType::Long, &mut cx).unwrap(), "long long");
        assert!(c_type(SourceType::Unknown, &mut cx).is_err());
    }

    #[test]
    fn test_specifiers() {
        assert_eq!(format_specifier(SourceType::Long), "%lld");
        assert_eq!(format_specifier(SourceType::Double), "%lf");
        assert_eq!(format_specifier(SourceType::Boolean), "%d");
        assert_eq!(format_specifier(SourceType::Char), "%c");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(default_value(SourceType::Int), "0");
        assert_eq!(default_value(SourceType::Double), "0.0");
        assert_eq!(default_value(SourceType::String), "\"\"");
    }
}
