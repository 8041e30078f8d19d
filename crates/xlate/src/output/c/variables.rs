//! Scalar declarations.

use super::CGenerator;
use super::print::printf_args;
use super::types::{RESERVED, c_type, default_value};
use crate::ast::{Expr, SourceType};
use crate::context::{Symbol, TranslationContext};
use crate::traits::GenerateError;

/// Capacity of the buffer a concatenated string initializer is printed into.
const STRING_BUFFER: usize = 256;

impl CGenerator {
    pub(super) fn variable_declaration(
        &self,
        name: &str,
        ty: SourceType,
        init: Option<&Expr>,
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError> {
        if let Some(value) = init.filter(|v| ty == SourceType::String && cx.is_concatenation(v)) {
            return self.string_buffer(name, value, cx);
        }
        let declarator = self.declarator(name, ty, init, cx)?;
        Ok(vec![cx.line(format!("{declarator};"))])
    }

    /// `T name = value` without the semicolon. Declarations without an
    /// initializer get the type's zero value.
    pub(super) fn declarator(
        &self,
        name: &str,
        ty: SourceType,
        init: Option<&Expr>,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        let c_ty = c_type(ty, cx)?;
        let value = match init {
            Some(value) => {
                let value_ty = cx.type_of(value);
                if value_ty == SourceType::Long && ty.is_integral() && ty != SourceType::Long {
                    cx.warn(format!("64-bit value narrowed to {} in `{name}`", ty.java_name()));
                }
                self.expr(value, cx)?
            }
            None => default_value(ty).to_string(),
        };
        let target = self.declare_scalar(name, ty, c_ty, cx);
        Ok(format!("{c_ty} {target} = {value}"))
    }

    /// Register a declaration and return its output identifier.
    pub(super) fn declare_scalar(
        &self,
        name: &str,
        ty: SourceType,
        c_ty: &str,
        cx: &mut TranslationContext,
    ) -> String {
        let target = cx.choose_name(name, RESERVED);
        let mut symbol = Symbol::scalar(name, ty);
        symbol.target_name = target.clone();
        symbol.target_type = Some(c_ty.to_string());
        cx.declare(symbol);
        target
    }

    /// `String s = "a" + n;` becomes a fixed buffer filled by `snprintf`.
    fn string_buffer(
        &self,
        name: &str,
        value: &Expr,
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError> {
        let parts = cx.concat_parts(value);
        let (format, args) = self.format_parts(&parts, cx)?;
        let target = self.declare_scalar(name, SourceType::String, "char[]", cx);
        Ok(vec![
            cx.line(format!("char {target}[{STRING_BUFFER}];")),
            cx.line(format!(
                "snprintf({target}, sizeof({target}), \"{format}\"{});",
                printf_args(&args)
            )),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, Literal, Stmt};
    use crate::config::TranslateConfig;
    use crate::context::Capability;
    use crate::traits::{Generator, Target};

    fn cx() -> TranslationContext {
        TranslationContext::new(Target::C, TranslateConfig::default())
    }

    fn render(stmt: &Stmt, cx: &mut TranslationContext) -> Vec<String> {
        CGenerator.statement(stmt, cx).unwrap()
    }

    #[test]
    fn test_defaults_per_type() {
        let mut cx = cx();
        let cases = [
            (SourceType::Int, "int n = 0;"),
            (SourceType::Long, "long long n = 0;"),
            (SourceType::Double, "double n = 0.0;"),
            (SourceType::Char, "char n = '\\0';"),
            (SourceType::String, "char* n = \"\";"),
        ];
        for (ty, expected) in cases {
            let lines = render(&Stmt::declaration("n", ty, None), &mut cx);
            assert_eq!(lines, vec![expected.to_string()]);
        }
        assert!(!cx.uses(Capability::Bool));
    }

    #[test]
    fn test_boolean_default_sets_capability() {
        let mut cx = cx();
        let lines = render(&Stmt::declaration("done", SourceType::Boolean, None), &mut cx);
        assert_eq!(lines, vec!["bool done = false;".to_string()]);
        assert!(cx.uses(Capability::Bool));
    }

    #[test]
    fn test_reserved_name_renamed_consistently() {
        let mut cx = cx();
        let lines = render(
            &Stmt::declaration("bool", SourceType::Boolean, Some(Expr::bool(true))),
            &mut cx,
        );
        assert_eq!(lines, vec!["bool bool_var = true;".to_string()]);
        let lines = render(
            &Stmt::expr(Expr::assign(
                Expr::ident("bool"),
                crate::ast::AssignOp::Assign,
                Expr::bool(false),
            )),
            &mut cx,
        );
        assert_eq!(lines, vec!["bool_var = false;".to_string()]);
    }

    #[test]
    fn test_concatenated_string_uses_buffer() {
        let mut cx = cx();
        cx.declare(Symbol::scalar("n", SourceType::Int));
        let init = Expr::binary(Expr::string("n = "), BinaryOp::Add, Expr::ident("n"));
        let lines = render(
            &Stmt::declaration("msg", SourceType::String, Some(init)),
            &mut cx,
        );
        assert_eq!(
            lines,
            vec![
                "char msg[256];".to_string(),
                "snprintf(msg, sizeof(msg), \"n = %d\", n);".to_string(),
            ]
        );
    }

    #[test]
    fn test_long_narrowing_warns() {
        let mut cx = cx();
        render(
            &Stmt::declaration(
                "x",
                SourceType::Int,
                Some(Expr::Literal(Literal::Long("5".into()))),
            ),
            &mut cx,
        );
        assert_eq!(cx.warnings().len(), 1);
    }
}
