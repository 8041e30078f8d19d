//! Declarations. Python has no declarations, so each one is an assignment
//! of the initializer or the type's zero value.

use super::{PythonGenerator, RESERVED};
use crate::ast::{ArrayInit, Expr, Literal, SourceType};
use crate::context::{Symbol, TranslationContext, literal_integer};
use crate::output::decimal_text;
use crate::traits::GenerateError;

impl PythonGenerator {
    pub(super) fn variable_declaration(
        &self,
        name: &str,
        ty: SourceType,
        init: Option<&Expr>,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        let value = match init {
            Some(value) => self.converted(ty, value, cx)?,
            None => default_value(ty).to_string(),
        };
        let target = self.declare_scalar(name, ty, cx);
        Ok(format!("{target} = {value}"))
    }

    pub(super) fn declare_scalar(
        &self,
        name: &str,
        ty: SourceType,
        cx: &mut TranslationContext,
    ) -> String {
        let target = cx.choose_name(name, RESERVED);
        let mut symbol = Symbol::scalar(name, ty);
        symbol.target_name = target.clone();
        cx.declare(symbol);
        target
    }

    /// Initializer with Java's implicit conversions made explicit where the
    /// Python value would otherwise differ (`double d = 5` prints `5.0`).
    fn converted(
        &self,
        ty: SourceType,
        value: &Expr,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        let from = cx.type_of(value);
        if ty.is_floating() && from.is_integral() {
            if let Expr::Literal(Literal::Int(text) | Literal::Long(text)) = value {
                if is_decimal(text) {
                    return Ok(decimal_text(text));
                }
            }
            return Ok(format!("float({})", self.expr(value, cx)?));
        }
        if ty == SourceType::Char && from.is_integral() && from != SourceType::Char {
            return Ok(format!("chr({})", self.expr(value, cx)?));
        }
        if ty.is_integral() && ty != SourceType::Char && from == SourceType::Char {
            return Ok(format!("ord({})", self.expr(value, cx)?));
        }
        self.expr(value, cx)
    }

    pub(super) fn array_declaration(
        &self,
        name: &str,
        element: SourceType,
        dimensions: usize,
        init: &ArrayInit,
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        let (value, size) = match init {
            ArrayInit::Literal(items) => {
                let rendered = items
                    .iter()
                    .map(|item| self.expr(item, cx))
                    .collect::<Result<Vec<_>, _>>()?;
                (format!("[{}]", rendered.join(", ")), Some(items.len()))
            }
            // Shallow, like Java's clone().
            ArrayInit::Clone(source) => {
                let size = source
                    .as_ident()
                    .and_then(|n| cx.lookup(n))
                    .and_then(|s| s.array_size);
                (format!("{}.copy()", self.operand(source, cx)?), size)
            }
            ArrayInit::Allocate(extents) => {
                let size = extents
                    .first()
                    .and_then(literal_integer)
                    .and_then(|n| usize::try_from(n).ok());
                (self.allocation(element, dimensions, extents, cx)?, size)
            }
            ArrayInit::Alias(source) => {
                let size = source
                    .as_ident()
                    .and_then(|n| cx.lookup(n))
                    .and_then(|s| s.array_size);
                (self.expr(source, cx)?, size)
            }
            ArrayInit::Default => ("None".to_string(), None),
        };

        let target = cx.choose_name(name, RESERVED);
        let mut symbol = Symbol::array(name, element, dimensions, size);
        symbol.target_name = target.clone();
        cx.declare(symbol);
        Ok(format!("{target} = {value}"))
    }

    /// `[0] * n`, with a comprehension per outer dimension so rows are
    /// distinct lists. Unspecified inner extents (`new int[3][]`) are `None`.
    fn allocation(
        &self,
        element: SourceType,
        dimensions: usize,
        extents: &[Expr],
        cx: &mut TranslationContext,
    ) -> Result<String, GenerateError> {
        let Some((last, outer)) = extents.split_last() else {
            return Err(GenerateError::invalid("array", "allocation without an extent"));
        };
        let fill = if extents.len() < dimensions {
            "None"
        } else {
            default_value(element)
        };
        let mut value = format!("[{fill}] * {}", self.operand(last, cx)?);
        for extent in outer.iter().rev() {
            value = format!("[{value} for _ in range({})]", self.expr(extent, cx)?);
        }
        Ok(value)
    }
}

fn is_decimal(text: &str) -> bool {
    text == "0" || (!text.starts_with('0') && text.chars().all(|c| c.is_ascii_digit()))
}

pub(super) fn default_value(ty: SourceType) -> &'static str {
    match ty {
        SourceType::Float | SourceType::Double => "0.0",
        SourceType::Boolean => "False",
        SourceType::Char => "'\\x00'",
        SourceType::String => "\"\"",
        SourceType::Unknown => "None",
        _ => "0",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Stmt;
    use crate::config::TranslateConfig;
    use crate::traits::{Generator, Target};

    fn cx() -> TranslationContext {
        TranslationContext::new(Target::Python, TranslateConfig::default())
    }

    fn render(stmt: &Stmt, cx: &mut TranslationContext) -> String {
        PythonGenerator.statement(stmt, cx).unwrap().join("\n")
    }

    fn array(name: &str, dims: usize, init: ArrayInit) -> Stmt {
        Stmt::ArrayDeclaration {
            name: name.into(),
            element_type: SourceType::Int,
            dimensions: dims,
            init,
        }
    }

    #[test]
    fn test_declarations_and_defaults() {
        let mut cx = cx();
        assert_eq!(
            render(&Stmt::declaration("x", SourceType::Int, Some(Expr::int(5))), &mut cx),
            "x = 5"
        );
        assert_eq!(
            render(&Stmt::declaration("done", SourceType::Boolean, None), &mut cx),
            "done = False"
        );
        assert_eq!(
            render(&Stmt::declaration("d", SourceType::Double, Some(Expr::int(5))), &mut cx),
            "d = 5.0"
        );
        assert_eq!(
            render(&Stmt::declaration("s", SourceType::String, None), &mut cx),
            "s = \"\""
        );
    }

    #[test]
    fn test_reserved_name_renamed() {
        let mut cx = cx();
        assert_eq!(
            render(&Stmt::declaration("len", SourceType::Int, Some(Expr::int(3))), &mut cx),
            "len_var = 3"
        );
        assert_eq!(cx.target_name("len"), "len_var");
    }

    #[test]
    fn test_array_forms() {
        let mut cx = cx();
        assert_eq!(
            render(
                &array("a", 1, ArrayInit::Literal(vec![Expr::int(1), Expr::int(2)])),
                &mut cx
            ),
            "a = [1, 2]"
        );
        assert_eq!(
            render(&array("b", 1, ArrayInit::Clone(Expr::ident("a"))), &mut cx),
            "b = a.copy()"
        );
        assert_eq!(cx.lookup("b").unwrap().array_size, Some(2));
        assert_eq!(
            render(&array("c", 1, ArrayInit::Alias(Expr::ident("a"))), &mut cx),
            "c = a"
        );
        assert_eq!(
            render(&array("z", 1, ArrayInit::Allocate(vec![Expr::int(5)])), &mut cx),
            "z = [0] * 5"
        );
        assert_eq!(
            render(
                &array("g", 2, ArrayInit::Allocate(vec![Expr::int(2), Expr::int(3)])),
                &mut cx
            ),
            "g = [[0] * 3 for _ in range(2)]"
        );
    }
}
