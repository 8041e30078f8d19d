//! Expression lowering: literals, operators, accesses and calls.

use super::{JavaLowerer, field};
use crate::ast::*;
use crate::context::TranslationContext;
use crate::traits::LowerError;
use tree_sitter::Node;

impl<'a> JavaLowerer<'a> {
    pub fn lower_expr(&self, node: Node, cx: &mut TranslationContext) -> Result<Expr, LowerError> {
        match node.kind() {
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal"
            | "decimal_floating_point_literal"
            | "hex_floating_point_literal" => Ok(Expr::Literal(lower_number(
                node.kind(),
                self.node_text(node),
            ))),

            "true" => Ok(Expr::bool(true)),
            "false" => Ok(Expr::bool(false)),
            "null_literal" => Ok(Expr::Literal(Literal::Null)),

            "character_literal" => {
                let text = self.node_text(node);
                Ok(Expr::Literal(Literal::Char(strip_quotes(text, "'").into())))
            }

            "string_literal" | "text_block" => {
                let text = self.node_text(node);
                Ok(Expr::Literal(Literal::String(lower_string(text))))
            }

            "identifier" => Ok(Expr::ident(self.node_text(node))),

            "parenthesized_expression" => {
                let inner = node.named_child(0).ok_or_else(|| {
                    LowerError::Parse("parenthesized_expression missing inner".into())
                })?;
                self.lower_expr(inner, cx)
            }

            "binary_expression" => self.lower_binary(node, cx),
            "unary_expression" => self.lower_unary(node, cx),
            "update_expression" => self.lower_update(node, cx),
            "assignment_expression" => self.lower_assignment(node, cx),

            "ternary_expression" => Ok(Expr::Ternary {
                condition: Box::new(self.lower_expr(field(node, "condition")?, cx)?),
                then_expr: Box::new(self.lower_expr(field(node, "consequence")?, cx)?),
                else_expr: Box::new(self.lower_expr(field(node, "alternative")?, cx)?),
            }),

            "cast_expression" => {
                let ty = self.node_text(field(node, "type")?);
                let value = self.lower_expr(field(node, "value")?, cx)?;
                Ok(Expr::Cast {
                    ty: SourceType::from_java(ty),
                    expr: Box::new(value),
                })
            }

            "array_access" => Ok(Expr::index(
                self.lower_expr(field(node, "array")?, cx)?,
                self.lower_expr(field(node, "index")?, cx)?,
            )),

            "field_access" => {
                let object = self.lower_expr(field(node, "object")?, cx)?;
                let name = self.node_text(field(node, "field")?);
                Ok(Expr::field(object, name))
            }

            "method_invocation" => self.lower_call(node, cx),

            "array_initializer" => self.lower_array_initializer(node, cx),

            "array_creation_expression" => match node.child_by_field_name("value") {
                Some(value) => self.lower_array_initializer(value, cx),
                None => Err(LowerError::Unsupported(
                    "array allocation outside a declaration".into(),
                )),
            },

            kind => Err(LowerError::Unsupported(format!("expression `{kind}`"))),
        }
    }

    fn lower_binary(&self, node: Node, cx: &mut TranslationContext) -> Result<Expr, LowerError> {
        let left = self.lower_expr(field(node, "left")?, cx)?;
        let right = self.lower_expr(field(node, "right")?, cx)?;
        let op_text = self.node_text(field(node, "operator")?);

        if let Some(op) = BinaryOp::from_java(op_text) {
            return Ok(Expr::binary(left, op, right));
        }
        if let Some(op) = CompareOp::from_java(op_text) {
            return Ok(Expr::comparison(left, op, right));
        }
        match op_text {
            "&&" => Ok(Expr::logical(left, LogicalOp::And, right)),
            "||" => Ok(Expr::logical(left, LogicalOp::Or, right)),
            _ => Err(LowerError::Parse(format!("unknown binary op: {op_text}"))),
        }
    }

    fn lower_unary(&self, node: Node, cx: &mut TranslationContext) -> Result<Expr, LowerError> {
        let op_text = self.node_text(field(node, "operator")?);
        let operand = self.lower_expr(field(node, "operand")?, cx)?;
        let op = UnaryOp::from_java(op_text)
            .ok_or_else(|| LowerError::Parse(format!("unknown unary op: {op_text}")))?;
        Ok(Expr::unary(op, operand))
    }

    fn lower_update(&self, node: Node, cx: &mut TranslationContext) -> Result<Expr, LowerError> {
        // No field names here: the operator token sits before or after the
        // operand.
        let first = node
            .child(0)
            .ok_or_else(|| LowerError::Parse("update_expression is empty".into()))?;
        let (prefix, op_node) = if first.is_named() {
            (false, node.child(1))
        } else {
            (true, Some(first))
        };
        let op = match op_node.map(|n| self.node_text(n)) {
            Some("++") => UpdateOp::Increment,
            Some("--") => UpdateOp::Decrement,
            other => {
                return Err(LowerError::Parse(format!(
                    "unknown update op: {}",
                    other.unwrap_or("")
                )));
            }
        };
        let operand = node
            .named_child(0)
            .ok_or_else(|| LowerError::Parse("update_expression missing operand".into()))?;
        Ok(Expr::update(self.lower_expr(operand, cx)?, op, prefix))
    }

    fn lower_assignment(
        &self,
        node: Node,
        cx: &mut TranslationContext,
    ) -> Result<Expr, LowerError> {
        let target = self.lower_expr(field(node, "left")?, cx)?;
        let value = self.lower_expr(field(node, "right")?, cx)?;
        let op_text = self.node_text(field(node, "operator")?);
        let op = AssignOp::from_java(op_text)
            .ok_or_else(|| LowerError::Parse(format!("unknown assignment op: {op_text}")))?;
        Ok(Expr::assign(target, op, value))
    }

    fn lower_call(&self, node: Node, cx: &mut TranslationContext) -> Result<Expr, LowerError> {
        let method = self.node_text(field(node, "name")?).to_string();
        let receiver = node
            .child_by_field_name("object")
            .map(|object| self.lower_expr(object, cx))
            .transpose()?
            .map(Box::new);
        let args = match node.child_by_field_name("arguments") {
            Some(list) => self.lower_arguments(list, cx)?,
            None => Vec::new(),
        };
        Ok(Expr::Call {
            receiver,
            method,
            args,
        })
    }

    pub(super) fn lower_arguments(
        &self,
        node: Node,
        cx: &mut TranslationContext,
    ) -> Result<Vec<Expr>, LowerError> {
        let mut args = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if !is_comment(child) {
                args.push(self.lower_expr(child, cx)?);
            }
        }
        Ok(args)
    }

    pub(super) fn lower_array_initializer(
        &self,
        node: Node,
        cx: &mut TranslationContext,
    ) -> Result<Expr, LowerError> {
        let mut items = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if !is_comment(child) {
                items.push(self.lower_expr(child, cx)?);
            }
        }
        Ok(Expr::ArrayLiteral(items))
    }
}

pub(super) fn is_comment(node: Node) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment" | "comment")
}

/// Numeric literal with digit separators and type suffixes removed.
pub(super) fn lower_number(kind: &str, text: &str) -> Literal {
    let digits: String = text.chars().filter(|c| *c != '_').collect();
    let is_hex = digits.starts_with("0x") || digits.starts_with("0X");

    if kind.contains("floating_point") {
        // Hex floats end in a binary exponent, so `f`/`d` are always suffixes.
        return match digits.chars().last() {
            Some('f' | 'F') => Literal::Float(digits[..digits.len() - 1].to_string()),
            Some('d' | 'D') => Literal::Double(digits[..digits.len() - 1].to_string()),
            _ => Literal::Double(digits),
        };
    }

    match digits.chars().last() {
        Some('l' | 'L') => Literal::Long(digits[..digits.len() - 1].to_string()),
        // A decimal literal written with a float suffix (`5f`) is lexed as
        // floating point by the grammar; this only guards odd inputs.
        Some('f' | 'F') if !is_hex => Literal::Float(digits[..digits.len() - 1].to_string()),
        Some('d' | 'D') if !is_hex => Literal::Double(digits[..digits.len() - 1].to_string()),
        _ => Literal::Int(digits),
    }
}

fn strip_quotes<'t>(text: &'t str, quote: &str) -> &'t str {
    let text = text.strip_prefix(quote).unwrap_or(text);
    text.strip_suffix(quote).unwrap_or(text)
}

/// String contents without quotes. Text blocks become a single string with
/// `\n` escapes.
fn lower_string(text: &str) -> String {
    if let Some(body) = text.strip_prefix("\"\"\"") {
        let body = body.strip_suffix("\"\"\"").unwrap_or(body);
        let body = body.strip_prefix('\n').unwrap_or(body);
        let lines: Vec<&str> = body.lines().collect();
        let margin = lines
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.len() - l.trim_start().len())
            .min()
            .unwrap_or(0);
        return lines
            .iter()
            .map(|l| l.get(margin..).unwrap_or("").trim_end())
            .collect::<Vec<_>>()
            .join("\\n")
            .replace('"', "\\\"");
    }
    strip_quotes(text, "\"").to_string()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::lower_body;
    use super::*;

    fn expr_of(stmt: &Stmt) -> &Expr {
        match stmt {
            Stmt::Expr(e) => e,
            Stmt::VariableDeclaration { init: Some(e), .. } => e,
            other => panic!("expected expression, got {other:?}"),
        }
    }

    #[test]
    fn test_number_suffixes() {
        assert_eq!(
            lower_number("decimal_integer_literal", "10L"),
            Literal::Long("10".into())
        );
        assert_eq!(
            lower_number("decimal_floating_point_literal", "2.5f"),
            Literal::Float("2.5".into())
        );
        assert_eq!(
            lower_number("decimal_floating_point_literal", "3d"),
            Literal::Double("3".into())
        );
        assert_eq!(
            lower_number("decimal_integer_literal", "1_000_000"),
            Literal::Int("1000000".into())
        );
        assert_eq!(
            lower_number("hex_integer_literal", "0xFF"),
            Literal::Int("0xFF".into())
        );
    }

    #[test]
    fn test_precedence_from_tree() {
        let (stmts, _) = lower_body("int r = 1 + 2 * 3;");
        match expr_of(&stmts[0]) {
            Expr::Binary { op, right, .. } => {
                assert_eq!(*op, BinaryOp::Add);
                assert!(matches!(
                    right.as_ref(),
                    Expr::Binary {
                        op: BinaryOp::Mul,
                        ..
                    }
                ));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }

    #[test]
    fn test_operator_families() {
        let (stmts, _) = lower_body("boolean b = x < 3 && !done;");
        match expr_of(&stmts[0]) {
            Expr::Logical { left, op, right } => {
                assert_eq!(*op, LogicalOp::And);
                assert!(matches!(
                    left.as_ref(),
                    Expr::Comparison {
                        op: CompareOp::Lt,
                        ..
                    }
                ));
                assert!(matches!(
                    right.as_ref(),
                    Expr::Unary {
                        op: UnaryOp::Not,
                        ..
                    }
                ));
            }
            other => panic!("expected logical, got {other:?}"),
        }
    }

    #[test]
    fn test_update_prefix_and_postfix() {
        let (stmts, _) = lower_body("i++;\n--j;");
        assert_eq!(
            expr_of(&stmts[0]),
            &Expr::update(Expr::ident("i"), UpdateOp::Increment, false)
        );
        assert_eq!(
            expr_of(&stmts[1]),
            &Expr::update(Expr::ident("j"), UpdateOp::Decrement, true)
        );
    }

    #[test]
    fn test_compound_assignment() {
        let (stmts, _) = lower_body("total += arr[i];");
        match expr_of(&stmts[0]) {
            Expr::Assign { op, value, .. } => {
                assert_eq!(*op, AssignOp::Compound(BinaryOp::Add));
                assert!(matches!(value.as_ref(), Expr::ArrayAccess { .. }));
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_literals_normalized() {
        let (stmts, _) = lower_body("char c = 'a';\nString s = \"hi\";\nlong n = 42L;");
        assert_eq!(
            expr_of(&stmts[0]),
            &Expr::Literal(Literal::Char("a".into()))
        );
        assert_eq!(expr_of(&stmts[1]), &Expr::string("hi"));
        assert_eq!(
            expr_of(&stmts[2]),
            &Expr::Literal(Literal::Long("42".into()))
        );
    }

    #[test]
    fn test_length_field_access() {
        let (stmts, _) = lower_body("int n = arr.length - 1;");
        match expr_of(&stmts[0]) {
            Expr::Binary { left, .. } => {
                assert_eq!(left.length_of(), Some(&Expr::ident("arr")));
            }
            other => panic!("expected binary, got {other:?}"),
        }
    }
}
