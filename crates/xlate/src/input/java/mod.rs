//! Tree-sitter based Java lowering.
//!
//! Each construct family lives in its own module (`variables`, `arrays`,
//! `print`, `comments`, `operators`, `control_flow`, `loops`) and adds
//! `lower_*` methods to [`JavaLowerer`]. Every module also exposes a
//! `can_lower` predicate over CST kinds so callers can tell recognized
//! statements from the ones that will degrade to a placeholder.

mod arrays;
mod comments;
mod control_flow;
mod loops;
mod operators;
mod print;
mod variables;

use crate::ast::{Block, Comment, Stmt};
use crate::context::TranslationContext;
use crate::traits::LowerError;
use tree_sitter::{Node, Parser, Tree};

/// Parse Java source into a tree-sitter tree.
pub fn parse_java(source: &str) -> Result<Tree, LowerError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_java::language().into())
        .map_err(|err| LowerError::Parse(err.to_string()))?;

    parser
        .parse(source, None)
        .ok_or_else(|| LowerError::Parse("failed to parse".into()))
}

/// Lowers CST nodes of one source text.
///
/// The lowerer itself only borrows the source; all mutable state goes
/// through the [`TranslationContext`] passed to each call.
pub struct JavaLowerer<'a> {
    source: &'a str,
}

impl<'a> JavaLowerer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    pub fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Whether some lowering parser claims this statement kind.
    pub fn can_lower(node: Node) -> bool {
        let kind = node.kind();
        variables::can_lower(kind)
            || print::can_lower(kind)
            || comments::can_lower(kind)
            || control_flow::can_lower(kind)
            || loops::can_lower(kind)
    }

    /// Lower one statement node.
    ///
    /// Returns `Ok(None)` for nodes that produce nothing (empty statements).
    /// Statement kinds nobody claims come back as [`Stmt::Unsupported`] so
    /// the generator can leave a placeholder in their place.
    pub fn lower_statement(
        &self,
        node: Node,
        cx: &mut TranslationContext,
    ) -> Result<Option<Stmt>, LowerError> {
        match node.kind() {
            "line_comment" | "block_comment" | "comment" => {
                Ok(Some(Stmt::Comment(self.lower_comment(node))))
            }

            "local_variable_declaration" => self.lower_local_declaration(node, cx).map(Some),

            "expression_statement" => {
                let expr_node = node.named_child(0).ok_or_else(|| {
                    LowerError::Parse("expression_statement has no child".into())
                })?;
                if print::is_print_call(self, expr_node) {
                    return self.lower_print(expr_node, cx).map(Some);
                }
                Ok(Some(Stmt::expr(self.lower_expr(expr_node, cx)?)))
            }

            "if_statement" => self.lower_if(node, cx).map(Some),
            "switch_expression" | "switch_statement" => self.lower_switch(node, cx).map(Some),

            "for_statement" => self.lower_for(node, cx).map(Some),
            "enhanced_for_statement" => self.lower_for_each(node, cx).map(Some),
            "while_statement" => self.lower_while(node, cx).map(Some),
            "do_statement" => self.lower_do_while(node, cx).map(Some),

            "break_statement" => Ok(Some(Stmt::Break)),
            "continue_statement" => Ok(Some(Stmt::Continue)),
            "return_statement" => {
                let value = node
                    .named_child(0)
                    .map(|n| self.lower_expr(n, cx))
                    .transpose()?;
                Ok(Some(Stmt::Return(value)))
            }

            "block" => cx
                .scoped(|cx| self.lower_block_statements(node, cx))
                .map(|b| Some(Stmt::Block(b))),

            ";" | "empty_statement" => Ok(None),

            kind => Ok(Some(Stmt::Unsupported {
                kind: kind.to_string(),
                text: self.node_text(node).to_string(),
            })),
        }
    }

    /// Lower a statement used as a body (`if`, loops, switch cases).
    ///
    /// A `block` contributes its statements; any other statement becomes a
    /// one-statement block. Runs in a child scope.
    pub fn lower_body(&self, node: Node, cx: &mut TranslationContext) -> Result<Block, LowerError> {
        cx.scoped(|cx| {
            if node.kind() == "block" {
                self.lower_block_statements(node, cx)
            } else {
                Ok(Block::new(self.lower_one(node, cx).into_iter().collect()))
            }
        })
    }

    fn lower_block_statements(
        &self,
        node: Node,
        cx: &mut TranslationContext,
    ) -> Result<Block, LowerError> {
        let mut statements = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if let Some(stmt) = self.lower_one(child, cx) {
                statements.push(stmt);
            }
        }
        Ok(Block::new(statements))
    }

    /// Lower a nested statement, degrading failures to a placeholder so one
    /// bad statement does not take its whole enclosing construct down.
    fn lower_one(&self, node: Node, cx: &mut TranslationContext) -> Option<Stmt> {
        match self.lower_statement(node, cx) {
            Ok(stmt) => stmt,
            Err(err) => {
                cx.warn(format!(
                    "line {}: {err}; statement kept as placeholder",
                    node.start_position().row + 1
                ));
                Some(Stmt::Unsupported {
                    kind: node.kind().to_string(),
                    text: self.node_text(node).to_string(),
                })
            }
        }
    }

    pub fn lower_comment(&self, node: Node) -> Comment {
        comments::lower(self.node_text(node))
    }
}

/// First child with the given field name, or a parse error naming it.
fn field<'t>(node: Node<'t>, name: &str) -> Result<Node<'t>, LowerError> {
    node.child_by_field_name(name)
        .ok_or_else(|| LowerError::Parse(format!("{} missing {}", node.kind(), name)))
}
