//! `System.out.print`, `println` and `printf`.

use super::{JavaLowerer, field};
use crate::ast::{Print, Stmt};
use crate::context::TranslationContext;
use crate::traits::LowerError;
use tree_sitter::Node;

pub(super) fn can_lower(kind: &str) -> bool {
    kind == "expression_statement"
}

const STREAMS: &[&str] = &["System.out", "System.err"];

/// Whether `node` is a call on one of the standard output streams.
pub(super) fn is_print_call(lowerer: &JavaLowerer, node: Node) -> bool {
    if node.kind() != "method_invocation" {
        return false;
    }
    let method = node
        .child_by_field_name("name")
        .map(|n| lowerer.node_text(n));
    let stream = node
        .child_by_field_name("object")
        .map(|n| lowerer.node_text(n));
    matches!(method, Some("print" | "println" | "printf" | "format"))
        && stream.is_some_and(|s| STREAMS.contains(&s))
}

impl<'a> JavaLowerer<'a> {
    pub fn lower_print(&self, node: Node, cx: &mut TranslationContext) -> Result<Stmt, LowerError> {
        let method = self.node_text(field(node, "name")?);
        let stream = self.node_text(field(node, "object")?);
        if stream == "System.err" {
            cx.warn("System.err output is written to standard output");
        }

        let args = match node.child_by_field_name("arguments") {
            Some(list) => self.lower_arguments(list, cx)?,
            None => Vec::new(),
        };
        let formatted = matches!(method, "printf" | "format");
        if formatted && args.is_empty() {
            return Err(LowerError::Parse(format!("{method} without a format string")));
        }

        Ok(Stmt::Print(Print {
            args,
            newline: method == "println",
            formatted,
        }))
    }
}
