//! Local variable declarations.

use super::{JavaLowerer, field};
use crate::ast::{SourceType, Stmt};
use crate::context::{Symbol, TranslationContext};
use crate::traits::LowerError;
use tree_sitter::Node;

pub(super) fn can_lower(kind: &str) -> bool {
    kind == "local_variable_declaration"
}

/// Number of `[]` pairs in a `dimensions` node's text.
pub(super) fn count_dimensions(text: &str) -> usize {
    text.matches('[').count()
}

impl<'a> JavaLowerer<'a> {
    /// Lower `T a = x, b;`. One declarator gives one statement; several give a
    /// [`Stmt::Sequence`] in source order.
    pub fn lower_local_declaration(
        &self,
        node: Node,
        cx: &mut TranslationContext,
    ) -> Result<Stmt, LowerError> {
        let type_node = field(node, "type")?;
        let (type_name, type_dims) = if type_node.kind() == "array_type" {
            let element = self.node_text(field(type_node, "element")?);
            let dims = count_dimensions(self.node_text(field(type_node, "dimensions")?));
            (element, dims)
        } else {
            (self.node_text(type_node), 0)
        };

        let mut cursor = node.walk();
        let declarators: Vec<Node> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();

        let mut stmts = Vec::with_capacity(declarators.len());
        for declarator in declarators {
            stmts.push(self.lower_declarator(declarator, type_name, type_dims, cx)?);
        }

        match stmts.len() {
            0 => Err(LowerError::Parse(
                "local_variable_declaration without declarators".into(),
            )),
            1 => Ok(stmts.remove(0)),
            _ => Ok(Stmt::Sequence(stmts)),
        }
    }

    fn lower_declarator(
        &self,
        declarator: Node,
        type_name: &str,
        type_dims: usize,
        cx: &mut TranslationContext,
    ) -> Result<Stmt, LowerError> {
        let name = self.node_text(field(declarator, "name")?);
        // `int a[] = ...` puts the brackets on the declarator.
        let dims = type_dims
            + declarator
                .child_by_field_name("dimensions")
                .map(|d| count_dimensions(self.node_text(d)))
                .unwrap_or(0);
        let value = declarator.child_by_field_name("value");

        if dims > 0 {
            return self.lower_array_declarator(
                name,
                SourceType::from_java(type_name),
                dims,
                value,
                cx,
            );
        }

        let creation = value.filter(|v| v.kind() == "array_creation_expression");
        if let (Some(creation), "var") = (creation, type_name) {
            let element = self.node_text(field(creation, "type")?);
            let dims = self.creation_dimensions(creation);
            return self.lower_array_declarator(
                name,
                SourceType::from_java(element),
                dims,
                value,
                cx,
            );
        }

        let init = value.map(|v| self.lower_expr(v, cx)).transpose()?;

        let ty = if type_name == "var" {
            let inferred = init
                .as_ref()
                .map(|e| cx.type_of(e))
                .unwrap_or(SourceType::Unknown);
            if inferred == SourceType::Unknown {
                cx.warn(format!("could not infer a type for `var {name}`"));
            }
            inferred
        } else {
            let ty = SourceType::from_java(type_name);
            if ty == SourceType::Unknown {
                cx.warn(format!("type `{type_name}` of `{name}` is not supported"));
            }
            ty
        };

        cx.declare(Symbol::scalar(name, ty));
        Ok(Stmt::declaration(name, ty, init))
    }
}
