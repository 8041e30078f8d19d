//! Translation orchestration.
//!
//! One call runs `Start → Parsed → EntryPointLocated → ItemsExtracted →
//! Generated → Assembled`, or stops at `Failed`. Every call builds its own
//! [`TranslationContext`], so a [`Transpiler`] can be shared between threads.
//! No stage returns an error or panics to the caller: failures become a
//! [`TranslationResult`] with `success: false`.

use crate::ast::Stmt;
use crate::config::TranslateConfig;
use crate::context::TranslationContext;
use crate::input::{JavaLowerer, parse_java};
use crate::output::render_statement;
use crate::registry;
use crate::traits::{Generator, LowerError, Target};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tree_sitter::Node;

/// Outcome of one translation. `code` is always set: generated source on
/// success, otherwise a comment explaining the failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub success: bool,
    pub code: String,
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Whole-translation failures.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Lower(#[from] LowerError),

    #[error("no entry point: expected a `static` method named `main`")]
    NoEntryPoint,

    #[error("no generator registered for {0}")]
    NoGenerator(Target),
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Start,
    Parsed,
    EntryPointLocated,
    ItemsExtracted,
    Generated,
    Assembled,
    Failed,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stage::Start => "start",
            Stage::Parsed => "parsed",
            Stage::EntryPointLocated => "entry-point-located",
            Stage::ItemsExtracted => "items-extracted",
            Stage::Generated => "generated",
            Stage::Assembled => "assembled",
            Stage::Failed => "failed",
        })
    }
}

/// A direct child of the entry body, in source order.
#[derive(Debug)]
enum Item<'t> {
    /// Blank source lines between two kept items, already capped.
    Blank(usize),
    /// A comment on its own line.
    Comment(Node<'t>),
    /// A statement and the comment that ends its last line, if any.
    Statement {
        node: Node<'t>,
        trailing: Option<Node<'t>>,
    },
}

/// Translator holding only immutable configuration.
#[derive(Debug, Clone, Default)]
pub struct Transpiler {
    config: TranslateConfig,
}

impl Transpiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TranslateConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranslateConfig {
        &self.config
    }

    /// Translate `source` into `target` using the registered generator.
    pub fn translate(&self, source: &str, target: Target) -> TranslationResult {
        match registry::generator_for(target) {
            Some(generator) => self.translate_with(generator, source),
            None => failure(target, &PipelineError::NoGenerator(target), Vec::new()),
        }
    }

    /// Translate with an explicit generator.
    pub fn translate_with(&self, generator: &dyn Generator, source: &str) -> TranslationResult {
        let target = generator.target();
        match panic::catch_unwind(AssertUnwindSafe(|| self.run(generator, source))) {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!(stage = %Stage::Failed, %target, "translation panicked: {message}");
                TranslationResult {
                    success: false,
                    code: echo_source(target, &message, source),
                    warnings: Vec::new(),
                    error: Some(format!("internal error: {message}")),
                }
            }
        }
    }

    fn run(&self, generator: &dyn Generator, source: &str) -> TranslationResult {
        let target = generator.target();
        tracing::debug!(stage = %Stage::Start, %target, bytes = source.len());
        let mut cx = TranslationContext::new(target, self.config.clone());
        match generate(generator, source, &mut cx) {
            Ok(code) => TranslationResult {
                success: true,
                code,
                warnings: cx.into_warnings(),
                error: None,
            },
            Err(err) => {
                tracing::debug!(stage = %Stage::Failed, %target, "{err}");
                failure(target, &err, cx.into_warnings())
            }
        }
    }
}

/// Translate with the default configuration.
pub fn translate(source: &str, target: Target) -> TranslationResult {
    Transpiler::new().translate(source, target)
}

fn generate(
    generator: &dyn Generator,
    source: &str,
    cx: &mut TranslationContext,
) -> Result<String, PipelineError> {
    let tree = parse_java(source)?;
    let root = tree.root_node();
    tracing::debug!(stage = %Stage::Parsed, has_error = root.has_error());
    if root.has_error() {
        cx.warn("source has syntax errors; affected statements may be placeholders");
    }

    let lowerer = JavaLowerer::new(source);
    let body = entry_body(root, &lowerer).ok_or(PipelineError::NoEntryPoint)?;
    tracing::debug!(
        stage = %Stage::EntryPointLocated,
        line = body.start_position().row + 1
    );

    let items = extract_items(body, cx.config.max_blank_lines);
    tracing::debug!(stage = %Stage::ItemsExtracted, items = items.len());

    let base = generator.base_indent(&cx.config);
    cx.set_indent(base);
    let mut lines = Vec::new();
    for item in items {
        match item {
            Item::Blank(count) => lines.extend(std::iter::repeat_n(String::new(), count)),
            Item::Comment(node) => {
                let stmt = Stmt::Comment(lowerer.lower_comment(node));
                lines.extend(render_statement(generator, &stmt, None, cx));
            }
            Item::Statement { node, trailing } => {
                lines.extend(statement_lines(generator, &lowerer, node, trailing, cx));
            }
        }
    }
    tracing::debug!(stage = %Stage::Generated, lines = lines.len());

    let code = cleanup(&generator.assemble(lines, cx), cx.config.max_blank_lines);
    tracing::debug!(stage = %Stage::Assembled, bytes = code.len());
    Ok(code)
}

fn statement_lines(
    generator: &dyn Generator,
    lowerer: &JavaLowerer<'_>,
    node: Node<'_>,
    trailing: Option<Node<'_>>,
    cx: &mut TranslationContext,
) -> Vec<String> {
    let text = lowerer.node_text(node);
    let stmt = match lowerer.lower_statement(node, cx) {
        Ok(stmt) => stmt,
        Err(err) => {
            cx.warn(format!(
                "line {}: {err}; statement kept as placeholder",
                node.start_position().row + 1
            ));
            Some(Stmt::Unsupported {
                kind: node.kind().to_string(),
                text: text.to_string(),
            })
        }
    };

    let mut lines = match &stmt {
        Some(stmt) => render_statement(generator, stmt, Some(text), cx),
        None => Vec::new(),
    };
    if let Some(comment) = trailing {
        let comment = lowerer.lower_comment(comment);
        match lines.last_mut() {
            Some(last) if cx.config.preserve_comments => {
                let text = comment.text.lines().collect::<Vec<_>>().join(" ");
                last.push_str(&generator.trailing_comment(&text));
            }
            // Nothing to attach to: keep it on its own line.
            None => lines.extend(render_statement(generator, &Stmt::Comment(comment), None, cx)),
            Some(_) => {}
        }
    }
    lines
}

/// Body of the first `static` method named `main`.
fn entry_body<'t>(node: Node<'t>, lowerer: &JavaLowerer<'_>) -> Option<Node<'t>> {
    if node.kind() == "method_declaration" && is_entry_point(node, lowerer) {
        return node.child_by_field_name("body");
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.named_children(&mut cursor).collect();
    children.into_iter().find_map(|c| entry_body(c, lowerer))
}

fn is_entry_point(method: Node<'_>, lowerer: &JavaLowerer<'_>) -> bool {
    let named_main = method
        .child_by_field_name("name")
        .is_some_and(|n| lowerer.node_text(n) == "main");
    let mut cursor = method.walk();
    let is_static = method
        .children(&mut cursor)
        .filter(|c| c.kind() == "modifiers")
        .any(|m| lowerer.node_text(m).split_whitespace().any(|w| w == "static"));
    named_main && is_static
}

fn is_comment(node: Node<'_>) -> bool {
    matches!(node.kind(), "line_comment" | "block_comment" | "comment")
}

/// Classify the direct children of the entry body.
fn extract_items(body: Node<'_>, max_blank_lines: usize) -> Vec<Item<'_>> {
    let mut items = Vec::new();
    let mut last_end: Option<usize> = None;
    let mut cursor = body.walk();

    for child in body.named_children(&mut cursor) {
        let start = child.start_position().row;

        if is_comment(child) {
            if let Some(Item::Statement { node, trailing }) = items.last_mut() {
                if trailing.is_none() && node.end_position().row == start {
                    *trailing = Some(child);
                    last_end = Some(child.end_position().row);
                    continue;
                }
            }
        }

        if let Some(end) = last_end {
            let gap = start.saturating_sub(end + 1).min(max_blank_lines);
            if gap > 0 {
                items.push(Item::Blank(gap));
            }
        }
        items.push(if is_comment(child) {
            Item::Comment(child)
        } else {
            Item::Statement {
                node: child,
                trailing: None,
            }
        });
        last_end = Some(child.end_position().row);
    }
    items
}

/// Collapse blank runs longer than `max_blank_lines` and trim blank lines at
/// both ends. Whitespace-only lines count as blank.
fn cleanup(code: &str, max_blank_lines: usize) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut run = 0;
    for line in code.lines() {
        if line.trim().is_empty() {
            if out.is_empty() || run >= max_blank_lines {
                continue;
            }
            run += 1;
            out.push("");
        } else {
            run = 0;
            out.push(line);
        }
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    let mut code = out.join("\n");
    code.push('\n');
    code
}

fn failure(target: Target, err: &PipelineError, warnings: Vec<String>) -> TranslationResult {
    TranslationResult {
        success: false,
        code: format!("{} translation failed: {err}\n", target.comment_prefix()),
        warnings,
        error: Some(err.to_string()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// The error and the untouched source, both as comments.
fn echo_source(target: Target, message: &str, source: &str) -> String {
    let prefix = target.comment_prefix();
    let mut code = format!("{prefix} translation failed: {message}\n{prefix}\n");
    for line in source.lines() {
        if line.is_empty() {
            code.push_str(prefix);
        } else {
            code.push_str(&format!("{prefix} {line}"));
        }
        code.push('\n');
    }
    code
}
