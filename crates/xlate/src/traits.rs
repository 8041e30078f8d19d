//! Error types, target languages and the generator trait.

use crate::ast::Stmt;
use crate::config::TranslateConfig;
use crate::context::TranslationContext;
use serde::{Deserialize, Serialize};

/// Error that can occur when lowering CST nodes into the AST.
#[derive(Debug, thiserror::Error)]
pub enum LowerError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("unsupported syntax: {0}")]
    Unsupported(String),

    #[error("expected {expected}, got {got}")]
    UnexpectedNode { expected: String, got: String },
}

/// Error that can occur when rendering an AST node for a target.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("cannot translate {0}")]
    Unsupported(String),

    #[error("invalid {construct}: {reason}")]
    Invalid { construct: String, reason: String },
}

impl GenerateError {
    pub fn invalid(construct: impl Into<String>, reason: impl Into<String>) -> Self {
        GenerateError::Invalid {
            construct: construct.into(),
            reason: reason.into(),
        }
    }
}

/// Output language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Statement-terminated, explicitly typed, manual memory.
    C,
    /// Indentation-based, dynamically typed.
    Python,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::C, Target::Python];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::C => "c",
            Target::Python => "python",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Target::C => "c",
            Target::Python => "py",
        }
    }

    /// Line comment marker.
    pub fn comment_prefix(&self) -> &'static str {
        match self {
            Target::C => "//",
            Target::Python => "#",
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Target {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" => Ok(Self::C),
            "python" | "py" => Ok(Self::Python),
            _ => Err(format!("unknown target language: {s}")),
        }
    }
}

/// A generator family renders AST statements as target source lines.
///
/// Generators hold no state: everything that changes during a translation
/// lives in the [`TranslationContext`] passed to each call, so one generator
/// can serve any number of concurrent translations.
pub trait Generator: Send + Sync {
    fn target(&self) -> Target;

    /// Indent depth of top-level body statements.
    fn base_indent(&self, config: &TranslateConfig) -> usize;

    /// Render one statement as lines indented at the context's depth.
    fn statement(
        &self,
        stmt: &Stmt,
        cx: &mut TranslationContext,
    ) -> Result<Vec<String>, GenerateError>;

    /// Degraded rendering of a statement from its original source text.
    fn fallback(&self, text: &str, cx: &mut TranslationContext) -> Option<String>;

    /// Comment naming a construct that could not be translated.
    fn placeholder(&self, construct: &str) -> String {
        format!(
            "{} unsupported: {}",
            self.target().comment_prefix(),
            construct
        )
    }

    /// Suffix appended to a line carrying a same-line source comment.
    fn trailing_comment(&self, text: &str) -> String;

    /// Wrap the generated body in the target's program skeleton.
    fn assemble(&self, body: Vec<String>, cx: &TranslationContext) -> String;
}
