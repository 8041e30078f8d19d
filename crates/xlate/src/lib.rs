//! Source-to-source translation of single-entry Java programs.
//!
//! `xlate` takes the body of a Java `main` method and rewrites it as C or
//! Python. It works statement by statement: a construct it cannot translate
//! becomes a best-effort line or a placeholder comment, and the rest of the
//! program still comes out.
//!
//! # Architecture
//!
//! ```text
//! Java source ─> tree-sitter CST ─> lowering ─> AST ─┬─> C generator      ─> C
//!                  (input::java)    (input::java)    └─> Python generator ─> Python
//!                                                         (output::*)
//! ```
//!
//! The [`pipeline`] drives one translation: it finds the entry method,
//! walks its body in source order and hands each statement to the
//! target's [`Generator`]. All per-call state (symbols, indentation,
//! warnings, capability includes) lives in a [`TranslationContext`], so a
//! [`Transpiler`] can be shared across threads.
//!
//! # Example
//!
//! ```ignore
//! use xlate::{Target, translate};
//!
//! let source = r#"
//! public class Main {
//!     public static void main(String[] args) {
//!         int x = 5;
//!         System.out.println(x);
//!     }
//! }"#;
//!
//! let result = translate(source, Target::Python);
//! assert_eq!(result.code, "x = 5\nprint(x)\n");
//! ```

pub mod ast;
pub mod config;
pub mod context;
pub mod fallback;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod traits;

// Re-exports: AST types
pub use ast::{Block, Expr, Literal, Loop, LoopKind, SourceType, Stmt};

// Re-exports: Context and configuration
pub use config::{ConfigError, TranslateConfig};
pub use context::{Capability, Symbol, TranslationContext};

// Re-exports: Traits
pub use traits::{GenerateError, Generator, LowerError, Target};

// Re-exports: Pipeline
pub use pipeline::{PipelineError, TranslationResult, Transpiler, translate};

// Re-exports: Registry
pub use registry::{generator_for, generator_for_name, generators, register_generator};

// Re-exports: Built-in generators
#[cfg(feature = "write-c")]
pub use output::CGenerator;
#[cfg(feature = "write-python")]
pub use output::PythonGenerator;
