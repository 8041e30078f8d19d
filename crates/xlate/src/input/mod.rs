//! Input side: parse source text and lower its CST into the AST.

pub mod java;

pub use java::{JavaLowerer, parse_java};
