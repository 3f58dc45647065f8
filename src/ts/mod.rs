//! Tree-sitter front end.
//!
//! Parses Rust source with the tree-sitter grammar shipped by
//! `ast-grep-language` and lowers the concrete tree into a [`SyntaxTree`]
//! whose tokens carry their surrounding whitespace and comments as trivia.
//!
//! [`SyntaxTree`]: crate::tree::SyntaxTree

pub mod classify;
mod convert;
pub mod errors;
pub mod parser;

pub use errors::TreeSitterError;
pub use parser::{ParsedSource, RustParser, SyntaxIssue};
