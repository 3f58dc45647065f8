//! Mapping from tree-sitter node kinds to tree categories and token kinds.

use crate::tree::{AggregateKind, NodeCategory, TokenKind};

/// Named leaves that refer to a declaration.
const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "field_identifier",
    "shorthand_field_identifier",
    "primitive_type",
    "metavariable",
    "self",
    "super",
    "crate",
];

const LITERAL_KINDS: &[&str] = &[
    "integer_literal",
    "float_literal",
    "char_literal",
    "string_content",
    "escape_sequence",
];

/// Literal composites that count as expressions without the suffix.
const LITERAL_COMPOSITES: &[&str] = &["string_literal", "raw_string_literal", "boolean_literal"];

const DELIMITERS: &[&str] = &["\"", "'"];

const PUNCTUATION: &[&str] = &["(", ")", "[", "]", "{", "}", ",", ";", ":", "::", ".", "#"];

pub fn node_category(kind: &str) -> NodeCategory {
    match kind {
        "tuple_expression" => NodeCategory::Aggregate(AggregateKind::Tuple),
        "array_expression" => NodeCategory::Aggregate(AggregateKind::Array),
        "macro_invocation" => NodeCategory::Expression,
        "scoped_type_identifier" | "type_arguments" => NodeCategory::Type,
        _ if LITERAL_COMPOSITES.contains(&kind) => NodeCategory::Expression,
        _ if kind.ends_with("_expression") => NodeCategory::Expression,
        _ if kind.ends_with("_type") => NodeCategory::Type,
        _ => NodeCategory::Other,
    }
}

/// Category of a node inside a parent of kind `parent`. A closure's braces
/// belong to its block body, so that block is the closure literal.
pub fn child_category(kind: &str, parent: &str) -> NodeCategory {
    match (parent, kind) {
        ("closure_expression", "block") => NodeCategory::Aggregate(AggregateKind::Closure),
        _ => node_category(kind),
    }
}

/// Kind of a leaf. Anonymous leaves have their own text as kind.
pub fn token_kind(kind: &str, named: bool) -> TokenKind {
    if IDENTIFIER_KINDS.contains(&kind) {
        return TokenKind::Identifier;
    }
    if named && LITERAL_KINDS.contains(&kind) {
        return TokenKind::Literal;
    }
    if DELIMITERS.contains(&kind) {
        TokenKind::LiteralDelimiter
    } else if PUNCTUATION.contains(&kind) {
        TokenKind::Punctuation
    } else if kind.chars().all(|c| c.is_ascii_alphabetic() || c == '_') && !kind.is_empty() {
        // Keywords and named leaves such as `mutable_specifier`.
        TokenKind::Keyword
    } else {
        TokenKind::Operator
    }
}
