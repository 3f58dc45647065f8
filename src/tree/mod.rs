//! Arena-backed syntax trees.
//!
//! Nodes and tokens live in flat vectors owned by [`SyntaxTree`] and refer to
//! each other through [`NodeId`] / [`TokenId`] handles, so parent links never
//! form ownership cycles. Generators only ever borrow the tree.

pub mod builder;
pub mod errors;
pub mod syntax;

pub use builder::TreeBuilder;
pub use errors::TreeError;
pub use syntax::{
    AggregateKind, Element, NodeCategory, NodeId, SyntaxTree, TokenId, TokenKind,
};
