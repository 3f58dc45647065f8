//! Action generation strategies.
//!
//! Every strategy is a pure function from a [`SyntaxTree`] to an ordered
//! action list. Strategies that rewrite the file start by deleting the whole
//! buffer and then re-insert every token's trivia and content, probing each
//! token boundary at the offset it occupies at that moment.

mod basic;
mod concurrent;
mod emit;
mod inside_out;
mod layout;
mod request;

use crate::action::Action;
use crate::tree::SyntaxTree;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Which generation strategy produced (or will produce) an action list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RewriteMode {
    /// Probe the file as-is, never editing it.
    #[default]
    None,
    /// Delete everything, then re-insert tokens left to right.
    Basic,
    /// Re-insert all top-level statements in round-robin lockstep.
    Concurrent,
    /// Re-insert the most deeply nested tokens first.
    InsideOut,
}

impl RewriteMode {
    pub const ALL: [RewriteMode; 4] = [
        RewriteMode::None,
        RewriteMode::Basic,
        RewriteMode::Concurrent,
        RewriteMode::InsideOut,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RewriteMode::None => "none",
            RewriteMode::Basic => "basic",
            RewriteMode::Concurrent => "concurrent",
            RewriteMode::InsideOut => "inside-out",
        }
    }

    /// Whether actions of this mode edit the buffer.
    pub fn rewrites(self) -> bool {
        self != RewriteMode::None
    }

    pub fn generate(self, tree: &SyntaxTree) -> Vec<Action> {
        let actions = match self {
            RewriteMode::None => request::generate(tree),
            RewriteMode::Basic => basic::generate(tree),
            RewriteMode::Concurrent => concurrent::generate(tree),
            RewriteMode::InsideOut => inside_out::generate(tree),
        };
        debug!(
            mode = self.name(),
            tokens = tree.token_count(),
            actions = actions.len(),
            "generated actions"
        );
        actions
    }
}

impl fmt::Display for RewriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RewriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RewriteMode::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| {
                format!("unknown rewrite mode '{s}' (expected none, basic, concurrent or inside-out)")
            })
    }
}
