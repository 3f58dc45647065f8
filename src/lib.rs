//! Stress Tester: action generation for language-service stress testing
//!
//! Given the syntax tree of a source file, the generators in this crate
//! produce a deterministic sequence of probes (cursor info, completion,
//! range info, type context, conforming methods) and edits. Rewrite modes
//! delete the whole file and rebuild it token by token in different orders,
//! probing every token boundary at the offset it has at that moment.
//!
//! # Architecture
//!
//! - [`tree`]: arena syntax tree with trivia-carrying tokens
//! - [`ts`]: lowers tree-sitter parse trees of Rust source into [`tree`]
//! - [`collect`]: annotates tokens with depth, probes and range links
//! - [`generate`]: the four generation strategies behind [`RewriteMode`]
//! - [`source_state`]: the shadow buffer every edit is checked against
//! - [`page`]: splits action lists into independently runnable pages
//! - [`driver`]: runs actions against a [`LanguageService`]
//!
//! # Invariant
//!
//! Replaying every `replaceText` action of a rewrite mode, in order, onto
//! the original file reproduces the original file byte for byte, and every
//! action fits the buffer as it is right before it runs.
//!
//! # Example
//!
//! ```
//! use stress_tester::{NullService, RewriteMode, RustParser, Session, SourceState};
//!
//! let source = "fn main() { let x = (1, 2); }\n";
//! let tree = RustParser::new()?.parse_tree(source)?;
//!
//! let actions = RewriteMode::InsideOut.generate(&tree);
//! let state = SourceState::new(RewriteMode::InsideOut, source);
//! let report = Session::run(state, &actions, &mut NullService)?;
//! assert_eq!(report.content, source);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod action;
pub mod collect;
pub mod config;
pub mod driver;
pub mod generate;
pub mod page;
pub mod position;
pub mod source_state;
pub mod tree;
pub mod ts;

// Re-exports
pub use action::{Action, ActionKind, Probe};
pub use collect::{ActionToken, ActionTokenCollector};
pub use config::{load_from_path, load_from_str, ConfigError, StressConfig};
pub use driver::{LanguageService, NullService, ServiceError, Session, SessionError, SessionReport};
pub use generate::RewriteMode;
pub use page::{paginate, select, Page, PageError, PageSpec, RequestFilter};
pub use position::{Length, LineCol, LineIndex, Position};
pub use source_state::{SourceState, SourceStateError};
pub use tree::{SyntaxTree, TreeBuilder, TreeError};
pub use ts::{RustParser, TreeSitterError};
