use stress_tester::{Action, NullService, RewriteMode, Session, SourceState, SyntaxTree};

pub const IF_ELSE_IF: &str = r#"fn classify(n: i32) -> &'static str {
    if n < 0 {
        "negative"
    } else if n == 0 {
        "zero"
    } else {
        "positive"
    }
}
"#;

pub const SAMPLE: &str = r#"//! Sample module.
use std::collections::HashMap;

/// A counter keyed by name.
pub struct Counter {
    counts: HashMap<String, usize>,
}

impl Counter {
    pub fn bump(&mut self, name: &str) -> usize {
        let slot = self.counts.entry(name.to_string()).or_insert(0);
        *slot += 1; // increment
        *slot
    }
}

fn main() {
    let pairs = [(1, 'a'), (2, 'b')];
    let total: i32 = pairs.iter().map(|(n, _)| n * 2).sum();
    println!("{total} {:?}", (total, "done"));
}
"#;

pub fn parse(source: &str) -> SyntaxTree {
    stress_tester::RustParser::new()
        .unwrap()
        .parse_tree(source)
        .unwrap()
}

/// Run `actions` from the original file, checking every action against
/// the buffer, and return the final content.
pub fn replay(mode: RewriteMode, original: &str, actions: &[Action]) -> String {
    let state = SourceState::new(mode, original);
    Session::run(state, actions, &mut NullService)
        .unwrap_or_else(|e| panic!("{mode}: {e}"))
        .content
}
