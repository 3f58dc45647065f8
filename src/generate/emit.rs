use crate::action::{Action, Probe};
use crate::collect::ActionToken;
use crate::position::Position;
use crate::tree::{SyntaxTree, TokenId};

/// The edit every rewriting strategy opens with. Empty files need none.
pub(super) fn delete_all(tree: &SyntaxTree) -> Option<Action> {
    (!tree.is_empty()).then(|| Action::ReplaceText {
        offset: 0,
        length: tree.len().bytes(),
        text: String::new(),
    })
}

/// Emit the probes of one token placed with its leading trivia at `start`,
/// interleaved with the insertions of its trivia and content when `insert`
/// is set.
///
/// Completion-style front probes run before the content exists, cursor info
/// needs the content in place, rear probes follow the content.
pub(super) fn emit_token(
    out: &mut Vec<Action>,
    tree: &SyntaxTree,
    token: &ActionToken,
    start: Position,
    insert: bool,
) {
    let id = token.token;
    let content_start = start + tree.leading_len(id);
    let content_end = content_start + tree.content_len(id);

    if insert {
        push_insert(out, start, tree.leading_trivia(id));
    }
    out.extend(
        token
            .front
            .iter()
            .filter(|&&probe| probe != Probe::CursorInfo)
            .map(|probe| probe.at(content_start.offset())),
    );
    if insert {
        push_insert(out, content_start, tree.token_text(id));
    }
    if token.front.contains(&Probe::CursorInfo) {
        out.push(Probe::CursorInfo.at(content_start.offset()));
    }
    out.extend(token.rear.iter().map(|probe| probe.at(content_end.offset())));
    if insert {
        push_insert(out, content_end, tree.trailing_trivia(id));
    }
}

/// Emit a range-info probe for every range with an edge at `token` whose
/// opposite edge is already placed.
///
/// `content_start` is where `token`'s content now sits; `locate` returns the
/// current content start of any other placed token and `None` for tokens not
/// placed yet. Ranges are emitted exactly once: when their second edge lands.
pub(super) fn emit_ranges(
    out: &mut Vec<Action>,
    tree: &SyntaxTree,
    token: &ActionToken,
    content_start: Position,
    locate: impl Fn(TokenId) -> Option<Position>,
) {
    let id = token.token;
    let locate = |other: TokenId| {
        if other == id {
            Some(content_start)
        } else {
            locate(other)
        }
    };
    let content_end = content_start + tree.content_len(id);

    for &start in &token.ended_ranges {
        if let Some(range_start) = locate(start) {
            push_range(out, range_start, content_end);
        }
    }
    for &end in token.started_ranges.iter().filter(|&&end| end != id) {
        if let Some(end_start) = locate(end) {
            push_range(out, content_start, end_start + tree.content_len(end));
        }
    }
}

fn push_insert(out: &mut Vec<Action>, at: Position, text: &str) {
    if !text.is_empty() {
        out.push(Action::insert(at.offset(), text));
    }
}

fn push_range(out: &mut Vec<Action>, start: Position, end: Position) {
    let length = end - start;
    if !length.is_zero() {
        out.push(Action::RangeInfo {
            offset: start.offset(),
            length: length.bytes(),
        });
    }
}
