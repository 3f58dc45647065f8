use super::emit::{emit_ranges, emit_token};
use crate::action::Action;
use crate::collect::ActionToken;
use crate::position::{Length, Position};
use crate::tree::{SyntaxTree, TokenId};

/// Prefix sums over byte lengths with point updates (Fenwick tree).
#[derive(Debug, Clone)]
struct PrefixSums {
    tree: Vec<usize>,
}

impl PrefixSums {
    fn new(len: usize) -> Self {
        Self {
            tree: vec![0; len + 1],
        }
    }

    fn add(&mut self, index: usize, value: usize) {
        let mut i = index + 1;
        while i < self.tree.len() {
            self.tree[i] += value;
            i += i & i.wrapping_neg();
        }
    }

    /// Sum of the values at indices `0..end`.
    fn prefix(&self, end: usize) -> usize {
        let mut i = end;
        let mut sum = 0;
        while i > 0 {
            sum += self.tree[i];
            i -= i & i.wrapping_neg();
        }
        sum
    }
}

#[derive(Debug)]
struct GroupSlots {
    /// Index of the group's first token; a group's tokens are contiguous.
    first: usize,
    placed: Vec<bool>,
    lengths: PrefixSums,
}

/// Tracks which tokens of which top-level group are already in the buffer.
///
/// Groups are laid out end to end. A token's insertion point is the placed
/// length of all earlier groups plus the placed length of the tokens that
/// precede it in its own group, whatever depth they were placed from.
#[derive(Debug)]
pub(super) struct GroupLayout<'t> {
    tree: &'t SyntaxTree,
    groups: Vec<GroupSlots>,
    totals: PrefixSums,
}

impl<'t> GroupLayout<'t> {
    /// `groups` must be non-empty, in document order, and each hold a
    /// contiguous run of tokens.
    pub(super) fn new(tree: &'t SyntaxTree, groups: &[Vec<ActionToken>]) -> Self {
        let groups: Vec<GroupSlots> = groups
            .iter()
            .map(|tokens| GroupSlots {
                first: tokens[0].token.index(),
                placed: vec![false; tokens.len()],
                lengths: PrefixSums::new(tokens.len()),
            })
            .collect();
        let totals = PrefixSums::new(groups.len());
        Self {
            tree,
            groups,
            totals,
        }
    }

    /// Insert `token` (token `index` of `group`) at its current insertion
    /// point, emitting its probes and every range it completes.
    pub(super) fn place(
        &mut self,
        out: &mut Vec<Action>,
        token: &ActionToken,
        group: usize,
        index: usize,
    ) {
        let tree = self.tree;
        let start = self.insertion_point(group, index);
        emit_token(out, tree, token, start, true);
        self.mark_placed(group, index);
        emit_ranges(
            out,
            tree,
            token,
            start + tree.leading_len(token.token),
            |other| self.content_start(other),
        );
    }

    /// Where the leading trivia of token `index` of `group` goes.
    pub(super) fn insertion_point(&self, group: usize, index: usize) -> Position {
        Position::START
            + Length::new(self.totals.prefix(group) + self.groups[group].lengths.prefix(index))
    }

    pub(super) fn mark_placed(&mut self, group: usize, index: usize) {
        let slots = &mut self.groups[group];
        assert!(!slots.placed[index], "token placed twice");
        let token = TokenId((slots.first + index) as u32);
        let len = self.tree.full_len(token).bytes();
        slots.placed[index] = true;
        slots.lengths.add(index, len);
        self.totals.add(group, len);
    }

    /// Current content start of `token`, or `None` if it is not placed yet.
    ///
    /// Panics if `token` belongs to none of the groups.
    pub(super) fn content_start(&self, token: TokenId) -> Option<Position> {
        let (group, index) = self.locate(token);
        self.groups[group].placed[index].then(|| {
            self.insertion_point(group, index) + self.tree.leading_len(token)
        })
    }

    /// Total bytes placed so far.
    pub(super) fn placed_len(&self) -> Length {
        Length::new(self.totals.prefix(self.groups.len()))
    }

    fn locate(&self, token: TokenId) -> (usize, usize) {
        let raw = token.index();
        let group = self
            .groups
            .partition_point(|slots| slots.first <= raw)
            .checked_sub(1);
        match group {
            Some(group) if raw - self.groups[group].first < self.groups[group].placed.len() => {
                (group, raw - self.groups[group].first)
            }
            _ => panic!("token {raw} does not belong to any placement group"),
        }
    }
}
