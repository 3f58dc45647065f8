use super::concurrent::top_level_groups;
use super::emit::delete_all;
use super::layout::GroupLayout;
use crate::action::Action;
use crate::tree::SyntaxTree;

/// Delete the file, then rebuild it from the most deeply nested tokens
/// outwards. Within one depth, top-level statements take turns inserting
/// their next token at that depth.
///
/// A boundary probe can be produced both when a token ends and when its
/// neighbour starts, so immediately repeated probes are collapsed. Repeated
/// edits are kept: each one changes the buffer.
pub(super) fn generate(tree: &SyntaxTree) -> Vec<Action> {
    let groups = top_level_groups(tree);
    let mut actions: Vec<Action> = delete_all(tree).into_iter().collect();
    let mut layout = GroupLayout::new(tree, &groups);

    // by_depth[group][depth] lists token indices of that group in document order.
    let by_depth: Vec<Vec<Vec<usize>>> = groups
        .iter()
        .map(|tokens| {
            let deepest = tokens.iter().map(|t| t.depth).max().unwrap_or(0);
            let mut buckets = vec![Vec::new(); deepest + 1];
            for (index, token) in tokens.iter().enumerate() {
                buckets[token.depth].push(index);
            }
            buckets
        })
        .collect();
    let levels = by_depth.iter().map(Vec::len).max().unwrap_or(0);

    for depth in (0..levels).rev() {
        let mut cursors = vec![0; groups.len()];
        loop {
            let mut progressed = false;
            for (group, tokens) in groups.iter().enumerate() {
                let next = by_depth[group]
                    .get(depth)
                    .and_then(|bucket| bucket.get(cursors[group]));
                let Some(&index) = next else {
                    continue;
                };
                layout.place(&mut actions, &tokens[index], group, index);
                cursors[group] += 1;
                progressed = true;
            }
            if !progressed {
                break;
            }
        }
    }

    assert_eq!(layout.placed_len(), tree.len(), "inside-out rewrite lost bytes");
    actions.dedup_by(|next, prev| next == prev && !next.is_edit());
    actions
}
