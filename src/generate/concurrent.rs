use super::emit::delete_all;
use super::layout::GroupLayout;
use crate::action::Action;
use crate::collect::{ActionToken, ActionTokenCollector};
use crate::tree::SyntaxTree;

/// Delete the file, then rebuild every top-level statement at once: each
/// round inserts the next token of every statement that still has one.
///
/// Adjacent duplicate actions are kept.
pub(super) fn generate(tree: &SyntaxTree) -> Vec<Action> {
    let groups = top_level_groups(tree);
    let mut actions: Vec<Action> = delete_all(tree).into_iter().collect();
    let mut layout = GroupLayout::new(tree, &groups);
    let mut cursors = vec![0; groups.len()];

    loop {
        let mut progressed = false;
        for (group, tokens) in groups.iter().enumerate() {
            let Some(token) = tokens.get(cursors[group]) else {
                continue;
            };
            layout.place(&mut actions, token, group, cursors[group]);
            cursors[group] += 1;
            progressed = true;
        }
        if !progressed {
            break;
        }
    }

    assert_eq!(layout.placed_len(), tree.len(), "concurrent rewrite lost bytes");
    actions
}

/// One independently collected token list per top-level statement, the
/// end-of-file token forming the last group.
pub(super) fn top_level_groups(tree: &SyntaxTree) -> Vec<Vec<ActionToken>> {
    let collector = ActionTokenCollector::new(tree);
    tree.top_level()
        .iter()
        .map(|&element| collector.collect(element))
        .filter(|tokens| !tokens.is_empty())
        .collect()
}
