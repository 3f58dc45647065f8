use super::emit::{delete_all, emit_ranges, emit_token};
use crate::action::Action;
use crate::collect::ActionTokenCollector;
use crate::position::Position;
use crate::tree::SyntaxTree;

/// Delete the file, then re-insert every token strictly left to right.
pub(super) fn generate(tree: &SyntaxTree) -> Vec<Action> {
    let mut actions: Vec<Action> = delete_all(tree).into_iter().collect();
    let mut position = Position::START;

    for token in ActionTokenCollector::new(tree).collect_all() {
        let id = token.token;
        // Everything before this token is back in place, so running and
        // original offsets agree.
        assert_eq!(position, tree.full_start(id), "basic rewrite drifted");

        emit_token(&mut actions, tree, &token, position, true);
        emit_ranges(
            &mut actions,
            tree,
            &token,
            position + tree.leading_len(id),
            |other| (other < id).then(|| tree.content_start(other)),
        );
        position += tree.full_len(id);
    }

    actions
}
