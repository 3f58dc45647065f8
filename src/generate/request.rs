use super::emit::{emit_ranges, emit_token};
use crate::action::Action;
use crate::collect::ActionTokenCollector;
use crate::tree::SyntaxTree;

/// Probe every token where it already is, without editing anything.
///
/// The result is sorted by action kind so the consumer can batch requests of
/// the same kind; ties keep emission order.
pub(super) fn generate(tree: &SyntaxTree) -> Vec<Action> {
    let mut actions = vec![Action::CollectExpressionType];

    for token in ActionTokenCollector::new(tree).collect_all() {
        let id = token.token;
        emit_token(&mut actions, tree, &token, tree.full_start(id), false);
        // Tokens count as placed once the walk has reached them.
        emit_ranges(&mut actions, tree, &token, tree.content_start(id), |other| {
            (other < id).then(|| tree.content_start(other))
        });
    }

    assert!(
        !actions.iter().any(Action::is_edit),
        "request generation produced an edit"
    );
    actions.sort_by_key(Action::kind);
    actions
}
