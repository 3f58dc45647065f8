use crate::common::{parse, replay, IF_ELSE_IF, SAMPLE};
use std::collections::HashSet;
use stress_tester::tree::{AggregateKind, Element, NodeCategory, TokenKind, TreeBuilder};
use stress_tester::{Action, ActionKind, ActionTokenCollector, RewriteMode, SyntaxTree};

fn count(actions: &[Action], kind: ActionKind) -> usize {
    actions.iter().filter(|a| a.kind() == kind).count()
}

/// `a.b([.c])` as a member call whose argument is an array literal holding
/// an implicit member.
fn member_call() -> SyntaxTree {
    let mut b = TreeBuilder::new("source_file");
    b.start_node("call_expression", NodeCategory::Expression)
        .token(TokenKind::Identifier, "a")
        .token(TokenKind::Punctuation, ".")
        .token(TokenKind::Identifier, "b")
        .token(TokenKind::Punctuation, "(")
        .start_node("arguments", NodeCategory::Other)
        .start_node("array_expression", NodeCategory::Aggregate(AggregateKind::Array))
        .token(TokenKind::Punctuation, "[")
        .start_node("elements", NodeCategory::Other)
        .token(TokenKind::Punctuation, ".")
        .token(TokenKind::Identifier, "c")
        .finish_node()
        .token(TokenKind::Punctuation, "]")
        .finish_node()
        .finish_node()
        .token(TokenKind::Punctuation, ")")
        .finish_node();
    b.finish().unwrap()
}

#[test]
fn inside_out_member_call_edit_sequence() {
    let tree = member_call();
    let actions = RewriteMode::InsideOut.generate(&tree);
    let edits: Vec<(usize, usize, &str)> = actions
        .iter()
        .filter_map(|a| match a {
            Action::ReplaceText {
                offset,
                length,
                text,
            } => Some((*offset, *length, text.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(
        edits,
        [
            (0, 9, ""),
            (0, 0, "."),
            (1, 0, "c"),
            (0, 0, "["),
            (3, 0, "]"),
            (0, 0, "a"),
            (1, 0, "."),
            (2, 0, "b"),
            (3, 0, "("),
            (8, 0, ")"),
        ]
    );
    assert_eq!(replay(RewriteMode::InsideOut, tree.source(), &actions), "a.b([.c])");
}

#[test]
fn collect_expression_type_only_without_rewriting() {
    let tree = parse(IF_ELSE_IF);
    assert_eq!(
        count(&RewriteMode::None.generate(&tree), ActionKind::CollectExpressionType),
        1
    );
    for mode in [RewriteMode::Basic, RewriteMode::Concurrent, RewriteMode::InsideOut] {
        assert_eq!(
            count(&mode.generate(&tree), ActionKind::CollectExpressionType),
            0,
            "{mode}"
        );
    }
}

#[test]
fn basic_rewrite_emits_each_range_once() {
    let tree = parse(IF_ELSE_IF);
    let actions = RewriteMode::Basic.generate(&tree);

    let ranges: Vec<&Action> = actions
        .iter()
        .filter(|a| a.kind() == ActionKind::RangeInfo)
        .collect();
    let unique: HashSet<&Action> = ranges.iter().copied().collect();
    assert_eq!(unique.len(), ranges.len(), "duplicate range probes");

    // One probe per distinct (first, last) token pair of a non-root node.
    let root = tree.root();
    let spans: HashSet<_> = tree
        .tokens()
        .flat_map(|token| tree.ancestors(token).collect::<Vec<_>>())
        .filter(|&node| node != root)
        .filter_map(|node| {
            let element = Element::Node(node);
            Some((tree.first_token(element)?, tree.last_token(element)?))
        })
        .collect();
    assert_eq!(ranges.len(), spans.len());
}

#[test]
fn request_probes_are_sorted_and_read_only() {
    let tree = parse(SAMPLE);
    let actions = RewriteMode::None.generate(&tree);
    assert_eq!(actions[0], Action::CollectExpressionType);
    assert!(actions.windows(2).all(|w| w[0].kind() <= w[1].kind()));
    assert!(!actions.iter().any(Action::is_edit));
    assert_eq!(replay(RewriteMode::None, SAMPLE, &actions), SAMPLE);
}

#[test]
fn every_identifier_gets_cursor_info() {
    let tree = parse(SAMPLE);
    let identifiers: Vec<usize> = tree
        .tokens()
        .filter(|&t| tree.token_kind(t) == TokenKind::Identifier)
        .map(|t| tree.content_start(t).offset())
        .collect();

    let cursor = |actions: &[Action]| -> Vec<usize> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::CursorInfo { offset } => Some(*offset),
                _ => None,
            })
            .collect()
    };

    // Without rewriting, cursor info lands on each identifier in place.
    assert_eq!(cursor(&RewriteMode::None.generate(&tree)), identifiers);
    // The basic rewrite places every token at its final offset.
    assert_eq!(cursor(&RewriteMode::Basic.generate(&tree)), identifiers);
}

#[test]
fn all_modes_rebuild_real_source() {
    for source in [SAMPLE, IF_ELSE_IF, "", "\n\n", "// only a comment\n"] {
        let tree = parse(source);
        for mode in RewriteMode::ALL {
            let actions = mode.generate(&tree);
            assert_eq!(replay(mode, source, &actions), source, "{mode} on {source:?}");
        }
    }
}

#[test]
fn empty_file_needs_no_edits() {
    let tree = parse("");
    for mode in RewriteMode::ALL {
        assert!(!mode.generate(&tree).iter().any(Action::is_edit), "{mode}");
    }
}

#[test]
fn rewrites_start_by_deleting_everything() {
    let tree = parse(SAMPLE);
    for mode in [RewriteMode::Basic, RewriteMode::Concurrent, RewriteMode::InsideOut] {
        let actions = mode.generate(&tree);
        assert_eq!(
            actions[0],
            Action::ReplaceText {
                offset: 0,
                length: SAMPLE.len(),
                text: String::new(),
            },
            "{mode}"
        );
    }
}

#[test]
fn broken_source_still_round_trips() {
    let source = "fn broken( {\n    let = ;\n}\nstruct";
    let tree = parse(source);
    for mode in RewriteMode::ALL {
        let actions = mode.generate(&tree);
        assert_eq!(replay(mode, source, &actions), source, "{mode}");
    }
}

#[test]
fn deeply_nested_source_is_collected() {
    const DEPTH: usize = 20_000;
    let source = format!(
        "fn f() {{ let x = {}1{}; }}\n",
        "(".repeat(DEPTH),
        ")".repeat(DEPTH)
    );
    let tree = parse(&source);
    let tokens = ActionTokenCollector::new(&tree).collect_all();
    assert_eq!(tokens.len(), tree.token_count());
    let deepest = tokens.iter().map(|t| t.depth).max().unwrap();
    assert!(deepest > DEPTH, "depth {deepest}");
}
