use crate::common::{parse, replay};
use proptest::prelude::*;
use proptest::string::string_regex;
use stress_tester::page::paginate;
use std::collections::HashSet;
use stress_tester::tree::{AggregateKind, Element, NodeCategory, TokenKind, TreeBuilder};
use stress_tester::{
    Action, ActionKind, ActionTokenCollector, Probe, RewriteMode, SourceState, SyntaxTree,
};

fn leaf_expr() -> impl Strategy<Value = String> {
    let int_lit = (0u32..=10_000).prop_map(|n| n.to_string());
    let text_lit = string_regex("[a-z ]{0,8}")
        .expect("regex")
        .prop_map(|s| format!("\"{}\"", s));
    let ident = prop_oneof![Just("x".to_string()), Just("value".to_string())];

    prop_oneof![int_lit, text_lit, ident]
}

fn expr_strategy() -> impl Strategy<Value = String> {
    leaf_expr().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a}, {b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("[{a}, {b}]")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a} + {b}")),
            inner.clone().prop_map(|a| format!("f({a})")),
            inner.clone().prop_map(|a| format!("x.field.call({a})")),
            inner.clone().prop_map(|a| format!("|y| {a}")),
            (inner.clone(), inner.clone())
                .prop_map(|(t, e)| format!("if x {{ {t} }} else {{ {e} }}")),
        ]
    })
}

fn program_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec((expr_strategy(), any::<bool>()), 0..5).prop_map(|items| {
        let mut out = String::from("// generated\n");
        for (index, (expr, commented)) in items.iter().enumerate() {
            out.push_str(&format!("fn item{index}() -> i32 {{\n    let v: Vec<i32> = {expr};"));
            if *commented {
                out.push_str(" // note");
            }
            out.push_str("\n    v\n}\n\n");
        }
        out
    })
}

/// Shapes for trees built directly, independent of any grammar.
#[derive(Debug, Clone)]
enum Shape {
    Token(TokenKind, String),
    Trivia(String),
    Node(NodeCategory, Vec<Shape>),
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let token = prop_oneof![
        string_regex("[a-z]{1,3}")
            .expect("regex")
            .prop_map(|s| Shape::Token(TokenKind::Identifier, s)),
        Just(Shape::Token(TokenKind::Punctuation, "(".to_string())),
        Just(Shape::Token(TokenKind::Punctuation, ")".to_string())),
        Just(Shape::Token(TokenKind::Operator, "+".to_string())),
        Just(Shape::Token(TokenKind::Keyword, "get".to_string())),
        Just(Shape::Token(TokenKind::Literal, "é".to_string())),
        prop_oneof![Just(" "), Just("\n"), Just(" /* c */\n  ")]
            .prop_map(|s| Shape::Trivia(s.to_string())),
    ];
    let category = prop_oneof![
        Just(NodeCategory::Other),
        Just(NodeCategory::Expression),
        Just(NodeCategory::Type),
        Just(NodeCategory::Aggregate(AggregateKind::Tuple)),
    ];
    token.prop_recursive(5, 64, 5, move |inner| {
        (category.clone(), prop::collection::vec(inner, 0..5))
            .prop_map(|(category, children)| Shape::Node(category, children))
    })
}

fn build(shapes: &[Shape]) -> SyntaxTree {
    fn add(builder: &mut TreeBuilder, shape: &Shape) {
        match shape {
            Shape::Token(kind, text) => {
                builder.token(*kind, text);
            }
            Shape::Trivia(text) => {
                builder.trivia(text);
            }
            Shape::Node(category, children) => {
                builder.start_node("node", *category);
                for child in children {
                    add(builder, child);
                }
                builder.finish_node();
            }
        }
    }

    let mut builder = TreeBuilder::new("root");
    for shape in shapes {
        add(&mut builder, shape);
    }
    builder.finish().unwrap()
}

/// Every action must fit the buffer and the edits must rebuild the source.
fn check_all_modes(tree: &SyntaxTree) -> Result<(), TestCaseError> {
    for mode in RewriteMode::ALL {
        let actions = mode.generate(tree);
        let mut state = SourceState::new(mode, tree.source());
        for (index, action) in actions.iter().enumerate() {
            if let Err(e) = state.apply(action) {
                return Err(TestCaseError::fail(format!(
                    "{mode}: action #{index} ({action}) invalid: {e}"
                )));
            }
        }
        prop_assert_eq!(state.content(), tree.source(), "{}", mode);
        prop_assert_eq!(state.was_modified(), mode.rewrites() && !tree.is_empty());
    }
    Ok(())
}

/// Every mode must issue every probe the collector assigns: one cursor info
/// per identifier, each boundary probe once and one range info per distinct
/// non-empty syntactic range.
fn check_completeness(tree: &SyntaxTree) -> Result<(), TestCaseError> {
    let tokens = ActionTokenCollector::new(tree).collect_all();
    let identifiers = tree
        .tokens()
        .filter(|&t| tree.token_kind(t) == TokenKind::Identifier)
        .count();
    let boundary = |probe: Probe| {
        tokens
            .iter()
            .map(|t| usize::from(t.front.contains(&probe)) + usize::from(t.rear.contains(&probe)))
            .sum::<usize>()
    };

    let root = tree.root();
    let spans: HashSet<_> = tree
        .tokens()
        .flat_map(|token| tree.ancestors(token).collect::<Vec<_>>())
        .filter(|&node| node != root)
        .filter_map(|node| {
            let element = Element::Node(node);
            Some((tree.first_token(element)?, tree.last_token(element)?))
        })
        .filter(|&(first, last)| tree.content_start(first) < tree.content_end(last))
        .collect();

    for mode in RewriteMode::ALL {
        let actions = mode.generate(tree);
        let count = |kind: ActionKind| actions.iter().filter(|a| a.kind() == kind).count();

        prop_assert_eq!(count(ActionKind::CursorInfo), identifiers, "{}", mode);
        prop_assert_eq!(count(ActionKind::RangeInfo), spans.len(), "{}", mode);
        for probe in [Probe::CodeComplete, Probe::TypeContextInfo, Probe::ConformingMethodList] {
            prop_assert_eq!(count(probe.at(0).kind()), boundary(probe), "{} {:?}", mode, probe);
        }
        for token in tokens.iter().filter(|t| !t.front.is_empty()) {
            let at = tree.content_start(token.token);
            let probed = match mode {
                // Rewrites move tokens around; only the request mode keeps
                // final offsets.
                RewriteMode::None => actions.contains(&Action::CodeComplete {
                    offset: at.offset(),
                }),
                _ => count(ActionKind::CodeComplete) > 0,
            };
            prop_assert!(probed, "{}: no completion for token at {}", mode, at.offset());
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn generated_programs_replay_exactly(program in program_strategy()) {
        let tree = parse(&program);
        prop_assert_eq!(tree.source(), program.as_str());
        check_all_modes(&tree)?;
    }

    #[test]
    fn built_trees_replay_exactly(shapes in prop::collection::vec(shape_strategy(), 0..6)) {
        let tree = build(&shapes);
        check_all_modes(&tree)?;
    }

    #[test]
    fn arbitrary_text_replays_exactly(text in string_regex("[ -~\n\té]{0,160}").expect("regex")) {
        let tree = parse(&text);
        check_all_modes(&tree)?;
    }

    #[test]
    fn generated_programs_issue_every_probe(program in program_strategy()) {
        check_completeness(&parse(&program))?;
    }

    #[test]
    fn built_trees_issue_every_probe(shapes in prop::collection::vec(shape_strategy(), 0..6)) {
        check_completeness(&build(&shapes))?;
    }

    #[test]
    fn rebuild_from_empty_after_delete(program in program_strategy()) {
        let tree = parse(&program);
        prop_assume!(!tree.is_empty());
        for mode in [RewriteMode::Basic, RewriteMode::Concurrent, RewriteMode::InsideOut] {
            let actions = mode.generate(&tree);
            // Everything after the initial delete rebuilds from nothing.
            prop_assert_eq!(replay(mode, "", &actions[1..]), program.as_str());
        }
    }

    #[test]
    fn pages_concatenate_and_chain(
        program in program_strategy(),
        count in 1usize..8,
    ) {
        let tree = parse(&program);
        for mode in RewriteMode::ALL {
            let actions = mode.generate(&tree);
            let pages = paginate(mode, &program, &actions, count).unwrap();
            prop_assert_eq!(pages.len(), count);

            let mut state = SourceState::new(mode, program.as_str());
            let mut joined = Vec::new();
            for page in &pages {
                prop_assert_eq!(page.start.content(), state.content());
                for action in &page.actions {
                    state.apply(action).unwrap();
                }
                joined.extend(page.actions.iter().cloned());
            }
            prop_assert_eq!(&joined, &actions);
            prop_assert_eq!(state.content(), program.as_str());
        }
    }

    #[test]
    fn collection_is_idempotent(shapes in prop::collection::vec(shape_strategy(), 0..6)) {
        let tree = build(&shapes);
        let collector = ActionTokenCollector::new(&tree);
        prop_assert_eq!(collector.collect_all(), collector.collect_all());
        prop_assert_eq!(collector.collect_all().len(), tree.token_count());
    }
}
