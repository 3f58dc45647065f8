use crate::ts::classify::{child_category, token_kind};
use crate::ts::errors::TreeSitterError;
use crate::tree::{SyntaxTree, TreeBuilder};
use tree_sitter::Node;

/// Lower a tree-sitter tree into a [`SyntaxTree`].
///
/// Extras (comments) and text no leaf covers end up as trivia. A node
/// whose children are all extras or zero-width is emitted as one token.
pub(super) fn lower(root: Node<'_>, source: &str) -> Result<SyntaxTree, TreeSitterError> {
    let mut builder = TreeBuilder::new(root.kind());
    let mut cursor = root.walk();
    // Kinds of the nodes currently open in the builder.
    let mut open: Vec<&str> = Vec::new();

    if cursor.goto_first_child() {
        'walk: loop {
            let node = cursor.node();
            if emits_text(node) {
                if has_text_children(node) {
                    let parent = open.last().copied().unwrap_or(root.kind());
                    builder.start_node(node.kind(), child_category(node.kind(), parent));
                    open.push(node.kind());
                    cursor.goto_first_child();
                    continue;
                }
                push_leaf(&mut builder, node, source);
            }

            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() || cursor.node() == root {
                    break 'walk;
                }
                builder.finish_node();
                open.pop();
            }
        }
    }

    let rest = &source[builder.text_len()..];
    builder.trivia(rest);
    Ok(builder.finish()?)
}

fn emits_text(node: Node<'_>) -> bool {
    !node.is_extra() && node.start_byte() < node.end_byte()
}

fn has_text_children(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(emits_text);
    found
}

fn push_leaf(builder: &mut TreeBuilder, node: Node<'_>, source: &str) {
    let range = node.byte_range();
    let start = range.start.max(builder.text_len());
    if start >= range.end {
        return;
    }
    let gap = &source[builder.text_len()..start];
    builder
        .trivia(gap)
        .token(token_kind(node.kind(), node.is_named()), &source[start..range.end]);
}
