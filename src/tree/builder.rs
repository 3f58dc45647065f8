use crate::tree::errors::TreeError;
use crate::tree::syntax::{
    Element, NodeCategory, NodeData, NodeId, SyntaxTree, TokenData, TokenId, TokenKind,
};

/// Incremental construction of a [`SyntaxTree`] in document order.
///
/// Text is appended as either token content or trivia. Trivia is assigned to
/// tokens when the tree is finished: text between two tokens up to the first
/// newline trails the earlier token, the rest leads the later one.
///
/// The chaining methods never fail; misuse is reported by [`TreeBuilder::finish`].
///
/// ```
/// use stress_tester::tree::{NodeCategory, TokenKind, TreeBuilder};
///
/// let mut builder = TreeBuilder::new("source_file");
/// builder
///     .start_node("call", NodeCategory::Expression)
///     .token(TokenKind::Identifier, "f")
///     .token(TokenKind::Punctuation, "(")
///     .token(TokenKind::Punctuation, ")")
///     .finish_node();
/// let tree = builder.finish().unwrap();
/// assert_eq!(tree.source(), "f()");
/// ```
#[derive(Debug)]
pub struct TreeBuilder {
    source: String,
    nodes: Vec<NodeData>,
    tokens: Vec<TokenData>,
    stack: Vec<NodeId>,
    error: Option<TreeError>,
}

impl TreeBuilder {
    /// Start a tree whose root node has the given kind.
    pub fn new(root_kind: &str) -> Self {
        let root = NodeData {
            kind: root_kind.into(),
            category: NodeCategory::Other,
            parent: None,
            children: Vec::new(),
            first_token: None,
            last_token: None,
        };
        Self {
            source: String::new(),
            nodes: vec![root],
            tokens: Vec::new(),
            stack: vec![NodeId(0)],
            error: None,
        }
    }

    pub fn start_node(&mut self, kind: &str, category: NodeCategory) -> &mut Self {
        let parent = self.current();
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind: kind.into(),
            category,
            parent: Some(parent),
            children: Vec::new(),
            first_token: None,
            last_token: None,
        });
        self.nodes[parent.index()].children.push(Element::Node(id));
        self.stack.push(id);
        self
    }

    pub fn finish_node(&mut self) -> &mut Self {
        if self.stack.len() > 1 {
            if let Some(done) = self.stack.pop() {
                self.propagate_boundaries(done);
            }
        } else {
            self.error.get_or_insert(TreeError::NoOpenNode);
        }
        self
    }

    pub fn token(&mut self, kind: TokenKind, text: &str) -> &mut Self {
        let start = self.source.len();
        self.source.push_str(text);
        self.push_token(kind, start..self.source.len());
        self
    }

    pub fn trivia(&mut self, text: &str) -> &mut Self {
        self.source.push_str(text);
        self
    }

    /// Number of source bytes appended so far.
    pub fn text_len(&self) -> usize {
        self.source.len()
    }

    /// Close the tree, appending the end-of-file token and distributing trivia.
    pub fn finish(mut self) -> Result<SyntaxTree, TreeError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        if self.stack.len() > 1 {
            return Err(TreeError::UnclosedNodes {
                open: self.stack.len() - 1,
            });
        }
        let end = self.source.len();
        self.push_token(TokenKind::EndOfFile, end..end);
        if self.tokens.len() > u32::MAX as usize {
            return Err(TreeError::TooLarge {
                count: self.tokens.len(),
            });
        }

        self.assign_trivia();

        Ok(SyntaxTree {
            source: self.source,
            nodes: self.nodes,
            tokens: self.tokens,
        })
    }

    fn current(&self) -> NodeId {
        *self.stack.last().unwrap_or(&NodeId(0))
    }

    fn push_token(&mut self, kind: TokenKind, content: std::ops::Range<usize>) {
        let parent = self.current();
        let id = TokenId(self.tokens.len() as u32);
        self.tokens.push(TokenData {
            kind,
            parent,
            leading: content.start..content.start,
            trailing: content.end..content.end,
            content,
        });
        let data = &mut self.nodes[parent.index()];
        data.children.push(Element::Token(id));
        data.first_token.get_or_insert(id);
        data.last_token = Some(id);
    }

    fn assign_trivia(&mut self) {
        let mut gap_start = 0;
        for idx in 0..self.tokens.len() {
            let content_start = self.tokens[idx].content.start;
            let split = if idx == 0 {
                0
            } else {
                self.source[gap_start..content_start]
                    .find('\n')
                    .map_or(content_start, |newline| gap_start + newline)
            };
            if idx > 0 {
                self.tokens[idx - 1].trailing = gap_start..split;
            }
            self.tokens[idx].leading = split..content_start;
            gap_start = self.tokens[idx].content.end;
        }
    }

    /// Hand a finished node's boundary tokens to its parent. Children finish
    /// in document order, so the parent keeps its earliest first token and
    /// takes the latest last token.
    fn propagate_boundaries(&mut self, done: NodeId) {
        let (first, last, parent) = {
            let data = &self.nodes[done.index()];
            (data.first_token, data.last_token, data.parent)
        };
        let (Some(parent), Some(first), Some(last)) = (parent, first, last) else {
            return;
        };
        let data = &mut self.nodes[parent.index()];
        data.first_token.get_or_insert(first);
        data.last_token = Some(last);
    }
}
