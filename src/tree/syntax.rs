use crate::position::{Length, Position};
use std::ops::Range;

/// Handle to a composite node inside a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

/// Handle to a token inside a [`SyntaxTree`]. Token ids increase in document
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TokenId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A child of a composite node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Node(NodeId),
    Token(TokenId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Operator,
    Punctuation,
    Literal,
    LiteralDelimiter,
    EndOfFile,
}

/// Literal forms whose closing delimiter gets completion probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Tuple,
    Closure,
    Array,
    Dictionary,
}

/// Syntactic category of a composite node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeCategory {
    Expression,
    Type,
    /// A tuple/closure/array/dictionary literal. Also an expression.
    Aggregate(AggregateKind),
    #[default]
    Other,
}

impl NodeCategory {
    pub fn is_expression(self) -> bool {
        matches!(self, NodeCategory::Expression | NodeCategory::Aggregate(_))
    }

    pub fn is_expression_or_type(self) -> bool {
        self.is_expression() || self == NodeCategory::Type
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: Box<str>,
    pub(crate) category: NodeCategory,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<Element>,
    pub(crate) first_token: Option<TokenId>,
    pub(crate) last_token: Option<TokenId>,
}

#[derive(Debug, Clone)]
pub(crate) struct TokenData {
    pub(crate) kind: TokenKind,
    pub(crate) parent: NodeId,
    pub(crate) leading: Range<usize>,
    pub(crate) content: Range<usize>,
    pub(crate) trailing: Range<usize>,
}

/// An immutable syntax tree over one source text.
///
/// The leading trivia, content and trailing trivia of all tokens, taken in
/// document order, tile the source text exactly. The last token is always an
/// empty [`TokenKind::EndOfFile`] token directly under the root.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub(crate) source: String,
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) tokens: Vec<TokenData>,
}

impl SyntaxTree {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> Length {
        Length::of(&self.source)
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// All tokens in document order, end-of-file included.
    pub fn tokens(&self) -> impl Iterator<Item = TokenId> + '_ {
        (0..self.tokens.len() as u32).map(TokenId)
    }

    pub fn end_of_file(&self) -> TokenId {
        TokenId(self.tokens.len() as u32 - 1)
    }

    /// Direct children of the root: the file's top-level statements followed
    /// by the end-of-file token.
    pub fn top_level(&self) -> &[Element] {
        self.children(self.root())
    }

    pub fn node_kind(&self, node: NodeId) -> &str {
        &self.node(node).kind
    }

    pub fn category(&self, node: NodeId) -> NodeCategory {
        self.node(node).category
    }

    pub fn children(&self, node: NodeId) -> &[Element] {
        &self.node(node).children
    }

    pub fn node_parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    pub fn token_parent(&self, token: TokenId) -> NodeId {
        self.token(token).parent
    }

    /// Ancestors of a token from its parent up to and including the root.
    pub fn ancestors(&self, token: TokenId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(self.token_parent(token)), move |&node| {
            self.node_parent(node)
        })
    }

    pub fn first_token(&self, element: Element) -> Option<TokenId> {
        match element {
            Element::Node(node) => self.node(node).first_token,
            Element::Token(token) => Some(token),
        }
    }

    pub fn last_token(&self, element: Element) -> Option<TokenId> {
        match element {
            Element::Node(node) => self.node(node).last_token,
            Element::Token(token) => Some(token),
        }
    }

    pub fn token_kind(&self, token: TokenId) -> TokenKind {
        self.token(token).kind
    }

    /// The token's content without trivia.
    pub fn token_text(&self, token: TokenId) -> &str {
        &self.source[self.token(token).content.clone()]
    }

    pub fn leading_trivia(&self, token: TokenId) -> &str {
        &self.source[self.token(token).leading.clone()]
    }

    pub fn trailing_trivia(&self, token: TokenId) -> &str {
        &self.source[self.token(token).trailing.clone()]
    }

    pub fn leading_len(&self, token: TokenId) -> Length {
        Length::new(self.token(token).leading.len())
    }

    pub fn content_len(&self, token: TokenId) -> Length {
        Length::new(self.token(token).content.len())
    }

    pub fn trailing_len(&self, token: TokenId) -> Length {
        Length::new(self.token(token).trailing.len())
    }

    /// Leading trivia + content + trailing trivia.
    pub fn full_len(&self, token: TokenId) -> Length {
        let data = self.token(token);
        Length::new(data.trailing.end - data.leading.start)
    }

    /// Where the token's leading trivia starts in the original source.
    pub fn full_start(&self, token: TokenId) -> Position {
        Position::new(self.token(token).leading.start)
    }

    pub fn content_start(&self, token: TokenId) -> Position {
        Position::new(self.token(token).content.start)
    }

    pub fn content_end(&self, token: TokenId) -> Position {
        Position::new(self.token(token).content.end)
    }

    fn node(&self, node: NodeId) -> &NodeData {
        &self.nodes[node.index()]
    }

    fn token(&self, token: TokenId) -> &TokenData {
        &self.tokens[token.index()]
    }
}
