//! Single-pass annotation of tokens with depth, probes and range links.

use crate::action::Probe;
use crate::tree::{Element, NodeCategory, SyntaxTree, TokenId, TokenKind};

const REFERENCE_PROBES: &[Probe] = &[
    Probe::CursorInfo,
    Probe::CodeComplete,
    Probe::TypeContextInfo,
    Probe::ConformingMethodList,
];

const COMPLETION_PROBES: &[Probe] = &[
    Probe::CodeComplete,
    Probe::TypeContextInfo,
    Probe::ConformingMethodList,
];

/// Contextual keywords that introduce accessor bodies.
const ACCESSOR_KEYWORDS: &[&str] = &["get", "set", "willSet", "didSet"];

const CLOSING_DELIMITERS: &[&str] = &[")", "]", "}"];

/// A token annotated with everything a generator needs to emit its actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionToken {
    pub token: TokenId,
    /// Number of composite nodes entered between the collection root and
    /// this token.
    pub depth: usize,
    /// Probes issued at the content start.
    pub front: Vec<Probe>,
    /// Probes issued at the content end.
    pub rear: Vec<Probe>,
    /// Start tokens of the maximal ranges whose last token is this one.
    pub ended_ranges: Vec<TokenId>,
    /// End tokens of the maximal ranges whose first token is this one.
    pub started_ranges: Vec<TokenId>,
}

/// Walks a tree once and produces [`ActionToken`]s in document order.
pub struct ActionTokenCollector<'t> {
    tree: &'t SyntaxTree,
}

impl<'t> ActionTokenCollector<'t> {
    pub fn new(tree: &'t SyntaxTree) -> Self {
        Self { tree }
    }

    /// Collect every token of the whole tree.
    pub fn collect_all(&self) -> Vec<ActionToken> {
        self.collect(Element::Node(self.tree.root()))
    }

    /// Collect the tokens below `element`, numbering depth from it.
    pub fn collect(&self, element: Element) -> Vec<ActionToken> {
        let mut tokens = Vec::new();
        let mut stack = vec![(element, 0)];
        while let Some((element, depth)) = stack.pop() {
            match element {
                Element::Token(token) => tokens.push(self.annotate(token, depth)),
                Element::Node(node) => {
                    let children = self.tree.children(node);
                    stack.extend(children.iter().rev().map(|&child| (child, depth + 1)));
                }
            }
        }
        tokens
    }

    fn annotate(&self, token: TokenId, depth: usize) -> ActionToken {
        let tree = self.tree;
        let (front, mut rear) = match tree.token_kind(token) {
            TokenKind::Identifier => (REFERENCE_PROBES.to_vec(), COMPLETION_PROBES.to_vec()),
            _ if self.starts_expression_or_type(token) => {
                (COMPLETION_PROBES.to_vec(), Vec::new())
            }
            TokenKind::Keyword if ACCESSOR_KEYWORDS.contains(&tree.token_text(token)) => {
                (COMPLETION_PROBES.to_vec(), COMPLETION_PROBES.to_vec())
            }
            _ => (Vec::new(), Vec::new()),
        };
        if rear.is_empty() && self.closes_aggregate(token) {
            rear = COMPLETION_PROBES.to_vec();
        }

        ActionToken {
            token,
            depth,
            front,
            rear,
            ended_ranges: self.range_partners(token, |e| tree.last_token(e), |e| {
                tree.first_token(e)
            }),
            started_ranges: self.range_partners(token, |e| tree.first_token(e), |e| {
                tree.last_token(e)
            }),
        }
    }

    fn starts_expression_or_type(&self, token: TokenId) -> bool {
        self.tree
            .ancestors(token)
            .take_while(|&node| self.tree.first_token(Element::Node(node)) == Some(token))
            .any(|node| self.tree.category(node).is_expression_or_type())
    }

    fn closes_aggregate(&self, token: TokenId) -> bool {
        self.tree.token_kind(token) == TokenKind::Punctuation
            && CLOSING_DELIMITERS.contains(&self.tree.token_text(token))
            && matches!(
                self.tree.category(self.tree.token_parent(token)),
                NodeCategory::Aggregate(_)
            )
    }

    /// Walk up while `token` is the `edge` token of each ancestor and record
    /// each ancestor's `opposite` token, skipping repeats so nested ranges
    /// sharing both edges are reported once. The root is never a range.
    fn range_partners(
        &self,
        token: TokenId,
        edge: impl Fn(Element) -> Option<TokenId>,
        opposite: impl Fn(Element) -> Option<TokenId>,
    ) -> Vec<TokenId> {
        let root = self.tree.root();
        let mut partners: Vec<TokenId> = Vec::new();
        for node in self.tree.ancestors(token) {
            if node == root || edge(Element::Node(node)) != Some(token) {
                break;
            }
            if let Some(partner) = opposite(Element::Node(node)) {
                if partners.last() != Some(&partner) {
                    partners.push(partner);
                }
            }
        }
        partners
    }
}
