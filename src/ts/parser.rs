use crate::tree::SyntaxTree;
use crate::ts::convert::lower;
use crate::ts::errors::TreeSitterError;
use ast_grep_language::{LanguageExt, SupportLang};
use std::ops::Range;
use tree_sitter::{Parser, Tree};

/// Parses Rust source with the ast-grep bundled grammar.
pub struct RustParser {
    parser: Parser,
}

impl RustParser {
    pub fn new() -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        parser
            .set_language(&SupportLang::Rust.get_ts_language())
            .map_err(|_| TreeSitterError::LanguageSet)?;

        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: &str) -> Result<Tree, TreeSitterError> {
        self.parser
            .parse(source, None)
            .ok_or(TreeSitterError::ParseFailed)
    }

    pub fn parse_with_source<'a>(
        &mut self,
        source: &'a str,
    ) -> Result<ParsedSource<'a>, TreeSitterError> {
        let tree = self.parse(source)?;
        Ok(ParsedSource { source, tree })
    }

    /// Parse source code straight into a [`SyntaxTree`]. Syntax errors are
    /// kept in the tree rather than rejected.
    pub fn parse_tree(&mut self, source: &str) -> Result<SyntaxTree, TreeSitterError> {
        self.parse_with_source(source)?.syntax_tree()
    }
}

/// A tree-sitter tree together with the text it was parsed from.
pub struct ParsedSource<'a> {
    pub source: &'a str,
    pub tree: Tree,
}

impl<'a> ParsedSource<'a> {
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// ERROR and MISSING nodes in document order. Subtrees without errors
    /// are not entered.
    pub fn syntax_issues(&self) -> Vec<SyntaxIssue> {
        let mut issues = Vec::new();
        let mut cursor = self.tree.walk();
        loop {
            let node = cursor.node();
            if node.is_error() || node.is_missing() {
                issues.push(SyntaxIssue {
                    span: node.byte_range(),
                    missing: node.is_missing().then(|| node.kind().to_string()),
                });
            }
            if node.has_error() && !node.is_missing() && cursor.goto_first_child() {
                continue;
            }
            while !cursor.goto_next_sibling() {
                if !cursor.goto_parent() {
                    return issues;
                }
            }
        }
    }

    pub fn syntax_tree(&self) -> Result<SyntaxTree, TreeSitterError> {
        lower(self.tree.root_node(), self.source)
    }
}

/// A region tree-sitter could not parse. `missing` names the token the
/// parser inserted when the issue is a MISSING node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    pub span: Range<usize>,
    pub missing: Option<String>,
}
