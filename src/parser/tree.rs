//! Owned syntax tree
//!
//! The parser produces a tree of [`SyntaxNode`]s whose leaves are the
//! lexer's [`Token`]s. Every node carries its [`SyntaxKind`] and a source
//! span derived from its first and last child, so consumers can reach
//! from any tree position back into the document.

use std::fmt;

use super::lexer::Token;
use super::syntax_kind::SyntaxKind;
use crate::base::Span;

/// A child of a [`SyntaxNode`]: either a nested node or a leaf token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxElement {
    Node(SyntaxNode),
    Token(Token),
}

impl SyntaxElement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            SyntaxElement::Node(n) => n.kind,
            SyntaxElement::Token(t) => t.kind,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SyntaxElement::Node(n) => n.span,
            SyntaxElement::Token(t) => t.span,
        }
    }

    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            SyntaxElement::Node(n) => Some(n),
            SyntaxElement::Token(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            SyntaxElement::Node(_) => None,
            SyntaxElement::Token(t) => Some(t),
        }
    }
}

/// An interior tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub span: Span,
    pub children: Vec<SyntaxElement>,
}

impl SyntaxNode {
    /// Build a node over its children. The span runs from the start of the
    /// first child to the end of the last; a node with no children gets a
    /// degenerate one-character span.
    pub fn new(kind: SyntaxKind, children: Vec<SyntaxElement>) -> Self {
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => Span::new(first.span().start, last.span().end),
            _ => Span::from_coords(1, 1, 1, 1),
        };
        Self {
            kind,
            span,
            children,
        }
    }

    /// Child nodes only, skipping leaf tokens.
    pub fn child_nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(SyntaxElement::as_node)
    }

    /// Child tokens only, skipping nested nodes.
    pub fn child_tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(SyntaxElement::as_token)
    }

    /// First child node of the given kind.
    pub fn find_node(&self, kind: SyntaxKind) -> Option<&SyntaxNode> {
        self.child_nodes().find(|n| n.kind == kind)
    }

    /// First child token of the given kind.
    pub fn find_token(&self, kind: SyntaxKind) -> Option<&Token> {
        self.child_tokens().find(|t| t.kind == kind)
    }

    /// Leftmost leaf under this node.
    pub fn first_token(&self) -> Option<&Token> {
        self.children.first().and_then(|c| match c {
            SyntaxElement::Token(t) => Some(t),
            SyntaxElement::Node(n) => n.first_token(),
        })
    }

    /// Rightmost leaf under this node.
    pub fn last_token(&self) -> Option<&Token> {
        self.children.last().and_then(|c| match c {
            SyntaxElement::Token(t) => Some(t),
            SyntaxElement::Node(n) => n.last_token(),
        })
    }

    /// Concatenated text of all tokens under this node.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Indented debug rendering of the subtree, one element per line.
    pub fn tree_string(&self) -> String {
        let mut out = String::new();
        render(self, 0, &mut out);
        out
    }
}

fn collect_text(node: &SyntaxNode, out: &mut String) {
    for child in &node.children {
        match child {
            SyntaxElement::Token(t) => out.push_str(&t.text),
            SyntaxElement::Node(n) => collect_text(n, out),
        }
    }
}

fn render(node: &SyntaxNode, depth: usize, out: &mut String) {
    use fmt::Write;
    let _ = writeln!(
        out,
        "{:indent$}{:?}@{}..{}",
        "",
        node.kind,
        node.span.start,
        node.span.end,
        indent = depth * 2
    );
    for child in &node.children {
        match child {
            SyntaxElement::Node(n) => render(n, depth + 1, out),
            SyntaxElement::Token(t) => {
                let _ = writeln!(
                    out,
                    "{:indent$}{:?}@{}..{} {:?}",
                    "",
                    t.kind,
                    t.span.start,
                    t.span.end,
                    t.text.as_str(),
                    indent = (depth + 1) * 2
                );
            }
        }
    }
}
