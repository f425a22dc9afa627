//! Recursive-descent parser for Argot markup
//!
//! Parsing is resilient: a malformed region is skipped up to the next
//! blank-line separator (or block end), wrapped in an `ERROR` node, and
//! reported as a [`ParseError`]. The surrounding document keeps parsing,
//! so one broken block never hides the rest.

use std::fmt;

use crate::base::Position;

use super::lexer::{tokenize, LexError, Token};
use super::syntax_kind::{kind_to_name, SyntaxKind};
use super::tree::{SyntaxElement, SyntaxNode};

/// Result of [`parse`]: the document tree plus everything that went wrong.
#[derive(Debug, Clone)]
pub struct Parse {
    pub root: SyntaxNode,
    pub lexer_errors: Vec<LexError>,
    pub parser_errors: Vec<ParseError>,
}

/// A recoverable syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub expected: Vec<SyntaxKind>,
    pub found: Option<SyntaxKind>,
    pub position: Position,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at {}: {}", self.position, self.message)?;
        if let Some(found) = self.found {
            write!(f, ", found {}", kind_to_name(found))?;
        }
        Ok(())
    }
}

/// Parse a whole document. Never fails: errors are collected in the result.
pub fn parse(input: &str) -> Parse {
    let (tokens, lexer_errors) = tokenize(input);
    let mut parser = Parser::new(tokens);
    let root = parser.document();
    tracing::debug!(
        errors = parser.errors.len(),
        "parsed document: {} top-level elements",
        root.child_nodes().count()
    );
    Parse {
        root,
        lexer_errors,
        parser_errors: parser.errors,
    }
}

/// Block-level synchronization points used while recovering.
const TOP_RECOVERY: &[SyntaxKind] = &[SyntaxKind::EMPTYLINE];
const BLOCK_RECOVERY: &[SyntaxKind] = &[SyntaxKind::EMPTYLINE, SyntaxKind::DEDENT];

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // cursor
    // ------------------------------------------------------------------

    fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Whitespace-only freestyle, as occurs between a metadata block and
    /// the delimiter closing an inference.
    fn at_blank_freestyle(&self) -> bool {
        self.at(SyntaxKind::FREESTYLE)
            && self
                .tokens
                .get(self.pos)
                .is_some_and(|t| t.text.trim().is_empty())
    }

    /// Source position of the current token, or just past the last one.
    fn position(&self) -> Position {
        match self.tokens.get(self.pos) {
            Some(t) => t.span.start,
            None => self
                .tokens
                .last()
                .map(|t| t.span.end)
                .unwrap_or_else(|| Position::new(1, 1)),
        }
    }

    /// Append the current token to `children` and advance.
    fn bump(&mut self, children: &mut Vec<SyntaxElement>) {
        if let Some(token) = self.tokens.get(self.pos) {
            children.push(SyntaxElement::Token(token.clone()));
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind, children: &mut Vec<SyntaxElement>) -> bool {
        if self.at(kind) {
            self.bump(children);
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind, children: &mut Vec<SyntaxElement>) -> bool {
        if self.eat(kind, children) {
            return true;
        }
        self.error(format!("expected {}", kind_to_name(kind)), &[kind]);
        false
    }

    fn error(&mut self, message: String, expected: &[SyntaxKind]) {
        let found = self.tokens.get(self.pos).map(|t| t.kind);
        self.errors.push(ParseError {
            message,
            expected: expected.to_vec(),
            found,
            position: self.position(),
        });
    }

    /// Record an error, then skip forward to a synchronization point.
    /// Skipped tokens are preserved under an `ERROR` node so the tree still
    /// covers the whole input. Indented sub-blocks inside the skipped
    /// region are passed over wholesale.
    fn error_recover(
        &mut self,
        message: String,
        expected: &[SyntaxKind],
        children: &mut Vec<SyntaxElement>,
        recovery: &[SyntaxKind],
    ) {
        self.error(message, expected);
        let mut skipped = Vec::new();
        let mut depth = 0usize;
        while !self.at_end() {
            let kind = self.current();
            if depth == 0 && recovery.contains(&kind) {
                break;
            }
            match kind {
                SyntaxKind::INDENT => depth += 1,
                SyntaxKind::DEDENT => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump(&mut skipped);
        }
        if !skipped.is_empty() {
            children.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::ERROR,
                skipped,
            )));
        }
    }

    // ------------------------------------------------------------------
    // grammar
    // ------------------------------------------------------------------

    /// document = Emptyline? element (Emptyline element)*
    ///
    /// An empty document yields an empty `DOCUMENT` node and no errors.
    fn document(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.eat(SyntaxKind::EMPTYLINE, &mut children);
        while !self.at_end() {
            self.element(&mut children);
            if self.at_end() {
                break;
            }
            if !self.eat(SyntaxKind::EMPTYLINE, &mut children) {
                self.error_recover(
                    "expected a blank line between top-level elements".into(),
                    &[SyntaxKind::EMPTYLINE],
                    &mut children,
                    TOP_RECOVERY,
                );
                self.eat(SyntaxKind::EMPTYLINE, &mut children);
            }
        }
        SyntaxNode::new(SyntaxKind::DOCUMENT, children)
    }

    /// element = heading | argument | argumentDefinitionElement
    ///         | argumentReferenceElement | orderedList | unorderedList
    ///         | statement
    fn element(&mut self, children: &mut Vec<SyntaxElement>) {
        match self.current() {
            SyntaxKind::HEADING_START => {
                let node = self.heading();
                children.push(SyntaxElement::Node(node));
            }
            SyntaxKind::STATEMENT_NUMBER => {
                let node = self.argument();
                children.push(SyntaxElement::Node(node));
            }
            SyntaxKind::ARGUMENT_DEFINITION => {
                let node = self.argument_definition_element();
                children.push(SyntaxElement::Node(node));
            }
            SyntaxKind::ARGUMENT_REFERENCE => {
                let node = self.argument_reference_element();
                children.push(SyntaxElement::Node(node));
            }
            SyntaxKind::INDENT => match self.nth(1) {
                SyntaxKind::ORDERED_LIST_MARKER => {
                    let node = self.ordered_list();
                    children.push(SyntaxElement::Node(node));
                }
                SyntaxKind::UNORDERED_LIST_MARKER => {
                    let node = self.unordered_list();
                    children.push(SyntaxElement::Node(node));
                }
                _ => self.error_recover(
                    "expected a list item after indentation".into(),
                    &[
                        SyntaxKind::ORDERED_LIST_MARKER,
                        SyntaxKind::UNORDERED_LIST_MARKER,
                    ],
                    children,
                    TOP_RECOVERY,
                ),
            },
            kind if is_statement_start(kind) => {
                let node = self.statement();
                children.push(SyntaxElement::Node(node));
            }
            _ => self.error_recover(
                "expected a heading, statement, argument or list".into(),
                &[],
                children,
                TOP_RECOVERY,
            ),
        }
    }

    /// heading = HeadingStart statementContent
    fn heading(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump(&mut children);
        if !self.statement_content(&mut children) {
            self.error("expected heading text".into(), &[SyntaxKind::FREESTYLE]);
        }
        SyntaxNode::new(SyntaxKind::HEADING, children)
    }

    /// statement = (StatementDefinition statementContent
    ///           | StatementReference
    ///           | statementContent) relations?
    fn statement(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        match self.current() {
            SyntaxKind::STATEMENT_DEFINITION => {
                self.bump(&mut children);
                if !self.statement_content(&mut children) {
                    self.error(
                        "expected statement text after the definition".into(),
                        &[SyntaxKind::FREESTYLE],
                    );
                }
            }
            SyntaxKind::STATEMENT_REFERENCE => {
                self.bump(&mut children);
            }
            _ => {
                if !self.statement_content(&mut children) {
                    self.error("expected statement text".into(), &[SyntaxKind::FREESTYLE]);
                }
            }
        }
        self.opt_relations(&mut children);
        SyntaxNode::new(SyntaxKind::STATEMENT, children)
    }

    /// Relations attach to the preceding line iff the indented block opens
    /// with a relation operator.
    fn opt_relations(&mut self, children: &mut Vec<SyntaxElement>) {
        if self.at(SyntaxKind::INDENT) && self.nth(1).is_relation_op() {
            let node = self.relations();
            children.push(SyntaxElement::Node(node));
        }
    }

    /// relations = Indent relation+ Dedent
    fn relations(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump(&mut children);
        while self.current().is_relation_op() {
            let node = self.relation();
            children.push(SyntaxElement::Node(node));
        }
        if !self.eat(SyntaxKind::DEDENT, &mut children) {
            self.error_recover(
                "expected the relation block to end".into(),
                &[SyntaxKind::DEDENT],
                &mut children,
                BLOCK_RECOVERY,
            );
            self.eat(SyntaxKind::DEDENT, &mut children);
        }
        SyntaxNode::new(SyntaxKind::RELATIONS, children)
    }

    /// relation = operator (statement | argumentDefinitionElement
    ///          | argumentReferenceElement)
    ///
    /// A contradiction member is always a statement; an incoming undercut
    /// targets arguments only.
    fn relation(&mut self) -> SyntaxNode {
        let op = self.current();
        let node_kind = match op {
            SyntaxKind::INCOMING_SUPPORT_OP => SyntaxKind::INCOMING_SUPPORT,
            SyntaxKind::INCOMING_ATTACK_OP => SyntaxKind::INCOMING_ATTACK,
            SyntaxKind::INCOMING_UNDERCUT_OP => SyntaxKind::INCOMING_UNDERCUT,
            SyntaxKind::OUTGOING_SUPPORT_OP => SyntaxKind::OUTGOING_SUPPORT,
            SyntaxKind::OUTGOING_ATTACK_OP => SyntaxKind::OUTGOING_ATTACK,
            SyntaxKind::OUTGOING_UNDERCUT_OP => SyntaxKind::OUTGOING_UNDERCUT,
            _ => SyntaxKind::CONTRADICTION,
        };
        let mut children = Vec::new();
        self.bump(&mut children);
        match self.current() {
            SyntaxKind::ARGUMENT_DEFINITION if op != SyntaxKind::CONTRADICTION_OP => {
                let node = self.argument_definition_element();
                children.push(SyntaxElement::Node(node));
            }
            SyntaxKind::ARGUMENT_REFERENCE if op != SyntaxKind::CONTRADICTION_OP => {
                let node = self.argument_reference_element();
                children.push(SyntaxElement::Node(node));
            }
            kind if is_statement_start(kind) && op != SyntaxKind::INCOMING_UNDERCUT_OP => {
                let node = self.statement();
                children.push(SyntaxElement::Node(node));
            }
            _ => {
                let expected = if op == SyntaxKind::INCOMING_UNDERCUT_OP {
                    "expected an argument after the undercut operator"
                } else {
                    "expected a relation member"
                };
                self.error_recover(
                    expected.into(),
                    &[],
                    &mut children,
                    BLOCK_RECOVERY,
                );
            }
        }
        SyntaxNode::new(node_kind, children)
    }

    /// argument = argumentStatement argumentBody+
    /// argumentBody = argumentStatement* inference argumentStatement
    ///
    /// The node is flat: statements and inferences in source order. Every
    /// inference must be followed by its conclusion statement, and a run
    /// of premises must reach an inference before the argument ends.
    fn argument(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        let node = self.argument_statement();
        children.push(SyntaxElement::Node(node));
        loop {
            while self.at(SyntaxKind::STATEMENT_NUMBER) {
                let node = self.argument_statement();
                children.push(SyntaxElement::Node(node));
            }
            if !self.at(SyntaxKind::INFERENCE_START) {
                self.error_recover(
                    "expected an inference step in the argument".into(),
                    &[SyntaxKind::INFERENCE_START],
                    &mut children,
                    TOP_RECOVERY,
                );
                break;
            }
            let node = self.inference();
            children.push(SyntaxElement::Node(node));
            if !self.at(SyntaxKind::STATEMENT_NUMBER) {
                self.error_recover(
                    "expected a conclusion after the inference".into(),
                    &[SyntaxKind::STATEMENT_NUMBER],
                    &mut children,
                    TOP_RECOVERY,
                );
                break;
            }
            let node = self.argument_statement();
            children.push(SyntaxElement::Node(node));
            if !self.at(SyntaxKind::STATEMENT_NUMBER) && !self.at(SyntaxKind::INFERENCE_START) {
                break;
            }
        }
        SyntaxNode::new(SyntaxKind::ARGUMENT, children)
    }

    /// argumentStatement = StatementNumber statement
    fn argument_statement(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump(&mut children);
        let node = self.statement();
        children.push(SyntaxElement::Node(node));
        SyntaxNode::new(SyntaxKind::ARGUMENT_STATEMENT, children)
    }

    /// inference = InferenceStart inferenceRules? metadata? InferenceEnd
    fn inference(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump(&mut children);
        if self.current().is_freestyle_part() {
            let node = self.inference_rules();
            children.push(SyntaxElement::Node(node));
        }
        if self.at(SyntaxKind::METADATA_START) {
            let node = self.metadata();
            children.push(SyntaxElement::Node(node));
        }
        while self.at_blank_freestyle() {
            self.bump(&mut children);
        }
        if !self.eat(SyntaxKind::INFERENCE_END, &mut children) {
            self.error_recover(
                "expected `--` to close the inference".into(),
                &[SyntaxKind::INFERENCE_END],
                &mut children,
                BLOCK_RECOVERY,
            );
            self.eat(SyntaxKind::INFERENCE_END, &mut children);
        }
        SyntaxNode::new(SyntaxKind::INFERENCE, children)
    }

    /// inferenceRules = freestyleText (ListDelimiter freestyleText)*
    fn inference_rules(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        let node = self.freestyle_text();
        children.push(SyntaxElement::Node(node));
        while self.eat(SyntaxKind::LIST_DELIMITER, &mut children) {
            if self.current().is_freestyle_part() {
                let node = self.freestyle_text();
                children.push(SyntaxElement::Node(node));
            } else {
                self.error(
                    "expected an inference rule name after `,`".into(),
                    &[SyntaxKind::FREESTYLE],
                );
                break;
            }
        }
        SyntaxNode::new(SyntaxKind::INFERENCE_RULES, children)
    }

    /// metadata = MetadataStart metadataStatement
    ///          (MetadataStatementEnd metadataStatement)* MetadataEnd
    fn metadata(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump(&mut children);
        self.metadata_statement(&mut children);
        while self.eat(SyntaxKind::METADATA_STATEMENT_END, &mut children) {
            self.metadata_statement(&mut children);
        }
        if !self.eat(SyntaxKind::METADATA_END, &mut children) {
            self.error_recover(
                "expected `)` to close the metadata".into(),
                &[SyntaxKind::METADATA_END],
                &mut children,
                BLOCK_RECOVERY,
            );
            self.eat(SyntaxKind::METADATA_END, &mut children);
        }
        SyntaxNode::new(SyntaxKind::METADATA, children)
    }

    /// metadataStatement = freestyleText Colon freestyleText
    ///                   (ListDelimiter freestyleText)*
    fn metadata_statement(&mut self, parent: &mut Vec<SyntaxElement>) {
        let mut children = Vec::new();
        if self.current().is_freestyle_part() {
            let node = self.freestyle_text();
            children.push(SyntaxElement::Node(node));
        } else {
            self.error("expected a metadata key".into(), &[SyntaxKind::FREESTYLE]);
            parent.push(SyntaxElement::Node(SyntaxNode::new(
                SyntaxKind::METADATA_STATEMENT,
                children,
            )));
            return;
        }
        self.expect(SyntaxKind::COLON, &mut children);
        while self.current().is_freestyle_part() || self.at(SyntaxKind::LIST_DELIMITER) {
            if self.current().is_freestyle_part() {
                let node = self.freestyle_text();
                children.push(SyntaxElement::Node(node));
            } else {
                self.bump(&mut children);
            }
        }
        parent.push(SyntaxElement::Node(SyntaxNode::new(
            SyntaxKind::METADATA_STATEMENT,
            children,
        )));
    }

    /// argumentDefinitionElement = ArgumentDefinition statementContent
    ///                           relations?
    fn argument_definition_element(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump(&mut children);
        if !self.statement_content(&mut children) {
            self.error(
                "expected a description after the argument definition".into(),
                &[SyntaxKind::FREESTYLE],
            );
        }
        self.opt_relations(&mut children);
        SyntaxNode::new(SyntaxKind::ARGUMENT_DEFINITION_ELEMENT, children)
    }

    /// argumentReferenceElement = ArgumentReference relations?
    fn argument_reference_element(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump(&mut children);
        self.opt_relations(&mut children);
        SyntaxNode::new(SyntaxKind::ARGUMENT_REFERENCE_ELEMENT, children)
    }

    /// orderedList = Indent orderedListItem+ Dedent
    fn ordered_list(&mut self) -> SyntaxNode {
        self.list(
            SyntaxKind::ORDERED_LIST,
            SyntaxKind::ORDERED_LIST_ITEM,
            SyntaxKind::ORDERED_LIST_MARKER,
        )
    }

    /// unorderedList = Indent unorderedListItem+ Dedent
    fn unordered_list(&mut self) -> SyntaxNode {
        self.list(
            SyntaxKind::UNORDERED_LIST,
            SyntaxKind::UNORDERED_LIST_ITEM,
            SyntaxKind::UNORDERED_LIST_MARKER,
        )
    }

    fn list(&mut self, list_kind: SyntaxKind, item_kind: SyntaxKind, marker: SyntaxKind) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump(&mut children);
        while self.at(marker) {
            let mut item = Vec::new();
            self.bump(&mut item);
            let node = self.statement();
            item.push(SyntaxElement::Node(node));
            children.push(SyntaxElement::Node(SyntaxNode::new(item_kind, item)));
        }
        if !self.eat(SyntaxKind::DEDENT, &mut children) {
            self.error_recover(
                "expected the list to end".into(),
                &[marker, SyntaxKind::DEDENT],
                &mut children,
                BLOCK_RECOVERY,
            );
            self.eat(SyntaxKind::DEDENT, &mut children);
        }
        SyntaxNode::new(list_kind, children)
    }

    // ------------------------------------------------------------------
    // statement content
    // ------------------------------------------------------------------

    /// statementContent = (freestyleText | Link | Tag | StatementMention
    ///                  | ArgumentMention | bold | italic)+
    ///
    /// Returns false if not a single content item was present.
    fn statement_content(&mut self, parent: &mut Vec<SyntaxElement>) -> bool {
        let mut children = Vec::new();
        loop {
            match self.current() {
                kind if kind.is_freestyle_part() => {
                    let node = self.freestyle_text();
                    children.push(SyntaxElement::Node(node));
                }
                SyntaxKind::LINK
                | SyntaxKind::TAG
                | SyntaxKind::STATEMENT_MENTION
                | SyntaxKind::ARGUMENT_MENTION => self.bump(&mut children),
                SyntaxKind::ASTERISK_BOLD_START | SyntaxKind::UNDERSCORE_BOLD_START => {
                    let node = self.bold();
                    children.push(SyntaxElement::Node(node));
                }
                SyntaxKind::ASTERISK_ITALIC_START | SyntaxKind::UNDERSCORE_ITALIC_START => {
                    let node = self.italic();
                    children.push(SyntaxElement::Node(node));
                }
                _ => break,
            }
        }
        if children.is_empty() {
            return false;
        }
        parent.push(SyntaxElement::Node(SyntaxNode::new(
            SyntaxKind::STATEMENT_CONTENT,
            children,
        )));
        true
    }

    /// bold = AsteriskBoldStart statementContent AsteriskBoldEnd
    ///      | UnderscoreBoldStart statementContent UnderscoreBoldEnd
    fn bold(&mut self) -> SyntaxNode {
        let end = if self.at(SyntaxKind::ASTERISK_BOLD_START) {
            SyntaxKind::ASTERISK_BOLD_END
        } else {
            SyntaxKind::UNDERSCORE_BOLD_END
        };
        self.emphasis(SyntaxKind::BOLD, end)
    }

    /// italic = AsteriskItalicStart statementContent AsteriskItalicEnd
    ///        | UnderscoreItalicStart statementContent UnderscoreItalicEnd
    fn italic(&mut self) -> SyntaxNode {
        let end = if self.at(SyntaxKind::ASTERISK_ITALIC_START) {
            SyntaxKind::ASTERISK_ITALIC_END
        } else {
            SyntaxKind::UNDERSCORE_ITALIC_END
        };
        self.emphasis(SyntaxKind::ITALIC, end)
    }

    fn emphasis(&mut self, node_kind: SyntaxKind, end: SyntaxKind) -> SyntaxNode {
        let mut children = Vec::new();
        self.bump(&mut children);
        if !self.statement_content(&mut children) {
            self.error(
                "expected text inside the emphasis".into(),
                &[SyntaxKind::FREESTYLE],
            );
        }
        self.expect(end, &mut children);
        SyntaxNode::new(node_kind, children)
    }

    /// freestyleText = (Freestyle | UnusedControlChar | EscapedChar)+
    fn freestyle_text(&mut self) -> SyntaxNode {
        let mut children = Vec::new();
        while self.current().is_freestyle_part() {
            self.bump(&mut children);
        }
        SyntaxNode::new(SyntaxKind::FREESTYLE_TEXT, children)
    }
}

fn is_statement_start(kind: SyntaxKind) -> bool {
    kind.is_freestyle_part()
        || matches!(
            kind,
            SyntaxKind::STATEMENT_DEFINITION
                | SyntaxKind::STATEMENT_REFERENCE
                | SyntaxKind::STATEMENT_MENTION
                | SyntaxKind::ARGUMENT_MENTION
                | SyntaxKind::LINK
                | SyntaxKind::TAG
                | SyntaxKind::ASTERISK_BOLD_START
                | SyntaxKind::UNDERSCORE_BOLD_START
                | SyntaxKind::ASTERISK_ITALIC_START
                | SyntaxKind::UNDERSCORE_ITALIC_START
        )
}
