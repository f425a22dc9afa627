//! Lexer for Argot markup
//!
//! Lexing happens in two cooperating layers:
//!
//! - a stateful line scanner that owns block structure: the indentation
//!   stack (Indent/Dedent), blank-line separation (Emptyline), line-start
//!   markers (headings, relation operators, list markers, statement
//!   numbers, inference delimiters) and comment skipping
//! - two [`logos`]-derived token enums that tokenize line remainders:
//!   ordinary inline content, and inference-block content where
//!   `: , ; ( )` become structural
//!
//! Lexing is total: unrecognizable characters are reported as [`LexError`]s
//! and skipped, never raised.

use std::fmt;

use logos::Logos;
use smol_str::SmolStr;

use super::syntax_kind::SyntaxKind;
use crate::base::{Position, Span};

/// A token produced by [`tokenize`]
///
/// `text` is the token image. For most tokens it equals the matched source
/// slice; for `ESCAPED_CHAR` it is the literal character without the
/// backslash, and for the virtual `DEDENT`/`EMPTYLINE` markers it is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub text: SmolStr,
    pub span: Span,
}

impl Token {
    fn new(kind: SyntaxKind, text: impl Into<SmolStr>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// A lexical error: a character no rule can start
///
/// Recorded and skipped; lexing always continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lex error at {}: {}", self.position, self.message)
    }
}

/// Tokenize a whole document.
///
/// Returns the token sequence and the (possibly empty) list of lexical
/// errors. Never panics on any input.
pub fn tokenize(input: &str) -> (Vec<Token>, Vec<LexError>) {
    Scanner::new(input).run()
}

// ============================================================================
// INLINE TOKENS (logos layer)
// ============================================================================

/// Tokens inside ordinary statement content.
///
/// Comments are skipped here so a line comment or a single-line block
/// comment can sit inside statement content. Multi-line block comments are
/// handled by the line scanner.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"//[^\n\r]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
#[logos(skip r"<!--([^-]|-[^-]|--[^>])*-->")]
enum InlineToken {
    #[regex(r"@\[[^\]\r\n]+\]")]
    StatementMention,

    #[regex(r"@<[^>\r\n]+>")]
    ArgumentMention,

    // needs to be lexed before StatementReference
    #[regex(r"\[[^\]\r\n]+\]\([^)\r\n]+\)")]
    Link,

    // the definition marker absorbs one following space so statement text
    // does not start with it
    #[regex(r"\[[^\]\r\n]+\]:[ \t]?")]
    StatementDefinition,

    #[regex(r"\[[^\]\r\n]+\]")]
    StatementReference,

    #[regex(r"<[^>\r\n]+>:[ \t]?")]
    ArgumentDefinition,

    #[regex(r"<[^>\r\n]+>")]
    ArgumentReference,

    #[regex(r"#\([^)\r\n]+\)")]
    #[regex(r"#[a-zA-Z0-9\u{00A0}-\u{D7FF}\u{F900}-\u{FDCF}\u{FDF0}-\u{FFEF}-]+")]
    Tag,

    #[token("__")]
    DoubleUnderscore,

    #[token("**")]
    DoubleStar,

    #[token("_")]
    Underscore,

    #[token("*")]
    Star,

    #[regex(r"\\[^\r\n]")]
    EscapedChar,

    #[regex(r"[^\\@#*_\[\]<>():;,+\-/\r\n]+")]
    Freestyle,

    #[regex(r"[@#\[\]<>():;,+\-/]")]
    UnusedControl,
}

/// Tokens between `--` and `--`, where metadata punctuation is structural.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"//[^\n\r]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
#[logos(skip r"<!--([^-]|-[^-]|--[^>])*-->")]
enum InferenceToken {
    #[token("--")]
    InferenceEnd,

    #[token("(")]
    MetadataStart,

    #[token(")")]
    MetadataEnd,

    #[token(";")]
    MetadataStatementEnd,

    #[token(",")]
    ListDelimiter,

    #[token(":")]
    Colon,

    #[regex(r"\\[^\r\n]")]
    EscapedChar,

    #[regex(r"[^\\():;,\-/\r\n]+")]
    Freestyle,

    #[regex(r"[\-/]")]
    UnusedControl,
}

// ============================================================================
// LINE SCANNER
// ============================================================================

/// Context an indentation level was opened in, deciding what a leading
/// `-` means at that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockContext {
    /// Block attaches to a preceding statement/argument line: `-` attacks.
    Relation,
    /// Block follows a blank-line separator or document start: `-` bullets.
    List,
}

#[derive(Debug, Clone, Copy)]
struct IndentLevel {
    width: usize,
    context: BlockContext,
}

struct Scanner<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
    /// Open indentation widths, seeded with 0.
    indents: Vec<IndentLevel>,
    /// Pending run of blank lines, flushed at the next significant line.
    blank_run: usize,
    /// Line number of the first blank line in the pending run.
    blank_start: usize,
    /// Any significant token emitted yet (document-start blank rule).
    seen_content: bool,
    in_inference: bool,
    /// Terminator of an open multi-line block comment.
    block_comment: Option<&'static str>,
    last_line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Inline,
    Inference,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            tokens: Vec::new(),
            errors: Vec::new(),
            indents: vec![IndentLevel {
                width: 0,
                context: BlockContext::Relation,
            }],
            blank_run: 0,
            blank_start: 0,
            seen_content: false,
            in_inference: false,
            block_comment: None,
            last_line: 0,
        }
    }

    fn run(mut self) -> (Vec<Token>, Vec<LexError>) {
        let mut line_no = 0;
        for raw in self.input.split('\n') {
            line_no += 1;
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            self.last_line = line_no;
            self.process_line(line_no, line);
        }
        // Trailing blank lines emit no Emptyline; open levels still unwind.
        self.flush_dedents(self.last_line.max(1), 0);
        (self.tokens, self.errors)
    }

    fn process_line(&mut self, line_no: usize, line: &str) {
        if let Some(term) = self.block_comment {
            match line.find(term) {
                Some(pos) => {
                    self.block_comment = None;
                    self.process_from(line_no, line, pos + term.len(), false);
                }
                None => {}
            }
            return;
        }
        self.process_from(line_no, line, 0, true);
    }

    /// Process a line starting at byte `from`. `at_line_start` is false when
    /// resuming after a closed block comment: no indentation handling and no
    /// line-start markers apply there.
    fn process_from(&mut self, line_no: usize, line: &str, from: usize, at_line_start: bool) {
        let rest = &line[from..];
        let ws_len = rest.len() - rest.trim_start_matches([' ', '\t']).len();
        let content_start = from + ws_len;
        let content = &line[content_start..];

        if content.is_empty() {
            if at_line_start {
                if self.blank_run == 0 {
                    self.blank_start = line_no;
                }
                self.blank_run += 1;
                self.in_inference = false;
            }
            return;
        }

        // Comment-led lines are transparent: no tokens, no blank-run reset.
        if content.starts_with("//") {
            return;
        }
        if content.starts_with("/*") {
            match content[2..].find("*/") {
                Some(pos) => {
                    self.process_from(line_no, line, content_start + 2 + pos + 2, false);
                }
                None => self.block_comment = Some("*/"),
            }
            return;
        }
        if content.starts_with("<!--") {
            match content[4..].find("-->") {
                Some(pos) => {
                    self.process_from(line_no, line, content_start + 4 + pos + 3, false);
                }
                None => self.block_comment = Some("-->"),
            }
            return;
        }

        self.flush_blank_run(line_no);

        if self.in_inference {
            self.lex_mixed(line_no, line, content_start, Mode::Inference);
            return;
        }

        if !at_line_start {
            // Continuation after an inline comment: plain content only.
            self.lex_mixed(line_no, line, content_start, Mode::Inline);
            return;
        }

        let width = line[..content_start].chars().count();
        self.handle_indentation(line_no, line, width);
        self.lex_markers(line_no, line, content_start);
    }

    /// Compare this line's leading width against the stack and emit
    /// Indent/Dedent markers.
    fn handle_indentation(&mut self, line_no: usize, line: &str, width: usize) {
        let top = self.indents.last().map(|l| l.width).unwrap_or(0);
        if width > top {
            let context = match self.tokens.last() {
                Some(t) if t.kind == SyntaxKind::EMPTYLINE => BlockContext::List,
                None => BlockContext::List,
                _ => BlockContext::Relation,
            };
            self.indents.push(IndentLevel { width, context });
            let text = &line[..line
                .char_indices()
                .nth(width)
                .map(|(b, _)| b)
                .unwrap_or(line.len())];
            self.tokens.push(Token::new(
                SyntaxKind::INDENT,
                text,
                Span::from_coords(line_no, 1, line_no, width.max(1)),
            ));
        } else if width < top {
            self.flush_dedents(line_no, width);
        }
    }

    /// Pop levels wider than `to_width`, one Dedent each.
    fn flush_dedents(&mut self, line_no: usize, to_width: usize) {
        while self.indents.len() > 1
            && self.indents.last().map(|l| l.width).unwrap_or(0) > to_width
        {
            self.indents.pop();
            self.tokens.push(Token::new(
                SyntaxKind::DEDENT,
                "",
                Span::from_coords(line_no, 1, line_no, 1),
            ));
        }
    }

    /// Close open blocks, then emit one Emptyline for the pending blank run.
    ///
    /// A single blank line before any content is just a leading newline, not
    /// a separator; two or more count even at document start.
    fn flush_blank_run(&mut self, _line_no: usize) {
        if self.blank_run == 0 {
            return;
        }
        let start = self.blank_start;
        let end = self.blank_start + self.blank_run - 1;
        let emit = self.seen_content || self.blank_run >= 2;
        self.blank_run = 0;
        if !emit {
            return;
        }
        self.flush_dedents(start, 0);
        self.tokens.push(Token::new(
            SyntaxKind::EMPTYLINE,
            "",
            Span::from_coords(start, 1, end, 1),
        ));
    }

    /// Line-start markers: heading start, inference start, relation
    /// operators, list markers, statement numbers. Falls through to plain
    /// inline content.
    fn lex_markers(&mut self, line_no: usize, line: &str, content_start: usize) {
        let content = &line[content_start..];
        let col = |byte: usize| line[..byte].chars().count() + 1;

        // Heading: one or more # followed by whitespace.
        if content.starts_with('#') {
            let hashes = content.chars().take_while(|&c| c == '#').count();
            let after = content[hashes..].chars().next();
            if matches!(after, Some(' ') | Some('\t')) {
                let end = content_start + hashes;
                self.push(
                    SyntaxKind::HEADING_START,
                    &content[..hashes],
                    line_no,
                    col(content_start),
                    col(end) - 1,
                );
                let resume = end + skip_ws(&line[end..]);
                self.lex_mixed(line_no, line, resume, Mode::Inline);
                return;
            }
            // A line-leading tag or lone # is inline content.
            self.lex_mixed(line_no, line, content_start, Mode::Inline);
            return;
        }

        // Inference step delimiter; `----` closes in the same line.
        if content.starts_with("--") {
            let end = content_start + 2;
            self.push(
                SyntaxKind::INFERENCE_START,
                "--",
                line_no,
                col(content_start),
                col(end) - 1,
            );
            self.in_inference = true;
            self.lex_mixed(line_no, line, end, Mode::Inference);
            return;
        }

        let marker = if content.starts_with("><") {
            Some((SyntaxKind::CONTRADICTION_OP, 2))
        } else if content.starts_with("<+") {
            Some((SyntaxKind::INCOMING_SUPPORT_OP, 2))
        } else if content.starts_with("<-") {
            Some((SyntaxKind::INCOMING_ATTACK_OP, 2))
        } else if content.starts_with("<_") {
            Some((SyntaxKind::INCOMING_UNDERCUT_OP, 2))
        } else if content.starts_with('+') {
            Some((SyntaxKind::OUTGOING_SUPPORT_OP, 1))
        } else if content.starts_with('>') {
            Some((SyntaxKind::OUTGOING_UNDERCUT_OP, 1))
        } else if content.starts_with('-') {
            let kind = match self.indents.last().map(|l| l.context) {
                Some(BlockContext::List) => SyntaxKind::UNORDERED_LIST_MARKER,
                _ => SyntaxKind::OUTGOING_ATTACK_OP,
            };
            Some((kind, 1))
        } else {
            None
        };
        if let Some((kind, len)) = marker {
            let end = content_start + len;
            self.push(kind, &content[..len], line_no, col(content_start), col(end) - 1);
            let resume = end + skip_ws(&line[end..]);
            self.lex_mixed(line_no, line, resume, Mode::Inline);
            return;
        }

        // Premise/conclusion number: (1)
        if let Some(len) = match_statement_number(content) {
            let end = content_start + len;
            self.push(
                SyntaxKind::STATEMENT_NUMBER,
                &content[..len],
                line_no,
                col(content_start),
                col(end) - 1,
            );
            let resume = end + skip_ws(&line[end..]);
            self.lex_mixed(line_no, line, resume, Mode::Inline);
            return;
        }

        // Ordered list marker: digits then a dot, indented at least one step.
        if content_start > 0 {
            if let Some(len) = match_ordered_marker(content) {
                let end = content_start + len;
                self.push(
                    SyntaxKind::ORDERED_LIST_MARKER,
                    &content[..len],
                    line_no,
                    col(content_start),
                    col(end) - 1,
                );
                let resume = end + skip_ws(&line[end..]);
                self.lex_mixed(line_no, line, resume, Mode::Inline);
                return;
            }
        }

        self.lex_mixed(line_no, line, content_start, Mode::Inline);
    }

    /// Lex a line remainder, switching between inline and inference modes
    /// at inference delimiters.
    fn lex_mixed(&mut self, line_no: usize, line: &str, from: usize, mode: Mode) {
        let mut cursor = from;
        let mut mode = mode;
        while cursor < line.len() {
            let advanced = match mode {
                Mode::Inline => {
                    self.lex_inline(line_no, line, cursor);
                    line.len()
                }
                Mode::Inference => match self.lex_inference(line_no, line, cursor) {
                    Some(resume) => {
                        mode = Mode::Inline;
                        resume
                    }
                    None => line.len(),
                },
            };
            cursor = advanced;
        }
    }

    fn lex_inline(&mut self, line_no: usize, line: &str, from: usize) {
        let rest = &line[from..];
        let mut lexer = InlineToken::lexer(rest);
        while let Some(item) = lexer.next() {
            let span = lexer.span();
            let abs_start = from + span.start;
            let abs_end = from + span.end;
            let start_col = line[..abs_start].chars().count() + 1;
            let end_col = line[..abs_end].chars().count();
            match item {
                Ok(tok) => {
                    let (kind, text) = self.classify_inline(tok, line, abs_start, abs_end);
                    self.push(kind, text, line_no, start_col, end_col);
                }
                Err(()) => self.record_bad_char(lexer.slice(), line_no, start_col),
            }
        }
    }

    /// Map an inline logos token to its SyntaxKind, resolving emphasis
    /// delimiters by their whitespace context.
    fn classify_inline<'l>(
        &self,
        tok: InlineToken,
        line: &'l str,
        abs_start: usize,
        abs_end: usize,
    ) -> (SyntaxKind, &'l str) {
        let slice = &line[abs_start..abs_end];
        let kind = match tok {
            InlineToken::StatementMention => SyntaxKind::STATEMENT_MENTION,
            InlineToken::ArgumentMention => SyntaxKind::ARGUMENT_MENTION,
            InlineToken::Link => SyntaxKind::LINK,
            InlineToken::StatementDefinition => SyntaxKind::STATEMENT_DEFINITION,
            InlineToken::StatementReference => SyntaxKind::STATEMENT_REFERENCE,
            InlineToken::ArgumentDefinition => SyntaxKind::ARGUMENT_DEFINITION,
            InlineToken::ArgumentReference => SyntaxKind::ARGUMENT_REFERENCE,
            InlineToken::Tag => SyntaxKind::TAG,
            InlineToken::EscapedChar => {
                return (SyntaxKind::ESCAPED_CHAR, &line[abs_start + 1..abs_end]);
            }
            InlineToken::Freestyle => SyntaxKind::FREESTYLE,
            InlineToken::UnusedControl => SyntaxKind::UNUSED_CONTROL_CHAR,
            InlineToken::DoubleUnderscore
            | InlineToken::DoubleStar
            | InlineToken::Underscore
            | InlineToken::Star => {
                let prev_ws = line[..abs_start]
                    .chars()
                    .last()
                    .map(|c| c.is_whitespace())
                    .unwrap_or(true);
                let next_ws = line[abs_end..]
                    .chars()
                    .next()
                    .map(|c| c.is_whitespace())
                    .unwrap_or(true);
                let (start_kind, end_kind) = match tok {
                    InlineToken::DoubleUnderscore => {
                        (SyntaxKind::UNDERSCORE_BOLD_START, SyntaxKind::UNDERSCORE_BOLD_END)
                    }
                    InlineToken::DoubleStar => {
                        (SyntaxKind::ASTERISK_BOLD_START, SyntaxKind::ASTERISK_BOLD_END)
                    }
                    InlineToken::Underscore => (
                        SyntaxKind::UNDERSCORE_ITALIC_START,
                        SyntaxKind::UNDERSCORE_ITALIC_END,
                    ),
                    _ => (
                        SyntaxKind::ASTERISK_ITALIC_START,
                        SyntaxKind::ASTERISK_ITALIC_END,
                    ),
                };
                if prev_ws && !next_ws {
                    start_kind
                } else if !prev_ws {
                    end_kind
                } else {
                    SyntaxKind::UNUSED_CONTROL_CHAR
                }
            }
        };
        (kind, slice)
    }

    /// Lex inference-block content. Returns the resume offset when the
    /// closing `--` was found on this line.
    fn lex_inference(&mut self, line_no: usize, line: &str, from: usize) -> Option<usize> {
        let rest = &line[from..];
        let mut lexer = InferenceToken::lexer(rest);
        while let Some(item) = lexer.next() {
            let span = lexer.span();
            let abs_start = from + span.start;
            let abs_end = from + span.end;
            let start_col = line[..abs_start].chars().count() + 1;
            let end_col = line[..abs_end].chars().count();
            match item {
                Ok(InferenceToken::InferenceEnd) => {
                    self.push(SyntaxKind::INFERENCE_END, "--", line_no, start_col, end_col);
                    self.in_inference = false;
                    return Some(abs_end);
                }
                Ok(tok) => {
                    let (kind, text) = match tok {
                        InferenceToken::MetadataStart => {
                            (SyntaxKind::METADATA_START, &line[abs_start..abs_end])
                        }
                        InferenceToken::MetadataEnd => {
                            (SyntaxKind::METADATA_END, &line[abs_start..abs_end])
                        }
                        InferenceToken::MetadataStatementEnd => {
                            (SyntaxKind::METADATA_STATEMENT_END, &line[abs_start..abs_end])
                        }
                        InferenceToken::ListDelimiter => {
                            (SyntaxKind::LIST_DELIMITER, &line[abs_start..abs_end])
                        }
                        InferenceToken::Colon => (SyntaxKind::COLON, &line[abs_start..abs_end]),
                        InferenceToken::EscapedChar => {
                            (SyntaxKind::ESCAPED_CHAR, &line[abs_start + 1..abs_end])
                        }
                        InferenceToken::Freestyle => {
                            (SyntaxKind::FREESTYLE, &line[abs_start..abs_end])
                        }
                        InferenceToken::UnusedControl => {
                            (SyntaxKind::UNUSED_CONTROL_CHAR, &line[abs_start..abs_end])
                        }
                        InferenceToken::InferenceEnd => unreachable!(),
                    };
                    self.push(kind, text, line_no, start_col, end_col);
                }
                Err(()) => self.record_bad_char(lexer.slice(), line_no, start_col),
            }
        }
        None
    }

    fn push(&mut self, kind: SyntaxKind, text: &str, line_no: usize, start_col: usize, end_col: usize) {
        self.seen_content = true;
        self.tokens.push(Token::new(
            kind,
            text,
            Span::from_coords(line_no, start_col, line_no, end_col.max(start_col)),
        ));
    }

    fn record_bad_char(&mut self, slice: &str, line_no: usize, col: usize) {
        self.errors.push(LexError {
            message: format!("unrecognized character `{}`", slice.escape_default()),
            position: Position::new(line_no, col),
        });
    }
}

fn skip_ws(s: &str) -> usize {
    s.len() - s.trim_start_matches([' ', '\t']).len()
}

/// `(digits)` at a line start.
fn match_statement_number(s: &str) -> Option<usize> {
    let rest = s.strip_prefix('(')?;
    let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    if rest[digits..].starts_with(')') {
        Some(digits + 2)
    } else {
        None
    }
}

/// `digits.` followed by whitespace.
fn match_ordered_marker(s: &str) -> Option<usize> {
    let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let rest = &s[digits..];
    if rest.starts_with('.') && matches!(rest[1..].chars().next(), Some(' ') | Some('\t')) {
        Some(digits + 1)
    } else {
        None
    }
}
