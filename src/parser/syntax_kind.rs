//! Syntax kinds for the Argot syntax tree
//!
//! This enum defines all possible token and node kinds in the syntax tree.
//! It follows the Argot grammar structure: line-oriented block tokens first,
//! then inline markup tokens, then composite node kinds.

/// All syntax kinds (tokens and nodes) in Argot
///
/// Tokens are leaf entries produced by the lexer (markers, operators,
/// freestyle runs). Nodes are composite (statements, arguments, relations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // BLOCK STRUCTURE (virtual indentation markers and the blank-line separator)
    // =========================================================================
    INDENT = 0,             // indentation width increased; text is the leading whitespace
    DEDENT,                 // one indentation level closed (zero-width)
    EMPTYLINE,              // blank line(s) separating top-level elements

    // =========================================================================
    // LINE-START MARKERS
    // =========================================================================
    HEADING_START,          // #, ##, ... followed by whitespace
    STATEMENT_NUMBER,       // (1)
    ORDERED_LIST_MARKER,    // 1.
    UNORDERED_LIST_MARKER,  // - in list context
    INFERENCE_START,        // -- opening an inference step
    INFERENCE_END,          // -- closing an inference step

    // =========================================================================
    // RELATION OPERATORS (line-start, relation context)
    // =========================================================================
    INCOMING_SUPPORT_OP,    // <+
    INCOMING_ATTACK_OP,     // <-
    INCOMING_UNDERCUT_OP,   // <_
    OUTGOING_SUPPORT_OP,    // +
    OUTGOING_ATTACK_OP,     // - in relation context
    OUTGOING_UNDERCUT_OP,   // >
    CONTRADICTION_OP,       // ><

    // =========================================================================
    // INFERENCE-BLOCK PUNCTUATION (structural only between -- and --)
    // =========================================================================
    METADATA_START,         // (
    METADATA_END,           // )
    METADATA_STATEMENT_END, // ;
    LIST_DELIMITER,         // ,
    COLON,                  // :

    // =========================================================================
    // INLINE TOKENS
    // =========================================================================
    STATEMENT_DEFINITION,   // [Title]:
    STATEMENT_REFERENCE,    // [Title]
    STATEMENT_MENTION,      // @[Title]
    ARGUMENT_DEFINITION,    // <Title>:
    ARGUMENT_REFERENCE,     // <Title>
    ARGUMENT_MENTION,       // @<Title>
    LINK,                   // [text](url)
    TAG,                    // #tag or #(tag text)
    UNDERSCORE_BOLD_START,  // __ opening
    UNDERSCORE_BOLD_END,    // __ closing
    ASTERISK_BOLD_START,    // ** opening
    ASTERISK_BOLD_END,      // ** closing
    UNDERSCORE_ITALIC_START, // _ opening
    UNDERSCORE_ITALIC_END,  // _ closing
    ASTERISK_ITALIC_START,  // * opening
    ASTERISK_ITALIC_END,    // * closing
    ESCAPED_CHAR,           // \x (token text is the literal character)
    UNUSED_CONTROL_CHAR,    // control character outside any control position
    FREESTYLE,              // plain text run
    EOF,                    // end of input (cursor sentinel, never in the tree)

    // =========================================================================
    // COMPOSITE NODES
    // =========================================================================
    DOCUMENT,
    HEADING,
    STATEMENT,
    STATEMENT_CONTENT,
    FREESTYLE_TEXT,
    BOLD,
    ITALIC,
    RELATIONS,
    INCOMING_SUPPORT,
    INCOMING_ATTACK,
    INCOMING_UNDERCUT,
    OUTGOING_SUPPORT,
    OUTGOING_ATTACK,
    OUTGOING_UNDERCUT,
    CONTRADICTION,
    ARGUMENT,
    ARGUMENT_STATEMENT,
    INFERENCE,
    INFERENCE_RULES,
    METADATA,
    METADATA_STATEMENT,
    ARGUMENT_DEFINITION_ELEMENT,
    ARGUMENT_REFERENCE_ELEMENT,
    ORDERED_LIST,
    UNORDERED_LIST,
    ORDERED_LIST_ITEM,
    UNORDERED_LIST_ITEM,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a zero-width indentation marker
    pub fn is_virtual(self) -> bool {
        matches!(self, Self::INDENT | Self::DEDENT)
    }

    /// Check if this is a relation operator token
    pub fn is_relation_op(self) -> bool {
        (self as u16) >= (Self::INCOMING_SUPPORT_OP as u16)
            && (self as u16) <= (Self::CONTRADICTION_OP as u16)
    }

    /// Check if this token can be absorbed into freestyle text
    pub fn is_freestyle_part(self) -> bool {
        matches!(
            self,
            Self::FREESTYLE | Self::UNUSED_CONTROL_CHAR | Self::ESCAPED_CHAR
        )
    }

    /// Check if this is a composite node kind rather than a token kind
    pub fn is_node(self) -> bool {
        (self as u16) >= (Self::DOCUMENT as u16) && (self as u16) <= (Self::ERROR as u16)
    }
}

/// Human-readable name for a kind, used in error messages
pub fn kind_to_name(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::INDENT => "indentation",
        SyntaxKind::DEDENT => "end of indented block",
        SyntaxKind::EMPTYLINE => "empty line",
        SyntaxKind::HEADING_START => "heading start",
        SyntaxKind::STATEMENT_NUMBER => "statement number",
        SyntaxKind::ORDERED_LIST_MARKER => "ordered list marker",
        SyntaxKind::UNORDERED_LIST_MARKER => "unordered list marker",
        SyntaxKind::INFERENCE_START => "inference start",
        SyntaxKind::INFERENCE_END => "inference end",
        SyntaxKind::INCOMING_SUPPORT_OP => "incoming support operator",
        SyntaxKind::INCOMING_ATTACK_OP => "incoming attack operator",
        SyntaxKind::INCOMING_UNDERCUT_OP => "incoming undercut operator",
        SyntaxKind::OUTGOING_SUPPORT_OP => "outgoing support operator",
        SyntaxKind::OUTGOING_ATTACK_OP => "outgoing attack operator",
        SyntaxKind::OUTGOING_UNDERCUT_OP => "outgoing undercut operator",
        SyntaxKind::CONTRADICTION_OP => "contradiction operator",
        SyntaxKind::METADATA_START => "metadata start",
        SyntaxKind::METADATA_END => "metadata end",
        SyntaxKind::METADATA_STATEMENT_END => "metadata statement end",
        SyntaxKind::LIST_DELIMITER => "list delimiter",
        SyntaxKind::COLON => "colon",
        SyntaxKind::STATEMENT_DEFINITION => "statement definition",
        SyntaxKind::STATEMENT_REFERENCE => "statement reference",
        SyntaxKind::STATEMENT_MENTION => "statement mention",
        SyntaxKind::ARGUMENT_DEFINITION => "argument definition",
        SyntaxKind::ARGUMENT_REFERENCE => "argument reference",
        SyntaxKind::ARGUMENT_MENTION => "argument mention",
        SyntaxKind::LINK => "link",
        SyntaxKind::TAG => "tag",
        SyntaxKind::UNDERSCORE_BOLD_START | SyntaxKind::ASTERISK_BOLD_START => "bold start",
        SyntaxKind::UNDERSCORE_BOLD_END | SyntaxKind::ASTERISK_BOLD_END => "bold end",
        SyntaxKind::UNDERSCORE_ITALIC_START | SyntaxKind::ASTERISK_ITALIC_START => "italic start",
        SyntaxKind::UNDERSCORE_ITALIC_END | SyntaxKind::ASTERISK_ITALIC_END => "italic end",
        SyntaxKind::ESCAPED_CHAR => "escaped character",
        SyntaxKind::UNUSED_CONTROL_CHAR => "control character",
        SyntaxKind::FREESTYLE => "text",
        SyntaxKind::EOF => "end of input",
        SyntaxKind::DOCUMENT => "document",
        SyntaxKind::HEADING => "heading",
        SyntaxKind::STATEMENT => "statement",
        SyntaxKind::STATEMENT_CONTENT => "statement content",
        SyntaxKind::FREESTYLE_TEXT => "freestyle text",
        SyntaxKind::BOLD => "bold span",
        SyntaxKind::ITALIC => "italic span",
        SyntaxKind::RELATIONS => "relation block",
        SyntaxKind::INCOMING_SUPPORT => "incoming support relation",
        SyntaxKind::INCOMING_ATTACK => "incoming attack relation",
        SyntaxKind::INCOMING_UNDERCUT => "incoming undercut relation",
        SyntaxKind::OUTGOING_SUPPORT => "outgoing support relation",
        SyntaxKind::OUTGOING_ATTACK => "outgoing attack relation",
        SyntaxKind::OUTGOING_UNDERCUT => "outgoing undercut relation",
        SyntaxKind::CONTRADICTION => "contradiction relation",
        SyntaxKind::ARGUMENT => "argument reconstruction",
        SyntaxKind::ARGUMENT_STATEMENT => "numbered statement",
        SyntaxKind::INFERENCE => "inference step",
        SyntaxKind::INFERENCE_RULES => "inference rules",
        SyntaxKind::METADATA => "metadata",
        SyntaxKind::METADATA_STATEMENT => "metadata statement",
        SyntaxKind::ARGUMENT_DEFINITION_ELEMENT => "argument definition",
        SyntaxKind::ARGUMENT_REFERENCE_ELEMENT => "argument reference",
        SyntaxKind::ORDERED_LIST => "ordered list",
        SyntaxKind::UNORDERED_LIST => "unordered list",
        SyntaxKind::ORDERED_LIST_ITEM => "ordered list item",
        SyntaxKind::UNORDERED_LIST_ITEM => "unordered list item",
        SyntaxKind::ERROR => "error",
        SyntaxKind::__LAST => "invalid",
    }
}
