//! Parsing: from source text to a kind-tagged syntax tree
//!
//! The pipeline is [`tokenize`] -> [`parse`]. Both are total: any input
//! produces a token stream and a `DOCUMENT` tree, with lexical and syntax
//! errors collected on the side instead of aborting.

mod lexer;
#[allow(clippy::module_inception)]
mod parser;
mod syntax_kind;
mod tree;

pub use lexer::{tokenize, LexError, Token};
pub use parser::{parse, Parse, ParseError};
pub use syntax_kind::{kind_to_name, SyntaxKind};
pub use tree::{SyntaxElement, SyntaxNode};
