//! # argot-core
//!
//! Core library for parsing Argot argumentation markup into syntax trees
//! and semantic argument maps.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! model     → Argument map: equivalence classes, arguments, relations
//!   ↓
//! syntax    → Tree walker with enter/exit visitors
//!   ↓
//! parser    → Logos lexer, indentation scanner, recursive-descent parser
//!   ↓
//! base      → Primitives (Position, Span)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → model)
// ============================================================================

/// Foundation types: Position, Span
pub mod base;

/// Parser: Logos lexer, indentation scanner, recursive-descent parser
pub mod parser;

/// Syntax: tree walker with enter/exit visitors
pub mod syntax;

/// Semantic model: equivalence classes, arguments, relations, sections
pub mod model;

// Re-export foundation types
pub use base::{Position, Span};

// Re-export the pipeline surface
pub use model::{ArgumentMap, ModelBuilder};
pub use parser::{parse, Parse, SyntaxKind, SyntaxNode};

/// Parse a document and build its argument map in one step.
pub fn compile(input: &str) -> ArgumentMap {
    let parse = parser::parse(input);
    ModelBuilder::build(&parse)
}
