//! Generic traversal over parsed trees
//!
//! Semantic passes are written as [`SyntaxVisitor`]s and driven by
//! [`walk`]; the model builder in [`crate::model`] is the main one.

mod walk;

pub use walk::{walk, NodeContext, SyntaxVisitor};
