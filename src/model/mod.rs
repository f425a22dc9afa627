//! Semantic model and its builder
//!
//! [`elements`] defines the data the compiler front end produces,
//! [`builder`] derives it from a parsed tree.

mod builder;
mod elements;

pub use builder::ModelBuilder;
pub use elements::{
    Argument, ArgumentMap, EquivalenceClass, Inference, InlineRange, InlineRangeKind, Relation,
    RelationStatus, RelationTarget, RelationType, Section, Statement, StatementRole,
};
