//! Foundation types for the Argot compiler front end.
//!
//! This module provides the primitives used throughout the crate:
//! - [`Position`], [`Span`] - 1-indexed line/column positions for tokens
//!   and syntax nodes
//!
//! This module has NO dependencies on other argot modules.

mod position;

pub use position::{Position, Span};
