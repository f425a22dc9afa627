//! Semantic model of an argument map
//!
//! The model is what remains after parsing: equivalence classes of
//! statements keyed by title, arguments with their reconstructions,
//! dialectical relations between them, the section hierarchy and the
//! document's tags. Maps preserve insertion order, which is
//! first-mention order in the source.

use indexmap::IndexMap;

use crate::parser::{LexError, ParseError};

/// How a statement occurrence is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatementRole {
    #[default]
    None,
    Premise,
    Conclusion,
    ArgumentDescription,
}

/// A styled or referring range within a statement's plain text.
///
/// `start` and `stop` are 0-based character indices into
/// [`Statement::text`]; `stop` is inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineRange {
    pub kind: InlineRangeKind,
    pub start: usize,
    pub stop: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineRangeKind {
    Bold,
    Italic,
    Link { url: String },
    Tag { tag: String },
    StatementMention { title: String },
    ArgumentMention { title: String },
}

/// One occurrence of a statement in the document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Statement {
    pub title: Option<String>,
    pub text: String,
    pub ranges: Vec<InlineRange>,
    pub tags: Vec<String>,
    pub role: StatementRole,
    /// Id of the section the statement occurs in.
    pub section: Option<String>,
    /// Set on conclusions: the inference that derived them.
    pub inference: Option<Inference>,
}

/// All statement occurrences sharing one title.
///
/// Occurrences of the same title are treated as equivalent; the class
/// collects their texts, the union of their tags and every relation one
/// of them takes part in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EquivalenceClass {
    pub title: String,
    pub members: Vec<Statement>,
    pub tags: Vec<String>,
    pub relations: Vec<Relation>,
    /// A member occurs as a top-level statement.
    pub is_used_as_root_of_statement_tree: bool,
    /// A member occurs inside a top-level statement's relation tree.
    pub is_used_as_child_of_statement_tree: bool,
    pub is_used_as_premise: bool,
    pub is_used_as_conclusion: bool,
}

impl EquivalenceClass {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A named argument: sketched through descriptions, reconstructed
/// through a premise-conclusion structure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Argument {
    pub title: String,
    pub descriptions: Vec<Statement>,
    /// Premise-conclusion structure, in source order. Empty while the
    /// argument is only sketched.
    pub pcs: Vec<Statement>,
    pub relations: Vec<Relation>,
    pub tags: Vec<String>,
    pub section: Option<String>,
}

impl Argument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Dialectical (sketched) and semantic (reconstructed) relation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationType {
    Support,
    Attack,
    Contradictory,
    Entails,
    Contrary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelationStatus {
    #[default]
    Sketched,
    Reconstructed,
}

/// One endpoint of a relation, referring into [`ArgumentMap::statements`]
/// or [`ArgumentMap::arguments`] by title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationTarget {
    Statement(String),
    Argument(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub kind: RelationType,
    pub status: RelationStatus,
    pub from: RelationTarget,
    pub to: RelationTarget,
}

/// The inference step of a reconstruction: rule names plus free-form
/// metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Inference {
    pub inference_rules: Vec<String>,
    pub metadata: IndexMap<String, Vec<String>>,
}

/// A heading-induced section. Sections form a forest; `parent` holds the
/// id of the enclosing section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub level: usize,
    pub children: Vec<Section>,
    pub parent: Option<String>,
}

/// The complete semantic model of one document.
#[derive(Debug, Clone, Default)]
pub struct ArgumentMap {
    /// Equivalence classes keyed by title (preserves insertion order).
    pub statements: IndexMap<String, EquivalenceClass>,
    /// Arguments keyed by title (preserves insertion order).
    pub arguments: IndexMap<String, Argument>,
    /// Every relation of the map, canonicalized.
    pub relations: Vec<Relation>,
    /// Top-level sections with their subsections.
    pub sections: Vec<Section>,
    /// All tags of the document, in first-occurrence order.
    pub tags: Vec<String>,
    pub lexer_errors: Vec<LexError>,
    pub parser_errors: Vec<ParseError>,
}

impl ArgumentMap {
    pub fn statement(&self, title: &str) -> Option<&EquivalenceClass> {
        self.statements.get(title)
    }

    pub fn argument(&self, title: &str) -> Option<&Argument> {
        self.arguments.get(title)
    }
}
