//! Model Tests - Relations
//!
//! Verifies relation orientation per operator, duplicate handling,
//! canonicalization of reconstructed-argument relations onto their
//! conclusion class, and the per-entity relation lists.

use argot::compile;
use argot::model::{RelationStatus, RelationTarget, RelationType};
use rstest::rstest;

fn statement(title: &str) -> RelationTarget {
    RelationTarget::Statement(title.to_string())
}

fn argument(title: &str) -> RelationTarget {
    RelationTarget::Argument(title.to_string())
}

// ============================================================================
// Orientation
// ============================================================================

// Between plain statements both endpoints are reconstructed, so the
// dialectical operator kinds arrive as their semantic counterparts.
#[rstest]
#[case("[A]: a\n  <+ [B]: b", RelationType::Entails, "A", "B")]
#[case("[A]: a\n  <- [B]: b", RelationType::Contrary, "A", "B")]
#[case("[A]: a\n  + [B]: b", RelationType::Entails, "B", "A")]
#[case("[A]: a\n  - [B]: b", RelationType::Contrary, "B", "A")]
#[case("[A]: a\n  >< [B]: b", RelationType::Contradictory, "A", "B")]
fn test_statement_relation_orientation(
    #[case] input: &str,
    #[case] kind: RelationType,
    #[case] from: &str,
    #[case] to: &str,
) {
    let map = compile(input);
    assert_eq!(map.relations.len(), 1, "for {input:?}");
    let relation = &map.relations[0];
    assert_eq!(relation.kind, kind);
    assert_eq!(relation.from, statement(from));
    assert_eq!(relation.to, statement(to));
    assert_eq!(relation.status, RelationStatus::Reconstructed);
}

#[rstest]
#[case("[A]: a\n  <+ <B>: b", RelationType::Support, "A", "B")]
#[case("[A]: a\n  <- <B>: b", RelationType::Attack, "A", "B")]
fn test_sketched_argument_keeps_dialectical_kind(
    #[case] input: &str,
    #[case] kind: RelationType,
    #[case] from: &str,
    #[case] to: &str,
) {
    let map = compile(input);
    assert_eq!(map.relations.len(), 1);
    let relation = &map.relations[0];
    assert_eq!(relation.kind, kind);
    assert_eq!(relation.from, statement(from));
    assert_eq!(relation.to, argument(to));
    assert_eq!(relation.status, RelationStatus::Sketched);
}

#[test]
fn test_relation_between_sketched_arguments() {
    let map = compile("<A>: a\n  + <B>");
    assert_eq!(map.relations.len(), 1);
    let relation = &map.relations[0];
    assert_eq!(relation.kind, RelationType::Support);
    assert_eq!(relation.from, argument("B"));
    assert_eq!(relation.to, argument("A"));
    assert_eq!(map.argument("A").unwrap().relations.len(), 1);
    assert_eq!(map.argument("B").unwrap().relations.len(), 1);
}

// ============================================================================
// Duplicates
// ============================================================================

#[test]
fn test_restating_a_relation_adds_nothing() {
    let map = compile("[A]: a\n  + [B]: b\n\n[B]\n  - [C]: c\n\n[A]\n  + [B]");
    assert_eq!(map.relations.len(), 2);
}

#[test]
fn test_contradiction_is_symmetric_for_duplicates() {
    let map = compile("[A]: a\n  >< [B]: b\n\n[B]\n  >< [A]");
    assert_eq!(map.relations.len(), 1);
    assert_eq!(map.relations[0].kind, RelationType::Contradictory);
}

#[test]
fn test_self_relation_is_listed_once() {
    let map = compile("[A]: a\n  + [A]");
    assert_eq!(map.relations.len(), 1);
    assert_eq!(map.statement("A").unwrap().relations.len(), 1);
}

// ============================================================================
// Undercuts
// ============================================================================

#[test]
fn test_undercuts_stay_out_of_the_relation_list() {
    let map = compile("<A>: a\n\n[P]: p\n  <_ <A>\n  > <A>");
    assert!(map.relations.is_empty());
    assert!(map.argument("A").unwrap().relations.is_empty());
    assert!(map.statement("P").unwrap().relations.is_empty());
}

// ============================================================================
// Canonicalization
// ============================================================================

#[test]
fn test_reconstructed_argument_relation_moves_to_its_conclusion() {
    let map = compile("<A>: sketch\n  <+ [T]: target\n\n<A>\n\n(1) p\n(2) q\n----\n(3) [C]: c");
    assert_eq!(map.relations.len(), 1);
    let relation = &map.relations[0];
    assert_eq!(relation.kind, RelationType::Entails);
    assert_eq!(relation.status, RelationStatus::Reconstructed);
    assert_eq!(relation.from, statement("C"));
    assert_eq!(relation.to, statement("T"));

    // The relation now lives on the conclusion class, not the argument.
    assert!(map.argument("A").unwrap().relations.is_empty());
    assert_eq!(map.statement("C").unwrap().relations.len(), 1);
    assert_eq!(map.statement("T").unwrap().relations.len(), 1);
}

#[test]
fn test_retargeting_drops_a_relation_that_becomes_a_duplicate() {
    let map = compile(
        "[T]: t\n  + [C]: c\n\n<A>: a\n  <+ [T]\n\n<A>\n\n(1) p\n----\n(2) [C]: c2",
    );
    let entails: Vec<_> = map
        .relations
        .iter()
        .filter(|r| r.kind == RelationType::Entails && r.from == statement("C"))
        .collect();
    assert_eq!(entails.len(), 1);
    assert_eq!(map.relations.len(), 1);
}

#[test]
fn test_relation_to_a_reconstructed_argument_stays_sketched() {
    let map = compile("[A]: a\n  <- <B>\n\n<B>\n\n(1) p\n----\n(2) c");
    assert_eq!(map.relations.len(), 1);
    let relation = &map.relations[0];
    assert_eq!(relation.kind, RelationType::Attack);
    assert_eq!(relation.status, RelationStatus::Sketched);
    assert_eq!(relation.to, argument("B"));
}

#[test]
fn test_relations_inside_a_reconstruction() {
    let map = compile("(1) p\n----\n(2) [C]: c\n  - [D]: d");
    assert_eq!(map.relations.len(), 1);
    let relation = &map.relations[0];
    assert_eq!(relation.kind, RelationType::Contrary);
    assert_eq!(relation.from, statement("D"));
    assert_eq!(relation.to, statement("C"));
}
