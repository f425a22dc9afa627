//! Model Tests - Statements, Sections and Tags
//!
//! Verifies how occurrences of the same title collapse into one
//! equivalence class, how headings produce the section forest, and how
//! tags and inline ranges land on statements.

use argot::compile;
use argot::model::{InlineRangeKind, StatementRole};

// ============================================================================
// Equivalence classes
// ============================================================================

#[test]
fn test_occurrences_of_one_title_share_a_class() {
    let map = compile(
        "[A]: first formulation\n\n[A]: second formulation\n\n[A]\n\nSee @[A] somewhere",
    );
    assert_eq!(map.statements.len(), 2);

    let class = map.statement("A").unwrap();
    assert_eq!(class.members.len(), 2);
    assert_eq!(class.members[0].text, "first formulation");
    assert_eq!(class.members[1].text, "second formulation");

    let anonymous = map.statement("Untitled 1").unwrap();
    assert_eq!(anonymous.members[0].text, "See @[A] somewhere");
}

#[test]
fn test_bare_reference_still_sets_usage_flags() {
    let map = compile("[A]: full text\n\n[A]\n  + [B]: b");
    let class = map.statement("A").unwrap();
    assert_eq!(class.members.len(), 1);
    assert!(class.is_used_as_root_of_statement_tree);
    assert_eq!(map.relations.len(), 1);
}

#[test]
fn test_tree_position_flags() {
    let map = compile("[A]: a\n  + [B]: b");
    let a = map.statement("A").unwrap();
    assert!(a.is_used_as_root_of_statement_tree);
    assert!(!a.is_used_as_child_of_statement_tree);
    let b = map.statement("B").unwrap();
    assert!(b.is_used_as_child_of_statement_tree);
    assert!(!b.is_used_as_root_of_statement_tree);
}

#[test]
fn test_untitled_numbering_is_shared_across_kinds() {
    let map = compile("first anon\n\n(1) p\n----\n(2) c\n\nsecond anon");
    assert!(map.statement("Untitled 1").is_some());
    let argument = map.argument("Untitled 2").unwrap();
    assert_eq!(argument.pcs.len(), 2);
    assert_eq!(argument.pcs[0].title.as_deref(), Some("Untitled 3"));
    assert_eq!(argument.pcs[1].title.as_deref(), Some("Untitled 4"));
    assert!(map.statement("Untitled 5").is_some());
}

#[test]
fn test_lone_delimiter_creates_no_argument() {
    let map = compile("----\n\nanonymous text");
    assert!(!map.parser_errors.is_empty());
    assert!(map.arguments.is_empty());
    assert_eq!(map.statements.len(), 1);
    assert_eq!(
        map.statement("Untitled 1").unwrap().members[0].text,
        "anonymous text"
    );
}

// ============================================================================
// Sections
// ============================================================================

#[test]
fn test_heading_levels_build_a_forest() {
    let map = compile(
        "# One\n\n[A]: a\n\n## Two\n\n[B]: b\n\n## Three\n\n[C]: c\n\n# Four\n\n[D]: d",
    );
    assert_eq!(map.sections.len(), 2);

    let one = &map.sections[0];
    assert_eq!(one.id, "s1");
    assert_eq!(one.title, "One");
    assert_eq!(one.level, 1);
    assert_eq!(one.parent, None);
    let child_titles: Vec<_> = one.children.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(child_titles, vec!["Two", "Three"]);
    assert!(one.children.iter().all(|s| s.parent.as_deref() == Some("s1")));

    let four = &map.sections[1];
    assert_eq!(four.id, "s4");
    assert_eq!(four.title, "Four");
    assert!(four.children.is_empty());
}

#[test]
fn test_statements_record_their_enclosing_section() {
    let map = compile(
        "# One\n\n[A]: a\n\n## Two\n\n[B]: b\n\n## Three\n\n[C]: c\n\n# Four\n\n[D]: d",
    );
    let section_of = |title: &str| {
        map.statement(title).unwrap().members[0]
            .section
            .clone()
            .unwrap()
    };
    assert_eq!(section_of("A"), "s1");
    assert_eq!(section_of("B"), "s2");
    assert_eq!(section_of("C"), "s3");
    assert_eq!(section_of("D"), "s4");
}

#[test]
fn test_arguments_record_their_enclosing_section() {
    let map = compile("# Sec\n\n<A>: the description\n\n(1) p\n----\n(2) c");
    let argument = map.argument("A").unwrap();
    assert_eq!(argument.section.as_deref(), Some("s1"));
    assert_eq!(argument.descriptions[0].section.as_deref(), Some("s1"));
    assert_eq!(argument.pcs.len(), 2);
}

// ============================================================================
// Tags
// ============================================================================

#[test]
fn test_tags_register_in_first_occurrence_order() {
    let map = compile(
        "[Statement 1]: text #tag1\n  + [Statement 2]: more #tag2\n    - [Statement 3]: deeper #tag3",
    );
    assert_eq!(map.tags, vec!["tag1", "tag2", "tag3"]);
    assert_eq!(map.statement("Statement 1").unwrap().tags, vec!["tag1"]);
    assert_eq!(map.statement("Statement 2").unwrap().tags, vec!["tag2"]);
    assert_eq!(map.statement("Statement 3").unwrap().tags, vec!["tag3"]);
}

#[test]
fn test_repeated_and_parenthesized_tags() {
    let map = compile("[A]: one #pro and #(two words) and #pro again");
    assert_eq!(map.tags, vec!["pro", "two words"]);
    let class = map.statement("A").unwrap();
    assert_eq!(class.tags, vec!["pro", "two words"]);
    let member = &class.members[0];
    assert_eq!(member.text, "one #pro and #(two words) and #pro again");
    let tag_ranges: Vec<_> = member
        .ranges
        .iter()
        .filter(|r| matches!(r.kind, InlineRangeKind::Tag { .. }))
        .collect();
    assert_eq!(tag_ranges.len(), 3);
    assert_eq!(
        &member.text[tag_ranges[1].start..=tag_ranges[1].stop],
        "#(two words)"
    );
}

// ============================================================================
// Inline ranges
// ============================================================================

#[test]
fn test_ranges_index_into_the_statement_text() {
    let map = compile("[R]: **b** _i_ @[M] #t [l](u)");
    let member = &map.statement("R").unwrap().members[0];
    assert_eq!(member.text, "b i @[M] #t l");
    assert_eq!(member.ranges.len(), 5);

    let covered: Vec<&str> = member
        .ranges
        .iter()
        .map(|r| &member.text[r.start..=r.stop])
        .collect();
    assert_eq!(covered, vec!["b", "i", "@[M]", "#t", "l"]);

    assert_eq!(member.ranges[0].kind, InlineRangeKind::Bold);
    assert_eq!(member.ranges[1].kind, InlineRangeKind::Italic);
    assert_eq!(
        member.ranges[2].kind,
        InlineRangeKind::StatementMention { title: "M".into() }
    );
    assert_eq!(
        member.ranges[3].kind,
        InlineRangeKind::Tag { tag: "t".into() }
    );
    assert_eq!(member.ranges[4].kind, InlineRangeKind::Link { url: "u".into() });
}

// ============================================================================
// Argument descriptions
// ============================================================================

#[test]
fn test_descriptions_accumulate_per_argument() {
    let map = compile("<A>: first take\n\n<A>: second take #tagged");
    let argument = map.argument("A").unwrap();
    assert_eq!(argument.descriptions.len(), 2);
    assert_eq!(argument.descriptions[0].text, "first take");
    assert_eq!(argument.descriptions[1].text, "second take #tagged");
    assert!(argument
        .descriptions
        .iter()
        .all(|d| d.role == StatementRole::ArgumentDescription));
    assert_eq!(argument.tags, vec!["tagged"]);
}

// ============================================================================
// Premise-conclusion roles
// ============================================================================

#[test]
fn test_roles_flow_back_into_class_members() {
    let map = compile("(1) [P]: premise text\n----\n(2) [C]: conclusion text");
    let premise = &map.statement("P").unwrap().members[0];
    assert_eq!(premise.role, StatementRole::Premise);
    assert!(premise.inference.is_none());

    let conclusion = &map.statement("C").unwrap().members[0];
    assert_eq!(conclusion.role, StatementRole::Conclusion);
    assert!(conclusion.inference.is_some());

    assert!(map.statement("P").unwrap().is_used_as_premise);
    assert!(map.statement("C").unwrap().is_used_as_conclusion);
}
