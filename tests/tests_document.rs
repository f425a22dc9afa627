//! End-to-End Tests
//!
//! Compiles a complete document and checks the resulting argument map in
//! one piece: sections, equivalence classes, an argument reconstruction
//! with its inference, relations and tags. Also exercises the tree
//! walker through the public API.

use argot::compile;
use argot::model::{RelationStatus, RelationTarget, RelationType, StatementRole};
use argot::parser::{parse, Token};
use argot::syntax::{walk, NodeContext, SyntaxVisitor};

const DOCUMENT: &str = "\
# Animal ethics

[Animal rights]: Animals have moral rights. #ethics
  + <Suffering argument>
  - [Contract view]: Rights arise from contracts among duty bearers. #ethics

## The main argument

<Suffering argument>: Moral status tracks the capacity to suffer. #utilitarian

(1) [Suffering matters]: If a being can suffer, its interests matter.
(2) [Animals suffer]: Animals can suffer.
-- modus ponens (uses: 1, 2) --
(3) [Interests count]: Animal interests matter morally.";

#[test]
fn test_document_compiles_cleanly() {
    let map = compile(DOCUMENT);
    assert!(map.lexer_errors.is_empty(), "{:?}", map.lexer_errors);
    assert!(map.parser_errors.is_empty(), "{:?}", map.parser_errors);
    assert_eq!(map.statements.len(), 5);
    assert_eq!(map.arguments.len(), 1);
    assert_eq!(map.relations.len(), 2);
}

#[test]
fn test_document_sections() {
    let map = compile(DOCUMENT);
    assert_eq!(map.sections.len(), 1);
    let root = &map.sections[0];
    assert_eq!(root.title, "Animal ethics");
    assert_eq!(root.level, 1);
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].title, "The main argument");
    assert_eq!(root.children[0].parent.as_deref(), Some(root.id.as_str()));

    let rights = map.statement("Animal rights").unwrap();
    assert_eq!(rights.members[0].section.as_deref(), Some("s1"));
    let premise = map.statement("Suffering matters").unwrap();
    assert_eq!(premise.members[0].section.as_deref(), Some("s2"));
}

#[test]
fn test_document_statement_tree() {
    let map = compile(DOCUMENT);
    let rights = map.statement("Animal rights").unwrap();
    assert!(rights.is_used_as_root_of_statement_tree);
    assert_eq!(rights.members[0].text, "Animals have moral rights. #ethics");

    let contract = map.statement("Contract view").unwrap();
    assert!(contract.is_used_as_child_of_statement_tree);
}

#[test]
fn test_document_reconstruction() {
    let map = compile(DOCUMENT);
    let argument = map.argument("Suffering argument").unwrap();
    assert_eq!(argument.section.as_deref(), Some("s2"));
    assert_eq!(argument.descriptions.len(), 1);
    assert_eq!(
        argument.descriptions[0].text,
        "Moral status tracks the capacity to suffer. #utilitarian"
    );

    assert_eq!(argument.pcs.len(), 3);
    assert_eq!(argument.pcs[0].role, StatementRole::Premise);
    assert_eq!(argument.pcs[1].role, StatementRole::Premise);
    assert_eq!(argument.pcs[2].role, StatementRole::Conclusion);
    assert_eq!(argument.pcs[2].title.as_deref(), Some("Interests count"));

    let inference = argument.pcs[2].inference.as_ref().unwrap();
    assert_eq!(inference.inference_rules, vec!["modus ponens".to_string()]);
    assert_eq!(
        inference.metadata.get("uses"),
        Some(&vec!["1".to_string(), "2".to_string()])
    );

    assert!(map.statement("Suffering matters").unwrap().is_used_as_premise);
    assert!(map.statement("Interests count").unwrap().is_used_as_conclusion);
}

#[test]
fn test_document_relations() {
    let map = compile(DOCUMENT);

    // The support sketched from the argument has been moved onto its
    // conclusion's equivalence class.
    let entails = map
        .relations
        .iter()
        .find(|r| r.kind == RelationType::Entails)
        .unwrap();
    assert_eq!(
        entails.from,
        RelationTarget::Statement("Interests count".into())
    );
    assert_eq!(
        entails.to,
        RelationTarget::Statement("Animal rights".into())
    );
    assert_eq!(entails.status, RelationStatus::Reconstructed);

    let contrary = map
        .relations
        .iter()
        .find(|r| r.kind == RelationType::Contrary)
        .unwrap();
    assert_eq!(
        contrary.from,
        RelationTarget::Statement("Contract view".into())
    );
    assert_eq!(contrary.to, RelationTarget::Statement("Animal rights".into()));

    assert_eq!(map.statement("Animal rights").unwrap().relations.len(), 2);
    assert_eq!(map.statement("Interests count").unwrap().relations.len(), 1);
    assert_eq!(map.statement("Contract view").unwrap().relations.len(), 1);
    assert!(map.argument("Suffering argument").unwrap().relations.is_empty());
}

#[test]
fn test_document_tags() {
    let map = compile(DOCUMENT);
    assert_eq!(map.tags, vec!["ethics", "utilitarian"]);
    assert_eq!(map.statement("Animal rights").unwrap().tags, vec!["ethics"]);
    assert_eq!(
        map.argument("Suffering argument").unwrap().tags,
        vec!["utilitarian"]
    );
}

// ============================================================================
// Walker as a public API
// ============================================================================

#[derive(Default)]
struct DefinitionCollector {
    titles: Vec<String>,
}

impl SyntaxVisitor for DefinitionCollector {
    fn on_statement_definition(&mut self, token: &Token, _ctx: NodeContext<'_>) {
        let inner = token.text.trim_end().trim_end_matches(':');
        self.titles.push(inner.trim_matches(['[', ']']).to_string());
    }
}

#[test]
fn test_walker_reaches_every_definition_in_source_order() {
    let parse = parse(DOCUMENT);
    let mut collector = DefinitionCollector::default();
    walk(&mut collector, &parse.root);
    assert_eq!(
        collector.titles,
        vec![
            "Animal rights",
            "Contract view",
            "Suffering matters",
            "Animals suffer",
            "Interests count",
        ]
    );
}
