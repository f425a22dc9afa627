//! Model builder
//!
//! Folds a parsed tree into an [`ArgumentMap`] in two phases. The walk
//! phase accumulates statements, arguments, sections, tags and sketched
//! relations exactly as they occur in the document. The finish phase
//! canonicalizes relations, copies them onto the entities they touch and
//! assembles the section forest.

use tracing::debug;

use crate::model::elements::{
    Argument, ArgumentMap, EquivalenceClass, Inference, InlineRange, InlineRangeKind, Relation,
    RelationStatus, RelationTarget, RelationType, Section, Statement, StatementRole,
};
use crate::parser::{Parse, SyntaxKind, SyntaxNode, Token};
use crate::syntax::{walk, NodeContext, SyntaxVisitor};

/// Statement under construction. Text, ranges and tags stream into it
/// while the walker is inside the owning node.
struct StatementFrame {
    statement: Statement,
    is_root: bool,
    is_child: bool,
}

impl StatementFrame {
    fn new(statement: Statement) -> Self {
        Self {
            statement,
            is_root: false,
            is_child: false,
        }
    }
}

/// Completed statement handed from a statement exit to the enclosing
/// premise-conclusion handling.
struct FinishedStatement {
    statement: Statement,
    added_to_members: bool,
}

/// Relation whose member endpoint is still being read.
struct PendingRelation {
    kind: RelationType,
    parent_is_from: bool,
    parent: RelationTarget,
}

/// What the relations block below the current element attaches to.
enum Anchor {
    Statement,
    Argument(String),
}

/// Section as recorded during the walk, before the forest is built.
struct SectionSlot {
    id: String,
    title: String,
    level: usize,
    parent: Option<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TargetKind {
    Statement,
    SketchedArgument,
    ReconstructedArgument,
}

/// Builds the semantic model for one document.
#[derive(Default)]
pub struct ModelBuilder {
    statements: indexmap::IndexMap<String, EquivalenceClass>,
    arguments: indexmap::IndexMap<String, Argument>,
    relations: Vec<Relation>,
    section_slots: Vec<SectionSlot>,
    current_section: Option<usize>,
    section_counter: usize,
    tags: Vec<String>,

    frames: Vec<StatementFrame>,
    finished: Option<FinishedStatement>,
    anchor: Option<Anchor>,
    parents: Vec<Option<RelationTarget>>,
    open_relations: Vec<Option<PendingRelation>>,
    pending_member: Option<RelationTarget>,
    range_starts: Vec<usize>,
    current_inference: Option<Inference>,
    current_reconstruction: Option<String>,
    in_statement_tree: bool,
    untitled_counter: usize,
    error_depth: usize,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `parse` and return the resulting model. Lexer and parser
    /// errors are carried over so callers get tree and diagnostics in
    /// one place.
    pub fn build(parse: &Parse) -> ArgumentMap {
        let mut builder = ModelBuilder::new();
        walk(&mut builder, &parse.root);
        builder.finish(parse)
    }

    fn finish(mut self, parse: &Parse) -> ArgumentMap {
        self.canonicalize();
        self.attach_relations();
        let sections = self.assemble_sections();
        debug!(
            statements = self.statements.len(),
            arguments = self.arguments.len(),
            relations = self.relations.len(),
            sections = sections.len(),
            "built argument map"
        );
        ArgumentMap {
            statements: self.statements,
            arguments: self.arguments,
            relations: self.relations,
            sections,
            tags: self.tags,
            lexer_errors: parse.lexer_errors.clone(),
            parser_errors: parse.parser_errors.clone(),
        }
    }

    /// Anonymous statements and untitled arguments draw from one shared
    /// counter.
    fn next_untitled(&mut self) -> String {
        self.untitled_counter += 1;
        format!("Untitled {}", self.untitled_counter)
    }

    fn class_mut(&mut self, title: &str) -> &mut EquivalenceClass {
        self.statements
            .entry(title.to_string())
            .or_insert_with(|| EquivalenceClass::new(title))
    }

    fn argument_mut(&mut self, title: &str) -> &mut Argument {
        self.arguments
            .entry(title.to_string())
            .or_insert_with(|| Argument::new(title))
    }

    fn current_section_id(&self) -> Option<String> {
        self.current_section
            .map(|index| self.section_slots[index].id.clone())
    }

    /// Statement currently receiving inline content. `None` inside error
    /// regions, which keeps skipped tokens out of the model.
    fn sink(&mut self) -> Option<&mut Statement> {
        if self.error_depth > 0 {
            return None;
        }
        self.frames.last_mut().map(|frame| &mut frame.statement)
    }

    /// Resolve the current anchor to a relation endpoint. An anonymous
    /// statement gets its title here, before its members are walked.
    fn resolve_parent(&mut self) -> Option<RelationTarget> {
        match &self.anchor {
            Some(Anchor::Argument(title)) => Some(RelationTarget::Argument(title.clone())),
            Some(Anchor::Statement) => {
                self.frames.last()?;
                let title = match self.frames.last().and_then(|f| f.statement.title.clone()) {
                    Some(title) => title,
                    None => {
                        let title = self.next_untitled();
                        if let Some(frame) = self.frames.last_mut() {
                            frame.statement.title = Some(title.clone());
                        }
                        title
                    }
                };
                self.class_mut(&title);
                Some(RelationTarget::Statement(title))
            }
            None => None,
        }
    }

    fn open_relation(&mut self, kind: RelationType, parent_is_from: bool) {
        self.pending_member = None;
        let pending = self
            .parents
            .last()
            .and_then(|parent| parent.clone())
            .map(|parent| PendingRelation {
                kind,
                parent_is_from,
                parent,
            });
        self.open_relations.push(pending);
    }

    /// Undercuts are kept in the tree but create no model relation.
    fn open_undercut(&mut self) {
        self.pending_member = None;
        self.open_relations.push(None);
    }

    fn close_undercut(&mut self) {
        self.open_relations.pop();
        self.pending_member = None;
    }

    fn close_relation(&mut self) {
        let pending = self.open_relations.pop().flatten();
        let member = self.pending_member.take();
        let (Some(pending), Some(member)) = (pending, member) else {
            return;
        };
        let (from, to) = if pending.parent_is_from {
            (pending.parent, member)
        } else {
            (member, pending.parent)
        };
        if self.relation_exists(&from, &to, pending.kind) {
            return;
        }
        self.relations.push(Relation {
            kind: pending.kind,
            status: RelationStatus::Sketched,
            from,
            to,
        });
    }

    /// A contradiction counts as a duplicate in either orientation.
    fn relation_exists(&self, from: &RelationTarget, to: &RelationTarget, kind: RelationType) -> bool {
        self.relations.iter().any(|relation| {
            (relation.from == *from && relation.to == *to && relation.kind == kind)
                || (kind == RelationType::Contradictory
                    && relation.kind == RelationType::Contradictory
                    && relation.from == *to
                    && relation.to == *from)
        })
    }

    fn adopted_argument_title(&self, ctx: NodeContext<'_>) -> Option<String> {
        let mut sibling = ctx.preceding_sibling(1)?;
        if sibling.kind() == SyntaxKind::EMPTYLINE {
            sibling = ctx.preceding_sibling(2)?;
        }
        let node = sibling.as_node()?;
        match node.kind {
            SyntaxKind::ARGUMENT_DEFINITION_ELEMENT => node
                .find_token(SyntaxKind::ARGUMENT_DEFINITION)
                .and_then(|token| definition_title(&token.text, '<', '>')),
            SyntaxKind::ARGUMENT_REFERENCE_ELEMENT => node
                .find_token(SyntaxKind::ARGUMENT_REFERENCE)
                .and_then(|token| reference_title(&token.text, '<', '>')),
            _ => None,
        }
    }

    fn open_range(&mut self, kind: InlineRangeKind) {
        let Some(statement) = self.sink() else {
            self.range_starts.push(usize::MAX);
            return;
        };
        let start = statement.text.len();
        statement.ranges.push(InlineRange {
            kind,
            start,
            stop: start,
        });
        let index = statement.ranges.len() - 1;
        self.range_starts.push(index);
    }

    fn close_range(&mut self) {
        let Some(index) = self.range_starts.pop() else {
            return;
        };
        let Some(statement) = self.sink() else {
            return;
        };
        if let Some(range) = statement.ranges.get_mut(index) {
            range.stop = statement.text.len().saturating_sub(1);
        }
    }

    fn push_mention(&mut self, token: &Token, kind: InlineRangeKind) {
        let Some(statement) = self.sink() else {
            return;
        };
        let start = statement.text.len();
        statement.text.push_str(&token.text);
        statement.ranges.push(InlineRange {
            kind,
            start,
            stop: statement.text.len() - 1,
        });
    }

    /// Classify relations, retarget those of reconstructed arguments to
    /// their conclusion's equivalence class and translate dialectical
    /// types into semantic ones. A retargeted relation that duplicates
    /// an existing one is dropped.
    fn canonicalize(&mut self) {
        let mut i = 0;
        while i < self.relations.len() {
            let from_kind = self.target_kind(&self.relations[i].from);
            let to_kind = self.target_kind(&self.relations[i].to);
            if from_kind == TargetKind::SketchedArgument
                || to_kind == TargetKind::SketchedArgument
                || to_kind == TargetKind::ReconstructedArgument
            {
                self.relations[i].status = RelationStatus::Sketched;
                i += 1;
                continue;
            }
            self.relations[i].status = RelationStatus::Reconstructed;
            if from_kind == TargetKind::ReconstructedArgument {
                let Some(conclusion) = self.conclusion_class(&self.relations[i].from) else {
                    i += 1;
                    continue;
                };
                let new_from = RelationTarget::Statement(conclusion);
                let to = self.relations[i].to.clone();
                let final_kind = semantic_type(self.relations[i].kind);
                let duplicate = self.relations.iter().enumerate().any(|(j, relation)| {
                    j != i
                        && relation.from == new_from
                        && relation.to == to
                        && semantic_type(relation.kind) == final_kind
                });
                if duplicate {
                    self.relations.remove(i);
                    continue;
                }
                self.relations[i].from = new_from;
            }
            self.relations[i].kind = semantic_type(self.relations[i].kind);
            i += 1;
        }
    }

    fn target_kind(&self, target: &RelationTarget) -> TargetKind {
        match target {
            RelationTarget::Statement(_) => TargetKind::Statement,
            RelationTarget::Argument(title) => match self.arguments.get(title) {
                Some(argument) if !argument.pcs.is_empty() => TargetKind::ReconstructedArgument,
                _ => TargetKind::SketchedArgument,
            },
        }
    }

    /// Equivalence class of the argument's conclusion, the last element
    /// of its premise-conclusion structure.
    fn conclusion_class(&self, target: &RelationTarget) -> Option<String> {
        let RelationTarget::Argument(title) = target else {
            return None;
        };
        let argument = self.arguments.get(title)?;
        argument.pcs.last()?.title.clone()
    }

    /// Copy each relation onto the entities it touches. A self-relation
    /// is listed once.
    fn attach_relations(&mut self) {
        let relations = std::mem::take(&mut self.relations);
        for relation in &relations {
            let mut targets = vec![&relation.from];
            if relation.to != relation.from {
                targets.push(&relation.to);
            }
            for target in targets {
                match target {
                    RelationTarget::Statement(title) => {
                        if let Some(class) = self.statements.get_mut(title) {
                            class.relations.push(relation.clone());
                        }
                    }
                    RelationTarget::Argument(title) => {
                        if let Some(argument) = self.arguments.get_mut(title) {
                            argument.relations.push(relation.clone());
                        }
                    }
                }
            }
        }
        self.relations = relations;
    }

    fn assemble_sections(&self) -> Vec<Section> {
        self.section_slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.parent.is_none())
            .map(|(index, _)| self.assemble_section(index))
            .collect()
    }

    fn assemble_section(&self, index: usize) -> Section {
        let slot = &self.section_slots[index];
        let children = self
            .section_slots
            .iter()
            .enumerate()
            .filter(|(_, child)| child.parent == Some(index))
            .map(|(child_index, _)| self.assemble_section(child_index))
            .collect();
        Section {
            id: slot.id.clone(),
            title: slot.title.clone(),
            level: slot.level,
            children,
            parent: slot.parent.map(|p| self.section_slots[p].id.clone()),
        }
    }
}

impl SyntaxVisitor for ModelBuilder {
    fn enter_heading(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.frames.push(StatementFrame::new(Statement::default()));
    }

    /// A heading closes over its accumulated text and becomes a section.
    /// The new section is attached to the closest open section with a
    /// strictly lower level, or becomes a root.
    fn exit_heading(&mut self, node: &SyntaxNode, _ctx: NodeContext<'_>) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let level = node
            .find_token(SyntaxKind::HEADING_START)
            .map(|token| token.text.len())
            .unwrap_or(1);
        self.section_counter += 1;
        let id = format!("s{}", self.section_counter);
        let title = frame.statement.text.trim().to_string();
        let mut parent = self.current_section;
        while let Some(index) = parent {
            if self.section_slots[index].level < level {
                break;
            }
            parent = self.section_slots[index].parent;
        }
        self.section_slots.push(SectionSlot {
            id,
            title,
            level,
            parent,
        });
        self.current_section = Some(self.section_slots.len() - 1);
    }

    fn enter_statement(&mut self, _node: &SyntaxNode, ctx: NodeContext<'_>) {
        let is_root = ctx.parent.map(|parent| parent.kind) == Some(SyntaxKind::DOCUMENT);
        let is_child = !is_root && self.in_statement_tree;
        if is_root {
            self.in_statement_tree = true;
        }
        let mut frame = StatementFrame::new(Statement::default());
        frame.is_root = is_root;
        frame.is_child = is_child;
        self.frames.push(frame);
        self.anchor = Some(Anchor::Statement);
    }

    fn exit_statement(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        let Some(mut frame) = self.frames.pop() else {
            return;
        };
        if frame.is_root {
            self.in_statement_tree = false;
        }
        let title = match frame.statement.title.clone() {
            Some(title) => title,
            None => {
                let title = self.next_untitled();
                frame.statement.title = Some(title.clone());
                title
            }
        };
        let added = !frame.statement.text.is_empty();
        if added {
            frame.statement.section = self.current_section_id();
        }
        let tags = frame.statement.tags.clone();
        let class = self.class_mut(&title);
        for tag in tags {
            if !class.tags.iter().any(|t| t == &tag) {
                class.tags.push(tag);
            }
        }
        if added {
            class.members.push(frame.statement.clone());
        }
        if frame.is_root {
            class.is_used_as_root_of_statement_tree = true;
        } else if frame.is_child {
            class.is_used_as_child_of_statement_tree = true;
        }
        self.pending_member = Some(RelationTarget::Statement(title));
        self.finished = Some(FinishedStatement {
            statement: frame.statement,
            added_to_members: added,
        });
    }

    fn enter_relations(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        let parent = self.resolve_parent();
        self.parents.push(parent);
    }

    fn exit_relations(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.parents.pop();
    }

    fn enter_incoming_support(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.open_relation(RelationType::Support, true);
    }

    fn exit_incoming_support(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.close_relation();
    }

    fn enter_incoming_attack(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.open_relation(RelationType::Attack, true);
    }

    fn exit_incoming_attack(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.close_relation();
    }

    fn enter_incoming_undercut(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.open_undercut();
    }

    fn exit_incoming_undercut(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.close_undercut();
    }

    fn enter_outgoing_support(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.open_relation(RelationType::Support, false);
    }

    fn exit_outgoing_support(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.close_relation();
    }

    fn enter_outgoing_attack(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.open_relation(RelationType::Attack, false);
    }

    fn exit_outgoing_attack(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.close_relation();
    }

    fn enter_outgoing_undercut(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.open_undercut();
    }

    fn exit_outgoing_undercut(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.close_undercut();
    }

    fn enter_contradiction(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.open_relation(RelationType::Contradictory, true);
    }

    fn exit_contradiction(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.close_relation();
    }

    /// An argument block adopts the argument defined or referenced right
    /// above it; otherwise it creates an untitled one. Reconstructing an
    /// argument a second time replaces its previous structure.
    fn enter_argument(&mut self, _node: &SyntaxNode, ctx: NodeContext<'_>) {
        let title = match self.adopted_argument_title(ctx) {
            Some(title) => title,
            None => self.next_untitled(),
        };
        let section = self.current_section_id();
        let argument = self.argument_mut(&title);
        if section.is_some() {
            argument.section = section;
        }
        if !argument.pcs.is_empty() {
            argument.pcs.clear();
        }
        self.current_reconstruction = Some(title);
    }

    fn exit_argument(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.current_reconstruction = None;
        self.current_inference = None;
        self.finished = None;
    }

    fn enter_argument_statement(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.finished = None;
    }

    fn exit_argument_statement(&mut self, _node: &SyntaxNode, ctx: NodeContext<'_>) {
        let Some(mut finished) = self.finished.take() else {
            return;
        };
        let Some(title) = finished.statement.title.clone() else {
            return;
        };
        let preceded_by_inference = ctx
            .preceding_sibling(1)
            .map(|sibling| sibling.kind() == SyntaxKind::INFERENCE)
            .unwrap_or(false);
        if preceded_by_inference {
            finished.statement.role = StatementRole::Conclusion;
            finished.statement.inference = self.current_inference.take();
            self.class_mut(&title).is_used_as_conclusion = true;
        } else {
            finished.statement.role = StatementRole::Premise;
            self.class_mut(&title).is_used_as_premise = true;
        }
        if finished.added_to_members {
            if let Some(member) = self
                .statements
                .get_mut(&title)
                .and_then(|class| class.members.last_mut())
            {
                member.role = finished.statement.role;
                member.inference = finished.statement.inference.clone();
            }
        }
        if let Some(reconstruction) = self.current_reconstruction.clone() {
            self.argument_mut(&reconstruction).pcs.push(finished.statement);
        }
    }

    fn enter_inference(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.current_inference = Some(Inference::default());
    }

    fn exit_inference_rules(&mut self, node: &SyntaxNode, _ctx: NodeContext<'_>) {
        let Some(inference) = self.current_inference.as_mut() else {
            return;
        };
        for child in node.child_nodes() {
            if child.kind == SyntaxKind::FREESTYLE_TEXT {
                let rule = child.text().trim().to_string();
                if !rule.is_empty() {
                    inference.inference_rules.push(rule);
                }
            }
        }
    }

    /// First freestyle part is the key, the rest are the values.
    fn exit_metadata_statement(&mut self, node: &SyntaxNode, _ctx: NodeContext<'_>) {
        let Some(inference) = self.current_inference.as_mut() else {
            return;
        };
        let mut texts = node
            .child_nodes()
            .filter(|child| child.kind == SyntaxKind::FREESTYLE_TEXT)
            .map(|child| child.text().trim().to_string());
        let Some(key) = texts.next() else {
            return;
        };
        if key.is_empty() {
            return;
        }
        let values: Vec<String> = texts.collect();
        inference.metadata.insert(key, values);
    }

    fn enter_argument_definition_element(&mut self, node: &SyntaxNode, _ctx: NodeContext<'_>) {
        let title = node
            .find_token(SyntaxKind::ARGUMENT_DEFINITION)
            .and_then(|token| definition_title(&token.text, '<', '>'));
        if let Some(title) = &title {
            self.argument_mut(title);
            self.anchor = Some(Anchor::Argument(title.clone()));
        }
        let statement = Statement {
            role: StatementRole::ArgumentDescription,
            section: self.current_section_id(),
            ..Statement::default()
        };
        self.frames.push(StatementFrame::new(statement));
    }

    fn exit_argument_definition_element(&mut self, node: &SyntaxNode, _ctx: NodeContext<'_>) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let Some(title) = node
            .find_token(SyntaxKind::ARGUMENT_DEFINITION)
            .and_then(|token| definition_title(&token.text, '<', '>'))
        else {
            return;
        };
        let tags = frame.statement.tags.clone();
        let argument = self.argument_mut(&title);
        for tag in tags {
            if !argument.tags.iter().any(|t| t == &tag) {
                argument.tags.push(tag);
            }
        }
        argument.descriptions.push(frame.statement);
        self.pending_member = Some(RelationTarget::Argument(title));
    }

    fn enter_argument_reference_element(&mut self, node: &SyntaxNode, _ctx: NodeContext<'_>) {
        let Some(title) = node
            .find_token(SyntaxKind::ARGUMENT_REFERENCE)
            .and_then(|token| reference_title(&token.text, '<', '>'))
        else {
            return;
        };
        self.argument_mut(&title);
        self.anchor = Some(Anchor::Argument(title));
    }

    fn exit_argument_reference_element(&mut self, node: &SyntaxNode, _ctx: NodeContext<'_>) {
        let Some(title) = node
            .find_token(SyntaxKind::ARGUMENT_REFERENCE)
            .and_then(|token| reference_title(&token.text, '<', '>'))
        else {
            return;
        };
        self.pending_member = Some(RelationTarget::Argument(title));
    }

    fn enter_bold(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.open_range(InlineRangeKind::Bold);
    }

    fn exit_bold(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.close_range();
    }

    fn enter_italic(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.open_range(InlineRangeKind::Italic);
    }

    fn exit_italic(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.close_range();
    }

    fn enter_error(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.error_depth += 1;
    }

    fn exit_error(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
        self.error_depth = self.error_depth.saturating_sub(1);
    }

    fn on_statement_definition(&mut self, token: &Token, _ctx: NodeContext<'_>) {
        let Some(title) = definition_title(&token.text, '[', ']') else {
            return;
        };
        if let Some(statement) = self.sink() {
            statement.title = Some(title);
        }
    }

    fn on_statement_reference(&mut self, token: &Token, _ctx: NodeContext<'_>) {
        let Some(title) = reference_title(&token.text, '[', ']') else {
            return;
        };
        if let Some(statement) = self.sink() {
            statement.title = Some(title);
        }
    }

    fn on_statement_mention(&mut self, token: &Token, _ctx: NodeContext<'_>) {
        let Some(title) = mention_title(&token.text, '[', ']') else {
            return;
        };
        self.push_mention(token, InlineRangeKind::StatementMention { title });
    }

    fn on_argument_mention(&mut self, token: &Token, _ctx: NodeContext<'_>) {
        let Some(title) = mention_title(&token.text, '<', '>') else {
            return;
        };
        self.push_mention(token, InlineRangeKind::ArgumentMention { title });
    }

    /// Only the link text enters the statement text; the url lives in the
    /// range.
    fn on_link(&mut self, token: &Token, _ctx: NodeContext<'_>) {
        let Some((label, url)) = link_parts(&token.text) else {
            return;
        };
        let Some(statement) = self.sink() else {
            return;
        };
        let start = statement.text.len();
        statement.text.push_str(&label);
        statement.ranges.push(InlineRange {
            kind: InlineRangeKind::Link { url },
            start,
            stop: statement.text.len() - 1,
        });
    }

    /// A tag stays part of the text and marks a range. It registers on
    /// the statement and the document in first-occurrence order.
    fn on_tag(&mut self, token: &Token, _ctx: NodeContext<'_>) {
        if self.error_depth > 0 {
            return;
        }
        let Some(tag) = tag_name(&token.text) else {
            return;
        };
        if !self.tags.iter().any(|t| t == &tag) {
            self.tags.push(tag.clone());
        }
        let Some(statement) = self.frames.last_mut().map(|frame| &mut frame.statement) else {
            return;
        };
        let start = statement.text.len();
        statement.text.push_str(&token.text);
        statement.ranges.push(InlineRange {
            kind: InlineRangeKind::Tag { tag: tag.clone() },
            start,
            stop: statement.text.len() - 1,
        });
        if !statement.tags.iter().any(|t| t == &tag) {
            statement.tags.push(tag);
        }
    }

    fn on_freestyle(&mut self, token: &Token, _ctx: NodeContext<'_>) {
        if let Some(statement) = self.sink() {
            statement.text.push_str(&token.text);
        }
    }

    fn on_unused_control_char(&mut self, token: &Token, _ctx: NodeContext<'_>) {
        if let Some(statement) = self.sink() {
            statement.text.push_str(&token.text);
        }
    }

    fn on_escaped_char(&mut self, token: &Token, _ctx: NodeContext<'_>) {
        if let Some(statement) = self.sink() {
            statement.text.push_str(&token.text);
        }
    }
}

/// Inner title of a definition token like `"[title]: "` or `"<title>: "`.
fn definition_title(text: &str, open: char, close: char) -> Option<String> {
    let text = text.trim_end().strip_suffix(':')?;
    let text = text.strip_prefix(open)?.strip_suffix(close)?;
    Some(text.to_string())
}

/// Inner title of a reference token like `"[title]"` or `"<title>"`.
fn reference_title(text: &str, open: char, close: char) -> Option<String> {
    let text = text.strip_prefix(open)?.strip_suffix(close)?;
    Some(text.to_string())
}

/// Inner title of a mention token like `"@[title]"` or `"@<title>"`.
fn mention_title(text: &str, open: char, close: char) -> Option<String> {
    reference_title(text.strip_prefix('@')?, open, close)
}

/// Tag name of a tag token, either `"#tag"` or `"#(tag name)"`.
fn tag_name(text: &str) -> Option<String> {
    let text = text.strip_prefix('#')?;
    match text.strip_prefix('(') {
        Some(inner) => inner.strip_suffix(')').map(str::to_string),
        None => Some(text.to_string()),
    }
}

/// Label and url of a link token `"[label](url)"`.
fn link_parts(text: &str) -> Option<(String, String)> {
    let inner = text.strip_prefix('[')?.strip_suffix(')')?;
    let (label, url) = inner.split_once("](")?;
    Some((label.to_string(), url.to_string()))
}

/// Dialectical relation types translate into their semantic counterparts
/// once both endpoints are reconstructed.
fn semantic_type(kind: RelationType) -> RelationType {
    match kind {
        RelationType::Support => RelationType::Entails,
        RelationType::Attack => RelationType::Contrary,
        other => other,
    }
}
