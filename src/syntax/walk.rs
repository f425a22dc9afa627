//! Depth-first tree walker
//!
//! [`walk`] drives a [`SyntaxVisitor`] over a parsed tree: one `enter_*`
//! call when a node is reached, its children in source order, then the
//! matching `exit_*` call. Leaf tokens that carry content get their own
//! hooks. Dispatch is a static match on [`SyntaxKind`]; every callback
//! defaults to a no-op so visitors implement only what they need.

use crate::parser::{SyntaxElement, SyntaxKind, SyntaxNode, Token};

/// Where the visited element sits in the tree: its parent node (if any)
/// and its index among the parent's children.
///
/// Exit calls receive the same context as the matching enter call.
#[derive(Debug, Clone, Copy)]
pub struct NodeContext<'a> {
    pub parent: Option<&'a SyntaxNode>,
    pub index: usize,
}

impl<'a> NodeContext<'a> {
    /// The sibling element `back` positions before this one.
    pub fn preceding_sibling(&self, back: usize) -> Option<&'a SyntaxElement> {
        let parent = self.parent?;
        let index = self.index.checked_sub(back)?;
        parent.children.get(index)
    }
}

macro_rules! define_visitor {
    ($( $kind:ident => $enter:ident, $exit:ident; )*) => {
        /// Per-kind callbacks for [`walk`]. All methods default to no-ops.
        #[allow(unused_variables)]
        pub trait SyntaxVisitor {
            $(
                fn $enter(&mut self, node: &SyntaxNode, ctx: NodeContext<'_>) {}
                fn $exit(&mut self, node: &SyntaxNode, ctx: NodeContext<'_>) {}
            )*

            fn on_statement_definition(&mut self, token: &Token, ctx: NodeContext<'_>) {}
            fn on_statement_reference(&mut self, token: &Token, ctx: NodeContext<'_>) {}
            fn on_statement_mention(&mut self, token: &Token, ctx: NodeContext<'_>) {}
            fn on_argument_mention(&mut self, token: &Token, ctx: NodeContext<'_>) {}
            fn on_link(&mut self, token: &Token, ctx: NodeContext<'_>) {}
            fn on_tag(&mut self, token: &Token, ctx: NodeContext<'_>) {}
            fn on_freestyle(&mut self, token: &Token, ctx: NodeContext<'_>) {}
            fn on_unused_control_char(&mut self, token: &Token, ctx: NodeContext<'_>) {}
            fn on_escaped_char(&mut self, token: &Token, ctx: NodeContext<'_>) {}
        }

        fn dispatch_enter<V: SyntaxVisitor + ?Sized>(
            visitor: &mut V,
            node: &SyntaxNode,
            ctx: NodeContext<'_>,
        ) {
            match node.kind {
                $( SyntaxKind::$kind => visitor.$enter(node, ctx), )*
                _ => {}
            }
        }

        fn dispatch_exit<V: SyntaxVisitor + ?Sized>(
            visitor: &mut V,
            node: &SyntaxNode,
            ctx: NodeContext<'_>,
        ) {
            match node.kind {
                $( SyntaxKind::$kind => visitor.$exit(node, ctx), )*
                _ => {}
            }
        }
    };
}

define_visitor! {
    DOCUMENT => enter_document, exit_document;
    HEADING => enter_heading, exit_heading;
    STATEMENT => enter_statement, exit_statement;
    STATEMENT_CONTENT => enter_statement_content, exit_statement_content;
    FREESTYLE_TEXT => enter_freestyle_text, exit_freestyle_text;
    BOLD => enter_bold, exit_bold;
    ITALIC => enter_italic, exit_italic;
    RELATIONS => enter_relations, exit_relations;
    INCOMING_SUPPORT => enter_incoming_support, exit_incoming_support;
    INCOMING_ATTACK => enter_incoming_attack, exit_incoming_attack;
    INCOMING_UNDERCUT => enter_incoming_undercut, exit_incoming_undercut;
    OUTGOING_SUPPORT => enter_outgoing_support, exit_outgoing_support;
    OUTGOING_ATTACK => enter_outgoing_attack, exit_outgoing_attack;
    OUTGOING_UNDERCUT => enter_outgoing_undercut, exit_outgoing_undercut;
    CONTRADICTION => enter_contradiction, exit_contradiction;
    ARGUMENT => enter_argument, exit_argument;
    ARGUMENT_STATEMENT => enter_argument_statement, exit_argument_statement;
    INFERENCE => enter_inference, exit_inference;
    INFERENCE_RULES => enter_inference_rules, exit_inference_rules;
    METADATA => enter_metadata, exit_metadata;
    METADATA_STATEMENT => enter_metadata_statement, exit_metadata_statement;
    ARGUMENT_DEFINITION_ELEMENT => enter_argument_definition_element, exit_argument_definition_element;
    ARGUMENT_REFERENCE_ELEMENT => enter_argument_reference_element, exit_argument_reference_element;
    ORDERED_LIST => enter_ordered_list, exit_ordered_list;
    UNORDERED_LIST => enter_unordered_list, exit_unordered_list;
    ORDERED_LIST_ITEM => enter_ordered_list_item, exit_ordered_list_item;
    UNORDERED_LIST_ITEM => enter_unordered_list_item, exit_unordered_list_item;
    ERROR => enter_error, exit_error;
}

fn dispatch_token<V: SyntaxVisitor + ?Sized>(visitor: &mut V, token: &Token, ctx: NodeContext<'_>) {
    match token.kind {
        SyntaxKind::STATEMENT_DEFINITION => visitor.on_statement_definition(token, ctx),
        SyntaxKind::STATEMENT_REFERENCE => visitor.on_statement_reference(token, ctx),
        SyntaxKind::STATEMENT_MENTION => visitor.on_statement_mention(token, ctx),
        SyntaxKind::ARGUMENT_MENTION => visitor.on_argument_mention(token, ctx),
        SyntaxKind::LINK => visitor.on_link(token, ctx),
        SyntaxKind::TAG => visitor.on_tag(token, ctx),
        SyntaxKind::FREESTYLE => visitor.on_freestyle(token, ctx),
        SyntaxKind::UNUSED_CONTROL_CHAR => visitor.on_unused_control_char(token, ctx),
        SyntaxKind::ESCAPED_CHAR => visitor.on_escaped_char(token, ctx),
        _ => {}
    }
}

/// Walk the whole tree rooted at `root`.
pub fn walk<V: SyntaxVisitor + ?Sized>(visitor: &mut V, root: &SyntaxNode) {
    walk_node(
        visitor,
        root,
        NodeContext {
            parent: None,
            index: 0,
        },
    );
}

fn walk_node<V: SyntaxVisitor + ?Sized>(visitor: &mut V, node: &SyntaxNode, ctx: NodeContext<'_>) {
    dispatch_enter(visitor, node, ctx);
    for (index, child) in node.children.iter().enumerate() {
        let child_ctx = NodeContext {
            parent: Some(node),
            index,
        };
        match child {
            SyntaxElement::Node(n) => walk_node(visitor, n, child_ctx),
            SyntaxElement::Token(t) => dispatch_token(visitor, t, child_ctx),
        }
    }
    dispatch_exit(visitor, node, ctx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl SyntaxVisitor for Recorder {
        fn enter_statement(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
            self.events.push("enter statement".into());
        }
        fn exit_statement(&mut self, _node: &SyntaxNode, _ctx: NodeContext<'_>) {
            self.events.push("exit statement".into());
        }
        fn on_freestyle(&mut self, token: &Token, _ctx: NodeContext<'_>) {
            self.events.push(format!("freestyle {:?}", token.text));
        }
    }

    #[test]
    fn test_enter_before_tokens_before_exit() {
        let parse = parse("hello world");
        let mut recorder = Recorder::default();
        walk(&mut recorder, &parse.root);
        assert_eq!(
            recorder.events,
            vec![
                "enter statement".to_string(),
                "freestyle \"hello world\"".to_string(),
                "exit statement".to_string(),
            ]
        );
    }

    #[test]
    fn test_context_carries_parent_and_index() {
        struct Check {
            seen: bool,
        }
        impl SyntaxVisitor for Check {
            fn enter_relations(&mut self, _node: &SyntaxNode, ctx: NodeContext<'_>) {
                let parent = ctx.parent.map(|p| p.kind);
                assert_eq!(parent, Some(SyntaxKind::STATEMENT));
                assert!(ctx.index > 0);
                self.seen = true;
            }
        }
        let parse = parse("[A]: a\n  + [B]");
        let mut check = Check { seen: false };
        walk(&mut check, &parse.root);
        assert!(check.seen);
    }

    #[test]
    fn test_exit_runs_after_nested_children() {
        #[derive(Default)]
        struct Depth {
            events: Vec<(String, usize)>,
            depth: usize,
        }
        impl SyntaxVisitor for Depth {
            fn enter_statement(&mut self, _n: &SyntaxNode, _c: NodeContext<'_>) {
                self.depth += 1;
                self.events.push(("enter".into(), self.depth));
            }
            fn exit_statement(&mut self, _n: &SyntaxNode, _c: NodeContext<'_>) {
                self.events.push(("exit".into(), self.depth));
                self.depth -= 1;
            }
        }
        let parse = parse("[A]: a\n  + [B]: b");
        let mut v = Depth::default();
        walk(&mut v, &parse.root);
        assert_eq!(
            v.events,
            vec![
                ("enter".into(), 1),
                ("enter".into(), 2),
                ("exit".into(), 2),
                ("exit".into(), 1),
            ]
        );
    }
}
