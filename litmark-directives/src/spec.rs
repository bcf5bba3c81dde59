//! Ties a [`DirectiveDecl`] to a build function and runs it against a
//! recognized invocation (§4.5 "Execution").

use std::cell::RefCell;
use std::rc::Rc;

use litmark_ast::{Block, DeferredBlock, DeferredSpan, DocumentCursor, Phase, Span};

use crate::decl::{DirectiveDecl, Invocation};
use crate::error::DirectiveFailure;

/// A directive declaration plus whether it requested `cursor()` — the
/// build function's `Option<&dyn DocumentCursor>` argument is `None` until
/// a cursor was actually requested and the rewrite driver supplies one.
pub struct DirectiveSpec<T> {
    pub name: String,
    pub decl: DirectiveDecl<T>,
    pub wants_cursor: bool,
    pub phase: Phase,
}

impl<T> DirectiveSpec<T> {
    pub fn new(name: impl Into<String>, decl: DirectiveDecl<T>) -> Self {
        DirectiveSpec { name: name.into(), decl, wants_cursor: false, phase: Phase::Build }
    }

    pub fn with_cursor(mut self, phase: Phase) -> Self {
        self.wants_cursor = true;
        self.phase = phase;
        self
    }
}

/// Runs `spec` against `invocation`, producing either the built block or an
/// `InvalidBlock` carrying the accumulated composite error message (§4.5
/// items 3–4).
pub fn evaluate_block<T: 'static>(
    spec: &DirectiveSpec<T>,
    invocation: &Invocation,
    build: impl Fn(T, Option<&dyn DocumentCursor>) -> Block + 'static,
) -> Block {
    let mut errors = Vec::new();
    let parsed = spec.decl.run(invocation, &mut errors);
    if !errors.is_empty() {
        let message = DirectiveFailure::Composite { name: spec.name.clone(), messages: errors }.to_string();
        return Block::InvalidBlock(message, invocation.source.clone());
    }
    let parsed = parsed.expect("no accumulated errors implies a successfully parsed value");

    if !spec.wants_cursor {
        return build(parsed, None);
    }

    let cell = Rc::new(RefCell::new(Some(parsed)));
    let build = Rc::new(build);
    Block::Deferred(DeferredBlock {
        source: invocation.source.clone(),
        descriptor: spec.name.clone(),
        phase: spec.phase.clone(),
        resolve: Rc::new(move |cursor| {
            let value = cell.borrow_mut().take().expect("deferred directive resolved more than once");
            build(value, Some(cursor))
        }),
    })
}

/// Span counterpart of [`evaluate_block`].
pub fn evaluate_span<T: 'static>(
    spec: &DirectiveSpec<T>,
    invocation: &Invocation,
    build: impl Fn(T, Option<&dyn DocumentCursor>) -> Span + 'static,
) -> Span {
    let mut errors = Vec::new();
    let parsed = spec.decl.run(invocation, &mut errors);
    if !errors.is_empty() {
        let message = DirectiveFailure::Composite { name: spec.name.clone(), messages: errors }.to_string();
        return Span::InvalidSpan(message, invocation.source.clone());
    }
    let parsed = parsed.expect("no accumulated errors implies a successfully parsed value");

    if !spec.wants_cursor {
        return build(parsed, None);
    }

    let cell = Rc::new(RefCell::new(Some(parsed)));
    let build = Rc::new(build);
    Span::Deferred(DeferredSpan {
        source: invocation.source.clone(),
        descriptor: spec.name.clone(),
        phase: spec.phase.clone(),
        resolve: Rc::new(move |cursor| {
            let value = cell.borrow_mut().take().expect("deferred directive resolved more than once");
            build(value, Some(cursor))
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{attribute, bool_converter, int_converter, string_converter, AttributeSelector};
    use litmark_ast::NodeOptions;
    use litmark_combinators::{Position, SourceFragment, VirtualPath};

    fn invocation(positional: Vec<&str>, named: &[(&str, &str)]) -> Invocation {
        use std::collections::HashMap;
        Invocation {
            name: "dir".to_string(),
            positional: positional.into_iter().map(str::to_string).collect(),
            named: named.iter().map(|(k, v): &(&str, &str)| (k.to_string(), v.to_string())).collect::<HashMap<_, _>>(),
            body_text: "1 2\n".to_string(),
            source: SourceFragment { path: VirtualPath::root(), start: Position::default(), end: Position::default(), text: "@:dir(foo, 4)".to_string() },
            recursive_parser: None,
        }
    }

    #[test]
    fn missing_required_attribute_produces_invalid_block_with_composite_message() {
        let decl = attribute::<String>(AttributeSelector::Positional(0), string_converter)
            .seq(&attribute::<i64>(AttributeSelector::Positional(1), int_converter));
        let spec = DirectiveSpec::new("dir", decl);
        let result = evaluate_block(&spec, &invocation(vec!["foo"], &[]), |_value, _cursor| {
            Block::Paragraph(vec![], NodeOptions::default())
        });
        match result {
            Block::InvalidBlock(message, _) => {
                assert_eq!(message, "One or more errors processing directive 'dir': missing required attribute at position 1");
            }
            other => panic!("expected InvalidBlock, got {other:?}"),
        }
    }

    #[test]
    fn successful_directive_without_cursor_builds_immediately() {
        let decl = attribute::<bool>(AttributeSelector::Named("flag".to_string()), bool_converter);
        let spec = DirectiveSpec::new("dir", decl);
        let result = evaluate_block(&spec, &invocation(vec![], &[("flag", "true")]), |flag, _cursor| {
            Block::CodeBlock(None, flag.to_string(), NodeOptions::default())
        });
        match result {
            Block::CodeBlock(_, text, _) => assert_eq!(text, "true"),
            other => panic!("expected CodeBlock, got {other:?}"),
        }
    }
}
