//! Integration coverage for §8 scenarios 1 and 2: a span parser prefix
//! optimization and a delimiter boundary rule, both exercised through a
//! minimal `*emphasis*` extension registered via `ExtensionBundle`.

use std::cell::Cell;
use std::rc::Rc;

use litmark_ast::{NodeOptions, Span};
use litmark_combinators::text::{delimited_by, literal, Delimiter, DelimitedByOptions};
use litmark_combinators::{CharSet, Parser};
use litmark_directives::RecursiveParser;
use litmark_engine::{EngineBuilder, ExtensionBundle, SpanParserBuilder};

/// `*text*` emphasis, rejected when the opening `*` is immediately
/// preceded by an alphanumeric character (§8 scenario 2's boundary rule).
fn emphasis_parser(handle: Rc<dyn RecursiveParser>) -> Parser<Span> {
    let open = Delimiter::new("*").prev_not(|c: char| c.is_alphanumeric()).build();
    let close = literal("*");
    let body = delimited_by(open, close, DelimitedByOptions { non_empty: true, ..Default::default() });
    body.map(move |inner| {
        let spans = handle.parse_spans(&inner).unwrap_or_else(|_| vec![Span::Text(inner.clone())]);
        Span::Emphasized(spans, NodeOptions::default())
    })
}

fn emphasis_bundle(invocation_count: Rc<Cell<usize>>) -> ExtensionBundle {
    ExtensionBundle::new("emphasis demo").with_span_parser(SpanParserBuilder::new(
        CharSet::single('*'),
        move |handle| {
            let invocation_count = invocation_count.clone();
            let inner = emphasis_parser(handle);
            Parser::new(move |ctx| {
                invocation_count.set(invocation_count.get() + 1);
                inner.parse(ctx)
            })
        },
    ))
}

#[test]
fn span_parser_is_not_invoked_off_its_prefix() {
    let invocation_count = Rc::new(Cell::new(0));
    let engine = EngineBuilder::new().with_bundle(emphasis_bundle(invocation_count.clone())).build();

    let blocks = engine.parse_document("this *is* bold");
    assert_eq!(blocks.len(), 1);
    let spans = blocks[0].spans();
    assert_eq!(spans.len(), 3);
    match &spans[0] {
        Span::Text(text) => assert_eq!(text, "this "),
        other => panic!("expected leading Text, got {other:?}"),
    }
    match &spans[1] {
        Span::Emphasized(children, _) => match &children[0] {
            Span::Text(text) => assert_eq!(text, "is"),
            other => panic!("expected Text inside Emphasized, got {other:?}"),
        },
        other => panic!("expected Emphasized, got {other:?}"),
    }
    match &spans[2] {
        Span::Text(text) => assert_eq!(text, " bold"),
        other => panic!("expected trailing Text, got {other:?}"),
    }

    // The dispatch table routes past every one of the 12 non-'*'
    // characters without invoking the emphasis parser at all; it is only
    // ever called once, for the single position where `*is*` opens.
    assert_eq!(invocation_count.get(), 1);
}

#[test]
fn delimiter_preceded_by_a_letter_does_not_open_emphasis() {
    let invocation_count = Rc::new(Cell::new(0));
    let engine = EngineBuilder::new().with_bundle(emphasis_bundle(invocation_count)).build();

    let blocks = engine.parse_document("a*b*c");
    assert_eq!(blocks.len(), 1);
    let spans = blocks[0].spans();
    assert_eq!(spans.len(), 1);
    match &spans[0] {
        Span::Text(text) => assert_eq!(text, "a*b*c"),
        other => panic!("expected a single Text span, got {other:?}"),
    }
}

#[test]
fn paragraph_fallback_handles_plain_text_with_no_bundles() {
    let engine = EngineBuilder::new().build();
    let blocks = engine.parse_document("hello\nworld\n\nsecond paragraph\n");
    assert_eq!(blocks.len(), 2);
    match &blocks[0] {
        litmark_ast::Block::Paragraph(spans, _) => match &spans[0] {
            Span::Text(text) => assert_eq!(text, "hello\nworld"),
            other => panic!("expected Text, got {other:?}"),
        },
        other => panic!("expected Paragraph, got {other:?}"),
    }
    match &blocks[1] {
        litmark_ast::Block::Paragraph(spans, _) => match &spans[0] {
            Span::Text(text) => assert_eq!(text, "second paragraph"),
            other => panic!("expected Text, got {other:?}"),
        },
        other => panic!("expected Paragraph, got {other:?}"),
    }
}
