//! A minimal markup flavor built entirely out of public `litmark-engine`/
//! `litmark-directives` APIs: `*emphasis*`, `**strong**` spans and an
//! `@:note(title)` block directive. Exists to demonstrate the extension
//! surface end to end, not as a markup-flavor implementation in its own
//! right (full flavor grammars are out of scope).

use std::rc::Rc;

use litmark_ast::{Block, NodeOptions, Span};
use litmark_combinators::text::{delimited_by, literal, DelimitedByOptions, Delimiter};
use litmark_combinators::{CharSet, Parser};
use litmark_directives::{attribute, evaluate_block, string_converter, AttributeSelector, DirectiveSpec, RecursiveParser};
use litmark_engine::{DirectiveRegistry, EngineBuilder, ExtensionBundle, MarkupEngine, SpanParserBuilder};

/// `**text**` strong emphasis. Tried before `*text*` since both bundles
/// register on `*` and declaration order breaks the tie (§4.7).
fn strong_parser(handle: Rc<dyn RecursiveParser>) -> Parser<Span> {
    let open = Delimiter::new("**").prev_not(|c: char| c.is_alphanumeric()).build();
    let close = literal("**");
    let body = delimited_by(open, close, DelimitedByOptions { non_empty: true, ..Default::default() });
    body.map(move |inner| {
        let spans = handle.parse_spans(&inner).unwrap_or_else(|_| vec![Span::Text(inner.clone())]);
        Span::Strong(spans, NodeOptions::default())
    })
}

/// `*text*` emphasis, rejected when immediately preceded by an
/// alphanumeric character (§8 scenario 2's boundary rule).
fn emphasis_parser(handle: Rc<dyn RecursiveParser>) -> Parser<Span> {
    let open = Delimiter::new("*").prev_not(|c: char| c.is_alphanumeric()).build();
    let close = literal("*");
    let body = delimited_by(open, close, DelimitedByOptions { non_empty: true, ..Default::default() });
    body.map(move |inner| {
        let spans = handle.parse_spans(&inner).unwrap_or_else(|_| vec![Span::Text(inner.clone())]);
        Span::Emphasized(spans, NodeOptions::default())
    })
}

fn emphasis_span_parser(handle: Rc<dyn RecursiveParser>) -> Parser<Span> {
    strong_parser(handle.clone()).or(emphasis_parser(handle))
}

/// `@:note(title) body @:@` — a styled container holding its body parsed
/// as blocks through the recursive handle every invocation carries.
fn note_directive() -> DirectiveRegistry {
    DirectiveRegistry::new().with_block("note", Vec::new(), |invocation| {
        let decl = attribute::<String>(AttributeSelector::Positional(0), string_converter);
        let spec = DirectiveSpec::new("note", decl);
        let body_text = invocation.body_text.clone();
        let handle = invocation.recursive_parser.clone();
        evaluate_block(&spec, invocation, move |title, _cursor| {
            let body = handle
                .as_ref()
                .map(|h| h.parse_blocks(body_text.trim()).unwrap_or_default())
                .unwrap_or_default();
            let mut children = vec![Block::Header(4, vec![Span::Text(title)], NodeOptions::default())];
            children.extend(body);
            Block::BlockSequence(children, NodeOptions::new().with_style("note"))
        })
    })
}

pub fn markdown_lite_bundle() -> ExtensionBundle {
    ExtensionBundle::new("markdown-lite")
        .with_span_parser(SpanParserBuilder::new(CharSet::single('*'), emphasis_span_parser))
        .with_directives(note_directive())
}

pub fn build_engine() -> Rc<MarkupEngine> {
    EngineBuilder::new().with_bundle(markdown_lite_bundle()).build()
}
