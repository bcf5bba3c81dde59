//! Assembles extension bundles into an immutable [`MarkupEngine`] (§4.7).

use std::rc::Rc;

use litmark_ast::{Block, Span};
use litmark_combinators::{CharSet, InputContext, ParseResult, Parser, PrefixDispatch, PrefixedParser, SourceFragment};
use litmark_directives::{capture_body, parse_header, DirectiveFailure, Invocation, RecursiveParser};
use log::debug;

use crate::bundle::{DirectiveRegistry, ExtensionBundle};
use crate::engine::{MarkupEngine, Tables};

/// Accumulates extension bundles, then builds the engine they describe.
///
/// Bundles are collected first and the engine is built once at the end —
/// "avoid a global registry" (§4.7): nothing about parsing depends on
/// mutable, ambient state, only on the immutable `Rc<MarkupEngine>` handed
/// back by [`EngineBuilder::build`].
#[derive(Default)]
pub struct EngineBuilder {
    bundles: Vec<ExtensionBundle>,
    strict: bool,
}

impl EngineBuilder {
    pub fn new() -> Self {
        EngineBuilder { bundles: Vec::new(), strict: false }
    }

    /// Only bundles with `use_in_strict` set are included in the build.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn with_bundle(mut self, bundle: ExtensionBundle) -> Self {
        self.bundles.push(bundle);
        self
    }

    pub fn build(self) -> Rc<MarkupEngine> {
        let engine = Rc::new(MarkupEngine::new());

        let mut block_entries: Vec<PrefixedParser<Block>> = Vec::new();
        let mut low_precedence_block: Vec<PrefixedParser<Block>> = Vec::new();
        let mut span_entries: Vec<PrefixedParser<Span>> = Vec::new();
        let mut low_precedence_span: Vec<PrefixedParser<Span>> = Vec::new();
        let mut pre_hooks = Vec::new();
        let mut post_hooks = Vec::new();
        let mut rewrite_rules = Vec::new();

        for bundle in &self.bundles {
            if self.strict && !bundle.use_in_strict {
                debug!("skipping bundle '{}' (excluded from strict mode)", bundle.description);
                continue;
            }

            let handle: Rc<dyn RecursiveParser> = engine.clone();
            for parser in &bundle.block_parsers {
                let built = PrefixedParser::new(parser.starts.clone(), (parser.build)(handle.clone()));
                if parser.low_precedence {
                    low_precedence_block.push(built);
                } else {
                    block_entries.push(built);
                }
            }
            for parser in &bundle.span_parsers {
                let built = PrefixedParser::new(parser.starts.clone(), (parser.build)(handle.clone()));
                if parser.low_precedence {
                    low_precedence_span.push(built);
                } else {
                    span_entries.push(built);
                }
            }
            if let Some(entry) = directive_block_entry(&bundle.directives, handle.clone()) {
                block_entries.push(entry);
            }
            if let Some(entry) = directive_span_entry(&bundle.directives, handle.clone()) {
                span_entries.push(entry);
            }
            if let Some(hook) = bundle.root_hooks.pre_process_input.clone() {
                pre_hooks.push(hook);
            }
            if let Some(hook) = bundle.root_hooks.post_process_document.clone() {
                post_hooks.push(hook);
            }
            rewrite_rules.extend(bundle.rewrite_rules.iter().cloned());
        }

        // "Extensions win over host by default" (§4.7): low-precedence
        // entries are appended last, so `PrefixDispatch` only reaches them
        // once every normal-precedence candidate for that start character
        // has already failed.
        block_entries.extend(low_precedence_block);
        span_entries.extend(low_precedence_span);

        let tables = Tables {
            blocks: PrefixDispatch::build(block_entries),
            spans: PrefixDispatch::build(span_entries),
            pre_process_hooks: pre_hooks,
            post_process_hooks: post_hooks,
            rewrite_rules,
        };
        engine
            .tables
            .set(tables)
            .unwrap_or_else(|_| panic!("EngineBuilder::build ran its assembly step twice"));
        engine
    }
}

/// Wraps a bundle's block directive registrations into a single dispatch
/// entry keyed on `@`: one entry per bundle (not per directive name) since
/// every directive invocation shares the same `@:name(...)` header syntax
/// and only the name lookup inside distinguishes them.
fn directive_block_entry(
    directives: &DirectiveRegistry,
    handle: Rc<dyn RecursiveParser>,
) -> Option<PrefixedParser<Block>> {
    if directives.block.is_empty() {
        return None;
    }
    let handlers = directives.block.clone();
    let parser = Parser::new(move |ctx: &InputContext| {
        let Some((header, after_header)) = parse_header(ctx) else {
            return ParseResult::failure("expected a directive invocation", ctx.clone());
        };
        let (body_text, after_body) = capture_body(&after_header, header.fence.as_deref());
        let source = SourceFragment {
            path: ctx.path().clone(),
            start: ctx.locate(ctx.offset()),
            end: ctx.locate(after_body.offset()),
            text: ctx.slice(ctx.offset(), after_body.offset()).to_string(),
        };
        // The start marker matched, so an unrecognized name is a directive
        // that starts but fails internally (§4.4), not "no candidate
        // applies": it surfaces its own `InvalidBlock` rather than letting
        // `parse_one_block` fall back to paragraph parsing.
        let Some(handler) = handlers.get(&header.name) else {
            let message = DirectiveFailure::UnknownDirective { name: header.name.clone() }.to_string();
            return ParseResult::success(Block::InvalidBlock(message, source), after_body);
        };
        let invocation = Invocation {
            name: header.name.clone(),
            positional: header.positional.clone(),
            named: header.named.clone(),
            body_text,
            source,
            recursive_parser: Some(handle.clone()),
        };
        ParseResult::success(handler(&invocation), after_body)
    });
    Some(PrefixedParser::new(CharSet::single('@'), parser))
}

/// Span counterpart of [`directive_block_entry`].
fn directive_span_entry(
    directives: &DirectiveRegistry,
    handle: Rc<dyn RecursiveParser>,
) -> Option<PrefixedParser<Span>> {
    if directives.span.is_empty() {
        return None;
    }
    let handlers = directives.span.clone();
    let parser = Parser::new(move |ctx: &InputContext| {
        let Some((header, after_header)) = parse_header(ctx) else {
            return ParseResult::failure("expected a directive invocation", ctx.clone());
        };
        let (body_text, after_body) = capture_body(&after_header, header.fence.as_deref());
        let source = SourceFragment {
            path: ctx.path().clone(),
            start: ctx.locate(ctx.offset()),
            end: ctx.locate(after_body.offset()),
            text: ctx.slice(ctx.offset(), after_body.offset()).to_string(),
        };
        let Some(handler) = handlers.get(&header.name) else {
            let message = DirectiveFailure::UnknownDirective { name: header.name.clone() }.to_string();
            return ParseResult::success(Span::InvalidSpan(message, source), after_body);
        };
        let invocation = Invocation {
            name: header.name.clone(),
            positional: header.positional.clone(),
            named: header.named.clone(),
            body_text,
            source,
            recursive_parser: Some(handle.clone()),
        };
        ParseResult::success(handler(&invocation), after_body)
    });
    Some(PrefixedParser::new(CharSet::single('@'), parser))
}
