//! The two-phase markup engine (§4.4): an immutable pair of block/span
//! dispatch tables, consulted by the block and span passes.

use std::rc::Rc;

use litmark_ast::{Block, NodeOptions, Span};
use litmark_combinators::{text, InputContext, ParseResult, PrefixDispatch, VirtualPath};
use litmark_directives::RecursiveParser;
use log::warn;
use once_cell::unsync::OnceCell;

use crate::bundle::RewriteHook;

pub(crate) struct Tables {
    pub(crate) blocks: PrefixDispatch<Block>,
    pub(crate) spans: PrefixDispatch<Span>,
    pub(crate) pre_process_hooks: Vec<Rc<dyn Fn(String) -> String>>,
    pub(crate) post_process_hooks: Vec<Rc<dyn Fn(Vec<Block>) -> Vec<Block>>>,
    pub(crate) rewrite_rules: Vec<RewriteHook>,
}

/// The built parser: an immutable pair of block/span dispatch tables plus
/// the root-level pre/post-processing hooks contributed by its bundles.
///
/// Implements [`RecursiveParser`] itself, delegating to its own tables —
/// this is how a block or span parser built from a bundle can recurse into
/// nested content. Each parser closure closes over a clone of this struct's
/// `Rc` at build time, even though the tables it will eventually delegate
/// to don't exist yet (they're assembled *from* those same parsers). A
/// `OnceCell` resolves the circularity: [`crate::builder::EngineBuilder`]
/// builds an empty engine first, builds every bundle's parsers against a
/// handle to it, assembles the dispatch tables from the results, and only
/// then fills the cell in — by which point the handles already handed out
/// to those parsers see a fully initialized engine on every subsequent
/// call.
pub struct MarkupEngine {
    pub(crate) tables: OnceCell<Tables>,
}

impl MarkupEngine {
    pub(crate) fn new() -> Self {
        MarkupEngine { tables: OnceCell::new() }
    }

    fn tables(&self) -> &Tables {
        self.tables
            .get()
            .expect("MarkupEngine used before EngineBuilder::build finished assembling it")
    }

    /// Runs the preprocessing hooks (line-ending normalization first, then
    /// whatever bundles contributed) and parses the result into a flat
    /// block sequence (§4.4 "Block pass").
    pub fn parse_document(&self, source: &str) -> Vec<Block> {
        let normalized = self.preprocess(source);
        let ctx = InputContext::new(normalized, VirtualPath::root());
        let blocks = self.parse_blocks_from(&ctx);
        self.postprocess(blocks)
    }

    /// The rewrite hooks contributed by every bundle this engine was built
    /// from, in declaration order — consumed by `litmark-rewrite`'s driver,
    /// which owns the tree traversal and cross-document resolution this
    /// crate has no model of.
    pub fn rewrite_rules(&self) -> &[RewriteHook] {
        &self.tables().rewrite_rules
    }

    /// Parses `source` as a standalone run of spans (§4.4 "Span pass"),
    /// without the block pass or root hooks — used both for top-level
    /// paragraph contents and by directive bodies that ask for span parsing.
    pub fn parse_spans(&self, source: &str) -> Vec<Span> {
        let ctx = InputContext::new(source.to_string(), VirtualPath::root());
        self.parse_spans_from(&ctx)
    }

    fn preprocess(&self, source: &str) -> String {
        let mut text = normalize_line_endings(source);
        for hook in &self.tables().pre_process_hooks {
            text = hook(text);
        }
        text
    }

    fn postprocess(&self, mut blocks: Vec<Block>) -> Vec<Block> {
        for hook in &self.tables().post_process_hooks {
            blocks = hook(blocks);
        }
        blocks
    }

    fn parse_blocks_from(&self, ctx: &InputContext) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut cursor = skip_blank_lines(ctx);
        while !cursor.is_at_end() {
            let (block, next) = self.parse_one_block(&cursor);
            if next.offset() == cursor.offset() {
                warn!(
                    "block parser made no progress at {}; skipping one line",
                    cursor.locate(cursor.offset())
                );
                let (_, after) =
                    text::rest_of_line().parse(&cursor).expect_success("cursor is not at end");
                cursor = skip_blank_lines(&after);
                continue;
            }
            blocks.push(block);
            cursor = skip_blank_lines(&next);
        }
        blocks
    }

    /// Boundary between the dispatch table and the paragraph fallback
    /// (§4.4): a registered block parser that matches wins outright; a
    /// registered parser that starts but fails internally surfaces as
    /// whatever it returned (typically an `InvalidBlock` from a directive),
    /// not as a silent fall-through. Only "no candidate applies at all"
    /// reaches the paragraph slicer.
    fn parse_one_block(&self, ctx: &InputContext) -> (Block, InputContext) {
        match self.tables().blocks.dispatch(ctx) {
            Some(ParseResult::Success { value, next }) => (value, next),
            Some(ParseResult::Failure { .. }) | None => self.parse_paragraph(ctx),
        }
    }

    fn parse_paragraph(&self, ctx: &InputContext) -> (Block, InputContext) {
        let non_blank_line = text::one_not("\n").map(|_| ()).lookahead();
        let slicer = text::block(non_blank_line.clone(), non_blank_line, None);
        let (raw, next) = slicer
            .parse(ctx)
            .expect_success("the caller only reaches here on a confirmed non-blank line");
        // The block's trailing line terminator is just a boundary marker,
        // not paragraph content.
        let trimmed = raw.strip_suffix('\n').unwrap_or(&raw).to_string();
        let inner_ctx = InputContext::new(trimmed, ctx.path().clone());
        let spans = self.parse_spans_from(&inner_ctx);
        (Block::Paragraph(spans, NodeOptions::default()), next)
    }

    fn parse_spans_from(&self, ctx: &InputContext) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut cursor = ctx.clone();
        let mut pending_text = String::new();
        while !cursor.is_at_end() {
            match self.tables().spans.dispatch(&cursor) {
                Some(ParseResult::Success { value, next }) => {
                    flush_pending_text(&mut pending_text, &mut spans);
                    spans.push(value);
                    cursor = next;
                }
                Some(ParseResult::Failure { .. }) | None => {
                    let ch = cursor.peek_char().expect("cursor is not at end");
                    pending_text.push(ch);
                    cursor = cursor.advance_char().expect("cursor is not at end");
                }
            }
        }
        flush_pending_text(&mut pending_text, &mut spans);
        spans
    }
}

fn flush_pending_text(pending: &mut String, spans: &mut Vec<Span>) {
    if !pending.is_empty() {
        spans.push(Span::Text(std::mem::take(pending)));
    }
}

fn skip_blank_lines(ctx: &InputContext) -> InputContext {
    let blank = text::blank_line();
    let mut cursor = ctx.clone();
    loop {
        match blank.parse(&cursor) {
            ParseResult::Success { next, .. } if next.offset() > cursor.offset() => cursor = next,
            _ => break,
        }
    }
    cursor
}

fn normalize_line_endings(source: &str) -> String {
    source.replace("\r\n", "\n").replace('\r', "\n")
}

impl RecursiveParser for MarkupEngine {
    fn parse_blocks(&self, source: &str) -> Result<Vec<Block>, String> {
        Ok(MarkupEngine::parse_document(self, source))
    }

    fn parse_spans(&self, source: &str) -> Result<Vec<Span>, String> {
        Ok(MarkupEngine::parse_spans(self, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_line_endings_handles_both_styles() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn skip_blank_lines_stops_at_first_non_blank() {
        let ctx = InputContext::new("   \n\nfoo", VirtualPath::root());
        let after = skip_blank_lines(&ctx);
        assert_eq!(after.remaining(), "foo");
    }
}
