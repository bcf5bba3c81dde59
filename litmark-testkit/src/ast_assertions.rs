//! A fluent AST assertion API, grounded on the teacher's `assert_ast`
//! pattern (`lex-parser/src/lex/testing/ast_assertions.rs`): assertions
//! read by node kind rather than by matching on the enum directly at every
//! call site, so a shape change only needs updating here.

use litmark_ast::{Block, Span};

pub fn assert_block(block: &Block) -> BlockAssert<'_> {
    BlockAssert(block)
}

pub struct BlockAssert<'a>(&'a Block);

impl<'a> BlockAssert<'a> {
    pub fn node(&self) -> &'a Block {
        self.0
    }

    pub fn assert_paragraph(&self) -> &'a [Span] {
        match self.0 {
            Block::Paragraph(spans, _) => spans,
            other => panic!("expected Paragraph, got {other:?}"),
        }
    }

    pub fn assert_header(&self, level: u8) -> &'a [Span] {
        match self.0 {
            Block::Header(found, spans, _) => {
                assert_eq!(*found, level, "header level mismatch");
                spans
            }
            other => panic!("expected Header({level}), got {other:?}"),
        }
    }

    pub fn assert_block_sequence(&self) -> ChildrenAssert<'a> {
        match self.0 {
            Block::BlockSequence(children, _) => ChildrenAssert(children),
            other => panic!("expected BlockSequence, got {other:?}"),
        }
    }

    pub fn assert_invalid(&self) -> &'a str {
        match self.0 {
            Block::InvalidBlock(message, _) => message,
            other => panic!("expected InvalidBlock, got {other:?}"),
        }
    }

    pub fn has_style(self, style: &str) -> Self {
        let options = self.0.options().unwrap_or_else(|| panic!("{:?} carries no NodeOptions", self.0));
        assert!(options.styles.contains(style), "expected style {style:?} on {:?}", self.0);
        self
    }
}

pub struct ChildrenAssert<'a>(&'a [Block]);

impl<'a> ChildrenAssert<'a> {
    pub fn child_count(self, expected: usize) -> Self {
        assert_eq!(self.0.len(), expected, "child count mismatch");
        self
    }

    pub fn child(self, index: usize, check: impl FnOnce(BlockAssert<'a>)) -> Self {
        let child = self.0.get(index).unwrap_or_else(|| panic!("no child at index {index}"));
        check(BlockAssert(child));
        self
    }
}

pub fn assert_span(span: &Span) -> SpanAssert<'_> {
    SpanAssert(span)
}

pub struct SpanAssert<'a>(&'a Span);

impl<'a> SpanAssert<'a> {
    pub fn assert_text(&self) -> &'a str {
        match self.0 {
            Span::Text(text) => text,
            other => panic!("expected Text, got {other:?}"),
        }
    }

    pub fn assert_emphasized(&self) -> &'a [Span] {
        match self.0 {
            Span::Emphasized(children, _) => children,
            other => panic!("expected Emphasized, got {other:?}"),
        }
    }

    pub fn assert_strong(&self) -> &'a [Span] {
        match self.0 {
            Span::Strong(children, _) => children,
            other => panic!("expected Strong, got {other:?}"),
        }
    }

    pub fn assert_invalid(&self) -> &'a str {
        match self.0 {
            Span::InvalidSpan(message, _) => message,
            other => panic!("expected InvalidSpan, got {other:?}"),
        }
    }
}
