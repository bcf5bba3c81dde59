//! The `Block` sealed hierarchy (§3): top-level rectangular regions of
//! markup.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use litmark_combinators::SourceFragment;

use crate::options::NodeOptions;
use crate::resolver::DeferredBlock;
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

#[derive(Debug, Clone)]
pub struct ListItem {
    pub blocks: Vec<Block>,
    pub options: NodeOptions,
}

/// One piece of a parsed template body (§4.6 "Template application").
#[derive(Debug, Clone)]
pub enum TemplatePart {
    Text(String),
    ContextRef(String),
    Directive(Block),
}

/// A user extension's block payload, carried opaquely.
#[derive(Clone)]
pub struct ExtensionBlock {
    pub tag: String,
    pub payload: Rc<dyn Any>,
    pub options: NodeOptions,
}

impl fmt::Debug for ExtensionBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionBlock")
            .field("tag", &self.tag)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Block {
    Paragraph(Vec<Span>, NodeOptions),
    Header(u8, Vec<Span>, NodeOptions),
    BlockSequence(Vec<Block>, NodeOptions),
    QuotedBlock(Vec<Block>, Option<String>, NodeOptions),
    CodeBlock(Option<String>, String, NodeOptions),
    ListBlock(ListKind, Vec<ListItem>, NodeOptions),
    Section(Box<Block>, Vec<Block>, NodeOptions),
    TemplateRoot(Vec<TemplatePart>, NodeOptions),
    InvalidBlock(String, SourceFragment),
    Extension(ExtensionBlock),
    Deferred(DeferredBlock),
}

impl Block {
    pub fn options(&self) -> Option<&NodeOptions> {
        match self {
            Block::Paragraph(_, o)
            | Block::Header(_, _, o)
            | Block::BlockSequence(_, o)
            | Block::QuotedBlock(_, _, o)
            | Block::CodeBlock(_, _, o)
            | Block::ListBlock(_, _, o)
            | Block::Section(_, _, o)
            | Block::TemplateRoot(_, o) => Some(o),
            Block::InvalidBlock(_, _) => None,
            Block::Extension(e) => Some(&e.options),
            Block::Deferred(_) => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Block::InvalidBlock(_, _))
    }

    pub fn children(&self) -> &[Block] {
        match self {
            Block::BlockSequence(children, _) | Block::QuotedBlock(children, _, _) => children,
            Block::Section(_, content, _) => content,
            _ => &[],
        }
    }

    pub fn spans(&self) -> &[Span] {
        match self {
            Block::Paragraph(spans, _) | Block::Header(_, spans, _) => spans,
            _ => &[],
        }
    }
}
