//! The `Span` sealed hierarchy (§3): inline elements inside a block.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use litmark_combinators::SourceFragment;

use crate::element::LinkTarget;
use crate::options::NodeOptions;
use crate::resolver::DeferredSpan;

/// A user extension's inline payload, carried opaquely (the host core has
/// no knowledge of extension-specific span shapes).
#[derive(Clone)]
pub struct ExtensionSpan {
    pub tag: String,
    pub payload: Rc<dyn Any>,
    pub options: NodeOptions,
}

impl fmt::Debug for ExtensionSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionSpan")
            .field("tag", &self.tag)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Span {
    Text(String),
    Emphasized(Vec<Span>, NodeOptions),
    Strong(Vec<Span>, NodeOptions),
    Literal(String, NodeOptions),
    SpanLink(Vec<Span>, LinkTarget, NodeOptions),
    SpanSequence(Vec<Span>, NodeOptions),
    InvalidSpan(String, SourceFragment),
    Extension(ExtensionSpan),
    Deferred(DeferredSpan),
}

impl Span {
    pub fn options(&self) -> Option<&NodeOptions> {
        match self {
            Span::Text(_) => None,
            Span::Emphasized(_, o)
            | Span::Strong(_, o)
            | Span::Literal(_, o)
            | Span::SpanLink(_, _, o)
            | Span::SpanSequence(_, o) => Some(o),
            Span::InvalidSpan(_, _) => None,
            Span::Extension(e) => Some(&e.options),
            Span::Deferred(_) => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Span::InvalidSpan(_, _))
    }

    pub fn children(&self) -> &[Span] {
        match self {
            Span::Emphasized(children, _)
            | Span::Strong(children, _)
            | Span::SpanLink(children, _, _)
            | Span::SpanSequence(children, _) => children,
            _ => &[],
        }
    }
}
