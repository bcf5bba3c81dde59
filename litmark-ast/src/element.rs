//! Small shared types referenced by both the `Block` and `Span` hierarchies.

use crate::block::Block;
use crate::span::Span;

/// Either half of the AST, used where configuration or fragment storage
/// needs to hold "some node, block or span" — e.g. `ConfigValue::ASTValue`
/// and `Document::fragments`.
#[derive(Debug, Clone)]
pub enum Element {
    Block(Block),
    Span(Span),
}

/// A key identifying a link/footnote/citation target within a tree (§4.6).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    Unique(String),
    Path(String, String),
    Anonymous(usize),
    Autonumber,
    Autosymbol,
}

/// Where a `SpanLink` points: a literal URL/path, or a selector resolved
/// during cross-document rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Direct(String),
    Selector(Selector),
}

/// An ordered rewrite phase (§4.6): deferred nodes declare which phase(s)
/// they participate in, and the rewrite driver dispatches purely on
/// equality against the phase currently being walked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Build,
    Resolve,
    Render(String),
}
