//! Deferred-node machinery (§3 "Deferred nodes", §4.6).
//!
//! A resolver node captures the work a directive or link reference could
//! not finish during parsing: it carries the phase it wants to run in and a
//! closure that, given a cursor, produces the final node. The concrete
//! zipper implementing [`DocumentCursor`] lives in `litmark-rewrite`, which
//! depends on this crate — defining the trait here (rather than the
//! concrete cursor type) is what lets `Block`/`Span` reference "a cursor"
//! without this crate depending on the rewrite driver.

use std::fmt;
use std::rc::Rc;

use litmark_combinators::SourceFragment;

use crate::config::{Config, ConfigValue};
use crate::element::{LinkTarget, Phase};

/// The minimal view a resolver closure needs over the document it is
/// running against.
pub trait DocumentCursor {
    fn resolve_reference(&self, dotted_path: &str) -> Option<ConfigValue>;
    fn merged_config(&self) -> &Config;
    fn global_link_targets(&self) -> &[LinkTarget];
}

/// A `Block` node whose final form is computed in a later rewrite phase.
#[derive(Clone)]
pub struct DeferredBlock {
    pub source: SourceFragment,
    pub descriptor: String,
    pub phase: Phase,
    pub resolve: Rc<dyn Fn(&dyn DocumentCursor) -> crate::block::Block>,
}

impl fmt::Debug for DeferredBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredBlock")
            .field("descriptor", &self.descriptor)
            .field("phase", &self.phase)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// A `Span` node whose final form is computed in a later rewrite phase.
#[derive(Clone)]
pub struct DeferredSpan {
    pub source: SourceFragment,
    pub descriptor: String,
    pub phase: Phase,
    pub resolve: Rc<dyn Fn(&dyn DocumentCursor) -> crate::span::Span>,
}

impl fmt::Debug for DeferredSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredSpan")
            .field("descriptor", &self.descriptor)
            .field("phase", &self.phase)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
