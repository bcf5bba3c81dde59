//! The two-phase markup engine (§4.4): block/span dispatch tables built
//! from user-registered extension bundles (§6), assembled once by an
//! [`EngineBuilder`] into an immutable [`MarkupEngine`].

pub mod builder;
pub mod bundle;
pub mod engine;

pub use builder::EngineBuilder;
pub use bundle::{
    BlockParserBuilder, DirectiveRegistry, ExtensionBundle, RewriteHook, RewriteRule, RootHooks,
    SpanParserBuilder,
};
pub use engine::MarkupEngine;
