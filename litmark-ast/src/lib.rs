//! The `Block`/`Span` AST, document containers, and the deferred-resolver
//! traits the rewrite driver dispatches against.

pub mod block;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod options;
pub mod resolver;
pub mod span;

pub use block::{Block, ExtensionBlock, ListItem, ListKind, TemplatePart};
pub use config::{Config, ConfigEntry, ConfigValue, UnresolvedConfig};
pub use document::{Document, DocumentTree, TreePosition};
pub use element::{Element, LinkTarget, Phase, Selector};
pub use error::AstError;
pub use options::NodeOptions;
pub use resolver::{DeferredBlock, DeferredSpan, DocumentCursor};
pub use span::{ExtensionSpan, Span};
