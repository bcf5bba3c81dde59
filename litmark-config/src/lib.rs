//! A native HOCON-compatible configuration language: parse surface syntax
//! into an [`UnresolvedConfig`], then `resolve` it against a fallback chain
//! into a typed, dotted-path [`Config`].
//!
//! This crate never shells out to an external HOCON/JSON/YAML library for
//! document configuration — the ambient, non-document settings loader that
//! *does* use `serde`/`config` lives in `litmark-settings` and is an
//! unrelated type.

pub mod codec;
pub mod config;
pub mod error;
pub mod parser;
pub mod resolve;
pub mod unresolved;
pub mod value;

pub use codec::ConfigCodec;
pub use config::Config;
pub use error::{ConfigError, ConfigParseError, ConfigResolveError, DecodeError};
pub use parser::parse;
pub use unresolved::UnresolvedConfig;
pub use value::{ConfigEntry, ConfigValue, NoAst, OrderedMap, Origin, Scope};
