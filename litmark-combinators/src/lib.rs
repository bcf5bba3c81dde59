//! Parser combinator core.
//!
//! This crate has no knowledge of markup, directives, or configuration — it
//! only provides the `InputContext`/`ParseResult`/`Parser` machinery and a
//! text parser kit built on top of it. Everything else in the workspace is
//! built from these pieces.

pub mod input;
pub mod parser;
pub mod prefixed;
pub mod result;
pub mod text;

pub use input::{InputContext, Position, SourceFragment, VirtualPath};
pub use parser::{choice, choice_all, lookbehind, seq, Parser};
pub use prefixed::{CharSet, PrefixDispatch, PrefixedParser};
pub use result::{LazyMessage, ParseResult};
