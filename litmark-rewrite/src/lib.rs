//! The multi-pass AST rewriter (§4.6): a pure-zipper `DocumentCursor`, a
//! bottom-up rewrite driver consuming bundle-contributed rules, and
//! cross-document link resolution.

pub mod cursor;
pub mod driver;
pub mod error;
pub mod targets;

pub use cursor::TreeCursor;
pub use driver::RewriteDriver;
pub use error::{CircularAliasError, DuplicateTargetError, ReferenceError};
pub use targets::{build_target_table, TargetResolver};
