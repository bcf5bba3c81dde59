//! The declarative directive framework (§4.5): attribute/body declaration
//! combinators, invocation-syntax parsing, and error-accumulating
//! evaluation into `Block`/`Span` (or `InvalidBlock`/`InvalidSpan`).

pub mod decl;
pub mod error;
pub mod invocation;
pub mod spec;

pub use decl::{
    all_attributes, attribute, attribute_optional, body, bool_converter, cursor, empty, int_converter, parser,
    separated_body, string_converter, AttributeSelector, CursorRequested, DirectiveDecl, Invocation, Multipart,
    RecursiveParser,
};
pub use error::{too_few_message, too_many_message, DirectiveFailure};
pub use invocation::{capture_body, parse_header, split_separated_body, DirectiveHeader, SeparatorSpec};
pub use spec::{evaluate_block, evaluate_span, DirectiveSpec};
