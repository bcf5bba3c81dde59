//! Property tests over the text parser kit (§8 "Properties"): arbitrary
//! bodies survive a `delimited_by` round trip, and `literal` always
//! consumes exactly the text it was given.

use litmark_combinators::text::{delimited_by, literal, DelimitedByOptions};
use litmark_combinators::{InputContext, ParseResult, VirtualPath};
use proptest::prelude::*;

fn ctx(input: &str) -> InputContext {
    InputContext::new(input.to_string(), VirtualPath::root())
}

fn body_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,32}".prop_filter("non-empty once trimmed", |s| !s.trim().is_empty())
}

proptest! {
    #[test]
    fn delimited_body_round_trips(body in body_text()) {
        let source = format!("<<{body}>>");
        let parser = delimited_by(literal("<<"), literal(">>"), DelimitedByOptions::default());
        match parser.parse(&ctx(&source)) {
            ParseResult::Success { value, next } => {
                prop_assert_eq!(value, body);
                prop_assert!(next.is_at_end());
            }
            ParseResult::Failure { message, .. } => prop_assert!(false, "expected {source:?} to parse: {}", message.resolve()),
        }
    }

    #[test]
    fn literal_consumes_exactly_its_own_length(text in body_text(), suffix in body_text()) {
        let source = format!("{text}{suffix}");
        match literal(text.clone()).parse(&ctx(&source)) {
            ParseResult::Success { value, next } => {
                prop_assert_eq!(value, text.clone());
                prop_assert_eq!(next.remaining(), suffix.as_str());
            }
            ParseResult::Failure { message, .. } => prop_assert!(false, "expected {text:?} to match: {}", message.resolve()),
        }
    }
}
