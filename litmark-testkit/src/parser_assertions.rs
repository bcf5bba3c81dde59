//! Parser-result assertions, replacing hand-unwrapped `ParseResult` matches
//! at every combinator test call site.

use litmark_combinators::{InputContext, ParseResult, Parser, VirtualPath};

pub fn context(input: &str) -> InputContext {
    InputContext::new(input.to_string(), VirtualPath::root())
}

/// Parses `input` and asserts the parser both succeeded and consumed it
/// fully, returning the produced value.
pub fn assert_parses_fully<T>(parser: &Parser<T>, input: &str) -> T {
    let ctx = context(input);
    match parser.parse(&ctx) {
        ParseResult::Success { value, next } => {
            assert!(
                next.is_at_end(),
                "expected {input:?} to be fully consumed, {:?} remained",
                next.remaining()
            );
            value
        }
        ParseResult::Failure { message, at } => {
            panic!("expected {input:?} to parse, failed at offset {}: {}", at.offset(), message.resolve())
        }
    }
}

/// Parses `input`, asserting success without requiring full consumption,
/// and returns the value plus the remaining unconsumed slice.
pub fn assert_parses<T>(parser: &Parser<T>, input: &str) -> (T, String) {
    let ctx = context(input);
    match parser.parse(&ctx) {
        ParseResult::Success { value, next } => (value, next.remaining().to_string()),
        ParseResult::Failure { message, at } => {
            panic!("expected {input:?} to parse, failed at offset {}: {}", at.offset(), message.resolve())
        }
    }
}

/// Asserts `parser` fails on `input`, returning the failure message.
pub fn assert_fails<T>(parser: &Parser<T>, input: &str) -> String {
    let ctx = context(input);
    match parser.parse(&ctx) {
        ParseResult::Failure { message, .. } => message.resolve(),
        ParseResult::Success { .. } => panic!("expected {input:?} to fail to parse, but it succeeded"),
    }
}
