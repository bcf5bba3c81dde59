//! The result of running a parser: success with a value and the next
//! context, or failure with a lazily-rendered message.

use std::fmt;
use std::rc::Rc;

use crate::input::InputContext;

/// A failure message that is only formatted when it actually escapes a
/// `choice` — cheap to construct on the hot path, where most alternatives
/// fail and are immediately discarded.
#[derive(Clone)]
pub struct LazyMessage(Rc<dyn Fn() -> String>);

impl LazyMessage {
    pub fn new(render: impl Fn() -> String + 'static) -> Self {
        LazyMessage(Rc::new(render))
    }

    pub fn eager(message: impl Into<String>) -> Self {
        let message = message.into();
        LazyMessage::new(move || message.clone())
    }

    pub fn resolve(&self) -> String {
        (self.0)()
    }
}

impl fmt::Debug for LazyMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LazyMessage({:?})", self.resolve())
    }
}

/// The outcome of running a [`crate::parser::Parser`] against an
/// [`InputContext`].
#[derive(Clone)]
pub enum ParseResult<T> {
    Success { value: T, next: InputContext },
    Failure { message: LazyMessage, at: InputContext },
}

impl<T> ParseResult<T> {
    pub fn success(value: T, next: InputContext) -> Self {
        ParseResult::Success { value, next }
    }

    pub fn failure(message: impl Into<String>, at: InputContext) -> Self {
        ParseResult::Failure {
            message: LazyMessage::eager(message),
            at,
        }
    }

    pub fn failure_lazy(render: impl Fn() -> String + 'static, at: InputContext) -> Self {
        ParseResult::Failure {
            message: LazyMessage::new(render),
            at,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ParseResult::Success { .. })
    }

    /// The offset a failure or success has advanced to; used to compare how
    /// far two alternatives of a `choice` got.
    pub fn offset(&self) -> usize {
        match self {
            ParseResult::Success { next, .. } => next.offset(),
            ParseResult::Failure { at, .. } => at.offset(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseResult<U> {
        match self {
            ParseResult::Success { value, next } => ParseResult::Success {
                value: f(value),
                next,
            },
            ParseResult::Failure { message, at } => ParseResult::Failure { message, at },
        }
    }

    /// Unwraps a successful result, panicking with the failure message
    /// otherwise. Intended for tests and examples, never for production
    /// control flow.
    pub fn expect_success(self, what: &str) -> (T, InputContext) {
        match self {
            ParseResult::Success { value, next } => (value, next),
            ParseResult::Failure { message, at } => panic!(
                "{what}: expected success, got failure {:?} at offset {}",
                message.resolve(),
                at.offset()
            ),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ParseResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseResult::Success { value, next } => f
                .debug_struct("Success")
                .field("value", value)
                .field("offset", &next.offset())
                .finish(),
            ParseResult::Failure { message, at } => f
                .debug_struct("Failure")
                .field("message", &message.resolve())
                .field("offset", &at.offset())
                .finish(),
        }
    }
}
