//! The parser combinator core (spec §4.1): a `Parser<T>` is a pure function
//! `InputContext -> ParseResult<T>`, wrapped so it can be cloned and shared.
//!
//! Libraries like `chumsky`/`nom` model parsers over an abstract token
//! stream and don't expose per-parser start-character sets or a
//! `Success`/`Failure` result shape as part of their own public surface —
//! both are required here (see [`crate::prefixed::PrefixedParser`] and
//! [`crate::result::ParseResult`]), so the core is hand-written in the style
//! of a small closure-returning combinator library, the way a hand-rolled
//! recursive-descent parser is usually built in Rust.

use std::rc::Rc;

use crate::input::{InputContext, SourceFragment};
use crate::result::ParseResult;

/// A reusable, cloneable parser for values of type `T`.
///
/// Cloning a `Parser` is an `Rc` bump, not a deep copy — parsers are meant to
/// be built once (e.g. when an [`crate::prefixed::ExtensionBundle`]-style
/// registry is assembled) and shared freely afterwards.
#[derive(Clone)]
pub struct Parser<T> {
    run: Rc<dyn Fn(&InputContext) -> ParseResult<T>>,
}

impl<T: 'static> Parser<T> {
    pub fn new(run: impl Fn(&InputContext) -> ParseResult<T> + 'static) -> Self {
        Parser { run: Rc::new(run) }
    }

    pub fn parse(&self, ctx: &InputContext) -> ParseResult<T> {
        (self.run)(ctx)
    }

    /// A parser that always fails without consuming input.
    pub fn fail(message: impl Into<String> + Clone + 'static) -> Self {
        Parser::new(move |ctx| ParseResult::failure(message.clone(), ctx.clone()))
    }

    /// A parser that always succeeds with `value`, without consuming input.
    pub fn pure(value: T) -> Self
    where
        T: Clone,
    {
        Parser::new(move |ctx| ParseResult::success(value.clone(), ctx.clone()))
    }

    /// `map(f)`: transforms a success value; never changes position.
    pub fn map<U: 'static>(&self, f: impl Fn(T) -> U + 'static) -> Parser<U> {
        let this = self.clone();
        Parser::new(move |ctx| this.parse(ctx).map(&f))
    }

    /// `flatMap(f)`: success continues with the parser `f(value)` returns,
    /// run against the remaining input.
    pub fn flat_map<U: 'static>(&self, f: impl Fn(T) -> Parser<U> + 'static) -> Parser<U> {
        let this = self.clone();
        Parser::new(move |ctx| match this.parse(ctx) {
            ParseResult::Success { value, next } => f(value).parse(&next),
            ParseResult::Failure { message, at } => ParseResult::Failure { message, at },
        })
    }

    /// `evalMap(f)`: like `map`, but `f` may itself fail; an `Err` becomes a
    /// parser failure at the *pre-conversion* position (the text already
    /// matched, only its interpretation was rejected).
    pub fn eval_map<U: 'static>(&self, f: impl Fn(T) -> Result<U, String> + 'static) -> Parser<U> {
        let this = self.clone();
        Parser::new(move |ctx| match this.parse(ctx) {
            ParseResult::Success { value, next } => match f(value) {
                Ok(converted) => ParseResult::success(converted, next),
                Err(message) => ParseResult::failure(message, ctx.clone()),
            },
            ParseResult::Failure { message, at } => ParseResult::Failure { message, at },
        })
    }

    /// `collect(pf)`: a partial function version of `eval_map` — `None`
    /// becomes a generic "did not match" failure.
    pub fn collect<U: 'static>(&self, pf: impl Fn(T) -> Option<U> + 'static) -> Parser<U> {
        self.eval_map(move |value| pf(value).ok_or_else(|| "value rejected".to_string()))
    }

    /// `seq(a, b)`: succeeds iff `self` then `other` succeed in turn.
    pub fn seq<U: 'static>(&self, other: Parser<U>) -> Parser<(T, U)> {
        let this = self.clone();
        Parser::new(move |ctx| match this.parse(ctx) {
            ParseResult::Success { value: a, next } => match other.parse(&next) {
                ParseResult::Success { value: b, next } => ParseResult::success((a, b), next),
                ParseResult::Failure { message, at } => ParseResult::Failure { message, at },
            },
            ParseResult::Failure { message, at } => ParseResult::Failure { message, at },
        })
    }

    /// `keepLeft`: like `seq`, but returns only `self`'s value.
    pub fn keep_left<U: 'static>(&self, other: Parser<U>) -> Parser<T> {
        self.seq(other).map(|(a, _)| a)
    }

    /// `keepRight`: like `seq`, but returns only `other`'s value.
    pub fn keep_right<U: 'static>(&self, other: Parser<U>) -> Parser<U> {
        self.seq(other).map(|(_, b)| b)
    }

    /// `choice(a, b)`: tries `self`; on a failure that consumed no input,
    /// tries `other` from the same position. If both fail, returns the
    /// failure from whichever alternative advanced furthest (ties favor the
    /// later alternative, i.e. `other`).
    pub fn or(&self, other: Parser<T>) -> Parser<T> {
        let this = self.clone();
        Parser::new(move |ctx| {
            let first = this.parse(ctx);
            match first {
                ParseResult::Success { .. } => first,
                ParseResult::Failure {
                    message: first_message,
                    at: first_at,
                } => {
                    if first_at.offset() > ctx.offset() {
                        // `self` consumed input before failing: do not retry.
                        return ParseResult::Failure {
                            message: first_message,
                            at: first_at,
                        };
                    }
                    match other.parse(ctx) {
                        ParseResult::Success { value, next } => ParseResult::success(value, next),
                        ParseResult::Failure {
                            message: second_message,
                            at: second_at,
                        } => {
                            if second_at.offset() >= first_at.offset() {
                                ParseResult::Failure {
                                    message: second_message,
                                    at: second_at,
                                }
                            } else {
                                ParseResult::Failure {
                                    message: first_message,
                                    at: first_at,
                                }
                            }
                        }
                    }
                }
            }
        })
    }

    /// `opt`: always succeeds; `Some` on a match, `None` (zero-width) on a
    /// failure that did not itself consume input. If the inner parser
    /// consumed input before failing, that failure propagates — `opt` does
    /// not silently discard partial progress.
    pub fn opt(&self) -> Parser<Option<T>> {
        let this = self.clone();
        Parser::new(move |ctx| match this.parse(ctx) {
            ParseResult::Success { value, next } => ParseResult::success(Some(value), next),
            ParseResult::Failure { at, message } => {
                if at.offset() > ctx.offset() {
                    ParseResult::Failure { message, at }
                } else {
                    ParseResult::success(None, ctx.clone())
                }
            }
        })
    }

    /// `rep`: zero or more repetitions; never fails by itself.
    pub fn rep(&self) -> Parser<Vec<T>> {
        self.rep_bounded(0, None)
    }

    /// Repetition bounded by `min`/`max` (§4.1): fewer than `min` matches is
    /// a failure; at `max` matches the parser stops accepting more, even if
    /// another would succeed.
    pub fn rep_bounded(&self, min: usize, max: Option<usize>) -> Parser<Vec<T>> {
        let this = self.clone();
        Parser::new(move |ctx| {
            let mut results = Vec::new();
            let mut current = ctx.clone();
            loop {
                if let Some(max) = max {
                    if results.len() >= max {
                        break;
                    }
                }
                match this.parse(&current) {
                    ParseResult::Success { value, next } => {
                        // A zero-width success would loop forever; treat it
                        // as "no further progress" and stop.
                        if next.offset() == current.offset() {
                            results.push(value);
                            break;
                        }
                        current = next;
                        results.push(value);
                    }
                    ParseResult::Failure { message, at } => {
                        if results.len() < min {
                            return ParseResult::Failure { message, at };
                        }
                        break;
                    }
                }
            }
            ParseResult::success(results, current)
        })
    }

    /// `repSep`: zero or more repetitions separated by `sep`.
    pub fn rep_sep<U: 'static>(&self, sep: Parser<U>) -> Parser<Vec<T>> {
        let this = self.clone();
        Parser::new(move |ctx| match this.parse(ctx) {
            ParseResult::Failure { .. } => ParseResult::success(Vec::new(), ctx.clone()),
            ParseResult::Success {
                value: first,
                next: mut current,
            } => {
                let mut results = vec![first];
                loop {
                    match sep.parse(&current) {
                        ParseResult::Failure { at, .. } if at.offset() == current.offset() => break,
                        ParseResult::Failure { message, at } => {
                            return ParseResult::Failure { message, at }
                        }
                        ParseResult::Success { next: after_sep, .. } => {
                            match this.parse(&after_sep) {
                                ParseResult::Success { value, next } => {
                                    results.push(value);
                                    current = next;
                                }
                                ParseResult::Failure { message, at } => {
                                    return ParseResult::Failure { message, at }
                                }
                            }
                        }
                    }
                }
                ParseResult::success(results, current)
            }
        })
    }

    /// `not(p)`: zero-width; succeeds (with `()`) iff `self` would fail;
    /// never consumes input either way.
    pub fn not(&self) -> Parser<()> {
        let this = self.clone();
        Parser::new(move |ctx| match this.parse(ctx) {
            ParseResult::Success { .. } => {
                ParseResult::failure("unexpected match in negative lookahead", ctx.clone())
            }
            ParseResult::Failure { .. } => ParseResult::success((), ctx.clone()),
        })
    }

    /// `lookahead(p)`: zero-width; succeeds iff `self` succeeds, returning
    /// its value but leaving the context unchanged.
    pub fn lookahead(&self) -> Parser<T> {
        let this = self.clone();
        Parser::new(move |ctx| match this.parse(ctx) {
            ParseResult::Success { value, .. } => ParseResult::success(value, ctx.clone()),
            ParseResult::Failure { message, at } => ParseResult::Failure { message, at },
        })
    }

    /// `source`: returns the exact input slice consumed by `self`.
    pub fn source(&self) -> Parser<String> {
        let this = self.clone();
        Parser::new(move |ctx| match this.parse(ctx) {
            ParseResult::Success { next, .. } => {
                let text = ctx.slice(ctx.offset(), next.offset()).to_string();
                ParseResult::success(text, next)
            }
            ParseResult::Failure { message, at } => ParseResult::Failure { message, at },
        })
    }

    /// `withCursor`: like `source`, but packages the consumed range as a
    /// [`SourceFragment`] alongside the value, for later error reporting.
    pub fn with_cursor(&self) -> Parser<(T, SourceFragment)> {
        let this = self.clone();
        Parser::new(move |ctx| match this.parse(ctx) {
            ParseResult::Success { value, next } => {
                let fragment = SourceFragment {
                    path: ctx.path().clone(),
                    start: ctx.locate(ctx.offset()),
                    end: ctx.locate(next.offset()),
                    text: ctx.slice(ctx.offset(), next.offset()).to_string(),
                };
                ParseResult::success((value, fragment), next)
            }
            ParseResult::Failure { message, at } => ParseResult::Failure { message, at },
        })
    }
}

/// `seq(a, b)` as a free function, matching the combinator table in spec §4.1.
pub fn seq<A: 'static, B: 'static>(a: &Parser<A>, b: Parser<B>) -> Parser<(A, B)> {
    a.seq(b)
}

/// `choice(a, b)` as a free function.
pub fn choice<T: 'static>(a: &Parser<T>, b: Parser<T>) -> Parser<T> {
    a.or(b)
}

/// `choice` over more than two alternatives, left to right, matching the
/// same furthest-failure tie-break rule pairwise.
pub fn choice_all<T: 'static>(alternatives: Vec<Parser<T>>) -> Parser<T> {
    let mut iter = alternatives.into_iter();
    let first = iter
        .next()
        .expect("choice_all requires at least one alternative");
    iter.fold(first, |acc, next| acc.or(next))
}

/// `lookbehind(n, p)`: runs `p` against the `n`-character window immediately
/// preceding the current offset, without consuming input itself.
pub fn lookbehind<T: 'static>(n: usize, p: Parser<T>) -> Parser<T> {
    Parser::new(move |ctx| {
        let preceding_text: String = {
            let before = &ctx.full_source()[..ctx.offset()];
            let chars: Vec<char> = before.chars().collect();
            let take = chars.len().min(n);
            chars[chars.len() - take..].iter().collect()
        };
        let window_ctx = InputContext::new(preceding_text, ctx.path().clone());
        match p.parse(&window_ctx) {
            ParseResult::Success { value, .. } => ParseResult::success(value, ctx.clone()),
            ParseResult::Failure { message, .. } => {
                ParseResult::Failure { message, at: ctx.clone() }
            }
        }
    })
}
