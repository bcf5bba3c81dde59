//! Prefixed parsers and dispatch tables (spec §4.1, §9).
//!
//! A [`PrefixedParser`] pairs an ordinary [`Parser`] with the set of
//! characters it can possibly start on. The block and span passes of the
//! markup engine hold dozens of these side by side and need to pick the
//! right one in O(1) per input character rather than trying each alternative
//! in turn — that's what [`PrefixDispatch`] is for.

use std::collections::HashSet;
use std::rc::Rc;

use crate::input::InputContext;
use crate::parser::Parser;
use crate::result::ParseResult;

/// The set of characters a parser may start matching on.
///
/// ASCII membership is a 128-bit bitset (four `u32`s); anything above ASCII
/// falls into a `HashSet<char>`, since the non-ASCII start-character sets
/// used by real extensions (smart quotes, typographic dashes) tend to be
/// small and sparse.
#[derive(Clone, Debug, Default)]
pub struct CharSet {
    ascii: [u32; 4],
    extra: Option<Rc<HashSet<char>>>,
}

impl CharSet {
    pub fn empty() -> Self {
        CharSet::default()
    }

    pub fn single(ch: char) -> Self {
        let mut set = CharSet::empty();
        set.insert(ch);
        set
    }

    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        let mut set = CharSet::empty();
        for ch in chars {
            set.insert(ch);
        }
        set
    }

    /// A set containing every character (used by parsers with no useful
    /// start-character restriction, e.g. "any non-whitespace").
    pub fn all() -> Self {
        CharSet {
            ascii: [u32::MAX; 4],
            extra: None,
        }
    }

    fn insert(&mut self, ch: char) {
        if ch.is_ascii() {
            let byte = ch as u32;
            self.ascii[(byte / 32) as usize] |= 1 << (byte % 32);
        } else {
            let extra = Rc::make_mut(self.extra.get_or_insert_with(|| Rc::new(HashSet::new())));
            extra.insert(ch);
        }
    }

    pub fn contains(&self, ch: char) -> bool {
        if ch.is_ascii() {
            let byte = ch as u32;
            (self.ascii[(byte / 32) as usize] >> (byte % 32)) & 1 == 1
        } else {
            self.extra.as_ref().is_some_and(|set| set.contains(&ch))
        }
    }

    pub fn union(&self, other: &CharSet) -> CharSet {
        let mut ascii = [0u32; 4];
        for i in 0..4 {
            ascii[i] = self.ascii[i] | other.ascii[i];
        }
        let extra = match (&self.extra, &other.extra) {
            (None, None) => None,
            (Some(a), None) => Some(a.clone()),
            (None, Some(b)) => Some(b.clone()),
            (Some(a), Some(b)) => {
                let mut merged = (**a).clone();
                merged.extend(b.iter().copied());
                Some(Rc::new(merged))
            }
        };
        CharSet { ascii, extra }
    }

    fn is_ascii_universal(&self) -> bool {
        self.ascii == [u32::MAX; 4]
    }
}

/// A parser annotated with the characters it can start on, so that a
/// [`PrefixDispatch`] can route input to it without trial and error.
#[derive(Clone)]
pub struct PrefixedParser<T> {
    pub starts: CharSet,
    pub parser: Parser<T>,
}

impl<T: 'static> PrefixedParser<T> {
    pub fn new(starts: CharSet, parser: Parser<T>) -> Self {
        PrefixedParser { starts, parser }
    }

    pub fn parse(&self, ctx: &InputContext) -> ParseResult<T> {
        self.parser.parse(ctx)
    }
}

/// A dispatch table over a family of [`PrefixedParser`]s sharing a result
/// type, keyed by the first byte of the remaining input for the ASCII
/// fast path, with a fallback list for everything else (non-ASCII leads,
/// and parsers whose start set is effectively unbounded).
///
/// This is the data structure behind the "indexed by first character"
/// optimization: building it is O(total start-character entries), and a
/// dispatch at parse time is an array lookup plus a linear scan of however
/// many candidate parsers share that one byte — in practice almost always
/// zero or one.
pub struct PrefixDispatch<T> {
    ascii_table: Vec<Vec<PrefixedParser<T>>>,
    fallback: Vec<PrefixedParser<T>>,
}

impl<T: 'static> PrefixDispatch<T> {
    pub fn build(entries: Vec<PrefixedParser<T>>) -> Self {
        let mut ascii_table: Vec<Vec<PrefixedParser<T>>> = (0..128).map(|_| Vec::new()).collect();
        let mut fallback: Vec<PrefixedParser<T>> = Vec::new();
        for entry in entries {
            if entry.starts.is_ascii_universal() {
                fallback.push(entry);
                continue;
            }
            let mut matched_any_ascii = false;
            for byte in 0u8..128 {
                if entry.starts.contains(byte as char) {
                    matched_any_ascii = true;
                    ascii_table[byte as usize].push(entry.clone());
                }
            }
            if entry.starts.extra.is_some() || !matched_any_ascii {
                fallback.push(entry);
            }
        }
        PrefixDispatch {
            ascii_table,
            fallback,
        }
    }

    /// Tries every candidate parser registered for the next character, in
    /// registration order, then falls back to the universal/non-ASCII list.
    /// Returns the first success, or the furthest-advancing failure.
    pub fn dispatch(&self, ctx: &InputContext) -> Option<ParseResult<T>> {
        let next_char = ctx.peek_char()?;
        let candidates: Box<dyn Iterator<Item = &PrefixedParser<T>>> = if next_char.is_ascii() {
            let byte = next_char as usize;
            Box::new(self.ascii_table[byte].iter().chain(self.fallback.iter()))
        } else {
            Box::new(self.fallback.iter())
        };

        let mut best_failure: Option<ParseResult<T>> = None;
        for candidate in candidates {
            match candidate.parse(ctx) {
                success @ ParseResult::Success { .. } => return Some(success),
                failure @ ParseResult::Failure { .. } => {
                    let better = match &best_failure {
                        None => true,
                        Some(current) => failure.offset() >= current.offset(),
                    };
                    if better {
                        best_failure = Some(failure);
                    }
                }
            }
        }
        best_failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::VirtualPath;

    fn ctx(s: &str) -> InputContext {
        InputContext::new(s, VirtualPath::root())
    }

    #[test]
    fn char_set_tracks_ascii_and_non_ascii_members() {
        let set = CharSet::from_chars(['*', '_', '\u{201C}']);
        assert!(set.contains('*'));
        assert!(set.contains('_'));
        assert!(set.contains('\u{201C}'));
        assert!(!set.contains('#'));
    }

    #[test]
    fn dispatch_routes_by_first_character() {
        let star = PrefixedParser::new(
            CharSet::single('*'),
            Parser::new(|c: &InputContext| ParseResult::success("star", c.advance_bytes(1))),
        );
        let under = PrefixedParser::new(
            CharSet::single('_'),
            Parser::new(|c: &InputContext| ParseResult::success("underscore", c.advance_bytes(1))),
        );
        let table = PrefixDispatch::build(vec![star, under]);

        let result = table.dispatch(&ctx("*bold*")).expect("a candidate exists");
        let (value, _) = result.expect_success("dispatch");
        assert_eq!(value, "star");
    }

    #[test]
    fn dispatch_returns_none_when_no_candidate_registered() {
        let star = PrefixedParser::new(
            CharSet::single('*'),
            Parser::new(|c: &InputContext| ParseResult::success("star", c.advance_bytes(1))),
        );
        let table = PrefixDispatch::build(vec![star]);
        assert!(table.dispatch(&ctx("#heading")).is_none());
    }
}
