//! The text parser kit (spec §4.2): character-class and line-oriented
//! primitives built on top of the [`Parser`] core.
//!
//! Functions here are grouped the way the specification's own table groups
//! them: literal matching, quantified character classes (`any*`/`some*`/
//! `one*`), classification predicates, whitespace and line helpers,
//! delimiters, and the two block-slicing primitives the markup engine's
//! block pass is built from.

use crate::parser::Parser;
use crate::result::ParseResult;

/// Matches an exact literal string.
pub fn literal(text: impl Into<String>) -> Parser<String> {
    let text = text.into();
    Parser::new(move |ctx| {
        if ctx.remaining().starts_with(text.as_str()) {
            ParseResult::success(text.clone(), ctx.advance_bytes(text.len()))
        } else {
            ParseResult::failure_lazy({
                let text = text.clone();
                move || format!("expected literal {text:?}")
            }, ctx.clone())
        }
    })
}

/// Zero or more characters matching `predicate`; never fails.
pub fn any_while(predicate: impl Fn(char) -> bool + 'static) -> Parser<String> {
    Parser::new(move |ctx| {
        let matched: String = ctx.remaining().chars().take_while(|c| predicate(*c)).collect();
        let next = ctx.advance_bytes(matched.len());
        ParseResult::success(matched, next)
    })
}

/// One or more characters matching `predicate`; fails on zero matches.
pub fn some_while(predicate: impl Fn(char) -> bool + 'static) -> Parser<String> {
    let predicate = std::rc::Rc::new(predicate);
    Parser::new(move |ctx| {
        let matched: String = ctx
            .remaining()
            .chars()
            .take_while(|c| predicate(*c))
            .collect();
        if matched.is_empty() {
            ParseResult::failure("expected at least one matching character", ctx.clone())
        } else {
            let next = ctx.advance_bytes(matched.len());
            ParseResult::success(matched, next)
        }
    })
}

/// Exactly one character matching `predicate`.
pub fn one_if(predicate: impl Fn(char) -> bool + 'static) -> Parser<char> {
    Parser::new(move |ctx| match ctx.peek_char() {
        Some(ch) if predicate(ch) => ParseResult::success(ch, ctx.advance_bytes(ch.len_utf8())),
        _ => ParseResult::failure("expected a character matching predicate", ctx.clone()),
    })
}

/// Zero or more characters drawn from `chars`; never fails.
pub fn any_of(chars: impl Into<String>) -> Parser<String> {
    let set: std::collections::HashSet<char> = chars.into().chars().collect();
    any_while(move |c| set.contains(&c))
}

/// Zero or more characters *not* in `chars`, and not at end of input; never
/// fails (an empty match is valid).
pub fn any_not(chars: impl Into<String>) -> Parser<String> {
    let set: std::collections::HashSet<char> = chars.into().chars().collect();
    any_while(move |c| !set.contains(&c))
}

/// One or more characters drawn from `chars`.
pub fn some_of(chars: impl Into<String>) -> Parser<String> {
    let set: std::collections::HashSet<char> = chars.into().chars().collect();
    some_while(move |c| set.contains(&c))
}

/// One or more characters *not* in `chars`.
pub fn some_not(chars: impl Into<String>) -> Parser<String> {
    let set: std::collections::HashSet<char> = chars.into().chars().collect();
    some_while(move |c| !set.contains(&c))
}

/// Exactly one character drawn from `chars`.
pub fn one_of(chars: impl Into<String>) -> Parser<char> {
    let set: std::collections::HashSet<char> = chars.into().chars().collect();
    one_if(move |c| set.contains(&c))
}

/// Exactly one character *not* in `chars`, and not at end of input.
pub fn one_not(chars: impl Into<String>) -> Parser<char> {
    let set: std::collections::HashSet<char> = chars.into().chars().collect();
    one_if(move |c| !set.contains(&c))
}

/// A single character within an inclusive range, e.g. `range('a', 'z')`.
pub fn char_range(low: char, high: char) -> Parser<char> {
    one_if(move |c| c >= low && c <= high)
}

pub fn digit() -> Parser<char> {
    one_if(|c| c.is_ascii_digit())
}

pub fn alpha() -> Parser<char> {
    one_if(|c| c.is_alphabetic())
}

pub fn alpha_num() -> Parser<char> {
    one_if(|c| c.is_alphanumeric())
}

pub fn hex() -> Parser<char> {
    one_if(|c| c.is_ascii_hexdigit())
}

/// Zero or more horizontal whitespace characters (spaces and tabs, not
/// newlines); never fails.
pub fn ws() -> Parser<String> {
    any_while(|c| c == ' ' || c == '\t')
}

/// A single line terminator: `\r\n`, `\n`, or end of input (treated as an
/// implicit terminator for the final line of a document).
pub fn eol() -> Parser<()> {
    Parser::new(|ctx| {
        if ctx.is_at_end() {
            return ParseResult::success((), ctx.clone());
        }
        if ctx.remaining().starts_with("\r\n") {
            return ParseResult::success((), ctx.advance_bytes(2));
        }
        if ctx.remaining().starts_with('\n') {
            return ParseResult::success((), ctx.advance_bytes(1));
        }
        ParseResult::failure("expected end of line", ctx.clone())
    })
}

/// A line containing only horizontal whitespace, terminated by `eol`.
pub fn blank_line() -> Parser<()> {
    ws().flat_map(|_| eol())
}

/// Everything up to (but not including) the next line terminator, which is
/// then consumed. Fails only at end of input with nothing left to consume.
pub fn rest_of_line() -> Parser<String> {
    Parser::new(|ctx| {
        if ctx.is_at_end() {
            return ParseResult::failure("expected a line, found end of input", ctx.clone());
        }
        let line: String = ctx.remaining().chars().take_while(|&c| c != '\n' && c != '\r').collect();
        let after_text = ctx.advance_bytes(line.len());
        match eol().parse(&after_text) {
            ParseResult::Success { next, .. } => ParseResult::success(line, next),
            failure => failure.map(|_| unreachable!()),
        }
    })
}

/// A delimiter match with zero-width boundary conditions: it only matches
/// when the character immediately before the delimiter does not satisfy
/// `prev_not` (if set) and the character immediately after does not satisfy
/// `next_not` (if set). This is the boundary rule inline emphasis-style
/// delimiters need — `a*b*c` should not treat the embedded `*`s as a pair
/// unless the characters flanking them actually look like word boundaries.
pub struct Delimiter {
    text: String,
    prev_not: Option<std::rc::Rc<dyn Fn(char) -> bool>>,
    next_not: Option<std::rc::Rc<dyn Fn(char) -> bool>>,
}

impl Delimiter {
    pub fn new(text: impl Into<String>) -> Self {
        Delimiter {
            text: text.into(),
            prev_not: None,
            next_not: None,
        }
    }

    /// The delimiter does not match if the preceding character satisfies
    /// this predicate (e.g. "not preceded by whitespace").
    pub fn prev_not(mut self, predicate: impl Fn(char) -> bool + 'static) -> Self {
        self.prev_not = Some(std::rc::Rc::new(predicate));
        self
    }

    /// The delimiter does not match if the following character satisfies
    /// this predicate (e.g. "not followed by whitespace").
    pub fn next_not(mut self, predicate: impl Fn(char) -> bool + 'static) -> Self {
        self.next_not = Some(std::rc::Rc::new(predicate));
        self
    }

    pub fn build(self) -> Parser<String> {
        let Delimiter {
            text,
            prev_not,
            next_not,
        } = self;
        Parser::new(move |ctx| {
            if let Some(predicate) = &prev_not {
                if ctx.offset() > 0 {
                    if let Some(prev_char) = ctx.full_source()[..ctx.offset()].chars().next_back() {
                        if predicate(prev_char) {
                            return ParseResult::failure(
                                "delimiter rejected by preceding-character boundary rule",
                                ctx.clone(),
                            );
                        }
                    }
                }
            }
            if !ctx.remaining().starts_with(text.as_str()) {
                return ParseResult::failure_lazy(
                    {
                        let text = text.clone();
                        move || format!("expected delimiter {text:?}")
                    },
                    ctx.clone(),
                );
            }
            let after = ctx.advance_bytes(text.len());
            if let Some(predicate) = &next_not {
                if let Some(next_char) = after.peek_char() {
                    if predicate(next_char) {
                        return ParseResult::failure(
                            "delimiter rejected by following-character boundary rule",
                            ctx.clone(),
                        );
                    }
                }
            }
            ParseResult::success(text.clone(), after)
        })
    }
}

/// Options controlling [`delimited_by`]'s behavior at the edges of input.
#[derive(Default)]
pub struct DelimitedByOptions {
    /// If set, matching stops (as a failure) the moment this parser would
    /// succeed inside the body, even before the closing delimiter is found —
    /// used to bound runaway unterminated spans at a hard stop character
    /// such as a paragraph break.
    pub fail_on: Option<Parser<()>>,
    /// Whether reaching end of input without a closing delimiter is treated
    /// as an (empty-remainder) success rather than a failure.
    pub accept_eof: bool,
    /// Whether a zero-length body between the delimiters is rejected.
    pub non_empty: bool,
    /// Whether the returned text includes the delimiters themselves.
    pub keep_delimiter: bool,
}

/// Text delimited by `open` and `close`, with the modifiers `DelimitedByOptions`
/// describes. `open`/`close` may be the same delimiter (e.g. matching
/// symmetric `*…*` emphasis).
pub fn delimited_by(
    open: Parser<String>,
    close: Parser<String>,
    options: DelimitedByOptions,
) -> Parser<String> {
    Parser::new(move |ctx| {
        let after_open = match open.parse(ctx) {
            ParseResult::Success { next, .. } => next,
            ParseResult::Failure { message, at } => return ParseResult::Failure { message, at },
        };

        let mut cursor = after_open.clone();
        loop {
            if let Some(fail_on) = &options.fail_on {
                if let ParseResult::Success { .. } = fail_on.parse(&cursor) {
                    return ParseResult::failure("delimited body hit its stop condition", ctx.clone());
                }
            }
            if let ParseResult::Success { next, .. } = close.parse(&cursor) {
                let body = ctx.slice(after_open.offset(), cursor.offset());
                if options.non_empty && body.is_empty() {
                    return ParseResult::failure("expected a non-empty delimited body", ctx.clone());
                }
                let rendered = if options.keep_delimiter {
                    ctx.slice(ctx.offset(), next.offset()).to_string()
                } else {
                    body.to_string()
                };
                return ParseResult::success(rendered, next);
            }
            if cursor.is_at_end() {
                if options.accept_eof {
                    let body = ctx.slice(after_open.offset(), cursor.offset());
                    if options.non_empty && body.is_empty() {
                        return ParseResult::failure("expected a non-empty delimited body", ctx.clone());
                    }
                    return ParseResult::success(body.to_string(), cursor);
                }
                return ParseResult::failure("unterminated delimited body", ctx.clone());
            }
            cursor = cursor.advance_char().expect("checked not at end above");
        }
    })
}

/// Slices a run of lines forming one block: the first line must match
/// `first_line_prefix`, and every subsequent line must match `line_prefix`
/// to remain part of the block. If `next_block_prefix` is given, a line
/// matching it (even if it would also match `line_prefix`) ends the current
/// block instead of extending it — used so that, say, a new heading line
/// doesn't get swallowed into a preceding paragraph just because both start
/// with non-blank text.
pub fn block(
    first_line_prefix: Parser<()>,
    line_prefix: Parser<()>,
    next_block_prefix: Option<Parser<()>>,
) -> Parser<String> {
    Parser::new(move |ctx| {
        if let ParseResult::Failure { message, at } = first_line_prefix.parse(ctx) {
            return ParseResult::Failure { message, at };
        }
        let mut block_end = consume_to_eol(ctx);
        loop {
            if block_end.is_at_end() {
                break;
            }
            if let Some(next_prefix) = &next_block_prefix {
                if let ParseResult::Success { .. } = next_prefix.parse(&block_end) {
                    break;
                }
            }
            match line_prefix.parse(&block_end) {
                ParseResult::Success { .. } => {
                    block_end = consume_to_eol(&block_end);
                }
                ParseResult::Failure { .. } => break,
            }
        }
        let text = ctx.slice(ctx.offset(), block_end.offset()).to_string();
        ParseResult::success(text, block_end)
    })
}

fn consume_to_eol(ctx: &crate::input::InputContext) -> crate::input::InputContext {
    let mut cursor = ctx.clone();
    while !cursor.is_at_end() {
        match cursor.peek_char() {
            Some('\n') => return cursor.advance_bytes(1),
            Some('\r') if cursor.remaining().starts_with("\r\n") => return cursor.advance_bytes(2),
            _ => cursor = cursor.advance_char().expect("not at end"),
        }
    }
    cursor
}

/// Slices a run of lines indented by at least `min_indent` columns (and, if
/// `max_indent` is set, by no more than that), per `line_predicate` applied
/// to each de-indented line's remaining text. Ends at the first
/// insufficiently indented, non-blank line, or (if `ends_on_blank_line`) at
/// the first blank line. If `first_line_indented` is false, the first line
/// is accepted regardless of its own indentation (the construct's opening
/// marker already established the block).
pub fn indented_block(
    min_indent: usize,
    line_predicate: Parser<()>,
    ends_on_blank_line: bool,
    first_line_indented: bool,
    max_indent: Option<usize>,
) -> Parser<String> {
    Parser::new(move |ctx| {
        let mut cursor = ctx.clone();
        let mut first = true;
        loop {
            if cursor.is_at_end() {
                break;
            }
            let indent = leading_spaces(cursor.remaining());
            let line_is_blank = cursor.remaining()[..indent]
                .len()
                == cursor.remaining().split(['\n', '\r']).next().unwrap_or("").len()
                && cursor.remaining().split(['\n', '\r']).next().unwrap_or("").trim().is_empty();

            if line_is_blank {
                if ends_on_blank_line {
                    break;
                }
                cursor = consume_to_eol(&cursor);
                first = false;
                continue;
            }

            let required = !first || first_line_indented;
            if required {
                if indent < min_indent {
                    break;
                }
                if let Some(max) = max_indent {
                    if indent > max {
                        break;
                    }
                }
            }

            let de_indented = cursor.advance_bytes(indent.min(cursor.remaining().len()));
            if let ParseResult::Failure { .. } = line_predicate.parse(&de_indented) {
                break;
            }
            cursor = consume_to_eol(&cursor);
            first = false;
        }
        let text = ctx.slice(ctx.offset(), cursor.offset()).to_string();
        ParseResult::success(text, cursor)
    })
}

fn leading_spaces(text: &str) -> usize {
    text.chars().take_while(|c| *c == ' ').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::VirtualPath;
    use crate::input::InputContext;

    fn ctx(s: &str) -> InputContext {
        InputContext::new(s, VirtualPath::root())
    }

    #[test]
    fn literal_matches_prefix() {
        let (value, next) = literal("###").parse(&ctx("### heading")).expect_success("literal");
        assert_eq!(value, "###");
        assert_eq!(next.offset(), 3);
    }

    #[test]
    fn some_while_requires_at_least_one() {
        match digit().parse(&ctx("x")) {
            ParseResult::Failure { .. } => {}
            _ => panic!("expected failure"),
        }
    }

    #[test]
    fn rest_of_line_stops_before_newline() {
        let (value, next) = rest_of_line().parse(&ctx("hello\nworld")).expect_success("rest_of_line");
        assert_eq!(value, "hello");
        assert_eq!(next.offset(), 6);
    }

    #[test]
    fn delimiter_honors_boundary_predicates() {
        let star = Delimiter::new("*").next_not(|c| c.is_whitespace()).build();
        match star.parse(&ctx("* not emphasis")) {
            ParseResult::Failure { .. } => {}
            ParseResult::Success { .. } => panic!("should reject delimiter followed by whitespace"),
        }
    }

    #[test]
    fn delimited_by_extracts_body() {
        let star = || literal("*");
        let p = delimited_by(star(), star(), DelimitedByOptions::default());
        let (value, next) = p.parse(&ctx("*bold*rest")).expect_success("delimited_by");
        assert_eq!(value, "bold");
        assert_eq!(next.remaining(), "rest");
    }

    #[test]
    fn delimited_by_rejects_empty_when_non_empty_required() {
        let star = || literal("*");
        let p = delimited_by(
            star(),
            star(),
            DelimitedByOptions {
                non_empty: true,
                ..Default::default()
            },
        );
        match p.parse(&ctx("**")) {
            ParseResult::Failure { .. } => {}
            ParseResult::Success { .. } => panic!("expected rejection of empty body"),
        }
    }

    #[test]
    fn block_extends_while_line_prefix_matches() {
        let non_blank = one_not("\n").map(|_| ()).lookahead();
        let p = block(non_blank.clone(), non_blank, None);
        let (value, next) = p.parse(&ctx("line one\nline two\n\nnext para")).expect_success("block");
        assert_eq!(value, "line one\nline two\n");
        assert!(next.remaining().starts_with('\n'));
    }

    #[test]
    fn indented_block_stops_at_underindented_line() {
        let any_line = Parser::new(|c: &InputContext| ParseResult::success((), c.clone()));
        let p = indented_block(2, any_line, true, false, None);
        let (value, _) = p
            .parse(&ctx("  first\n  second\nthird"))
            .expect_success("indented_block");
        assert_eq!(value, "  first\n  second\n");
    }
}
