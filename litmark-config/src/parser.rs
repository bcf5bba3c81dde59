//! The HOCON-compatible surface grammar (§4.3): objects, arrays, the string
//! forms, numbers, substitutions, path expressions, and same-line
//! concatenation.
//!
//! Written as a hand-rolled recursive descent over
//! [`litmark_combinators::InputContext`], reaching for the text parser kit
//! (`ws`, `digit`, `literal`) for the token-level pieces and doing the
//! context-sensitive parts — nesting, concatenation, dotted-key expansion —
//! as plain recursive functions, the way the grammar's own shape (objects
//! containing fields containing values containing objects) suggests.

use litmark_combinators::text;
use litmark_combinators::{InputContext, Parser, VirtualPath};

use crate::error::ConfigParseError;
use crate::unresolved::{insert_dotted, RawField, RawValue, UnresolvedConfig};
use crate::value::{Origin, Scope};

/// Parses `source` into an [`UnresolvedConfig`], attributing every field to
/// `scope`. The root object's outer braces are optional, matching HOCON's
/// "the root object's `{`/`}` may be omitted" convention.
pub fn parse(source: &str, scope: Scope) -> Result<UnresolvedConfig, ConfigParseError> {
    let ctx = InputContext::new(source, VirtualPath::root());
    let ctx = skip_trivia(&ctx);
    let (fields, after) = if ctx.peek_char() == Some('{') {
        let after_open = ctx.advance_bytes(1);
        parse_object_body(&after_open, Some('}'), scope)?
    } else {
        parse_object_body(&ctx, None, scope)?
    };
    let after = skip_trivia(&after);
    if !after.is_at_end() {
        return Err(ConfigParseError::ExpectedKey { at: after.locate(after.offset()) });
    }
    Ok(UnresolvedConfig::new(fields))
}

fn skip_trivia(ctx: &InputContext) -> InputContext {
    let mut cursor = ctx.clone();
    loop {
        let trimmed = text::any_while(|c| c.is_whitespace()).parse(&cursor);
        cursor = match trimmed {
            litmark_combinators::ParseResult::Success { next, .. } => next,
            litmark_combinators::ParseResult::Failure { at, .. } => at,
        };
        if cursor.remaining().starts_with('#') || cursor.remaining().starts_with("//") {
            cursor = consume_line(&cursor);
            continue;
        }
        break;
    }
    cursor
}

fn consume_line(ctx: &InputContext) -> InputContext {
    let mut cursor = ctx.clone();
    while let Some(ch) = cursor.peek_char() {
        if ch == '\n' {
            break;
        }
        cursor = cursor.advance_char().expect("peeked");
    }
    cursor
}

fn is_separator_or_close(ch: char) -> bool {
    matches!(ch, ',' | '\n' | '}' | ']')
}

/// Parses fields until `closing` (if set) or end of input. Separators
/// (comma or newline) between fields are equivalent and may repeat.
fn parse_object_body(
    ctx: &InputContext,
    closing: Option<char>,
    scope: Scope,
) -> Result<(Vec<(String, RawField)>, InputContext), ConfigParseError> {
    let mut fields: Vec<(String, RawField)> = Vec::new();
    let mut cursor = skip_trivia(ctx);
    loop {
        if let Some(close) = closing {
            if cursor.peek_char() == Some(close) {
                cursor = cursor.advance_bytes(1);
                return Ok((fields, cursor));
            }
        }
        if cursor.is_at_end() {
            if closing.is_some() {
                return Err(ConfigParseError::UnterminatedObject { at: cursor.locate(cursor.offset()) });
            }
            return Ok((fields, cursor));
        }

        let (key, after_key) = parse_key(&cursor)?;
        let after_key = skip_trivia(&after_key);

        let (field_value, append, after_value) = if after_key.peek_char() == Some('{') {
            let (value, after) = parse_object(&after_key, scope)?;
            (value, false, after)
        } else {
            let append = after_key.remaining().starts_with("+=");
            let after_op = if append {
                after_key.advance_bytes(2)
            } else if after_key.peek_char() == Some(':') || after_key.peek_char() == Some('=') {
                after_key.advance_bytes(1)
            } else {
                return Err(ConfigParseError::ExpectedValue { at: after_key.locate(after_key.offset()) });
            };
            let after_op = skip_trivia(&after_op);
            let (value, after) = parse_concatenated_value(&after_op, scope)?;
            (value, append, after)
        };

        let mut field = RawField::new(field_value, Origin::new(scope, key.clone()));
        field.append = append;
        insert_dotted(&mut fields, &key, field);

        cursor = skip_trivia(&after_value);
        // A comma/newline separator is optional right before a closing
        // brace; consume one if present either way.
        if cursor.peek_char() == Some(',') {
            cursor = skip_trivia(&cursor.advance_bytes(1));
        }
    }
}

fn parse_object(
    ctx: &InputContext,
    scope: Scope,
) -> Result<(RawValue, InputContext), ConfigParseError> {
    debug_assert_eq!(ctx.peek_char(), Some('{'));
    let after_open = ctx.advance_bytes(1);
    let (fields, after) = parse_object_body(&after_open, Some('}'), scope)?;
    Ok((RawValue::Object(fields), after))
}

fn parse_key(ctx: &InputContext) -> Result<(String, InputContext), ConfigParseError> {
    let mut cursor = ctx.clone();
    let mut segments = Vec::new();
    loop {
        let (segment, after) = if cursor.peek_char() == Some('"') {
            parse_quoted_string(&cursor)?
        } else {
            parse_unquoted_key_segment(&cursor)?
        };
        segments.push(segment);
        cursor = after;
        if cursor.peek_char() == Some('.') {
            cursor = cursor.advance_bytes(1);
            continue;
        }
        break;
    }
    if segments.is_empty() || segments.iter().all(|s| s.is_empty()) {
        return Err(ConfigParseError::ExpectedKey { at: ctx.locate(ctx.offset()) });
    }
    Ok((segments.join("."), cursor))
}

fn parse_unquoted_key_segment(ctx: &InputContext) -> Result<(String, InputContext), ConfigParseError> {
    let text: String = ctx
        .remaining()
        .chars()
        .take_while(|c| !matches!(c, '.' | ':' | '=' | '{' | '}' | '[' | ']' | ',' | '"' | '$' | '#') && !c.is_whitespace())
        .collect();
    if text.is_empty() {
        return Err(ConfigParseError::ExpectedKey { at: ctx.locate(ctx.offset()) });
    }
    Ok((text.clone(), ctx.advance_bytes(text.len())))
}

/// Parses one value, then (same line only) keeps parsing further values to
/// concatenate with it until a separator, newline, or closing bracket is
/// reached — HOCON's value-concatenation rule.
fn parse_concatenated_value(
    ctx: &InputContext,
    scope: Scope,
) -> Result<(RawValue, InputContext), ConfigParseError> {
    let (first, mut cursor) = parse_value(ctx, scope)?;
    let mut pieces = vec![first];
    loop {
        let ws_skipped = text::ws().parse(&cursor);
        let after_ws = match ws_skipped {
            litmark_combinators::ParseResult::Success { next, .. } => next,
            litmark_combinators::ParseResult::Failure { at, .. } => at,
        };
        match after_ws.peek_char() {
            None => break,
            Some(c) if is_separator_or_close(c) => break,
            Some('#') => break,
            _ if after_ws.remaining().starts_with("//") => break,
            _ => {}
        }
        match parse_value(&after_ws, scope) {
            Ok((value, next)) => {
                pieces.push(value);
                cursor = next;
            }
            Err(_) => break,
        }
    }
    let value = if pieces.len() == 1 {
        pieces.into_iter().next().unwrap()
    } else {
        RawValue::Concat(pieces)
    };
    Ok((value, cursor))
}

fn parse_value(ctx: &InputContext, scope: Scope) -> Result<(RawValue, InputContext), ConfigParseError> {
    match ctx.peek_char() {
        Some('{') => parse_object(ctx, scope),
        Some('[') => parse_array(ctx, scope),
        Some('"') => {
            if ctx.remaining().starts_with("\"\"\"") {
                let (text, next) = parse_triple_quoted_string(ctx)?;
                Ok((RawValue::Str(text), next))
            } else {
                let (text, next) = parse_quoted_string(ctx)?;
                Ok((RawValue::Str(text), next))
            }
        }
        Some('$') if ctx.remaining().starts_with("${") => parse_substitution(ctx),
        Some(c) if c == '-' || c.is_ascii_digit() => parse_number(ctx),
        Some(_) => parse_unquoted_value(ctx),
        None => Err(ConfigParseError::ExpectedValue { at: ctx.locate(ctx.offset()) }),
    }
}

fn parse_array(ctx: &InputContext, scope: Scope) -> Result<(RawValue, InputContext), ConfigParseError> {
    debug_assert_eq!(ctx.peek_char(), Some('['));
    let mut cursor = skip_trivia(&ctx.advance_bytes(1));
    let mut items = Vec::new();
    loop {
        if cursor.peek_char() == Some(']') {
            return Ok((RawValue::Array(items), cursor.advance_bytes(1)));
        }
        if cursor.is_at_end() {
            return Err(ConfigParseError::UnterminatedArray { at: cursor.locate(cursor.offset()) });
        }
        let (value, after) = parse_concatenated_value(&cursor, scope)?;
        items.push(value);
        cursor = skip_trivia(&after);
        if cursor.peek_char() == Some(',') {
            cursor = skip_trivia(&cursor.advance_bytes(1));
        }
    }
}

fn parse_substitution(ctx: &InputContext) -> Result<(RawValue, InputContext), ConfigParseError> {
    debug_assert!(ctx.remaining().starts_with("${"));
    let mut cursor = ctx.advance_bytes(2);
    let optional = cursor.peek_char() == Some('?');
    if optional {
        cursor = cursor.advance_bytes(1);
    }
    let path: String = cursor
        .remaining()
        .chars()
        .take_while(|c| *c != '}')
        .collect();
    let after_path = cursor.advance_bytes(path.len());
    if after_path.peek_char() != Some('}') {
        return Err(ConfigParseError::InvalidSubstitution { at: ctx.locate(ctx.offset()) });
    }
    if path.is_empty() {
        return Err(ConfigParseError::InvalidSubstitution { at: ctx.locate(ctx.offset()) });
    }
    Ok((
        RawValue::Substitution { path, optional },
        after_path.advance_bytes(1),
    ))
}

fn parse_quoted_string(ctx: &InputContext) -> Result<(String, InputContext), ConfigParseError> {
    debug_assert_eq!(ctx.peek_char(), Some('"'));
    let mut cursor = ctx.advance_bytes(1);
    let mut text = String::new();
    loop {
        match cursor.peek_char() {
            None => return Err(ConfigParseError::UnclosedQuote { at: ctx.locate(ctx.offset()) }),
            Some('"') => return Ok((text, cursor.advance_bytes(1))),
            Some('\\') => {
                let after_backslash = cursor.advance_bytes(1);
                let source_char = after_backslash
                    .peek_char()
                    .ok_or_else(|| ConfigParseError::UnclosedQuote { at: ctx.locate(ctx.offset()) })?;
                let escaped = match source_char {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '"' => '"',
                    '\\' => '\\',
                    other => other,
                };
                text.push(escaped);
                cursor = after_backslash.advance_bytes(source_char.len_utf8());
            }
            Some(ch) => {
                text.push(ch);
                cursor = cursor.advance_bytes(ch.len_utf8());
            }
        }
    }
}

fn parse_triple_quoted_string(ctx: &InputContext) -> Result<(String, InputContext), ConfigParseError> {
    debug_assert!(ctx.remaining().starts_with("\"\"\""));
    let mut cursor = ctx.advance_bytes(3);
    let start = cursor.offset();
    loop {
        if cursor.remaining().starts_with("\"\"\"") {
            let text = ctx.slice(start, cursor.offset()).to_string();
            return Ok((text, cursor.advance_bytes(3)));
        }
        if cursor.is_at_end() {
            return Err(ConfigParseError::UnterminatedTripleQuote { at: ctx.locate(ctx.offset()) });
        }
        cursor = cursor.advance_char().expect("checked not at end");
    }
}

fn parse_number(ctx: &InputContext) -> Result<(RawValue, InputContext), ConfigParseError> {
    let mut cursor = ctx.clone();
    if cursor.peek_char() == Some('-') {
        cursor = cursor.advance_bytes(1);
    }
    let (_, after_int) = text::some_while(|c| c.is_ascii_digit())
        .parse(&cursor)
        .expect_success_or(|| ConfigParseError::ExpectedValue { at: ctx.locate(ctx.offset()) })?;
    cursor = after_int;
    let mut is_float = false;

    if cursor.peek_char() == Some('.') {
        let after_dot = cursor.advance_bytes(1);
        if after_dot.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            let (_, after_frac) = text::some_while(|c| c.is_ascii_digit())
                .parse(&after_dot)
                .expect_success_or(|| ConfigParseError::ExpectedValue { at: ctx.locate(ctx.offset()) })?;
            cursor = after_frac;
        }
    }
    if matches!(cursor.peek_char(), Some('e') | Some('E')) {
        let after_e = cursor.advance_bytes(1);
        let after_sign = if matches!(after_e.peek_char(), Some('+') | Some('-')) {
            after_e.advance_bytes(1)
        } else {
            after_e
        };
        if let litmark_combinators::ParseResult::Success { next, .. } =
            text::some_while(|c| c.is_ascii_digit()).parse(&after_sign)
        {
            is_float = true;
            cursor = next;
        }
    }

    let text = ctx.slice(ctx.offset(), cursor.offset());
    if is_float {
        let parsed: f64 = text
            .parse()
            .map_err(|_| ConfigParseError::ExpectedValue { at: ctx.locate(ctx.offset()) })?;
        Ok((RawValue::Double(parsed), cursor))
    } else {
        let parsed: i64 = text
            .parse()
            .map_err(|_| ConfigParseError::ExpectedValue { at: ctx.locate(ctx.offset()) })?;
        Ok((RawValue::Long(parsed), cursor))
    }
}

fn parse_unquoted_value(ctx: &InputContext) -> Result<(RawValue, InputContext), ConfigParseError> {
    let text: String = ctx
        .remaining()
        .chars()
        .take_while(|c| !matches!(c, '{' | '}' | '[' | ']' | ':' | '=' | ',' | '"' | '$' | '#') && *c != '\n')
        .collect();
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return Err(ConfigParseError::ExpectedValue { at: ctx.locate(ctx.offset()) });
    }
    let next = ctx.advance_bytes(trimmed.len());
    let value = match trimmed {
        "true" => RawValue::Bool(true),
        "false" => RawValue::Bool(false),
        "null" => RawValue::Null,
        other => RawValue::Str(other.to_string()),
    };
    Ok((value, next))
}

/// Small helper so number parsing can reuse the text-kit combinators while
/// reporting a `ConfigParseError` on failure instead of a generic parser
/// message.
trait ExpectSuccessOr<T> {
    fn expect_success_or<E>(self, err: impl FnOnce() -> E) -> Result<(T, InputContext), E>;
}

impl<T> ExpectSuccessOr<T> for litmark_combinators::ParseResult<T> {
    fn expect_success_or<E>(self, err: impl FnOnce() -> E) -> Result<(T, InputContext), E> {
        match self {
            litmark_combinators::ParseResult::Success { value, next } => Ok((value, next)),
            litmark_combinators::ParseResult::Failure { .. } => Err(err()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unresolved::find_raw_path;

    #[test]
    fn parses_flat_object_with_mixed_separators() {
        let config = parse("a = 1, b: 2\nc = true", Scope::DocumentScope).expect("parses");
        assert!(matches!(find_raw_path(&config.root, "a").unwrap().value, RawValue::Long(1)));
        assert!(matches!(find_raw_path(&config.root, "b").unwrap().value, RawValue::Long(2)));
        assert!(matches!(find_raw_path(&config.root, "c").unwrap().value, RawValue::Bool(true)));
    }

    #[test]
    fn dotted_keys_expand_into_nested_objects() {
        let config = parse("a.b.c = 1", Scope::DocumentScope).expect("parses");
        let found = find_raw_path(&config.root, "a.b.c").expect("nested path resolves");
        assert!(matches!(found.value, RawValue::Long(1)));
    }

    #[test]
    fn duplicate_object_keys_merge() {
        let config = parse("a { x = 1 }\na { y = 2 }", Scope::DocumentScope).expect("parses");
        assert!(matches!(find_raw_path(&config.root, "a.x").unwrap().value, RawValue::Long(1)));
        assert!(matches!(find_raw_path(&config.root, "a.y").unwrap().value, RawValue::Long(2)));
    }

    #[test]
    fn parses_substitution_forms() {
        let config = parse("a = ${foo}\nb = ${?bar}", Scope::DocumentScope).expect("parses");
        match &find_raw_path(&config.root, "a").unwrap().value {
            RawValue::Substitution { path, optional } => {
                assert_eq!(path, "foo");
                assert!(!optional);
            }
            other => panic!("expected substitution, got {other:?}"),
        }
        match &find_raw_path(&config.root, "b").unwrap().value {
            RawValue::Substitution { path, optional } => {
                assert_eq!(path, "bar");
                assert!(optional);
            }
            other => panic!("expected substitution, got {other:?}"),
        }
    }

    #[test]
    fn append_field_becomes_array() {
        let config = parse("a = [1]\na += 2", Scope::DocumentScope).expect("parses");
        match &find_raw_path(&config.root, "a").unwrap().value {
            RawValue::Array(items) => assert_eq!(items.len(), 2),
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn unclosed_quote_is_reported() {
        let err = parse("a = \"unterminated", Scope::DocumentScope).unwrap_err();
        assert!(matches!(err, ConfigParseError::UnclosedQuote { .. }));
    }
}
