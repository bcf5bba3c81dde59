//! Parses the invocation surface described in §4.5: `@:name(pos, …) {
//! named=val, … } fence\n ...body... \n@:@fence`, plus splitting a body on
//! `@:sepName` markers for `separated_body`.

use std::collections::HashMap;

use litmark_combinators::InputContext;

use crate::error::DirectiveFailure;

#[derive(Debug, Clone)]
pub struct DirectiveHeader {
    pub name: String,
    pub positional: Vec<String>,
    pub named: HashMap<String, String>,
    pub fence: Option<String>,
}

/// Counts required for one declared `separated_body` separator.
#[derive(Debug, Clone)]
pub struct SeparatorSpec {
    pub name: String,
    pub min: usize,
    pub max: usize,
}

impl SeparatorSpec {
    pub fn new(name: impl Into<String>, min: usize, max: usize) -> Self {
        SeparatorSpec { name: name.into(), min, max }
    }
}

/// Recognizes a directive start at `ctx` and parses its header line. Returns
/// `None` if `ctx` does not begin with `@:`.
pub fn parse_header(ctx: &InputContext) -> Option<(DirectiveHeader, InputContext)> {
    if !ctx.remaining().starts_with("@:") {
        return None;
    }
    let mut cursor = ctx.advance_bytes(2);

    let (name, next) = take_while(cursor, |c| c.is_alphanumeric() || c == '_' || c == '-');
    cursor = next;
    if name.is_empty() {
        return None;
    }

    let mut positional = Vec::new();
    if cursor.peek_char() == Some('(') {
        cursor = cursor.advance_bytes(1);
        loop {
            cursor = skip_while(cursor, |c| c == ' ' || c == '\t');
            match cursor.peek_char() {
                Some(')') => {
                    cursor = cursor.advance_bytes(1);
                    break;
                }
                None => break,
                _ => {}
            }
            let (token, next) = take_while(cursor, |c| c != ',' && c != ')');
            cursor = next;
            positional.push(token.trim().to_string());
            if cursor.peek_char() == Some(',') {
                cursor = cursor.advance_bytes(1);
            }
        }
    }

    cursor = skip_while(cursor, |c| c == ' ' || c == '\t');
    let mut named = HashMap::new();
    if cursor.peek_char() == Some('{') {
        cursor = cursor.advance_bytes(1);
        loop {
            cursor = skip_while(cursor, |c| c.is_whitespace());
            match cursor.peek_char() {
                Some('}') => {
                    cursor = cursor.advance_bytes(1);
                    break;
                }
                None => break,
                _ => {}
            }
            let (key, next) = take_while(cursor, |c| c != '=' && c != ',' && c != '}');
            cursor = next;
            let key = key.trim().to_string();
            if key.is_empty() {
                break;
            }
            if cursor.peek_char() == Some('=') {
                cursor = cursor.advance_bytes(1);
            }
            let (value, next) = take_while(cursor, |c| c != ',' && c != '}' && c != '\n');
            cursor = next;
            named.insert(key, value.trim().to_string());
            if cursor.peek_char() == Some(',') {
                cursor = cursor.advance_bytes(1);
            }
        }
    }

    let (line_rest, next) = take_while(cursor, |c| c != '\n');
    cursor = next;
    let fence = {
        let trimmed = line_rest.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    };
    if cursor.peek_char() == Some('\n') {
        cursor = cursor.advance_bytes(1);
    }

    Some((DirectiveHeader { name, positional, named, fence }, cursor))
}

/// Captures everything up to (and consuming) the matching `@:@`/`@:@fence`
/// end marker, tracking nesting so a nested directive's own `@:@` doesn't
/// close the outer one prematurely. Runs to end of input if no end marker
/// is ever found.
pub fn capture_body(ctx: &InputContext, fence: Option<&str>) -> (String, InputContext) {
    let close_marker = match fence {
        Some(f) => format!("@:@{f}"),
        None => "@:@".to_string(),
    };
    let remaining = ctx.remaining();
    let mut depth: i32 = 0;
    let mut consumed = 0usize;
    let mut body = String::new();

    for line in remaining.split_inclusive('\n') {
        let trimmed = line.trim_end_matches('\n').trim();
        if trimmed == close_marker {
            consumed += line.len();
            if depth == 0 {
                break;
            }
            depth -= 1;
            body.push_str(line);
            continue;
        }
        if trimmed.starts_with("@:") && !trimmed.starts_with("@:@") {
            depth += 1;
        }
        body.push_str(line);
        consumed += line.len();
    }

    (body, ctx.advance_bytes(consumed))
}

/// Splits `body` on top-level `@:sepName` marker lines. A marker whose name
/// is not among `separators` is recorded in `errors` as an orphaned
/// separator and left in place as ordinary text.
pub fn split_separated_body(
    body: &str,
    separators: &[SeparatorSpec],
    errors: &mut Vec<String>,
) -> (String, Vec<(String, String)>) {
    let names: Vec<&str> = separators.iter().map(|s| s.name.as_str()).collect();
    let mut main_body = String::new();
    let mut current_name: Option<String> = None;
    let mut current_text = String::new();
    let mut segments: Vec<(String, String)> = Vec::new();

    for line in body.split_inclusive('\n') {
        let trimmed = line.trim_end_matches('\n').trim();
        let looks_like_marker =
            trimmed.starts_with("@:") && trimmed != "@:@" && !trimmed.contains('(') && !trimmed.contains('{');
        if looks_like_marker {
            let marker_name = trimmed.trim_start_matches("@:").trim().to_string();
            if !names.contains(&marker_name.as_str()) {
                errors.push(DirectiveFailure::OrphanedSeparator { name: marker_name }.to_string());
                current_text.push_str(line);
                continue;
            }
            match current_name.take() {
                Some(name) => segments.push((name, std::mem::take(&mut current_text))),
                None => main_body = std::mem::take(&mut current_text),
            }
            current_name = Some(marker_name);
            continue;
        }
        current_text.push_str(line);
    }
    match current_name.take() {
        Some(name) => segments.push((name, current_text)),
        None => main_body = current_text,
    }

    (main_body, segments)
}

fn take_while(ctx: InputContext, pred: impl Fn(char) -> bool) -> (String, InputContext) {
    let mut out = String::new();
    let mut cursor = ctx;
    while let Some(c) = cursor.peek_char() {
        if !pred(c) {
            break;
        }
        out.push(c);
        cursor = cursor.advance_char().expect("peek_char just returned Some");
    }
    (out, cursor)
}

fn skip_while(ctx: InputContext, pred: impl Fn(char) -> bool) -> InputContext {
    take_while(ctx, pred).1
}
