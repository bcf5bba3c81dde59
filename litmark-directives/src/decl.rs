//! The declaration combinators (§4.5): `attribute`, `body`,
//! `separated_body`, `all_attributes`, `cursor`, `parser`, `empty`, composed
//! with `seq`/`map` into the spec the host directive builds from.

use std::collections::HashMap;
use std::rc::Rc;

use litmark_combinators::SourceFragment;

use crate::invocation::SeparatorSpec;

/// Everything the declaration combinators read from a recognized directive
/// invocation, already split into header fields and raw body text.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub name: String,
    pub positional: Vec<String>,
    pub named: HashMap<String, String>,
    pub body_text: String,
    pub source: SourceFragment,
    pub recursive_parser: Option<Rc<dyn RecursiveParser>>,
}

/// The host parser's recursive block/span entry points, handed to a
/// directive declaration that requests `parser()`. Defined here (rather
/// than in `litmark-engine`, which depends on this crate for the directive
/// machinery) so a declaration can reference "a recursive parser handle"
/// without a circular crate dependency — the same inversion used for
/// `DocumentCursor` in `litmark-ast`.
pub trait RecursiveParser {
    fn parse_blocks(&self, source: &str) -> Result<Vec<litmark_ast::Block>, String>;
    fn parse_spans(&self, source: &str) -> Result<Vec<litmark_ast::Span>, String>;
}

/// A declaration: reads zero or more pieces of an [`Invocation`], pushing a
/// message onto `errors` for each piece that's missing or fails to convert,
/// and returning `None` overall iff any piece failed. Errors are never
/// short-circuited — every declared piece is attempted, per §4.5 item 3.
pub struct DirectiveDecl<T> {
    read: Rc<dyn Fn(&Invocation, &mut Vec<String>) -> Option<T>>,
}

impl<T> Clone for DirectiveDecl<T> {
    fn clone(&self) -> Self {
        DirectiveDecl { read: self.read.clone() }
    }
}

impl<T: 'static> DirectiveDecl<T> {
    pub fn run(&self, invocation: &Invocation, errors: &mut Vec<String>) -> Option<T> {
        (self.read)(invocation, errors)
    }

    pub fn map<U: 'static>(&self, f: impl Fn(T) -> U + 'static) -> DirectiveDecl<U> {
        let read = self.read.clone();
        DirectiveDecl { read: Rc::new(move |inv, errors| read(inv, errors).map(&f)) }
    }

    /// Runs both declarations regardless of whether the first fails, so
    /// their errors both land in the same accumulator before the overall
    /// result collapses to `None`.
    pub fn seq<U: 'static>(&self, other: &DirectiveDecl<U>) -> DirectiveDecl<(T, U)> {
        let a = self.read.clone();
        let b = other.read.clone();
        DirectiveDecl {
            read: Rc::new(move |inv, errors| {
                let left = a(inv, errors);
                let right = b(inv, errors);
                match (left, right) {
                    (Some(x), Some(y)) => Some((x, y)),
                    _ => None,
                }
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub enum AttributeSelector {
    Positional(usize),
    Named(String),
}

fn lookup(invocation: &Invocation, selector: &AttributeSelector) -> Option<String> {
    match selector {
        AttributeSelector::Positional(index) => invocation.positional.get(*index).cloned(),
        AttributeSelector::Named(name) => invocation.named.get(name).cloned(),
    }
}

fn describe(selector: &AttributeSelector) -> String {
    match selector {
        AttributeSelector::Positional(index) => format!("at position {index}"),
        AttributeSelector::Named(name) => format!("'{name}'"),
    }
}

/// A required attribute, by position or name, converted with `convert`.
pub fn attribute<T: 'static>(
    selector: AttributeSelector,
    convert: impl Fn(&str) -> Result<T, String> + 'static,
) -> DirectiveDecl<T> {
    DirectiveDecl {
        read: Rc::new(move |invocation, errors| match lookup(invocation, &selector) {
            None => {
                errors.push(format!("missing required attribute {}", describe(&selector)));
                None
            }
            Some(raw) => match convert(&raw) {
                Ok(value) => Some(value),
                Err(message) => {
                    errors.push(format!("invalid attribute {}: {message}", describe(&selector)));
                    None
                }
            },
        }),
    }
}

/// An attribute whose absence is not an error — `.optional` in §4.5's
/// prose, expressed as a distinct builder since Rust has no method that
/// can retroactively relax a closure already captured by `attribute`.
pub fn attribute_optional<T: 'static>(
    selector: AttributeSelector,
    convert: impl Fn(&str) -> Result<T, String> + 'static,
) -> DirectiveDecl<Option<T>> {
    DirectiveDecl {
        read: Rc::new(move |invocation, errors| match lookup(invocation, &selector) {
            None => Some(None),
            Some(raw) => match convert(&raw) {
                Ok(value) => Some(Some(value)),
                Err(message) => {
                    errors.push(format!("invalid attribute {}: {message}", describe(&selector)));
                    None
                }
            },
        }),
    }
}

pub fn string_converter(raw: &str) -> Result<String, String> {
    Ok(raw.to_string())
}

pub fn int_converter(raw: &str) -> Result<i64, String> {
    raw.trim().parse::<i64>().map_err(|_| format!("'{raw}' is not an integer"))
}

pub fn bool_converter(raw: &str) -> Result<bool, String> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(format!("'{other}' is not a boolean")),
    }
}

/// The required body, parsed by the host language's own block or span
/// parser (supplied as `parse`).
pub fn body<C: 'static>(parse: impl Fn(&str) -> Result<C, String> + 'static) -> DirectiveDecl<C> {
    DirectiveDecl {
        read: Rc::new(move |invocation, errors| match parse(&invocation.body_text) {
            Ok(value) => Some(value),
            Err(message) => {
                errors.push(format!("invalid body: {message}"));
                None
            }
        }),
    }
}

/// A body split on separator markers (§4.5 item 4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Multipart<C> {
    pub main_body: C,
    pub children: Vec<(String, C)>,
}

pub fn separated_body<C: 'static>(
    separators: Vec<SeparatorSpec>,
    parse: impl Fn(&str) -> Result<C, String> + 'static,
) -> DirectiveDecl<Multipart<C>> {
    DirectiveDecl {
        read: Rc::new(move |invocation, errors| {
            let mut local = Vec::new();
            let (main_text, segments) = crate::invocation::split_separated_body(&invocation.body_text, &separators, &mut local);
            for spec in &separators {
                let actual = segments.iter().filter(|(name, _)| name == &spec.name).count();
                if actual < spec.min {
                    local.push(crate::error::too_few_message(&spec.name, spec.min, actual));
                }
                if actual > spec.max {
                    local.push(crate::error::too_many_message(&spec.name, spec.max, actual));
                }
            }

            let main_body = match parse(&main_text) {
                Ok(value) => Some(value),
                Err(message) => {
                    local.push(format!("invalid body: {message}"));
                    None
                }
            };
            let mut children = Vec::new();
            for (name, text) in &segments {
                match parse(text) {
                    Ok(value) => children.push((name.clone(), value)),
                    Err(message) => local.push(format!("invalid body for separator '{name}': {message}")),
                }
            }

            let succeeded = local.is_empty();
            errors.extend(local);
            if succeeded {
                Some(Multipart { main_body: main_body.expect("no errors implies main_body parsed"), children })
            } else {
                None
            }
        }),
    }
}

/// The whole attribute set as a `Config`, positional attributes addressed
/// as `_0`, `_1`, … and named attributes under their own key.
pub fn all_attributes() -> DirectiveDecl<litmark_ast::Config> {
    DirectiveDecl {
        read: Rc::new(|invocation, _errors| {
            let mut root = litmark_config::OrderedMap::new();
            for (index, value) in invocation.positional.iter().enumerate() {
                root.insert(
                    format!("_{index}"),
                    litmark_config::ConfigEntry::new(
                        litmark_config::ConfigValue::String(value.clone()),
                        litmark_config::Origin::new(litmark_config::Scope::DirectiveScope, format!("_{index}")),
                    ),
                );
            }
            for (key, value) in &invocation.named {
                root.insert(
                    key.clone(),
                    litmark_config::ConfigEntry::new(
                        litmark_config::ConfigValue::String(value.clone()),
                        litmark_config::Origin::new(litmark_config::Scope::DirectiveScope, key.clone()),
                    ),
                );
            }
            Some(litmark_ast::widen(litmark_config::Config::from_root(root)))
        }),
    }
}

/// A marker value produced by [`cursor`], carrying nothing itself — its
/// presence in a declaration is what tells [`crate::spec::DirectiveSpec`]
/// to defer the build step to a later rewrite phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorRequested;

pub fn cursor() -> DirectiveDecl<CursorRequested> {
    DirectiveDecl { read: Rc::new(|_invocation, _errors| Some(CursorRequested)) }
}

pub fn parser() -> DirectiveDecl<Rc<dyn RecursiveParser>> {
    DirectiveDecl {
        read: Rc::new(|invocation, errors| match &invocation.recursive_parser {
            Some(handle) => Some(handle.clone()),
            None => {
                errors.push("no recursive parser handle available".to_string());
                None
            }
        }),
    }
}

/// A directive that takes no inputs at all.
pub fn empty<T: Clone + 'static>(value: T) -> DirectiveDecl<T> {
    DirectiveDecl { read: Rc::new(move |_invocation, _errors| Some(value.clone())) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use litmark_combinators::{Position, VirtualPath};

    fn invocation(positional: Vec<&str>, named: &[(&str, &str)], body_text: &str) -> Invocation {
        Invocation {
            name: "dir".to_string(),
            positional: positional.into_iter().map(str::to_string).collect(),
            named: named.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            body_text: body_text.to_string(),
            source: SourceFragment {
                path: VirtualPath::root(),
                start: Position::default(),
                end: Position::default(),
                text: body_text.to_string(),
            },
            recursive_parser: None,
        }
    }

    #[test]
    fn required_attribute_reports_missing() {
        let decl = attribute::<i64>(AttributeSelector::Positional(3), int_converter);
        let mut errors = Vec::new();
        let result = decl.run(&invocation(vec!["a"], &[], ""), &mut errors);
        assert!(result.is_none());
        assert_eq!(errors, vec!["missing required attribute at position 3".to_string()]);
    }

    #[test]
    fn seq_accumulates_both_sides_errors() {
        let a = attribute::<i64>(AttributeSelector::Positional(5), int_converter);
        let b = attribute::<i64>(AttributeSelector::Named("missing".to_string()), int_converter);
        let combined = a.seq(&b);
        let mut errors = Vec::new();
        let result = combined.run(&invocation(vec![], &[], ""), &mut errors);
        assert!(result.is_none());
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn separated_body_enforces_min_counts() {
        let decl = separated_body::<String>(vec![SeparatorSpec::new("foo", 1, 1)], |text| Ok(text.to_string()));
        let mut errors = Vec::new();
        let result = decl.run(&invocation(vec![], &[], "main\n"), &mut errors);
        assert!(result.is_none());
        assert_eq!(errors, vec!["too few occurrences of separator directive 'foo': expected min: 1, actual: 0".to_string()]);
    }
}
