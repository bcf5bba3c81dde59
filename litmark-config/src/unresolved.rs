//! The intermediate tree produced by `parse`: substitution placeholders and
//! origins are preserved here, before `resolve` expands them into a
//! [`crate::value::Config`].

use crate::value::Origin;

/// An unresolved value: either a concrete literal, a nested object/array
/// still holding placeholders, or a substitution reference waiting to be
/// expanded.
#[derive(Debug, Clone)]
pub enum RawValue {
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    Str(String),
    Array(Vec<RawValue>),
    Object(Vec<(String, RawField)>),
    /// `${path}` (required) or `${?path}` (optional — absent rather than an
    /// error if nothing resolves it).
    Substitution { path: String, optional: bool },
    /// Adjacent values concatenated on the same line, e.g. `foo ${bar} baz`.
    Concat(Vec<RawValue>),
}

#[derive(Debug, Clone)]
pub struct RawField {
    pub value: RawValue,
    pub origin: Origin,
    /// Set when this field was declared with `+=` rather than `=`/`:`.
    pub append: bool,
}

impl RawField {
    pub fn new(value: RawValue, origin: Origin) -> Self {
        RawField {
            value,
            origin,
            append: false,
        }
    }
}

/// The result of `parse`: a root object of fields, not yet resolved.
#[derive(Debug, Clone, Default)]
pub struct UnresolvedConfig {
    pub root: Vec<(String, RawField)>,
}

impl UnresolvedConfig {
    pub fn new(root: Vec<(String, RawField)>) -> Self {
        UnresolvedConfig { root }
    }
}

/// Inserts `field` at `key` into `fields`, applying the same merge rule
/// `OrderedMap::insert` applies to resolved values (objects merge
/// recursively; anything else replaces), plus the `+=` field-append rule:
/// an appended field becomes (or extends) an array regardless of what
/// preceded it.
pub fn insert_field(fields: &mut Vec<(String, RawField)>, key: String, field: RawField) {
    if field.append {
        if let Some(existing_index) = fields.iter().position(|(k, _)| *k == key) {
            let existing = fields[existing_index].1.clone();
            let mut elements = match existing.value {
                RawValue::Array(items) => items,
                other => vec![other],
            };
            elements.push(field.value);
            fields[existing_index].1 = RawField::new(RawValue::Array(elements), field.origin);
        } else {
            fields.push((key, RawField::new(RawValue::Array(vec![field.value]), field.origin)));
        }
        return;
    }

    if let Some(existing_index) = fields.iter().position(|(k, _)| *k == key) {
        let merged = match (&fields[existing_index].1.value, &field.value) {
            (RawValue::Object(old), RawValue::Object(new)) => {
                let mut merged_fields = old.clone();
                for (k, v) in new {
                    insert_field(&mut merged_fields, k.clone(), v.clone());
                }
                RawField::new(RawValue::Object(merged_fields), field.origin)
            }
            _ => field,
        };
        fields[existing_index].1 = merged;
    } else {
        fields.push((key, field));
    }
}

/// Inserts a field declared under a dotted key (`a.b.c = 1`) by expanding it
/// into nested single-segment objects before merging it in, per the "path
/// expressions equivalent to nested objects" rule.
pub fn insert_dotted(fields: &mut Vec<(String, RawField)>, dotted_key: &str, field: RawField) {
    let mut segments = dotted_key.split('.');
    let first = segments.next().expect("split always yields at least one segment");
    let remaining: Vec<&str> = segments.collect();
    if remaining.is_empty() {
        insert_field(fields, first.to_string(), field);
        return;
    }
    let nested_key = remaining.join(".");
    let origin = field.origin.clone();
    let append = field.append;
    let mut inner_fields = Vec::new();
    let mut inner_field = RawField::new(field.value, origin.clone());
    inner_field.append = append;
    insert_dotted(&mut inner_fields, &nested_key, inner_field);
    insert_field(fields, first.to_string(), RawField::new(RawValue::Object(inner_fields), origin));
}

/// Looks up a dotted path directly within a raw field list, without
/// resolving anything it finds — used by substitution resolution to locate
/// the field a `${path}` reference points at.
pub fn find_raw_path<'a>(fields: &'a [(String, RawField)], path: &str) -> Option<&'a RawField> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = fields.iter().find(|(k, _)| k == first).map(|(_, f)| f)?;
    for segment in segments {
        match &current.value {
            RawValue::Object(inner) => {
                current = inner.iter().find(|(k, _)| k == segment).map(|(_, f)| f)?;
            }
            _ => return None,
        }
    }
    Some(current)
}
