//! Typed decode/encode for configuration values (§4.3, §9).
//!
//! `ConfigCodec` is implemented on the Rust type being decoded into, the
//! way `serde::Deserialize` is, rather than as a lookup keyed by the target
//! type — a natural adaptation of the design note's `decode`/`encode` pair
//! to an idiomatic trait shape.

use std::collections::HashMap;

use litmark_combinators::VirtualPath;

use crate::error::DecodeError;
use crate::value::{ConfigValue, NoAst};

pub trait ConfigCodec<A: Clone = NoAst>: Sized {
    fn decode(value: &ConfigValue<A>) -> Result<Self, DecodeError>;
    fn encode(&self) -> ConfigValue<A>;
}

fn mismatch<T>(expected: &'static str, value: &ConfigValue<impl Clone>) -> Result<T, DecodeError> {
    Err(DecodeError::TypeMismatch {
        key: String::new(),
        expected,
        found: value.type_name(),
    })
}

impl<A: Clone> ConfigCodec<A> for String {
    fn decode(value: &ConfigValue<A>) -> Result<Self, DecodeError> {
        match value {
            ConfigValue::String(s) => Ok(s.clone()),
            other => mismatch("string", other),
        }
    }

    fn encode(&self) -> ConfigValue<A> {
        ConfigValue::String(self.clone())
    }
}

impl<A: Clone> ConfigCodec<A> for i64 {
    fn decode(value: &ConfigValue<A>) -> Result<Self, DecodeError> {
        match value {
            ConfigValue::Long(n) => Ok(*n),
            other => mismatch("long", other),
        }
    }

    fn encode(&self) -> ConfigValue<A> {
        ConfigValue::Long(*self)
    }
}

impl<A: Clone> ConfigCodec<A> for f64 {
    fn decode(value: &ConfigValue<A>) -> Result<Self, DecodeError> {
        match value {
            ConfigValue::Double(n) => Ok(*n),
            ConfigValue::Long(n) => Ok(*n as f64),
            other => mismatch("double", other),
        }
    }

    fn encode(&self) -> ConfigValue<A> {
        ConfigValue::Double(*self)
    }
}

impl<A: Clone> ConfigCodec<A> for bool {
    fn decode(value: &ConfigValue<A>) -> Result<Self, DecodeError> {
        match value {
            ConfigValue::Bool(b) => Ok(*b),
            other => mismatch("boolean", other),
        }
    }

    fn encode(&self) -> ConfigValue<A> {
        ConfigValue::Bool(*self)
    }
}

impl<A: Clone, T: ConfigCodec<A>> ConfigCodec<A> for Vec<T> {
    fn decode(value: &ConfigValue<A>) -> Result<Self, DecodeError> {
        match value {
            ConfigValue::Array(items) => items.iter().map(T::decode).collect(),
            other => mismatch("array", other),
        }
    }

    fn encode(&self) -> ConfigValue<A> {
        ConfigValue::Array(self.iter().map(T::encode).collect())
    }
}

impl<A: Clone, T: ConfigCodec<A>> ConfigCodec<A> for HashMap<String, T> {
    fn decode(value: &ConfigValue<A>) -> Result<Self, DecodeError> {
        match value {
            ConfigValue::Object(map) => map
                .iter()
                .map(|(k, entry)| T::decode(&entry.value).map(|v| (k.to_string(), v)))
                .collect(),
            other => mismatch("object", other),
        }
    }

    fn encode(&self) -> ConfigValue<A> {
        let mut map = crate::value::OrderedMap::new();
        for (k, v) in self {
            map.insert(
                k.clone(),
                crate::value::ConfigEntry::new(
                    v.encode(),
                    crate::value::Origin::new(crate::value::Scope::DocumentScope, k.clone()),
                ),
            );
        }
        ConfigValue::Object(map)
    }
}

/// Decodes a `VirtualPath`, resolving a relative value against the
/// directory the declaring field's origin path points into — distinct from
/// the blanket `ConfigCodec` impls above because it needs the entry's
/// origin, not just its value.
pub fn decode_virtual_path<A: Clone>(
    entry: &crate::value::ConfigEntry<A>,
) -> Result<VirtualPath, DecodeError> {
    let raw = match &entry.value {
        ConfigValue::String(s) => s.clone(),
        other => return mismatch("string", other),
    };
    let candidate = VirtualPath::parse(&raw);
    if candidate.is_absolute() {
        return Ok(candidate);
    }
    let origin_path = VirtualPath::parse(&entry.origin.path);
    Ok(origin_path.join(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ConfigEntry, Origin, Scope};

    #[test]
    fn string_codec_round_trips() {
        let value = "hello".to_string().encode();
        assert_eq!(String::decode(&value).unwrap(), "hello");
    }

    #[test]
    fn virtual_path_resolves_relative_to_origin() {
        let entry = ConfigEntry::<NoAst>::new(
            ConfigValue::String("figures/one.png".to_string()),
            Origin::new(Scope::DocumentScope, "/chapters/intro"),
        );
        let path = decode_virtual_path(&entry).unwrap();
        assert_eq!(path.as_str(), "/chapters/figures/one.png");
    }
}
