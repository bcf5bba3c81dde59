//! The resolved configuration view: typed, dotted-path lookups over an
//! [`OrderedMap`] produced by [`crate::unresolved::UnresolvedConfig::resolve`].

use crate::codec::ConfigCodec;
use crate::error::ConfigError;
use crate::value::{ConfigEntry, NoAst, OrderedMap};

#[derive(Debug, Clone)]
pub struct Config<A: Clone = NoAst> {
    root: OrderedMap<A>,
}

impl<A: Clone> Default for Config<A> {
    fn default() -> Self {
        Config { root: OrderedMap::default() }
    }
}

impl<A: Clone> Config<A> {
    pub fn from_root(root: OrderedMap<A>) -> Self {
        Config { root }
    }

    pub fn root(&self) -> &OrderedMap<A> {
        &self.root
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.get_entry(key).is_some()
    }

    /// Navigates a dotted path through nested objects to the entry it names.
    pub fn get_entry(&self, key: &str) -> Option<&ConfigEntry<A>> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;
        for segment in segments {
            match &current.value {
                crate::value::ConfigValue::Object(inner) => {
                    current = inner.get(segment)?;
                }
                _ => return None,
            }
        }
        Some(current)
    }

    /// Decodes a required value, erroring if the key is missing.
    pub fn get<T: ConfigCodec<A>>(&self, key: &str) -> Result<T, ConfigError> {
        let entry = self
            .get_entry(key)
            .ok_or_else(|| ConfigError::Decode(crate::error::DecodeError::Missing { key: key.to_string() }))?;
        T::decode(&entry.value).map_err(|e| attribute_key(e, key)).map_err(ConfigError::Decode)
    }

    /// Decodes an optional value: `Ok(None)` when the key is absent.
    pub fn get_opt<T: ConfigCodec<A>>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        match self.get_entry(key) {
            None => Ok(None),
            Some(entry) => T::decode(&entry.value)
                .map(Some)
                .map_err(|e| attribute_key(e, key))
                .map_err(ConfigError::Decode),
        }
    }

    /// Decodes a value, falling back to `default` when the key is absent.
    pub fn get_or<T: ConfigCodec<A>>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        Ok(self.get_opt(key)?.unwrap_or(default))
    }
}

fn attribute_key(error: crate::error::DecodeError, key: &str) -> crate::error::DecodeError {
    match error {
        crate::error::DecodeError::TypeMismatch { expected, found, .. } => {
            crate::error::DecodeError::TypeMismatch { key: key.to_string(), expected, found }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::value::Scope;

    #[test]
    fn get_decodes_nested_value() {
        let config = parse("server { port = 8080 }", Scope::Global)
            .unwrap()
            .resolve(None)
            .unwrap();
        assert_eq!(config.get::<i64>("server.port").unwrap(), 8080);
    }

    #[test]
    fn get_opt_is_none_for_missing_key() {
        let config = parse("a = 1", Scope::Global).unwrap().resolve(None).unwrap();
        assert_eq!(config.get_opt::<i64>("absent").unwrap(), None);
    }

    #[test]
    fn get_or_falls_back_to_default() {
        let config = parse("a = 1", Scope::Global).unwrap().resolve(None).unwrap();
        assert_eq!(config.get_or::<i64>("absent", 42).unwrap(), 42);
    }

    #[test]
    fn get_errors_on_type_mismatch() {
        let config = parse("a = \"text\"", Scope::Global).unwrap().resolve(None).unwrap();
        let err = config.get::<i64>("a").unwrap_err();
        assert!(matches!(err, ConfigError::Decode(crate::error::DecodeError::TypeMismatch { .. })));
    }
}
