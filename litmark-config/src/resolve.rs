//! Expands an [`UnresolvedConfig`] into a resolved [`crate::config::Config`]
//! by following substitutions against the tree itself and, failing that, a
//! fallback chain, with cycle detection and `${?path}` absence handling.

use crate::config::Config;
use crate::error::ConfigResolveError;
use crate::unresolved::{find_raw_path, RawField, RawValue, UnresolvedConfig};
use crate::value::{ConfigEntry, ConfigValue, NoAst, OrderedMap, Origin};

impl UnresolvedConfig {
    /// Resolves substitutions by looking up first within this tree, then in
    /// `fallback` if given, merging objects and returning the first error
    /// encountered.
    pub fn resolve(&self, fallback: Option<&Config>) -> Result<Config, ConfigResolveError> {
        let resolver = Resolver {
            root: &self.root,
            fallback,
        };
        let mut visiting = Vec::new();
        let root = resolver.resolve_object(&self.root, &mut visiting)?;
        Ok(Config::from_root(root))
    }
}

struct Resolver<'a> {
    root: &'a [(String, RawField)],
    fallback: Option<&'a Config>,
}

impl<'a> Resolver<'a> {
    fn resolve_object(
        &self,
        fields: &[(String, RawField)],
        visiting: &mut Vec<String>,
    ) -> Result<OrderedMap<NoAst>, ConfigResolveError> {
        let mut map = OrderedMap::new();
        for (key, field) in fields {
            match self.resolve_value(&field.value, visiting)? {
                Some(value) => map.insert(key.clone(), ConfigEntry::new(value, field.origin.clone())),
                None => {
                    log::debug!("dropping unresolved optional substitution at {key}");
                }
            }
        }
        Ok(map)
    }

    fn resolve_value(
        &self,
        value: &RawValue,
        visiting: &mut Vec<String>,
    ) -> Result<Option<ConfigValue<NoAst>>, ConfigResolveError> {
        match value {
            RawValue::Null => Ok(Some(ConfigValue::Null)),
            RawValue::Bool(b) => Ok(Some(ConfigValue::Bool(*b))),
            RawValue::Long(n) => Ok(Some(ConfigValue::Long(*n))),
            RawValue::Double(n) => Ok(Some(ConfigValue::Double(*n))),
            RawValue::Str(s) => Ok(Some(ConfigValue::String(s.clone()))),
            RawValue::Array(items) => {
                let mut resolved = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(v) = self.resolve_value(item, visiting)? {
                        resolved.push(v);
                    }
                }
                Ok(Some(ConfigValue::Array(resolved)))
            }
            RawValue::Object(fields) => Ok(Some(ConfigValue::Object(self.resolve_object(fields, visiting)?))),
            RawValue::Substitution { path, optional } => self.lookup(path, *optional, visiting),
            RawValue::Concat(pieces) => {
                let mut rendered = String::new();
                for piece in pieces {
                    if let Some(v) = self.resolve_value(piece, visiting)? {
                        rendered.push_str(&v.render_for_concat());
                    }
                }
                Ok(Some(ConfigValue::String(rendered)))
            }
        }
    }

    fn lookup(
        &self,
        path: &str,
        optional: bool,
        visiting: &mut Vec<String>,
    ) -> Result<Option<ConfigValue<NoAst>>, ConfigResolveError> {
        if visiting.contains(&path.to_string()) {
            let mut cycle = visiting.clone();
            cycle.push(path.to_string());
            return Err(ConfigResolveError::CircularSubstitution { cycle });
        }
        visiting.push(path.to_string());
        let found_locally = find_raw_path(self.root, path)
            .map(|field| self.resolve_value(&field.value, visiting))
            .transpose()?
            .flatten();
        visiting.pop();

        let resolved = match found_locally {
            Some(value) => Some(value),
            None => self
                .fallback
                .and_then(|config| config.get_entry(path))
                .map(|entry| entry.value.clone()),
        };

        if resolved.is_none() && !optional {
            return Err(ConfigResolveError::UnresolvedSubstitution { path: path.to_string() });
        }
        Ok(resolved)
    }
}
