//! This crate's instantiation of `litmark_config`'s generic value/config
//! types, with `Element` plugged in for `ASTValue` entries (§3's
//! `Config value` variant `ASTValue(Element)`).

pub type ConfigValue = litmark_config::ConfigValue<crate::element::Element>;
pub type ConfigEntry = litmark_config::ConfigEntry<crate::element::Element>;
pub type Config = litmark_config::Config<crate::element::Element>;
pub type UnresolvedConfig = litmark_config::UnresolvedConfig;

/// `litmark_config::resolve` always produces a `Config<NoAst>` — textual
/// substitution can never itself produce an `ASTValue` — so a document's
/// header config is resolved plainly and then widened into this crate's
/// `Config<Element>`, whose `ASTValue` arm directive evaluation can later
/// populate by rebuilding entries through [`Config::from_root`].
pub fn widen(plain: litmark_config::Config<litmark_config::NoAst>) -> Config {
    Config::from_root(widen_map(plain.root().clone()))
}

fn widen_map(
    map: litmark_config::OrderedMap<litmark_config::NoAst>,
) -> litmark_config::OrderedMap<crate::element::Element> {
    let mut widened = litmark_config::OrderedMap::new();
    for (key, entry) in map.iter() {
        widened.insert(key.to_string(), litmark_config::ConfigEntry::new(widen_value(entry.value.clone()), entry.origin.clone()));
    }
    widened
}

fn widen_value(
    value: litmark_config::ConfigValue<litmark_config::NoAst>,
) -> litmark_config::ConfigValue<crate::element::Element> {
    match value {
        litmark_config::ConfigValue::Null => litmark_config::ConfigValue::Null,
        litmark_config::ConfigValue::Bool(b) => litmark_config::ConfigValue::Bool(b),
        litmark_config::ConfigValue::Long(n) => litmark_config::ConfigValue::Long(n),
        litmark_config::ConfigValue::Double(n) => litmark_config::ConfigValue::Double(n),
        litmark_config::ConfigValue::String(s) => litmark_config::ConfigValue::String(s),
        litmark_config::ConfigValue::Array(items) => {
            litmark_config::ConfigValue::Array(items.into_iter().map(widen_value).collect())
        }
        litmark_config::ConfigValue::Object(map) => litmark_config::ConfigValue::Object(widen_map(map)),
        litmark_config::ConfigValue::ASTValue(never) => match never {},
    }
}
