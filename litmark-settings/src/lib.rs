//! Operational settings for the toolkit's own defaults (§1.1): tab
//! expansion, the recursion nesting cap `InputContext::nested_at` enforces
//! against, and directive fence/separator defaults. Distinct from
//! `litmark-config`'s HOCON-compatible *document* configuration model —
//! this crate's `LitmarkConfig` never appears inside a parsed document.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/litmark.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct LitmarkConfig {
    pub parsing: ParsingConfig,
    pub directives: DirectivesConfig,
    pub rewrite: RewriteConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParsingConfig {
    pub tab_width: usize,
    pub max_nest_level: u32,
    pub expand_tabs: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectivesConfig {
    pub default_fence: String,
    pub max_separator_occurrences: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RewriteConfig {
    pub max_phase_passes: u32,
}

/// Layers user overrides over the embedded defaults before deserializing.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Loader { builder }
    }

    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref()).format(FileFormat::Toml).required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref()).format(FileFormat::Toml).required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<LitmarkConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Loader::new()
    }
}

pub fn load_defaults() -> Result<LitmarkConfig, ConfigError> {
    Loader::new().build()
}
