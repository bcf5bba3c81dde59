//! Per-node metadata every `Block`/`Span` carries (§3): an optional id and a
//! set of style tags.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeOptions {
    pub id: Option<String>,
    pub styles: BTreeSet<String>,
}

impl NodeOptions {
    pub fn new() -> Self {
        NodeOptions::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.styles.insert(style.into());
        self
    }
}
