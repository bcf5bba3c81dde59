//! The concrete `DocumentCursor` (§4.6, §9 "pure zippers"): reconstructs a
//! document's view of its own config and the tree's global link targets
//! without owning any mutable state. Two cursors for the same document
//! snapshot are always equivalent — rewriting across documents stays
//! order-independent per §5's "Ordering guarantees".

use litmark_ast::{Config, ConfigValue, Document, DocumentCursor, LinkTarget, Selector};

pub struct TreeCursor<'a> {
    document: &'a Document,
    link_targets: Vec<LinkTarget>,
}

impl<'a> TreeCursor<'a> {
    pub fn new(document: &'a Document, known_selectors: impl Iterator<Item = Selector>) -> Self {
        TreeCursor { document, link_targets: known_selectors.map(LinkTarget::Selector).collect() }
    }
}

impl<'a> DocumentCursor for TreeCursor<'a> {
    fn resolve_reference(&self, dotted_path: &str) -> Option<ConfigValue> {
        self.document.config.get_entry(dotted_path).map(|entry| entry.value.clone())
    }

    fn merged_config(&self) -> &Config {
        &self.document.config
    }

    fn global_link_targets(&self) -> &[LinkTarget] {
        &self.link_targets
    }
}
