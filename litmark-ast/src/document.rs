//! `Document` and `DocumentTree` (§3): the containers a parsed document and
//! its surrounding tree of siblings, subtrees, and templates live in.

use std::collections::HashMap;

use litmark_combinators::VirtualPath;

use crate::block::Block;
use crate::config::{Config, UnresolvedConfig};
use crate::element::Element;
use crate::error::AstError;

/// Where a document sits among its siblings — enough for deterministic
/// autonumbering (`Selector::Anonymous`/`Autonumber`) without needing a
/// live reference back into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreePosition {
    pub index: usize,
    pub sibling_count: usize,
}

#[derive(Debug, Clone)]
pub struct Document {
    pub path: VirtualPath,
    pub content: Block,
    pub fragments: HashMap<String, Element>,
    pub config: Config,
    pub position: TreePosition,
}

impl Document {
    pub fn new(path: VirtualPath, content: Block, config: Config, position: TreePosition) -> Self {
        Document {
            path,
            content,
            fragments: HashMap::new(),
            config,
            position,
        }
    }
}

/// A recursive container of documents, subtrees, templates, and
/// declared styles/static-asset references.
///
/// Invariants (enforced by [`DocumentTree::new`]): `path` is absolute;
/// document and subtree names are unique within this tree.
#[derive(Debug, Clone)]
pub struct DocumentTree {
    pub path: VirtualPath,
    pub documents: Vec<Document>,
    pub subtrees: Vec<DocumentTree>,
    pub templates: HashMap<String, Block>,
    pub static_assets: Vec<VirtualPath>,
    pub styles: Vec<String>,
    /// The tree's own (unresolved) configuration; resolving it against a
    /// parent's already-resolved `Config` happens on demand via
    /// [`DocumentTree::resolved_config`], per §3's "merged view with
    /// parent fallbacks applied on demand".
    pub config: UnresolvedConfig,
}

impl DocumentTree {
    pub fn new(
        path: VirtualPath,
        documents: Vec<Document>,
        subtrees: Vec<DocumentTree>,
        templates: HashMap<String, Block>,
        static_assets: Vec<VirtualPath>,
        styles: Vec<String>,
        config: UnresolvedConfig,
    ) -> Result<Self, AstError> {
        if !path.is_absolute() {
            return Err(AstError::PathNotAbsolute { path: path.to_string() });
        }
        let mut seen = std::collections::HashSet::new();
        for document in &documents {
            if let Some(name) = document.path.name() {
                if !seen.insert(name.to_string()) {
                    return Err(AstError::DuplicateName {
                        parent: path.to_string(),
                        name: name.to_string(),
                    });
                }
            }
        }
        for subtree in &subtrees {
            if let Some(name) = subtree.path.name() {
                if !seen.insert(name.to_string()) {
                    return Err(AstError::DuplicateName {
                        parent: path.to_string(),
                        name: name.to_string(),
                    });
                }
            }
        }
        Ok(DocumentTree {
            path,
            documents,
            subtrees,
            templates,
            static_assets,
            styles,
            config,
        })
    }

    /// Resolves this tree's configuration against `parent`, per the
    /// "fallback chain" resolution rule (§4.3).
    pub fn resolved_config(&self, parent: Option<&litmark_config::Config>) -> Result<litmark_config::Config, litmark_config::ConfigResolveError> {
        self.config.resolve(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use litmark_config::Scope;

    fn empty_config() -> UnresolvedConfig {
        litmark_config::parse("", Scope::TreeScope).unwrap()
    }

    #[test]
    fn rejects_relative_path() {
        let err = DocumentTree::new(
            VirtualPath::parse("relative"),
            vec![],
            vec![],
            HashMap::new(),
            vec![],
            vec![],
            empty_config(),
        )
        .unwrap_err();
        assert!(matches!(err, AstError::PathNotAbsolute { .. }));
    }

    #[test]
    fn rejects_duplicate_document_names() {
        let doc = |name: &str| {
            Document::new(
                VirtualPath::parse(&format!("/{name}")),
                Block::Paragraph(vec![], Default::default()),
                litmark_config::Config::default(),
                TreePosition { index: 0, sibling_count: 1 },
            )
        };
        let err = DocumentTree::new(
            VirtualPath::root(),
            vec![doc("intro"), doc("intro")],
            vec![],
            HashMap::new(),
            vec![],
            vec![],
            empty_config(),
        )
        .unwrap_err();
        assert!(matches!(err, AstError::DuplicateName { .. }));
    }
}
