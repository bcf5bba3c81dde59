//! Cross-document target resolution (§4.6): "the rewriter builds, before
//! any resolve-phase walk, a global map `Selector -> TargetResolver` by
//! unioning per-document link-target providers".
//!
//! Only `Selector::Unique` targets are collected here, sourced from a
//! node's `NodeOptions.id` — the selector kind a `name=` anchor or a link
//! alias declaration produces. `Path`/`Anonymous`/`Autonumber`/`Autosymbol`
//! selectors are assigned by flavor-specific numbering schemes this crate
//! doesn't define (out of scope, like the markup flavors themselves); a
//! caller wiring up numbering can still populate the map it hands to
//! `RewriteDriver::new` with additional entries before running it.
//!
//! A `SpanLink` that carries its own `id` is an alias declaration rather
//! than a terminal anchor: `[foo]{id=foo}(bar)` both names `foo` and points
//! onward at `bar`, so resolving `foo` means following `bar` in turn. Every
//! other id-bearing node is terminal — its own location is the anchor.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use litmark_ast::{Block, Document, DocumentTree, LinkTarget, Span};
use litmark_combinators::VirtualPath;

use crate::error::DuplicateTargetError;

/// Where a `Selector::Unique(name)` resolves to, or why it can't.
#[derive(Debug, Clone)]
pub enum TargetResolver {
    Unique { document: VirtualPath, anchor: String },
    Alias { document: VirtualPath, target: LinkTarget },
    Duplicate(DuplicateTargetError),
}

pub fn build_target_table(tree: &DocumentTree) -> HashMap<String, TargetResolver> {
    let mut table = HashMap::new();
    collect_tree(tree, &mut table);
    table
}

fn collect_tree(tree: &DocumentTree, table: &mut HashMap<String, TargetResolver>) {
    for document in &tree.documents {
        collect_document(document, table);
    }
    for subtree in &tree.subtrees {
        collect_tree(subtree, table);
    }
}

fn collect_document(document: &Document, table: &mut HashMap<String, TargetResolver>) {
    collect_block(&document.content, &document.path, table);
}

fn collect_block(block: &Block, path: &VirtualPath, table: &mut HashMap<String, TargetResolver>) {
    if let Some(id) = block.options().and_then(|o| o.id.as_ref()) {
        register(table, id, path);
    }
    if let Block::Section(header, _, _) = block {
        collect_block(header, path, table);
    }
    for child in block.children() {
        collect_block(child, path, table);
    }
    if let Block::ListBlock(_, items, _) = block {
        for item in items {
            for child in &item.blocks {
                collect_block(child, path, table);
            }
        }
    }
    for span in block.spans() {
        collect_span(span, path, table);
    }
}

fn collect_span(span: &Span, path: &VirtualPath, table: &mut HashMap<String, TargetResolver>) {
    match span {
        Span::SpanLink(_, target, opts) => {
            if let Some(id) = opts.id.as_ref() {
                register_alias(table, id, path, target.clone());
            }
        }
        _ => {
            if let Some(id) = span.options().and_then(|o| o.id.as_ref()) {
                register(table, id, path);
            }
        }
    }
    for child in span.children() {
        collect_span(child, path, table);
    }
}

fn register(table: &mut HashMap<String, TargetResolver>, name: &str, path: &VirtualPath) {
    register_resolver(table, name, path, TargetResolver::Unique { document: path.clone(), anchor: name.to_string() });
}

fn register_alias(table: &mut HashMap<String, TargetResolver>, name: &str, path: &VirtualPath, target: LinkTarget) {
    register_resolver(table, name, path, TargetResolver::Alias { document: path.clone(), target });
}

fn register_resolver(table: &mut HashMap<String, TargetResolver>, name: &str, path: &VirtualPath, value: TargetResolver) {
    match table.entry(name.to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => {
            let paths = match slot.get() {
                TargetResolver::Unique { document, .. } | TargetResolver::Alias { document, .. } => {
                    vec![document.clone(), path.clone()]
                }
                TargetResolver::Duplicate(err) => {
                    let mut paths = err.paths.clone();
                    paths.push(path.clone());
                    paths
                }
            };
            slot.insert(TargetResolver::Duplicate(DuplicateTargetError { name: name.to_string(), paths }));
        }
    }
}
