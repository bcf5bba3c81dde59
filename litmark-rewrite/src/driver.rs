//! The rewrite driver (§4.6): walks an AST bottom-up for one phase at a
//! time, applying bundle-installed node rules and resolving deferred
//! nodes whose phase matches, plus cross-document link resolution.

use std::collections::HashMap;

use litmark_ast::{
    Block, ConfigValue, Document, DocumentTree, Element, LinkTarget, ListItem, NodeOptions, Phase, Selector, Span,
    TemplatePart,
};
use litmark_combinators::{SourceFragment, VirtualPath};
use litmark_engine::{MarkupEngine, RewriteHook};

use crate::cursor::TreeCursor;
use crate::error::{CircularAliasError, DuplicateTargetError, ReferenceError};
use crate::targets::{build_target_table, TargetResolver};

/// Owns the rule set contributed by an engine's bundles plus the
/// once-per-tree target table, then drives bottom-up phase walks over
/// individual documents.
pub struct RewriteDriver {
    rules: Vec<RewriteHook>,
    targets: HashMap<String, TargetResolver>,
    templates: HashMap<String, Block>,
}

impl RewriteDriver {
    pub fn new(engine: &MarkupEngine, tree: &DocumentTree) -> Self {
        RewriteDriver {
            rules: engine.rewrite_rules().to_vec(),
            targets: build_target_table(tree),
            templates: tree.templates.clone(),
        }
    }

    /// Runs `phase` over every document in `tree`, bottom-up, and returns
    /// the rewritten tree. Subtrees are walked with the same rule set and
    /// target table, since cross-document resolution is tree-wide (§4.6).
    pub fn run_tree(&self, tree: &DocumentTree, phase: Phase) -> DocumentTree {
        let documents = tree
            .documents
            .iter()
            .map(|document| {
                let cursor = TreeCursor::new(document, self.known_selectors());
                let content = self
                    .rewrite_block(document.content.clone(), &phase, &cursor, &document.path)
                    .unwrap_or_else(|| Block::BlockSequence(Vec::new(), NodeOptions::default()));
                Document { content, ..document.clone() }
            })
            .collect();
        let subtrees = tree.subtrees.iter().map(|subtree| self.run_tree(subtree, phase.clone())).collect();
        DocumentTree { documents, subtrees, ..tree.clone() }
    }

    fn known_selectors(&self) -> impl Iterator<Item = Selector> + '_ {
        self.targets.keys().map(|name| Selector::Unique(name.clone()))
    }

    fn apply_block_rules(&self, block: Block, phase: &Phase, cursor: &TreeCursor<'_>) -> Option<Block> {
        let mut current = Some(block);
        for hook in &self.rules {
            if hook.phase != *phase {
                continue;
            }
            let Some(node) = current.take() else { break };
            let rule = (hook.make_rule)(cursor);
            current = rule(node);
        }
        current
    }

    fn rewrite_block_children(
        &self,
        children: Vec<Block>,
        phase: &Phase,
        cursor: &TreeCursor<'_>,
        path: &VirtualPath,
    ) -> Vec<Block> {
        children.into_iter().filter_map(|child| self.rewrite_block(child, phase, cursor, path)).collect()
    }

    /// Bottom-up: a container's children are fully rewritten (and any
    /// removed per their own rules) before the container's own rules run.
    fn rewrite_block(
        &self,
        block: Block,
        phase: &Phase,
        cursor: &TreeCursor<'_>,
        path: &VirtualPath,
    ) -> Option<Block> {
        let rewritten = match block {
            Block::BlockSequence(children, opts) => {
                Block::BlockSequence(self.rewrite_block_children(children, phase, cursor, path), opts)
            }
            Block::QuotedBlock(children, attribution, opts) => {
                Block::QuotedBlock(self.rewrite_block_children(children, phase, cursor, path), attribution, opts)
            }
            Block::Section(header, content, opts) => {
                let content = self.rewrite_block_children(content, phase, cursor, path);
                match self.rewrite_block(*header, phase, cursor, path) {
                    Some(header) => Block::Section(Box::new(header), content, opts),
                    // A section with its header rule'd away still has
                    // content worth keeping (§4.6 "parents adapt via their
                    // own constructor logic").
                    None => Block::BlockSequence(content, opts),
                }
            }
            Block::ListBlock(kind, items, opts) => {
                let items = items
                    .into_iter()
                    .map(|item| ListItem {
                        blocks: self.rewrite_block_children(item.blocks, phase, cursor, path),
                        options: item.options,
                    })
                    .collect();
                Block::ListBlock(kind, items, opts)
            }
            Block::Paragraph(spans, opts) => {
                Block::Paragraph(self.rewrite_spans(spans, phase, cursor, path), opts)
            }
            Block::Header(level, spans, opts) => {
                Block::Header(level, self.rewrite_spans(spans, phase, cursor, path), opts)
            }
            Block::Deferred(deferred) if deferred.phase == *phase => {
                let resolved = (deferred.resolve)(cursor);
                return self.rewrite_block(resolved, phase, cursor, path);
            }
            Block::TemplateRoot(parts, opts) => self.render_template_parts(parts, opts, phase, cursor, path),
            other => other,
        };
        self.apply_block_rules(rewritten, phase, cursor)
    }

    /// Applies an already-built template (§4.6 "Template application"):
    /// text parts pass through, context references resolve against
    /// `cursor`, and directive parts recurse through the normal block
    /// rewrite so their own rules and deferred resolution still run.
    pub fn apply_template(&self, template: &Block, phase: &Phase, cursor: &TreeCursor<'_>, path: &VirtualPath) -> Block {
        match template {
            Block::TemplateRoot(parts, opts) => self.render_template_parts(parts.clone(), opts.clone(), phase, cursor, path),
            other => other.clone(),
        }
    }

    /// Looks a template up by name in the tree-wide store (`DocumentTree.
    /// templates`) and applies it against `cursor` — the "applying a
    /// template to a document" half of §4.6, exposed for a bundle's own
    /// directives to call once they want to reference a template by name.
    pub fn apply_named_template(
        &self,
        name: &str,
        phase: &Phase,
        cursor: &TreeCursor<'_>,
        path: &VirtualPath,
    ) -> Option<Block> {
        let template = self.templates.get(name)?;
        Some(self.apply_template(template, phase, cursor, path))
    }

    fn render_template_parts(
        &self,
        parts: Vec<TemplatePart>,
        opts: NodeOptions,
        phase: &Phase,
        cursor: &TreeCursor<'_>,
        path: &VirtualPath,
    ) -> Block {
        let rendered = parts.into_iter().map(|part| self.render_template_part(part, phase, cursor, path)).collect();
        Block::BlockSequence(rendered, opts)
    }

    fn render_template_part(
        &self,
        part: TemplatePart,
        phase: &Phase,
        cursor: &TreeCursor<'_>,
        path: &VirtualPath,
    ) -> Block {
        match part {
            TemplatePart::Text(text) => Block::Paragraph(vec![Span::Text(text)], NodeOptions::default()),
            TemplatePart::ContextRef(key) => match cursor.resolve_reference(&key) {
                Some(value) => self.render_context_value(value, phase, cursor, path),
                None => {
                    let message = format!("unresolved template context reference '{key}'");
                    Block::InvalidBlock(message, placeholder_fragment(path))
                }
            },
            TemplatePart::Directive(inner) => {
                self.rewrite_block(inner, phase, cursor, path).unwrap_or_else(|| Block::BlockSequence(Vec::new(), NodeOptions::default()))
            }
        }
    }

    fn render_context_value(&self, value: ConfigValue, phase: &Phase, cursor: &TreeCursor<'_>, path: &VirtualPath) -> Block {
        match value {
            ConfigValue::ASTValue(Element::Block(block)) => self
                .rewrite_block(block, phase, cursor, path)
                .unwrap_or_else(|| Block::BlockSequence(Vec::new(), NodeOptions::default())),
            ConfigValue::ASTValue(Element::Span(span)) => {
                let rewritten = self.rewrite_span(span, phase, cursor, path);
                Block::Paragraph(rewritten.into_iter().collect(), NodeOptions::default())
            }
            other => Block::Paragraph(vec![Span::Text(render_scalar(&other))], NodeOptions::default()),
        }
    }

    fn rewrite_spans(
        &self,
        spans: Vec<Span>,
        phase: &Phase,
        cursor: &TreeCursor<'_>,
        path: &VirtualPath,
    ) -> Vec<Span> {
        spans.into_iter().filter_map(|span| self.rewrite_span(span, phase, cursor, path)).collect()
    }

    fn rewrite_span(&self, span: Span, phase: &Phase, cursor: &TreeCursor<'_>, path: &VirtualPath) -> Option<Span> {
        match span {
            Span::Emphasized(children, opts) => {
                Some(Span::Emphasized(self.rewrite_spans(children, phase, cursor, path), opts))
            }
            Span::Strong(children, opts) => {
                Some(Span::Strong(self.rewrite_spans(children, phase, cursor, path), opts))
            }
            Span::SpanSequence(children, opts) => {
                Some(Span::SpanSequence(self.rewrite_spans(children, phase, cursor, path), opts))
            }
            Span::SpanLink(children, target, opts) => {
                let children = self.rewrite_spans(children, phase, cursor, path);
                if *phase == Phase::Resolve {
                    Some(self.resolve_link(children, target, opts, path))
                } else {
                    Some(Span::SpanLink(children, target, opts))
                }
            }
            Span::Deferred(deferred) if deferred.phase == *phase => {
                let resolved = (deferred.resolve)(cursor);
                self.rewrite_span(resolved, phase, cursor, path)
            }
            other => Some(other),
        }
    }

    /// Cross-document resolution (§4.6): a `Selector`-addressed link is
    /// rewritten into a direct target, or an `InvalidSpan` carrying
    /// [`DuplicateTargetError`]'s exact wording when two documents claim
    /// the same unique selector (§8 scenario 6), or [`CircularAliasError`]'s
    /// wording when following a chain of alias declarations loops back on
    /// itself.
    fn resolve_link(&self, children: Vec<Span>, target: LinkTarget, opts: NodeOptions, path: &VirtualPath) -> Span {
        let LinkTarget::Selector(Selector::Unique(name)) = &target else {
            return Span::SpanLink(children, target, opts);
        };
        match self.resolve_alias_chain(name) {
            Ok(resolved) => Span::SpanLink(children, resolved, opts),
            Err(ChainFailure::Duplicate(err)) => Span::InvalidSpan(err.to_string(), placeholder_fragment(path)),
            Err(ChainFailure::Circular(err)) => Span::InvalidSpan(err.to_string(), placeholder_fragment(path)),
            Err(ChainFailure::Unresolved(name)) => {
                let err = ReferenceError { document: path.clone(), message: format!("unresolved link target '{name}'") };
                Span::InvalidSpan(err.to_string(), placeholder_fragment(path))
            }
        }
    }

    /// Follows a chain of alias declarations (a `SpanLink` that carries its
    /// own `id`, §4.6) to its terminal anchor, tracking visited names on a
    /// stack the way `litmark-config`'s config-reference resolver does, so
    /// a name that reappears on its own chain is reported as
    /// [`CircularAliasError`] rather than looping forever.
    fn resolve_alias_chain(&self, start: &str) -> Result<LinkTarget, ChainFailure> {
        let mut visiting = Vec::new();
        let mut current = start.to_string();
        loop {
            if visiting.contains(&current) {
                visiting.push(current);
                return Err(ChainFailure::Circular(CircularAliasError { chain: visiting }));
            }
            visiting.push(current.clone());
            match self.targets.get(&current) {
                Some(TargetResolver::Unique { document, anchor }) => {
                    return Ok(LinkTarget::Direct(format!("{document}#{anchor}")));
                }
                Some(TargetResolver::Duplicate(err)) => return Err(ChainFailure::Duplicate(err.clone())),
                Some(TargetResolver::Alias { target: LinkTarget::Direct(url), .. }) => {
                    return Ok(LinkTarget::Direct(url.clone()));
                }
                Some(TargetResolver::Alias { target: LinkTarget::Selector(Selector::Unique(next)), .. }) => {
                    current = next.clone();
                }
                Some(TargetResolver::Alias { .. }) | None => return Err(ChainFailure::Unresolved(current)),
            }
        }
    }
}

/// Why following an alias chain (see [`RewriteDriver::resolve_alias_chain`])
/// didn't reach a usable target.
enum ChainFailure {
    Duplicate(DuplicateTargetError),
    Circular(CircularAliasError),
    Unresolved(String),
}

/// `SpanLink` carries no `SourceFragment` of its own (§3), so cross-document
/// resolution — which runs after parsing, against a whole tree rather than
/// one `InputContext` — can't recover the original parse-time source slice.
fn placeholder_fragment(path: &VirtualPath) -> SourceFragment {
    let position = Default::default();
    SourceFragment { path: path.clone(), start: position, end: position, text: String::new() }
}

/// Renders a non-AST config value to text for a template context reference.
/// `ASTValue` never reaches here — the caller splices the embedded node in
/// directly instead of stringifying it.
fn render_scalar(value: &ConfigValue) -> String {
    match value {
        ConfigValue::Null => String::new(),
        ConfigValue::Bool(b) => b.to_string(),
        ConfigValue::Long(n) => n.to_string(),
        ConfigValue::Double(n) => n.to_string(),
        ConfigValue::String(s) => s.clone(),
        ConfigValue::Array(items) => items.iter().map(render_scalar).collect::<Vec<_>>().join(", "),
        ConfigValue::Object(_) => String::new(),
        ConfigValue::ASTValue(_) => String::new(),
    }
}
