//! §4.6 "Template application": a `TemplateRoot`'s text passes through,
//! context references resolve against the document's own config, and
//! nested directive parts recurse through the normal block rewrite.

use std::collections::HashMap;

use litmark_ast::{Block, Document, DocumentTree, NodeOptions, Phase, Span, TemplatePart, TreePosition};
use litmark_combinators::VirtualPath;
use litmark_config::{ConfigEntry, ConfigValue, OrderedMap, Origin, Scope};
use litmark_engine::EngineBuilder;
use litmark_rewrite::{RewriteDriver, TreeCursor};

fn empty_config() -> litmark_ast::UnresolvedConfig {
    litmark_config::parse("", Scope::TreeScope).unwrap()
}

fn config_with(key: &str, value: &str) -> litmark_ast::Config {
    let mut root = OrderedMap::new();
    root.insert(key, ConfigEntry::new(ConfigValue::String(value.to_string()), Origin::new(Scope::DocumentScope, key)));
    litmark_ast::Config::from_root(root)
}

fn document_with(config: litmark_ast::Config) -> Document {
    Document::new(
        VirtualPath::parse("/only"),
        Block::Paragraph(vec![], NodeOptions::default()),
        config,
        TreePosition { index: 0, sibling_count: 1 },
    )
}

fn tree_of(document: Document) -> DocumentTree {
    DocumentTree::new(VirtualPath::root(), vec![document], vec![], HashMap::new(), vec![], vec![], empty_config())
        .unwrap()
}

#[test]
fn apply_template_resolves_context_refs_and_keeps_text() {
    let document = document_with(config_with("name", "world"));
    let tree = tree_of(document.clone());
    let driver = RewriteDriver::new(&EngineBuilder::new().build(), &tree);
    let cursor = TreeCursor::new(&document, std::iter::empty());

    let template = Block::TemplateRoot(
        vec![TemplatePart::Text("hello, ".to_string()), TemplatePart::ContextRef("name".to_string())],
        NodeOptions::default(),
    );

    let rendered = driver.apply_template(&template, &Phase::Resolve, &cursor, &document.path);
    match rendered {
        Block::BlockSequence(children, _) => {
            assert_eq!(children.len(), 2);
            match &children[0] {
                Block::Paragraph(spans, _) => match &spans[0] {
                    Span::Text(text) => assert_eq!(text, "hello, "),
                    other => panic!("expected Text, got {other:?}"),
                },
                other => panic!("expected Paragraph, got {other:?}"),
            }
            match &children[1] {
                Block::Paragraph(spans, _) => match &spans[0] {
                    Span::Text(text) => assert_eq!(text, "world"),
                    other => panic!("expected Text, got {other:?}"),
                },
                other => panic!("expected Paragraph, got {other:?}"),
            }
        }
        other => panic!("expected BlockSequence, got {other:?}"),
    }
}

#[test]
fn apply_template_reports_an_unresolved_context_ref() {
    let document = document_with(litmark_ast::Config::default());
    let tree = tree_of(document.clone());
    let driver = RewriteDriver::new(&EngineBuilder::new().build(), &tree);
    let cursor = TreeCursor::new(&document, std::iter::empty());

    let template = Block::TemplateRoot(vec![TemplatePart::ContextRef("missing".to_string())], NodeOptions::default());
    let rendered = driver.apply_template(&template, &Phase::Resolve, &cursor, &document.path);

    match rendered {
        Block::BlockSequence(children, _) => match &children[0] {
            Block::InvalidBlock(message, _) => assert_eq!(message, "unresolved template context reference 'missing'"),
            other => panic!("expected InvalidBlock, got {other:?}"),
        },
        other => panic!("expected BlockSequence, got {other:?}"),
    }
}

#[test]
fn apply_named_template_looks_up_the_tree_wide_store() {
    let document = document_with(config_with("name", "world"));
    let template = Block::TemplateRoot(vec![TemplatePart::ContextRef("name".to_string())], NodeOptions::default());
    let mut templates = HashMap::new();
    templates.insert("greeting".to_string(), template);
    let tree =
        DocumentTree::new(VirtualPath::root(), vec![document.clone()], vec![], templates, vec![], vec![], empty_config())
            .unwrap();
    let driver = RewriteDriver::new(&EngineBuilder::new().build(), &tree);
    let cursor = TreeCursor::new(&document, std::iter::empty());

    let rendered = driver.apply_named_template("greeting", &Phase::Resolve, &cursor, &document.path).unwrap();
    match rendered {
        Block::BlockSequence(children, _) => match &children[0] {
            Block::Paragraph(spans, _) => match &spans[0] {
                Span::Text(text) => assert_eq!(text, "world"),
                other => panic!("expected Text, got {other:?}"),
            },
            other => panic!("expected Paragraph, got {other:?}"),
        },
        other => panic!("expected BlockSequence, got {other:?}"),
    }

    assert!(driver.apply_named_template("missing", &Phase::Resolve, &cursor, &document.path).is_none());
}
