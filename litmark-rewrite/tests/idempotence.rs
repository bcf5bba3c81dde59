//! §8 invariant: "rewriting is idempotent once all resolvers have been
//! processed: applying the resolved phase a second time yields an equal
//! tree."

use std::collections::HashMap;
use std::rc::Rc;

use litmark_ast::{Block, DeferredBlock, Document, DocumentTree, NodeOptions, Phase, Span, TreePosition};
use litmark_combinators::{SourceFragment, VirtualPath};
use litmark_config::Scope;
use litmark_engine::EngineBuilder;
use litmark_rewrite::RewriteDriver;

fn empty_config() -> litmark_ast::UnresolvedConfig {
    litmark_config::parse("", Scope::TreeScope).unwrap()
}

fn tree_with(content: Block) -> DocumentTree {
    let document = Document::new(
        VirtualPath::parse("/only"),
        content,
        litmark_ast::Config::default(),
        TreePosition { index: 0, sibling_count: 1 },
    );
    DocumentTree::new(VirtualPath::root(), vec![document], vec![], HashMap::new(), vec![], vec![], empty_config())
        .unwrap()
}

fn tree() -> DocumentTree {
    tree_with(Block::Paragraph(vec![Span::Text("plain text, no resolvers".to_string())], NodeOptions::default()))
}

/// A document containing an unresolved `Deferred` block (the kind a
/// `cursor()`-requesting directive produces), wrapped in a `BlockSequence`
/// alongside plain content.
fn tree_with_deferred() -> DocumentTree {
    let source = SourceFragment {
        path: VirtualPath::parse("/only"),
        start: Default::default(),
        end: Default::default(),
        text: String::new(),
    };
    let deferred = Block::Deferred(DeferredBlock {
        source,
        descriptor: "greeting".to_string(),
        phase: Phase::Resolve,
        resolve: Rc::new(|_cursor| Block::Paragraph(vec![Span::Text("resolved".to_string())], NodeOptions::default())),
    });
    let content = Block::BlockSequence(
        vec![Block::Paragraph(vec![Span::Text("intro".to_string())], NodeOptions::default()), deferred],
        NodeOptions::default(),
    );
    tree_with(content)
}

#[test]
fn resolving_twice_yields_an_observably_equal_tree() {
    let tree = tree();
    let driver = RewriteDriver::new(&EngineBuilder::new().build(), &tree);

    let once = driver.run_tree(&tree, Phase::Resolve);
    let twice = driver.run_tree(&once, Phase::Resolve);

    assert_eq!(format!("{:?}", once.documents), format!("{:?}", twice.documents));
}

#[test]
fn resolving_a_deferred_node_twice_does_not_re_trigger_or_diverge() {
    let tree = tree_with_deferred();
    let driver = RewriteDriver::new(&EngineBuilder::new().build(), &tree);

    let once = driver.run_tree(&tree, Phase::Resolve);
    match &once.documents[0].content {
        Block::BlockSequence(children, _) => match &children[1] {
            Block::Paragraph(spans, _) => match &spans[0] {
                Span::Text(text) => assert_eq!(text, "resolved"),
                other => panic!("expected Text, got {other:?}"),
            },
            other => panic!("expected Paragraph, got {other:?}"),
        },
        other => panic!("expected BlockSequence, got {other:?}"),
    }

    let twice = driver.run_tree(&once, Phase::Resolve);
    assert_eq!(format!("{:?}", once.documents), format!("{:?}", twice.documents));
}
