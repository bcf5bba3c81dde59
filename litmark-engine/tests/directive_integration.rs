//! Exercises a block directive registered through `DirectiveRegistry` end
//! to end: invocation-syntax recognition (owned by `litmark-directives`)
//! wired into the engine's block dispatch table (owned by this crate).

use litmark_ast::{Block, NodeOptions, Span};
use litmark_directives::{attribute, evaluate_block, string_converter, AttributeSelector, DirectiveSpec};
use litmark_engine::{DirectiveRegistry, EngineBuilder, ExtensionBundle};

fn note_bundle() -> ExtensionBundle {
    let registry = DirectiveRegistry::new().with_block("note", Vec::new(), |invocation| {
        let decl = attribute::<String>(AttributeSelector::Positional(0), string_converter);
        let spec = DirectiveSpec::new("note", decl);
        evaluate_block(&spec, invocation, |title, _cursor| {
            Block::BlockSequence(
                vec![Block::Paragraph(vec![Span::Text(title)], NodeOptions::default())],
                NodeOptions::new().with_style("note"),
            )
        })
    });
    ExtensionBundle::new("note directive").with_directives(registry)
}

#[test]
fn registered_directive_parses_as_a_block_sequence() {
    let engine = EngineBuilder::new().with_bundle(note_bundle()).build();
    let blocks = engine.parse_document("@:note(heads up)\nignored body\n@:@\n");
    assert_eq!(blocks.len(), 1);
    match &blocks[0] {
        Block::BlockSequence(children, options) => {
            assert!(options.styles.contains("note"));
            match &children[0] {
                Block::Paragraph(spans, _) => match &spans[0] {
                    Span::Text(text) => assert_eq!(text, "heads up"),
                    other => panic!("expected Text, got {other:?}"),
                },
                other => panic!("expected Paragraph, got {other:?}"),
            }
        }
        other => panic!("expected BlockSequence, got {other:?}"),
    }
}

#[test]
fn unknown_directive_name_surfaces_as_an_invalid_block() {
    let engine = EngineBuilder::new().with_bundle(note_bundle()).build();
    let blocks = engine.parse_document("@:warn(oops)\nbody\n@:@\n");
    assert_eq!(blocks.len(), 1);
    match &blocks[0] {
        Block::InvalidBlock(message, _) => assert_eq!(message, "unknown directive 'warn'"),
        other => panic!("expected an InvalidBlock, got {other:?}"),
    }
}
