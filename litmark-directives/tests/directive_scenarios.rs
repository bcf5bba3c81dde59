//! Integration coverage for §8 scenarios 3 and 4: a block directive with
//! positional/named attributes and a body, and separator-count enforcement.

use std::collections::HashMap;

use litmark_ast::{Block, NodeOptions, Span};
use litmark_combinators::{Position, SourceFragment, VirtualPath};
use litmark_directives::{
    attribute, attribute_optional, body, evaluate_block, int_converter, string_converter, AttributeSelector,
    DirectiveSpec, Invocation,
};

fn invocation(positional: Vec<&str>, named: &[(&str, &str)], body_text: &str) -> Invocation {
    Invocation {
        name: "dir".to_string(),
        positional: positional.into_iter().map(str::to_string).collect(),
        named: named.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<HashMap<_, _>>(),
        body_text: body_text.to_string(),
        source: SourceFragment {
            path: VirtualPath::root(),
            start: Position::default(),
            end: Position::default(),
            text: body_text.to_string(),
        },
        recursive_parser: None,
    }
}

/// A stand-in for the host language's own paragraph parser, good enough to
/// exercise the directive machinery without pulling in `litmark-engine`.
fn parse_as_single_paragraph(text: &str) -> Result<Block, String> {
    Ok(Block::Paragraph(vec![Span::Text(text.trim().to_string())], NodeOptions::default()))
}

#[test]
fn directive_with_attributes_and_body_builds_a_block_sequence() {
    let decl = attribute::<String>(AttributeSelector::Positional(0), string_converter)
        .seq(&attribute::<i64>(AttributeSelector::Positional(1), int_converter))
        .seq(&attribute_optional::<String>(AttributeSelector::Named("strAttr".to_string()), string_converter))
        .seq(&attribute_optional::<i64>(AttributeSelector::Named("intAttr".to_string()), int_converter))
        .seq(&body(parse_as_single_paragraph));

    let spec = DirectiveSpec::new("dir", decl);
    let invocation = invocation(vec!["foo", "4"], &[("strAttr", "str"), ("intAttr", "7")], "1 value 2\n");

    let result = evaluate_block(&spec, &invocation, |((((positional0, positional1), str_attr), int_attr), parsed_body), _cursor| {
        let summary = format!("{positional0}:{}:{}", str_attr.unwrap_or_default(), positional1 + int_attr.unwrap_or(0));
        Block::BlockSequence(
            vec![Block::Paragraph(vec![Span::Text(summary)], NodeOptions::default()), parsed_body],
            NodeOptions::default(),
        )
    });

    let Block::BlockSequence(children, _) = result else { panic!("expected BlockSequence") };
    assert_eq!(children.len(), 2);
    match &children[0] {
        Block::Paragraph(spans, _) => match &spans[0] {
            Span::Text(text) => assert_eq!(text, "foo:str:11"),
            other => panic!("expected Text span, got {other:?}"),
        },
        other => panic!("expected Paragraph, got {other:?}"),
    }
    match &children[1] {
        Block::Paragraph(spans, _) => match &spans[0] {
            Span::Text(text) => assert_eq!(text, "1 value 2"),
            other => panic!("expected Text span, got {other:?}"),
        },
        other => panic!("expected Paragraph, got {other:?}"),
    }
}

#[test]
fn separator_below_minimum_produces_invalid_block_with_exact_message() {
    use litmark_directives::{separated_body, SeparatorSpec};

    let decl = separated_body::<Block>(
        vec![SeparatorSpec::new("foo", 1, usize::MAX), SeparatorSpec::new("bar", 0, 1)],
        parse_as_single_paragraph,
    );
    let spec = DirectiveSpec::new("dir", decl);
    let invocation = invocation(vec![], &[], "main text\n");

    let result = evaluate_block(&spec, &invocation, |_multipart, _cursor| Block::Paragraph(vec![], NodeOptions::default()));

    match result {
        Block::InvalidBlock(message, _) => assert_eq!(
            message,
            "One or more errors processing directive 'dir': too few occurrences of separator directive 'foo': expected min: 1, actual: 0"
        ),
        other => panic!("expected InvalidBlock, got {other:?}"),
    }
}
