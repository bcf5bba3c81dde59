use litmark_testkit::{assert_block, assert_span};
use markdown_lite::build_engine;

#[test]
fn parses_strong_and_emphasis_spans() {
    let engine = build_engine();
    let spans = engine.parse_spans("plain **bold** and *italic* text");

    assert_eq!(spans.len(), 5, "unexpected span split: {spans:?}");
    assert_span(&spans[1]).assert_strong();
    assert_span(&spans[3]).assert_emphasized();
}

#[test]
fn strong_is_tried_before_emphasis_on_shared_delimiter() {
    let engine = build_engine();
    let spans = engine.parse_spans("**both**");

    assert_eq!(spans.len(), 1);
    assert_span(&spans[0]).assert_strong();
}

#[test]
fn emphasis_rejects_mid_word_delimiters() {
    let engine = build_engine();
    let spans = engine.parse_spans("a*b*c");

    let joined: Vec<&str> = spans.iter().map(|s| assert_span(s).assert_text()).collect();
    assert_eq!(joined.join(""), "a*b*c");
}

#[test]
fn note_directive_builds_a_styled_block_sequence() {
    let engine = build_engine();
    let blocks = engine.parse_document("@:note(Heads up)\nremember *this*\n@:@\n");

    assert_eq!(blocks.len(), 1, "expected a single note block: {blocks:?}");
    let children = assert_block(&blocks[0]).has_style("note").assert_block_sequence();
    children.child(0, |header| {
        let spans = header.assert_header(4);
        assert_eq!(assert_span(&spans[0]).assert_text(), "Heads up");
    });
}
