//! Table-driven coverage of `EngineBuilder::strict()` (§4.7: "extensions
//! opt out of a strict build via `excluded_from_strict`").

use litmark_ast::Span;
use litmark_combinators::{text::literal, CharSet, Parser};
use litmark_engine::{EngineBuilder, ExtensionBundle, SpanParserBuilder};
use rstest::rstest;

fn marker_bundle(name: &str, exclude: bool) -> ExtensionBundle {
    let bundle = ExtensionBundle::new(name).with_span_parser(SpanParserBuilder::new(CharSet::single('#'), |_handle| {
        literal("#marker").map(|_| Span::Text("marker".to_string()))
    }));
    if exclude {
        bundle.excluded_from_strict()
    } else {
        bundle
    }
}

#[rstest]
#[case(false, false, "marker")]
#[case(false, true, "marker")]
#[case(true, false, "marker")]
#[case(true, true, "#marker")]
fn strict_build_only_admits_non_excluded_bundles(
    #[case] build_strict: bool,
    #[case] bundle_excluded: bool,
    #[case] expected_text: &str,
) {
    let mut builder = EngineBuilder::new().with_bundle(marker_bundle("demo", bundle_excluded));
    if build_strict {
        builder = builder.strict();
    }
    let engine = builder.build();

    let spans = engine.parse_spans("#marker");
    let rendered = match &spans[0] {
        Span::Text(text) => text.as_str(),
        other => panic!("expected Text, got {other:?}"),
    };
    assert_eq!(rendered, expected_text);
}
