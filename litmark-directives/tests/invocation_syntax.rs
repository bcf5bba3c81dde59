//! Table-driven coverage of the invocation header grammar (§4.5:
//! `@:name(pos, …) { named=val, … } fence`).

use litmark_combinators::{InputContext, VirtualPath};
use litmark_directives::parse_header;
use rstest::rstest;

fn ctx(source: &str) -> InputContext {
    InputContext::new(source.to_string(), VirtualPath::root())
}

#[rstest]
#[case("@:note\n", "note", vec![], vec![])]
#[case("@:note()\n", "note", vec![], vec![])]
#[case("@:note(foo)\n", "note", vec!["foo"], vec![])]
#[case("@:note(foo, 4)\n", "note", vec!["foo", "4"], vec![])]
#[case("@:note(foo) { strAttr=str }\n", "note", vec!["foo"], vec![("strAttr", "str")])]
#[case("@:note { a=1, b=2 }\n", "note", vec![], vec![("a", "1"), ("b", "2")])]
fn parses_recognized_header_shapes(
    #[case] source: &str,
    #[case] name: &str,
    #[case] positional: Vec<&str>,
    #[case] named: Vec<(&str, &str)>,
) {
    let (header, _rest) = parse_header(&ctx(source)).unwrap_or_else(|| panic!("expected {source:?} to parse as a header"));
    assert_eq!(header.name, name);
    assert_eq!(header.positional, positional);
    for (key, value) in named {
        assert_eq!(header.named.get(key).map(String::as_str), Some(value));
    }
}

#[rstest]
#[case("plain text, no marker\n")]
#[case("@not-a-directive-marker\n")]
fn rejects_input_without_a_directive_marker(#[case] source: &str) {
    assert!(parse_header(&ctx(source)).is_none());
}

#[test]
fn custom_fence_is_captured_on_the_header() {
    let (header, _rest) = parse_header(&ctx("@:note(foo) ~~~\n")).unwrap();
    assert_eq!(header.fence.as_deref(), Some("~~~"));
}
