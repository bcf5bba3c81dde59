//! Table-driven coverage of the scalar literal forms §4.3's grammar
//! describes: quoted/unquoted strings, booleans, null, and numbers, plus
//! the `:`/`=` separator equivalence.

use litmark_config::{parse, Scope};
use rstest::rstest;

#[rstest]
#[case("a = \"quoted\"", "a", "quoted")]
#[case("a = unquoted", "a", "unquoted")]
#[case("a: colon-separated", "a", "colon-separated")]
#[case("a = \"\"\"triple quoted\"\"\"", "a", "triple quoted")]
fn string_literal_forms(#[case] source: &str, #[case] key: &str, #[case] expected: &str) {
    let config = parse(source, Scope::DocumentScope).expect("parses").resolve(None).expect("resolves");
    assert_eq!(config.get::<String>(key).unwrap(), expected);
}

#[rstest]
#[case("a = true", true)]
#[case("a = false", false)]
fn boolean_literal_forms(#[case] source: &str, #[case] expected: bool) {
    let config = parse(source, Scope::DocumentScope).expect("parses").resolve(None).expect("resolves");
    assert_eq!(config.get::<bool>("a").unwrap(), expected);
}

#[rstest]
#[case("a = null")]
fn null_literal_drops_no_error(#[case] source: &str) {
    let config = parse(source, Scope::DocumentScope).expect("parses").resolve(None).expect("resolves");
    assert!(config.has_key("a"));
}

#[rstest]
#[case("a = 42", 42)]
#[case("a = -7", -7)]
#[case("a = 0", 0)]
fn integer_literal_forms(#[case] source: &str, #[case] expected: i64) {
    let config = parse(source, Scope::DocumentScope).expect("parses").resolve(None).expect("resolves");
    assert_eq!(config.get::<i64>("a").unwrap(), expected);
}
