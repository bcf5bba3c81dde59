//! Table-driven coverage of `Loader::set_override` across the settings
//! tree's three sections.

use litmark_settings::Loader;
use rstest::rstest;

#[rstest]
#[case("parsing.tab_width", 2, 2)]
#[case("parsing.max_nest_level", 128, 128)]
#[case("directives.max_separator_occurrences", 16, 16)]
#[case("rewrite.max_phase_passes", 1, 1)]
fn integer_overrides_apply_to_the_named_field(#[case] key: &str, #[case] value: i64, #[case] expected: i64) {
    let config = Loader::new().set_override(key, value).expect("override to apply").build().expect("config to build");

    let actual = match key {
        "parsing.tab_width" => config.parsing.tab_width as i64,
        "parsing.max_nest_level" => config.parsing.max_nest_level as i64,
        "directives.max_separator_occurrences" => config.directives.max_separator_occurrences as i64,
        "rewrite.max_phase_passes" => config.rewrite.max_phase_passes as i64,
        other => panic!("unexpected key {other}"),
    };
    assert_eq!(actual, expected);
}

#[rstest]
#[case("~~~")]
#[case("@@")]
fn string_override_replaces_the_default_fence(#[case] fence: &str) {
    let config = Loader::new()
        .set_override("directives.default_fence", fence)
        .expect("override to apply")
        .build()
        .expect("config to build");
    assert_eq!(config.directives.default_fence, fence);
}
