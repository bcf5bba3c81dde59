//! Property tests over the parser/resolver pair (§8 "Properties"):
//! arbitrary scalar values survive a parse-then-resolve round trip, and
//! arbitrary non-cyclic substitution chains all resolve to the same leaf.

use litmark_config::{parse, Scope};
use proptest::prelude::*;

fn alnum_string() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9]{0,15}".prop_filter("non-empty", |s| !s.is_empty())
}

proptest! {
    #[test]
    fn quoted_string_value_round_trips(value in alnum_string()) {
        let source = format!("key = \"{value}\"");
        let unresolved = parse(&source, Scope::DocumentScope).expect("parses");
        let config = unresolved.resolve(None).expect("resolves");
        prop_assert_eq!(config.get::<String>("key").unwrap(), value);
    }

    #[test]
    fn integer_value_round_trips(value in any::<i32>()) {
        let source = format!("key = {value}");
        let unresolved = parse(&source, Scope::DocumentScope).expect("parses");
        let config = unresolved.resolve(None).expect("resolves");
        prop_assert_eq!(config.get::<i64>("key").unwrap(), value as i64);
    }

    #[test]
    fn non_cyclic_substitution_chain_resolves_to_the_root_value(
        value in alnum_string(),
        chain_len in 1usize..8,
    ) {
        // a0 = "value", a1 = ${a0}, a2 = ${a1}, ..., a{chain_len} = ${a{chain_len-1}}
        let mut source = format!("a0 = \"{value}\"\n");
        for i in 1..=chain_len {
            source.push_str(&format!("a{i} = ${{a{prev}}}\n", prev = i - 1));
        }
        let unresolved = parse(&source, Scope::DocumentScope).expect("parses");
        let config = unresolved.resolve(None).expect("resolves");
        prop_assert_eq!(config.get::<String>(&format!("a{chain_len}")).unwrap(), value);
    }
}
