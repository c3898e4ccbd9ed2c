//! Property-based tests for the property filter and the schema mapper

use std::collections::BTreeMap;

use proptest::prelude::*;
use serde_json::{Map, Value};
use theme_bridge::theme::{filter_properties, map_to_target, RoleTable, ThemeDocument, BUILTIN_ROLES};

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        "doki[A-Za-z]{0,5}",
        "DOKI[a-z]{0,3}",
        "[a-zA-Z.*]{1,10}",
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        "[a-z#0-9 \"\\\\]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(key(), inner, 0..5)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn has_prefixed_key(value: &Value, prefix: &str) -> bool {
    match value {
        Value::Object(map) => map
            .iter()
            .any(|(k, v)| k.to_lowercase().starts_with(prefix) || has_prefixed_key(v, prefix)),
        Value::Array(items) => items.iter().any(|v| has_prefixed_key(v, prefix)),
        _ => false,
    }
}

fn role_key() -> impl Strategy<Value = String> {
    let known: Vec<String> = BUILTIN_ROLES.iter().map(|(s, _)| s.to_string()).collect();
    prop_oneof![
        prop::sample::select(known),
        "syntax\\.[a-z]{3,8}",
        "[A-Z][a-z]{2,6}\\.[a-z]{3,8}",
    ]
}

fn theme_json() -> impl Strategy<Value = String> {
    (
        "[A-Za-z][A-Za-z ]{0,11}",
        any::<bool>(),
        prop::collection::btree_map(role_key(), "#[0-9a-f]{6}", 0..24),
    )
        .prop_map(|(name, dark, colors)| {
            serde_json::json!({ "name": name, "dark": dark, "colors": colors }).to_string()
        })
}

fn overrides() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(role_key(), prop_oneof![Just(String::new()), "[a-z]{3,8}\\.[a-zA-Z]{3,8}"], 0..6)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 200,
        ..ProptestConfig::default()
    })]

    /// Property: filtered output is valid JSON without prefixed keys
    #[test]
    fn prop_filter_output_reparses(value in json_value()) {
        let raw = serde_json::to_string_pretty(&value).unwrap();
        let outcome = filter_properties(&raw, &["doki".to_string()]).unwrap();

        let reparsed: Value = serde_json::from_str(&outcome.text).unwrap();
        prop_assert!(!has_prefixed_key(&reparsed, "doki"));
        if outcome.removed == 0 {
            prop_assert_eq!(&outcome.text, &raw);
        } else {
            prop_assert!(outcome.text.ends_with('\n'));
        }
    }

    /// Property: filtering twice removes nothing the second time
    #[test]
    fn prop_filter_is_idempotent(value in json_value()) {
        let raw = serde_json::to_string(&value).unwrap();
        let once = filter_properties(&raw, &["doki".to_string()]).unwrap();
        let twice = filter_properties(&once.text, &["doki".to_string()]).unwrap();
        prop_assert_eq!(twice.removed, 0);
        prop_assert_eq!(twice.text, once.text);
    }

    /// Property: mapping is deterministic and only produces table destinations
    #[test]
    fn prop_mapper_is_pure_and_closed(raw in theme_json(), extra in overrides()) {
        let doc = ThemeDocument::parse(raw.as_bytes()).unwrap();
        let roles = RoleTable::builtin().with_overrides(&extra);

        let first = map_to_target(&doc, &roles);
        let second = map_to_target(&doc, &roles);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );

        let destinations = roles.destinations();
        for key in first.workbench_colors.keys() {
            prop_assert!(destinations.contains(key.as_str()), "{} is not a destination", key);
        }
        prop_assert_eq!(first.name, doc.name);
    }
}
