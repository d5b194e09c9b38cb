//! Property-Based Tests for expansion
//!
//! - deep merge with an empty side is identity
//! - overlay / later values always win on scalar conflicts
//! - substitution leaves no supplied placeholder behind

use proptest::prelude::*;
use serde_yaml::{Mapping, Value};

use n0spec_core::merge::deep_merge;
use n0spec_core::substitute::{placeholder, substitute};
use n0spec_core::{expand, TemplateDefinition, TemplateStore};

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,12}".prop_map(Value::String),
    ]
}

/// Nested mappings / sequences with short lowercase keys
fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
            prop::collection::vec(("[a-e]", inner), 0..4).prop_map(|entries| {
                Value::Mapping(
                    entries
                        .into_iter()
                        .map(|(k, v)| (Value::String(k), v))
                        .collect(),
                )
            }),
        ]
    })
}

fn mapping_strategy() -> impl Strategy<Value = Mapping> {
    prop::collection::vec(("[a-e]", value_strategy()), 0..5).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(k, v)| (Value::String(k), v))
            .collect()
    })
}

/// Template body whose string leaves embed the `__p__` placeholder
fn templated_body_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        "[a-z]{0,4}".prop_map(|s| Value::String(format!("{}__p__{}", s, s))),
        any::<i64>().prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Sequence),
            prop::collection::vec(("[a-c]", inner), 0..3).prop_map(|entries| {
                Value::Mapping(
                    entries
                        .into_iter()
                        .map(|(k, v)| (Value::String(k), v))
                        .collect(),
                )
            }),
        ]
    })
}

proptest! {
    /// Merging into an empty mapping reproduces the overlay
    #[test]
    fn merge_into_empty_is_identity(overlay in mapping_strategy()) {
        prop_assert_eq!(deep_merge(Mapping::new(), overlay.clone()), overlay);
    }

    /// Merging an empty overlay leaves the base alone
    #[test]
    fn merge_empty_overlay_is_identity(base in mapping_strategy()) {
        prop_assert_eq!(deep_merge(base.clone(), Mapping::new()), base);
    }

    /// A scalar in the overlay always ends up in the result
    #[test]
    fn overlay_scalar_wins(base in mapping_strategy(), key in "[a-e]", value in scalar_strategy()) {
        let mut overlay = Mapping::new();
        overlay.insert(Value::String(key.clone()), value.clone());
        let merged = deep_merge(base, overlay);
        prop_assert_eq!(merged.get(key.as_str()), Some(&value));
    }

    /// Objects without `from_templates` expand to themselves
    #[test]
    fn expand_without_templates_is_identity(object in mapping_strategy()) {
        let expanded = expand("obj", &Value::Mapping(object.clone()), &TemplateStore::new()).unwrap();
        prop_assert_eq!(expanded, object);
    }

    /// No supplied placeholder survives substitution, at any depth
    #[test]
    fn substitution_removes_token(body in templated_body_strategy(), replacement in "[a-z0-9]{0,6}") {
        let out = substitute(&body, &placeholder("p"), &replacement);
        let text = serde_yaml::to_string(&out).unwrap();
        prop_assert!(!text.contains("__p__"));
    }

    /// Expanding through the store never changes the stored template
    #[test]
    fn store_unchanged_by_expansion(size in any::<i64>()) {
        let raw: Value = serde_yaml::from_str("{args: {size: int}, size: __size__}").unwrap();
        let mut store = TemplateStore::new();
        store.register(TemplateDefinition::from_value("disk", &raw).unwrap());
        let before = store.get("disk").cloned();

        let mut args = Mapping::new();
        args.insert(Value::from("size"), Value::from(size));
        let mut reference = Mapping::new();
        reference.insert(Value::from("name"), Value::from("disk"));
        reference.insert(Value::from("args"), Value::Mapping(args));
        let mut object = Mapping::new();
        object.insert(Value::from("from_templates"), Value::Sequence(vec![Value::Mapping(reference)]));

        let expanded = expand("vol", &Value::Mapping(object), &store).unwrap();
        prop_assert_eq!(expanded.get("size"), Some(&Value::String(size.to_string())));
        prop_assert_eq!(store.get("disk").cloned(), before);
    }
}
