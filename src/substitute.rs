//! Placeholder substitution over nested template bodies.
//!
//! Substitution is textual: every replaced leaf is a string afterwards, even
//! when the leaf was nothing but the placeholder token. `size: __size__` with
//! `size = 10` becomes `size: "10"`, never the integer `10`.

use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};

/// Placeholder token for a template argument, e.g. `__size__`
pub fn placeholder(arg_name: &str) -> String {
    format!("__{}__", arg_name)
}

/// Replace every literal occurrence of `token` in every string leaf of `node`.
///
/// Mapping keys are left untouched; key order and sequence order are kept.
/// The token is matched literally and the replacement is inserted verbatim.
pub fn substitute(node: &Value, token: &str, replacement: &str) -> Value {
    match node {
        Value::String(s) => Value::String(s.replace(token, replacement)),
        Value::Sequence(items) => Value::Sequence(
            items
                .iter()
                .map(|item| substitute(item, token, replacement))
                .collect(),
        ),
        Value::Mapping(fields) => Value::Mapping(substitute_mapping(fields, token, replacement)),
        Value::Tagged(tagged) => Value::Tagged(Box::new(TaggedValue {
            tag: tagged.tag.clone(),
            value: substitute(&tagged.value, token, replacement),
        })),
        Value::Null | Value::Bool(_) | Value::Number(_) => node.clone(),
    }
}

/// [`substitute`] over every value of a mapping, keys untouched
pub fn substitute_mapping(fields: &Mapping, token: &str, replacement: &str) -> Mapping {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), substitute(value, token, replacement)))
        .collect()
}

/// Canonical text of a value, as used for substitution and for output keys.
///
/// Null renders as the empty string. Containers render as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Tagged(tagged) => stringify(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => match serde_json::to_string(value) {
            Ok(json) => json,
            // JSON has no non-string map keys; fall back to YAML flow text
            Err(_) => serde_yaml::to_string(value)
                .map(|yaml| yaml.trim_end().to_string())
                .unwrap_or_default(),
        },
    }
}
