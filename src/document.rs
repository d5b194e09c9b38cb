//! Spec Documents - Versioned Envelopes for Each Pipeline Stage
//!
//! Spec0: client -> api (carries templates)
//! Spec1: api -> scheduler (fully expanded)
//! Spec2: scheduler <-> agent (not produced yet)

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::substitute::stringify;

/// The only Spec0 version this engine understands
pub const SPEC0_VERSION: i64 = 0;

/// Generic envelope shared by every stage's document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecDocument<S> {
    pub version: i64,
    #[serde(default)]
    pub annotations: Mapping,
    pub spec: S,
}

impl<S: Serialize> SpecDocument<S> {
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Output stage: resource name -> expanded object
pub type Spec1Document = SpecDocument<Mapping>;

/// Agent stage envelope; nothing produces it yet
pub type Spec2Document = SpecDocument<Mapping>;

/// Input stage: resource objects plus the templates they reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spec0Document {
    pub version: i64,
    #[serde(default)]
    pub annotations: Mapping,
    #[serde(default)]
    pub templates: Mapping,
    pub spec: Mapping,
}

impl Spec0Document {
    pub fn from_value(raw: Value) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_value(raw)
    }

    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Advisory shape check on a raw parsed document.
    ///
    /// Typing a document with `from_value` rejects most of these shapes too,
    /// but only with the first serde error; call this first to get every
    /// reason at once. Returns the reasons on failure.
    pub fn check_structure(raw: &Value) -> Result<(), Vec<String>> {
        let Some(fields) = raw.as_mapping() else {
            return Err(vec!["document should be a Map".to_string()]);
        };

        let mut reasons = vec![];
        if fields.get("version").and_then(Value::as_i64) != Some(SPEC0_VERSION) {
            reasons.push(format!("`version` should be {}", SPEC0_VERSION));
        }
        if fields.get("annotations").is_some_and(|v| !v.is_mapping()) {
            reasons.push("`annotations` should be a Map".to_string());
        }
        if !fields.get("spec").is_some_and(Value::is_mapping) {
            reasons.push("`spec` should be a Map".to_string());
        }
        if fields.get("templates").is_some_and(|v| !v.is_mapping()) {
            reasons.push("`templates` should be a Map".to_string());
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(reasons)
        }
    }
}

/// Rebuild a value with every mapping key, at every depth, as a string
pub fn stringify_keys(value: Value) -> Value {
    match value {
        Value::Mapping(fields) => Value::Mapping(stringify_mapping_keys(fields)),
        Value::Sequence(items) => Value::Sequence(items.into_iter().map(stringify_keys).collect()),
        other => other,
    }
}

pub fn stringify_mapping_keys(fields: Mapping) -> Mapping {
    fields
        .into_iter()
        .map(|(key, value)| {
            let key = match key {
                Value::String(_) => key,
                other => Value::String(stringify(&other)),
            };
            (key, stringify_keys(value))
        })
        .collect()
}
