//! Argument Validation - Supplied Args vs Declared Types
//!
//! Both checks collect every violation before failing so the caller gets a
//! complete diagnostic. Supplied arguments the template does not declare are
//! neither checked nor rejected.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::substitute::stringify;
use crate::templates::{ArgDecl, TypeTag};

/// Runtime kind of a YAML value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Integer,
    Float,
    String,
    Boolean,
    Null,
    Sequence,
    Mapping,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(n) if n.is_f64() => ValueKind::Float,
            Value::Number(_) => ValueKind::Integer,
            Value::String(_) => ValueKind::String,
            Value::Sequence(_) => ValueKind::Sequence,
            Value::Mapping(_) => ValueKind::Mapping,
            Value::Tagged(tagged) => ValueKind::of(&tagged.value),
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Integer => "Integer",
            ValueKind::Float => "Float",
            ValueKind::String => "String",
            ValueKind::Boolean => "Boolean",
            ValueKind::Null => "Null",
            ValueKind::Sequence => "Sequence",
            ValueKind::Mapping => "Mapping",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgMismatch {
    pub param: String,
    pub expected: TypeTag,
    pub actual: ValueKind,
}

impl fmt::Display for ArgMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (expected: {}, actual: {})",
            self.param, self.expected, self.actual
        )
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArgError {
    #[error("In template \"{context}\", arguments are insufficient: {}", join_names(.missing))]
    InsufficientArguments { context: String, missing: Vec<String> },

    #[error("In template \"{context}\", arguments type mismatch: {}", format_mismatches(.mismatches))]
    ArgumentTypeMismatch {
        context: String,
        mismatches: Vec<ArgMismatch>,
    },
}

fn join_names(names: &[String]) -> String {
    names.join(", ")
}

fn format_mismatches(mismatches: &[ArgMismatch]) -> String {
    mismatches
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check supplied arguments against a template's declarations.
///
/// `context` names the caller in diagnostics (the resource being expanded).
/// Supplied keys are compared by their string form, the same form used to
/// build their placeholders. Missing arguments are reported before type
/// mismatches.
pub fn check_args(declared: &[ArgDecl], supplied: &Mapping, context: &str) -> Result<(), ArgError> {
    let supplied: HashMap<String, &Value> = supplied
        .iter()
        .map(|(key, value)| (stringify(key), value))
        .collect();
    check_sufficient(declared, &supplied, context)?;
    check_types(declared, &supplied, context)
}

fn check_sufficient(
    declared: &[ArgDecl],
    supplied: &HashMap<String, &Value>,
    context: &str,
) -> Result<(), ArgError> {
    let missing: Vec<String> = declared
        .iter()
        .filter(|arg| !supplied.contains_key(&arg.name))
        .map(|arg| arg.name.clone())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ArgError::InsufficientArguments {
            context: context.to_string(),
            missing,
        })
    }
}

fn check_types(
    declared: &[ArgDecl],
    supplied: &HashMap<String, &Value>,
    context: &str,
) -> Result<(), ArgError> {
    let mismatches: Vec<ArgMismatch> = declared
        .iter()
        .filter_map(|arg| {
            let value = *supplied.get(&arg.name)?;
            if arg.type_tag.accepts(value) {
                None
            } else {
                Some(ArgMismatch {
                    param: arg.name.clone(),
                    expected: arg.type_tag,
                    actual: ValueKind::of(value),
                })
            }
        })
        .collect();

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(ArgError::ArgumentTypeMismatch {
            context: context.to_string(),
            mismatches,
        })
    }
}
