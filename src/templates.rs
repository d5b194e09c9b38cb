//! Template System - Parameterized Resource Fragments
//!
//! A template is read once from the `templates` section of a Spec0 document.
//! Its `args` entry declares typed parameters; everything else is the body.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::substitute::stringify;

/// Key under which a template declares its parameters.
pub const ARGS_KEY: &str = "args";

pub type TemplateName = String;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TemplateError {
    #[error("In template \"{template}\", type `{type_name}` can't be converted to a known type")]
    UnknownTypeName { template: String, type_name: String },

    #[error("Template \"{template}\" is invalid: {reason}")]
    InvalidDefinition { template: String, reason: String },
}

/// Declared parameter type of a template argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeTag {
    Integer,
    Float,
    String,
    Boolean,
    Null,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Integer => "Integer",
            TypeTag::Float => "Float",
            TypeTag::String => "String",
            TypeTag::Boolean => "Boolean",
            TypeTag::Null => "Null",
        }
    }

    /// Whether a supplied argument value satisfies this declared type
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeTag::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (TypeTag::Float, Value::Number(n)) => n.is_f64(),
            (TypeTag::String, Value::String(_)) => true,
            // only the two literals, not "truthy" values
            (TypeTag::Boolean, Value::Bool(true)) | (TypeTag::Boolean, Value::Bool(false)) => true,
            (TypeTag::Null, Value::Null) => true,
            (tag, Value::Tagged(tagged)) => tag.accepts(&tagged.value),
            _ => false,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "number" | "int" | "integer" => Ok(TypeTag::Integer),
            "float" | "double" => Ok(TypeTag::Float),
            "str" | "string" | "char" => Ok(TypeTag::String),
            "bool" => Ok(TypeTag::Boolean),
            "null" | "nil" => Ok(TypeTag::Null),
            _ => Err(s.to_string()),
        }
    }
}

/// One declared parameter of a template
#[derive(Debug, Clone, PartialEq)]
pub struct ArgDecl {
    pub name: String,
    pub type_tag: TypeTag,
}

/// A parsed template: ordered parameter declarations plus the body to expand
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDefinition {
    pub name: TemplateName,
    pub args: Vec<ArgDecl>,
    pub body: Mapping,
}

impl TemplateDefinition {
    /// Parse a single raw template definition.
    ///
    /// Type names are resolved here, so an unknown type fails as soon as the
    /// template is read rather than when it is first used.
    pub fn from_value(name: &str, raw: &Value) -> Result<Self, TemplateError> {
        let fields = raw.as_mapping().ok_or_else(|| TemplateError::InvalidDefinition {
            template: name.to_string(),
            reason: "definition should be a Map".to_string(),
        })?;

        let args = match fields.get(ARGS_KEY) {
            None | Some(Value::Null) => vec![],
            Some(Value::Mapping(declared)) => parse_arg_decls(name, declared)?,
            Some(_) => {
                return Err(TemplateError::InvalidDefinition {
                    template: name.to_string(),
                    reason: "`args` should be a Map".to_string(),
                })
            }
        };

        let body = fields
            .iter()
            .filter(|(key, _)| key.as_str() != Some(ARGS_KEY))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            name: name.to_string(),
            args,
            body,
        })
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.args.iter().any(|arg| arg.name == name)
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.args.iter().map(|arg| arg.name.as_str()).collect()
    }
}

fn parse_arg_decls(template: &str, declared: &Mapping) -> Result<Vec<ArgDecl>, TemplateError> {
    declared
        .iter()
        .map(|(param, type_name)| {
            let unknown = || TemplateError::UnknownTypeName {
                template: template.to_string(),
                type_name: stringify(type_name),
            };
            let type_tag = type_name
                .as_str()
                .ok_or_else(unknown)?
                .parse::<TypeTag>()
                .map_err(|_| unknown())?;
            Ok(ArgDecl {
                name: stringify(param),
                type_tag,
            })
        })
        .collect()
}

/// A `from_templates` entry of a resource object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateReference {
    pub name: TemplateName,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub args: Mapping,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Mapping, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Mapping>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read-only set of templates available to one transform
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: HashMap<TemplateName, TemplateDefinition>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the store from the raw `templates` section of a Spec0 document
    pub fn from_mapping(raw: &Mapping) -> Result<Self, TemplateError> {
        let mut store = Self::new();
        for (name, definition) in raw {
            let name = stringify(name);
            store.register(TemplateDefinition::from_value(&name, definition)?);
        }
        Ok(store)
    }

    pub fn register(&mut self, template: TemplateDefinition) {
        self.templates.insert(template.name.clone(), template);
    }

    pub fn get(&self, name: &str) -> Option<&TemplateDefinition> {
        self.templates.get(name)
    }

    /// Private copy of a template for one expansion.
    ///
    /// Callers own the result outright; nothing they do to it is visible to
    /// later lookups of the same template.
    pub fn instantiate(&self, name: &str) -> Option<TemplateDefinition> {
        self.templates.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
