//! Resource Expansion - Templates In, Concrete Objects Out
//!
//! An object's `from_templates` list is folded left to right into one
//! mapping, then the object's own fields are merged on top. Later templates
//! beat earlier ones; the object beats every template.

use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::{trace, warn};

use crate::merge::deep_merge;
use crate::substitute::{placeholder, stringify, substitute_mapping};
use crate::templates::{TemplateReference, TemplateStore};
use crate::validation::{check_args, ArgError};

/// Key holding a resource object's template references.
pub const FROM_TEMPLATES_KEY: &str = "from_templates";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExpandError {
    #[error("Template not found: \"{template}\" (referenced by \"{resource}\")")]
    TemplateNotFound { template: String, resource: String },

    #[error(transparent)]
    Arguments(#[from] ArgError),

    #[error("Resource \"{resource}\" is invalid: {reason}")]
    InvalidResource { resource: String, reason: String },
}

/// Expand one resource object into its final, template-free form.
///
/// The input object is not modified. Unknown templates and argument errors
/// abort the expansion before anything is substituted for that reference.
pub fn expand(name: &str, object: &Value, templates: &TemplateStore) -> Result<Mapping, ExpandError> {
    let fields = object.as_mapping().ok_or_else(|| ExpandError::InvalidResource {
        resource: name.to_string(),
        reason: "object should be a Map".to_string(),
    })?;

    let overrides: Mapping = fields
        .iter()
        .filter(|(key, _)| key.as_str() != Some(FROM_TEMPLATES_KEY))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let references = match fields.get(FROM_TEMPLATES_KEY) {
        None => return Ok(overrides),
        Some(raw) => parse_references(name, raw)?,
    };

    let mut expanded = Mapping::new();
    for reference in &references {
        let applied = apply_template(name, reference, templates)?;
        expanded = deep_merge(expanded, applied);
    }

    Ok(deep_merge(expanded, overrides))
}

fn parse_references(resource: &str, raw: &Value) -> Result<Vec<TemplateReference>, ExpandError> {
    let invalid = |reason: String| ExpandError::InvalidResource {
        resource: resource.to_string(),
        reason,
    };

    match raw {
        Value::Null => Ok(vec![]),
        Value::Sequence(entries) => entries
            .iter()
            .map(|entry| {
                serde_yaml::from_value(entry.clone())
                    .map_err(|e| invalid(format!("bad `{}` entry: {}", FROM_TEMPLATES_KEY, e)))
            })
            .collect(),
        _ => Err(invalid(format!("`{}` should be a list", FROM_TEMPLATES_KEY))),
    }
}

/// Instantiate one referenced template with its arguments substituted
fn apply_template(
    resource: &str,
    reference: &TemplateReference,
    templates: &TemplateStore,
) -> Result<Mapping, ExpandError> {
    let template = templates
        .instantiate(&reference.name)
        .ok_or_else(|| ExpandError::TemplateNotFound {
            template: reference.name.clone(),
            resource: resource.to_string(),
        })?;

    check_args(&template.args, &reference.args, resource)?;

    let extra: Vec<String> = reference
        .args
        .keys()
        .map(stringify)
        .filter(|arg| !template.has_parameter(arg))
        .collect();
    if !extra.is_empty() {
        warn!(
            resource,
            template = %template.name,
            extra = ?extra,
            "undeclared template arguments supplied"
        );
    }

    // one pass per argument, in the order they were supplied
    let mut body = template.body;
    for (arg_name, arg_value) in &reference.args {
        body = substitute_mapping(&body, &placeholder(&stringify(arg_name)), &stringify(arg_value));
    }

    trace!(resource, template = %template.name, "applied template");
    Ok(body)
}
