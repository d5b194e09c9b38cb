//! Spec Transform - Spec0 -> Spec1
//!
//! Every resource is expanded in document order. The first failure aborts the
//! whole transform; no partial Spec1 is ever returned.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::document::{stringify_mapping_keys, Spec0Document, Spec1Document, SpecDocument};
use crate::expander::{expand, ExpandError};
use crate::substitute::stringify;
use crate::templates::{TemplateError, TemplateStore};

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Structural validation failed: {}", join_reasons(.0))]
    StructuralValidation(Vec<String>),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Failed to expand \"{resource}\": {source}")]
    Expand {
        resource: String,
        #[source]
        source: ExpandError,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read {}: {source}", display_path(.path))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn join_reasons(reasons: &[String]) -> String {
    reasons.join("; ")
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

impl TransformError {
    pub fn is_structural(&self) -> bool {
        matches!(self, TransformError::StructuralValidation(_))
    }
}

/// Options for the document-level entry points
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Run the advisory structure check before typing the document
    pub check_structure: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            check_structure: true,
        }
    }
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_structure_check(mut self, enabled: bool) -> Self {
        self.check_structure = enabled;
        self
    }
}

/// Expands resources against one template store
pub struct Transformer {
    templates: TemplateStore,
}

impl Transformer {
    pub fn new(templates: TemplateStore) -> Self {
        Self { templates }
    }

    /// Read the templates of a Spec0 document.
    ///
    /// Unknown type names fail here, before any resource is touched.
    pub fn for_document(doc: &Spec0Document) -> Result<Self, TransformError> {
        Ok(Self::new(TemplateStore::from_mapping(&doc.templates)?))
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    /// Expand a single resource, annotating failures with its name
    pub fn expand_resource(&self, name: &str, object: &Value) -> Result<Mapping, TransformError> {
        expand(name, object, &self.templates).map_err(|source| TransformError::Expand {
            resource: name.to_string(),
            source,
        })
    }

    /// Produce the Spec1 document for `doc`
    pub fn transform(&self, doc: &Spec0Document) -> Result<Spec1Document, TransformError> {
        info!(
            resources = doc.spec.len(),
            templates = self.templates.len(),
            "expanding spec0 document"
        );

        let mut spec = Mapping::new();
        for (name, object) in &doc.spec {
            let name = stringify(name);
            let expanded = self.expand_resource(&name, object)?;
            debug!(resource = %name, fields = expanded.len(), "expanded resource");
            spec.insert(Value::String(name), Value::Mapping(stringify_mapping_keys(expanded)));
        }

        Ok(SpecDocument {
            version: doc.version,
            annotations: stringify_mapping_keys(doc.annotations.clone()),
            spec,
        })
    }
}

impl Spec0Document {
    /// Expand every resource into a Spec1 document.
    ///
    /// No structural check happens here. Documents from untrusted input should
    /// go through [`Spec0Document::check_structure`] on the raw value first,
    /// as [`compile_str`] does.
    pub fn to_spec1(&self) -> Result<Spec1Document, TransformError> {
        Transformer::for_document(self)?.transform(self)
    }
}

/// Parse, optionally check, and transform a Spec0 document from YAML text
pub fn compile_str(source: &str, options: &TransformOptions) -> Result<Spec1Document, TransformError> {
    let raw: Value = serde_yaml::from_str(source)?;
    compile_value(raw, options)
}

/// Same as [`compile_str`], reading the document from `path`
pub fn compile_file(path: &Path, options: &TransformOptions) -> Result<Spec1Document, TransformError> {
    let source = fs::read_to_string(path).map_err(|source| TransformError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = source.len(), "read spec0 document");
    compile_str(&source, options)
}

fn compile_value(raw: Value, options: &TransformOptions) -> Result<Spec1Document, TransformError> {
    if options.check_structure {
        Spec0Document::check_structure(&raw).map_err(TransformError::StructuralValidation)?;
    }
    let doc = Spec0Document::from_value(raw)?;
    doc.to_spec1()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ArgError;

    const DOC: &str = r#"
version: 0
annotations:
  owner: infra
templates:
  disk:
    args:
      size: int
    type: volume
    size: __size__
spec:
  vol1:
    from_templates:
      - name: disk
        args:
          size: 10
  net1:
    type: network
"#;

    fn parse(source: &str) -> Spec0Document {
        Spec0Document::from_yaml(source).unwrap()
    }

    #[test]
    fn test_transform_keeps_envelope_and_order() {
        let spec1 = parse(DOC).to_spec1().unwrap();
        assert_eq!(spec1.version, 0);
        assert_eq!(spec1.annotations.get("owner"), Some(&Value::from("infra")));

        let names: Vec<_> = spec1.spec.keys().filter_map(Value::as_str).collect();
        assert_eq!(names, vec!["vol1", "net1"]);
    }

    #[test]
    fn test_output_has_no_template_vocabulary() {
        let yaml = parse(DOC).to_spec1().unwrap().to_yaml().unwrap();
        assert!(!yaml.contains("templates"));
        assert!(!yaml.contains("from_templates"));
        assert!(!yaml.contains("__size__"));
    }

    #[test]
    fn test_failure_names_resource() {
        let doc = parse(
            r#"
version: 0
templates:
  disk: {args: {size: int}, size: __size__}
spec:
  ok: {kind: plain}
  broken:
    from_templates: [{name: disk, args: {size: big}}]
"#,
        );
        let err = doc.to_spec1().unwrap_err();
        match err {
            TransformError::Expand { resource, source } => {
                assert_eq!(resource, "broken");
                assert!(matches!(
                    source,
                    ExpandError::Arguments(ArgError::ArgumentTypeMismatch { .. })
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_fails_before_expansion() {
        let doc = parse(
            r#"
version: 0
templates:
  disk: {args: {size: huge}, size: __size__}
spec:
  plain: {kind: x}
"#,
        );
        let err = doc.to_spec1().unwrap_err();
        assert!(matches!(
            err,
            TransformError::Template(TemplateError::UnknownTypeName { .. })
        ));
    }

    #[test]
    fn test_compile_str_runs_structure_check() {
        let err = compile_str("version: 3\nspec: {}", &TransformOptions::default()).unwrap_err();
        assert!(err.is_structural());
        assert_eq!(err.to_string(), "Structural validation failed: `version` should be 0");
    }

    #[test]
    fn test_compile_str_without_check() {
        let options = TransformOptions::new().with_structure_check(false);
        let spec1 = compile_str("version: 3\nspec: {a: {k: v}}", &options).unwrap();
        assert_eq!(spec1.version, 3);
    }

    #[test]
    fn test_missing_version_rejected_without_check() {
        let options = TransformOptions::new().with_structure_check(false);
        let err = compile_str("spec: {a: {k: v}}", &options).unwrap_err();
        assert!(matches!(err, TransformError::Yaml(_)), "{:?}", err);
    }

    #[test]
    fn test_compile_file_missing_path() {
        let err = compile_file(Path::new("/nonexistent/spec.yaml"), &TransformOptions::default())
            .unwrap_err();
        assert!(matches!(err, TransformError::Io { .. }));
    }
}
