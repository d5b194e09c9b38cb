//! n0spec Core - Spec0 -> Spec1 Template Expansion
//!
//! A Spec0 document names reusable templates and resource objects that pull
//! them in through `from_templates`. The transform resolves every reference,
//! checks the supplied arguments against the declared parameter types,
//! substitutes `__<arg>__` placeholders and deep-merges the results under the
//! object's own fields. The Spec1 output carries no template vocabulary.
//!
//! ```rust
//! use n0spec_core::{compile_str, TransformOptions};
//!
//! let spec1 = compile_str(
//!     r#"
//! version: 0
//! templates:
//!   disk:
//!     args: { size: int }
//!     type: volume
//!     size: __size__
//! spec:
//!   vol1:
//!     from_templates:
//!       - { name: disk, args: { size: 10 } }
//! "#,
//!     &TransformOptions::default(),
//! )
//! .unwrap();
//!
//! let vol1 = spec1.spec.get("vol1").unwrap();
//! assert_eq!(vol1.get("size").and_then(|v| v.as_str()), Some("10"));
//! ```

pub mod document;
pub mod expander;
pub mod hashing;
pub mod merge;
pub mod pipeline;
pub mod resources;
pub mod substitute;
pub mod templates;
pub mod validation;

pub use document::{Spec0Document, Spec1Document, Spec2Document, SpecDocument, SPEC0_VERSION};
pub use expander::{expand, ExpandError};
pub use hashing::{canonical_json, fingerprint};
pub use pipeline::{compile_file, compile_str, TransformError, TransformOptions, Transformer};
pub use templates::{TemplateDefinition, TemplateError, TemplateReference, TemplateStore, TypeTag};
pub use validation::{check_args, ArgError, ArgMismatch, ValueKind};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
