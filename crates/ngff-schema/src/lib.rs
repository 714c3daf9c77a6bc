//! # ngff-schema -- Schema Resolution and Validation
//!
//! - [`SchemaLocator`]: (kind, version) to schema URL, with swappable
//!   per-version templates and the ancillary `$ref` set of each version.
//! - [`SchemaCache`]: single-flight cache of fetched schema documents.
//! - [`ValidationEngine`]: resolves, classifies, fetches, compiles and
//!   evaluates. Evaluation is delegated to the `jsonschema` crate.

pub mod cache;
pub mod engine;
pub mod error;
pub mod locator;

pub use cache::{SchemaCache, SchemaDocument};
pub use engine::{
    ValidationEngine, ValidationIssue, ValidationOutcome, ValidationResult, UNRECOGNIZED_MESSAGE,
};
pub use error::ValidationError;
pub use locator::{ancillary_stems, LocatorConfig, SchemaLocator};

// Pure resolution and classification, for callers that only need this crate.
pub use ngff_core::{classify, primary_kind, resolve};
