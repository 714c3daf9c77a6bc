//! # Validation Engine
//!
//! Validates one group document:
//!
//! 1. Resolve effective attributes, payload and version
//!    ([`ngff_core::resolve`]). A resolution failure is reported as a single
//!    issue; nothing is fetched.
//! 2. Classify object kinds ([`ngff_core::classify`]). No kind is reported
//!    as a single "unrecognized data" issue.
//! 3. Fetch the version's ancillary schemas and register them with a
//!    retriever scoped to this call.
//! 4. For each kind, fetch and compile its primary schema (Draft 2020-12)
//!    and evaluate the payload.
//! 5. Concatenate issues in classification order.
//!
//! Missing or uncompilable schemas are [`ValidationError`]s: validity
//! cannot be decided without them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use jsonschema::{Retrieve, Uri};
use ngff_core::{classify, resolve, ObjectKind, SchemaKind, SpecVersion};
use ngff_fetch::JsonFetcher;
use serde::Serialize;
use serde_json::Value;

use crate::cache::{file_name, SchemaCache, SchemaDocument};
use crate::error::ValidationError;
use crate::locator::SchemaLocator;

/// Message of the issue reported for documents with no known object kind.
pub const UNRECOGNIZED_MESSAGE: &str = "unrecognized data: no known NGFF object kind present";

/// A single structural problem found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// JSON pointer into the validated payload (empty = root).
    pub instance_path: String,
    /// JSON pointer into the schema (empty when no schema was involved).
    pub schema_path: String,
    /// Failing schema keyword, e.g. `required`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Human-readable description.
    pub message: String,
    /// Schema the issue came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaKind>,
}

impl ValidationIssue {
    /// An issue about the document as a whole, not tied to a schema.
    pub fn document(message: impl Into<String>) -> Self {
        Self {
            instance_path: String::new(),
            schema_path: String::new(),
            keyword: None,
            message: message.into(),
            schema: None,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = self.schema {
            write!(f, "[{schema}] ")?;
        }
        if self.instance_path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// Ordered issues from one validation call. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationResult {
    issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationIssue> {
        self.issues.iter()
    }
}

impl IntoIterator for ValidationResult {
    type Item = ValidationIssue;
    type IntoIter = std::vec::IntoIter<ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {issue}")?;
        }
        Ok(())
    }
}

/// What a validation call found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    /// Resolved version; `None` only when resolution failed.
    pub version: Option<SpecVersion>,
    /// Classified kinds, in priority order.
    pub kinds: Vec<ObjectKind>,
    /// Issues found.
    pub result: ValidationResult,
}

impl ValidationOutcome {
    fn rejected(version: Option<SpecVersion>, message: impl Into<String>) -> Self {
        Self {
            version,
            kinds: Vec::new(),
            result: ValidationResult::new(vec![ValidationIssue::document(message)]),
        }
    }
}

/// Serves registered schemas to the compiler during `$ref` resolution.
///
/// Each schema is registered under the URL it was fetched from, its `$id`,
/// and its file name. Unregistered URIs are an error so that a missing
/// ancillary schema fails compilation instead of passing silently.
struct RegisteredSchemas {
    by_uri: HashMap<String, Value>,
}

impl RegisteredSchemas {
    fn new(docs: &[Arc<SchemaDocument>]) -> Self {
        let mut by_uri = HashMap::new();
        for doc in docs {
            by_uri.insert(doc.url.clone(), doc.schema.clone());
            if let Some(id) = &doc.id {
                by_uri.insert(id.clone(), doc.schema.clone());
            }
            by_uri.insert(doc.file_name().to_string(), doc.schema.clone());
        }
        Self { by_uri }
    }
}

impl Retrieve for RegisteredSchemas {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        if let Some(value) = self.by_uri.get(uri_str) {
            return Ok(value.clone());
        }
        if let Some(value) = self.by_uri.get(file_name(uri_str)) {
            return Ok(value.clone());
        }
        Err(format!("unregistered schema reference: {uri_str}").into())
    }
}

/// Validates NGFF group documents against their spec version's schemas.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    locator: SchemaLocator,
    cache: Arc<SchemaCache>,
}

impl ValidationEngine {
    /// An engine with a fresh cache backed by `fetcher`.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, locator: SchemaLocator) -> Self {
        Self::with_cache(Arc::new(SchemaCache::new(fetcher)), locator)
    }

    /// An engine sharing an existing cache.
    pub fn with_cache(cache: Arc<SchemaCache>, locator: SchemaLocator) -> Self {
        Self { locator, cache }
    }

    pub fn cache(&self) -> &Arc<SchemaCache> {
        &self.cache
    }

    pub fn locator(&self) -> &SchemaLocator {
        &self.locator
    }

    /// Validate a raw group document (`.zattrs` or `zarr.json` contents).
    ///
    /// The version is always taken from the document. `raw` is not
    /// modified.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::SchemaNotFound`] if a needed schema cannot be
    ///   fetched.
    /// - [`ValidationError::SchemaCompile`] if a schema does not compile.
    pub async fn validate(&self, raw: &Value) -> Result<ValidationOutcome, ValidationError> {
        let resolved = match resolve(raw) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::debug!(error = %e, "attribute resolution failed");
                return Ok(ValidationOutcome::rejected(None, e.to_string()));
            }
        };
        let version = resolved.version;

        let kinds = classify(&resolved.effective);
        if kinds.is_empty() {
            return Ok(ValidationOutcome::rejected(Some(version), UNRECOGNIZED_MESSAGE));
        }

        let mut ancillary = Vec::new();
        for url in self.locator.locate_ancillary_schemas(&version) {
            ancillary.push(self.cache.get_or_fetch(&url, &version).await?);
        }

        let mut primaries = Vec::with_capacity(kinds.len());
        for kind in &kinds {
            let schema_kind = kind.schema_kind();
            let url = self.locator.locate_schema(schema_kind, &version);
            primaries.push((schema_kind, self.cache.get_or_fetch(&url, &version).await?));
        }

        let mut issues = Vec::new();
        for (schema_kind, schema) in &primaries {
            issues.extend(evaluate(schema, &ancillary, *schema_kind, &resolved.payload)?);
        }

        tracing::debug!(
            version = %version,
            kinds = ?kinds,
            issues = issues.len(),
            "document validated"
        );
        Ok(ValidationOutcome {
            version: Some(version),
            kinds,
            result: ValidationResult::new(issues),
        })
    }
}

/// Compile `schema` against `ancillary` and evaluate `payload`.
fn evaluate(
    schema: &SchemaDocument,
    ancillary: &[Arc<SchemaDocument>],
    kind: SchemaKind,
    payload: &Value,
) -> Result<Vec<ValidationIssue>, ValidationError> {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    opts.with_retriever(RegisteredSchemas::new(ancillary));

    let validator = opts
        .build(&schema.schema)
        .map_err(|e| ValidationError::SchemaCompile {
            url: schema.url.clone(),
            reason: e.to_string(),
        })?;

    let issues = validator
        .iter_errors(payload)
        .map(|e| {
            let schema_path = e.schema_path.to_string();
            ValidationIssue {
                instance_path: e.instance_path.to_string(),
                keyword: keyword_of(&schema_path),
                schema_path,
                message: e.to_string(),
                schema: Some(kind),
            }
        })
        .collect();
    Ok(issues)
}

/// The failing keyword: the last non-index segment of a schema pointer.
fn keyword_of(schema_path: &str) -> Option<String> {
    schema_path
        .rsplit('/')
        .find(|segment| !segment.is_empty() && !segment.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
}
