//! # Validation Errors
//!
//! Fatal failures of a validation call. Structural problems with the
//! document itself are not errors: they are returned as
//! [`ValidationIssue`](crate::ValidationIssue)s.

use ngff_core::SpecVersion;
use thiserror::Error;

/// A validation call could not determine validity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A schema URL was located but could not be fetched or was not a
    /// JSON object. Never cached; a later call fetches again.
    #[error("schema for version {version} not available at {url}: {reason}")]
    SchemaNotFound {
        /// Version the schema was requested for.
        version: SpecVersion,
        /// Located schema URL.
        url: String,
        /// Underlying fetch failure.
        reason: String,
    },

    /// A schema was fetched but could not be compiled, including when it
    /// references a document that was not registered.
    #[error("schema at {url} failed to compile: {reason}")]
    SchemaCompile {
        /// Schema URL.
        url: String,
        /// Compiler message.
        reason: String,
    },
}

impl ValidationError {
    /// The schema URL the failure relates to.
    pub fn url(&self) -> &str {
        match self {
            Self::SchemaNotFound { url, .. } | Self::SchemaCompile { url, .. } => url,
        }
    }
}
