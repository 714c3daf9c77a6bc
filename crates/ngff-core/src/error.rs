//! # Error Types
//!
//! Errors raised while interpreting NGFF documents. All of them are
//! data errors: they describe what is wrong with a document, never an I/O
//! failure.

use thiserror::Error;

/// A version string could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid spec version '{input}': {reason}")]
pub struct VersionParseError {
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: String,
}

/// Attribute/version resolution failed for a group document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The group document is not a JSON object.
    #[error("group metadata is not a JSON object (found {found})")]
    NotAnObject {
        /// JSON type name of what was found instead.
        found: &'static str,
    },

    /// `attributes.ome` exists but declares no version.
    #[error("no version found under attributes.ome; versions >= 0.5 must declare one")]
    MissingNamespacedVersion,

    /// A version field was present but unusable.
    #[error("invalid version at {field}: {source}")]
    InvalidVersion {
        /// Dotted location of the offending field.
        field: &'static str,
        /// Underlying parse failure.
        #[source]
        source: VersionParseError,
    },
}

/// Zarr array metadata could not be interpreted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrayMetadataError {
    /// The metadata document is not a JSON object.
    #[error("array metadata is not a JSON object")]
    NotAnObject,

    /// Neither `chunks` (v2) nor `chunk_grid` (v3) is present.
    #[error("array metadata has neither 'chunks' nor 'chunk_grid.configuration.chunk_shape'")]
    MissingChunkShape,

    /// A field exists but has the wrong shape.
    #[error("malformed array metadata field '{field}': {reason}")]
    Malformed {
        /// Field path.
        field: String,
        /// Deserialization failure.
        reason: String,
    },
}
