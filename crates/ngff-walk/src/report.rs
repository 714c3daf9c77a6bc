//! # Node Reports
//!
//! One [`NodeReport`] per visited node. A node either validated (possibly
//! with issues) or failed with a [`NodeError`]; a failure never affects
//! sibling nodes.

use ngff_core::{ArrayMetadata, ObjectKind, SpecVersion};
use ngff_fetch::{FetchError, MetadataFile};
use ngff_schema::{ValidationError, ValidationResult};
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::preview::Preview;

/// Where a node sits in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    /// The URL the walk started from.
    Root,
    /// A well of a plate.
    Well,
    /// An image inside a well.
    WellImage,
    /// The `labels/` group of an image. Reported only when it fails.
    Labels,
    /// A label image under `labels/{name}/`.
    Label,
}

/// A node-scoped failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeError {
    /// The node's metadata could not be read.
    #[error("could not read metadata at {url}: {source}")]
    Fetch {
        /// Node URL.
        url: String,
        #[source]
        source: FetchError,
    },

    /// Validation could not be completed.
    #[error("could not validate {url}: {source}")]
    Validation {
        /// Node URL.
        url: String,
        #[source]
        source: ValidationError,
    },
}

impl NodeError {
    /// True if the node's metadata does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Fetch { source, .. } if source.is_not_found())
    }
}

/// Outcome of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NodeStatus {
    /// Validation ran. `issues` is empty for a valid node.
    Validated { issues: ValidationResult },
    /// The node could not be validated.
    Failed {
        #[serde(serialize_with = "display")]
        error: NodeError,
    },
}

/// Array metadata read for one dataset of an image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    /// `multiscales[0].datasets[].path`.
    pub path: String,
    pub url: String,
    #[serde(flatten)]
    pub status: DatasetStatus,
}

/// Result of reading one dataset's array metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DatasetStatus {
    Read {
        file: MetadataFile,
        metadata: ArrayMetadata,
    },
    Failed {
        error: String,
    },
}

/// One entry of the walk stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    /// Path relative to the walk root; empty for the root itself.
    pub path: String,
    /// Node URL, ending with `/`.
    pub url: String,
    pub role: NodeRole,
    /// Classified kinds, in priority order.
    pub kinds: Vec<ObjectKind>,
    /// Resolved spec version, when resolution succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<SpecVersion>,
    /// The sidecar the attributes were read from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_file: Option<MetadataFile>,
    #[serde(flatten)]
    pub status: NodeStatus,
    /// Dataset array metadata, when arrays were inspected.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub datasets: Vec<DatasetSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<Preview>,
}

impl NodeReport {
    /// A report for a node that could not be validated.
    pub fn failed(path: String, url: String, role: NodeRole, error: NodeError) -> Self {
        Self {
            path,
            url,
            role,
            kinds: Vec::new(),
            version: None,
            metadata_file: None,
            status: NodeStatus::Failed { error },
            datasets: Vec::new(),
            preview: None,
        }
    }

    /// True if the node validated with no issues.
    pub fn is_valid(&self) -> bool {
        matches!(&self.status, NodeStatus::Validated { issues } if issues.is_valid())
    }

    /// Validation issues, empty for failed nodes.
    pub fn issues(&self) -> Option<&ValidationResult> {
        match &self.status {
            NodeStatus::Validated { issues } => Some(issues),
            NodeStatus::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&NodeError> {
        match &self.status {
            NodeStatus::Validated { .. } => None,
            NodeStatus::Failed { error } => Some(error),
        }
    }
}

fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
