//! # Zarr Array Metadata
//!
//! Only the fields the validator reports on are read: shape, chunk shape,
//! shard shape, data type. Codecs other than `sharding_indexed` are ignored
//! and chunks are never decoded.
//!
//! ## Formats
//!
//! - **v2** (`.zarray`): `chunks`, `dtype`, `shape`.
//! - **v3** (`zarr.json`): `chunk_grid.configuration.chunk_shape`,
//!   `data_type`, `shape`, and optionally a `sharding_indexed` codec whose
//!   `configuration.chunk_shape` is the inner chunk shape. With sharding the
//!   regular grid describes shards, not chunks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ArrayMetadataError;

/// Codec name that wraps chunks into shards.
pub const SHARDING_CODEC: &str = "sharding_indexed";

/// The Zarr format version an array document was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZarrFormat {
    /// `.zarray`
    V2,
    /// `zarr.json`
    V3,
}

/// Summary of one array's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayMetadata {
    /// Format the document was written in.
    pub zarr_format: ZarrFormat,
    /// Array shape, absent in metadata fragments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<Vec<u64>>,
    /// Shape of one (inner) chunk.
    pub chunk_shape: Vec<u64>,
    /// Shape of one shard, when the array is sharded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shard_shape: Option<Vec<u64>>,
    /// `dtype` (v2) or `data_type` (v3). v3 extension data types may be
    /// objects; those are kept as their JSON text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl ArrayMetadata {
    /// Interpret a `.zarray` or array `zarr.json` document.
    ///
    /// # Errors
    ///
    /// - [`ArrayMetadataError::NotAnObject`] for non-object input.
    /// - [`ArrayMetadataError::MissingChunkShape`] if no chunk shape can be
    ///   found in either format.
    /// - [`ArrayMetadataError::Malformed`] if a shape field is not an
    ///   array of non-negative integers.
    pub fn from_json(doc: &Value) -> Result<Self, ArrayMetadataError> {
        let map = doc.as_object().ok_or(ArrayMetadataError::NotAnObject)?;

        let shape = map
            .get("shape")
            .map(|v| shape_field(v, "shape"))
            .transpose()?;

        let is_v3 = map.contains_key("chunk_grid")
            || map.get("zarr_format").and_then(Value::as_u64) == Some(3);

        if is_v3 {
            let grid = doc
                .pointer("/chunk_grid/configuration/chunk_shape")
                .ok_or(ArrayMetadataError::MissingChunkShape)?;
            let grid = shape_field(grid, "chunk_grid.configuration.chunk_shape")?;

            let (chunk_shape, shard_shape) = match sharding_inner_shape(map.get("codecs"))? {
                Some(inner) => (inner, Some(grid)),
                None => (grid, None),
            };

            return Ok(Self {
                zarr_format: ZarrFormat::V3,
                shape,
                chunk_shape,
                shard_shape,
                data_type: map.get("data_type").map(data_type_text),
            });
        }

        let chunks = map
            .get("chunks")
            .ok_or(ArrayMetadataError::MissingChunkShape)?;
        Ok(Self {
            zarr_format: ZarrFormat::V2,
            shape,
            chunk_shape: shape_field(chunks, "chunks")?,
            shard_shape: None,
            data_type: map.get("dtype").map(data_type_text),
        })
    }

    /// Number of dimensions, taken from the chunk shape.
    pub fn ndim(&self) -> usize {
        self.chunk_shape.len()
    }

    /// True if chunks are grouped into shards.
    pub fn is_sharded(&self) -> bool {
        self.shard_shape.is_some()
    }
}

fn sharding_inner_shape(codecs: Option<&Value>) -> Result<Option<Vec<u64>>, ArrayMetadataError> {
    let Some(codecs) = codecs.and_then(Value::as_array) else {
        return Ok(None);
    };
    let Some(sharding) = codecs
        .iter()
        .find(|c| c.get("name").and_then(Value::as_str) == Some(SHARDING_CODEC))
    else {
        return Ok(None);
    };
    let inner = sharding
        .pointer("/configuration/chunk_shape")
        .ok_or_else(|| ArrayMetadataError::Malformed {
            field: "codecs[sharding_indexed].configuration.chunk_shape".to_string(),
            reason: "missing".to_string(),
        })?;
    shape_field(inner, "codecs[sharding_indexed].configuration.chunk_shape").map(Some)
}

fn shape_field(value: &Value, field: &str) -> Result<Vec<u64>, ArrayMetadataError> {
    serde_json::from_value::<Vec<u64>>(value.clone()).map_err(|e| ArrayMetadataError::Malformed {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

fn data_type_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
