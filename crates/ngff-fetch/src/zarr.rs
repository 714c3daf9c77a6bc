//! # Zarr Sidecar Lookup
//!
//! Zarr v3 keeps group and array metadata in `zarr.json`; Zarr v2 splits it
//! across `.zattrs` (group attributes) and `.zarray` (array metadata). A
//! node is checked for the v3 file first and falls back to the v2 file only
//! when the first answers [`FetchError::NotFound`]. Any other failure is
//! returned unchanged.
//!
//! Node URLs always end with `/`; [`node_url`] and [`child_url`] maintain
//! that.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FetchError;
use crate::JsonFetcher;

/// A metadata sidecar file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetadataFile {
    #[serde(rename = "zarr.json")]
    ZarrJson,
    #[serde(rename = ".zattrs")]
    Zattrs,
    #[serde(rename = ".zarray")]
    Zarray,
}

impl MetadataFile {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::ZarrJson => "zarr.json",
            Self::Zattrs => ".zattrs",
            Self::Zarray => ".zarray",
        }
    }

    /// True for the Zarr v2 sidecars.
    pub fn is_v2(self) -> bool {
        !matches!(self, Self::ZarrJson)
    }
}

impl fmt::Display for MetadataFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// A metadata document together with the file it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct SidecarDocument {
    pub file: MetadataFile,
    pub url: String,
    pub doc: Value,
}

/// `url` with exactly one trailing `/`, and any trailing sidecar file name
/// stripped so that a pasted `.../image.zarr/zarr.json` points at the node.
pub fn node_url(url: &str) -> String {
    let mut trimmed = url.trim().trim_end_matches('/');
    for file in [MetadataFile::ZarrJson, MetadataFile::Zattrs, MetadataFile::Zarray] {
        if let Some(stripped) = trimmed.strip_suffix(file.file_name()) {
            if stripped.ends_with('/') {
                trimmed = stripped.trim_end_matches('/');
                break;
            }
        }
    }
    format!("{trimmed}/")
}

/// URL of the child node `path` below `parent`. `path` may contain several
/// segments (`"A/1"`) and stray slashes.
pub fn child_url(parent: &str, path: &str) -> String {
    let segment = path.trim_matches('/');
    if segment.is_empty() {
        return node_url(parent);
    }
    node_url(&format!("{}{}", node_url(parent), segment))
}

/// Fetch group metadata: `zarr.json`, then `.zattrs` on `NotFound`.
pub async fn fetch_group(
    fetcher: &dyn JsonFetcher,
    node: &str,
) -> Result<SidecarDocument, FetchError> {
    fetch_first(fetcher, node, &[MetadataFile::ZarrJson, MetadataFile::Zattrs]).await
}

/// Fetch array metadata. Tries `zarr.json` then `.zarray`, or the
/// reverse when `prefer_v2` is set (the parent group was a v2 group).
pub async fn fetch_array(
    fetcher: &dyn JsonFetcher,
    node: &str,
    prefer_v2: bool,
) -> Result<SidecarDocument, FetchError> {
    let order = if prefer_v2 {
        [MetadataFile::Zarray, MetadataFile::ZarrJson]
    } else {
        [MetadataFile::ZarrJson, MetadataFile::Zarray]
    };
    fetch_first(fetcher, node, &order).await
}

async fn fetch_first(
    fetcher: &dyn JsonFetcher,
    node: &str,
    candidates: &[MetadataFile],
) -> Result<SidecarDocument, FetchError> {
    let base = node_url(node);
    let mut last_not_found = None;
    for &file in candidates {
        let url = format!("{base}{}", file.file_name());
        match fetcher.fetch_json(&url).await {
            Ok(doc) => return Ok(SidecarDocument { file, url, doc }),
            Err(err) if err.is_not_found() => {
                tracing::debug!(url = %url, "sidecar not found, trying next");
                last_not_found = Some(err);
            }
            Err(err) => return Err(err),
        }
    }
    Err(last_not_found.unwrap_or(FetchError::NotFound { url: base }))
}
