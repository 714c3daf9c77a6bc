//! # ngff-fetch -- JSON fetch capability for NGFF validation
//!
//! Everything the validator reads is a JSON document behind a URL: group
//! attributes, array metadata and the schemas themselves. This crate puts
//! that behind one capability, [`JsonFetcher`], with two implementations:
//!
//! - [`HttpFetcher`]: reqwest, for real datasets and schema hosts.
//! - [`InMemoryFetcher`]: a URL-keyed map with fetch counters, for tests.
//!
//! ## Error Contract
//!
//! A 404 is [`FetchError::NotFound`] and must stay distinguishable from a
//! transport failure: the sidecar lookup in [`zarr`] falls back from
//! `zarr.json` to `.zattrs` on `NotFound` only.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod zarr;

pub use config::{ConfigError, FetchConfig};
pub use error::FetchError;
pub use http::HttpFetcher;
pub use memory::InMemoryFetcher;
pub use zarr::{child_url, fetch_array, fetch_group, node_url, MetadataFile, SidecarDocument};

use async_trait::async_trait;
use serde_json::Value;

/// Fetch a URL and parse its body as JSON.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError>;
}
