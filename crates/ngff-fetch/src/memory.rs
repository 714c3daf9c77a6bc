//! In-memory [`JsonFetcher`] for tests and offline fixtures.
//!
//! Documents are keyed by exact URL. URLs that were never inserted answer
//! [`FetchError::NotFound`]; explicit failures can be injected per URL.
//! Every call is counted, including failed ones, so tests can assert on
//! how many fetches a component issued.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use crate::error::FetchError;
use crate::JsonFetcher;

#[derive(Debug, Clone)]
enum Entry {
    Document(Value),
    Failure(FetchError),
}

/// A [`JsonFetcher`] serving documents from a concurrent map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFetcher {
    entries: Arc<DashMap<String, Entry>>,
    counts: Arc<DashMap<String, usize>>,
    latency: Option<Duration>,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every fetch by `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Serve `doc` at `url`.
    pub fn insert(&self, url: impl Into<String>, doc: Value) {
        self.entries.insert(url.into(), Entry::Document(doc));
    }

    /// Answer every fetch of `url` with `error`.
    pub fn fail(&self, url: impl Into<String>, error: FetchError) {
        self.entries.insert(url.into(), Entry::Failure(error));
    }

    /// Stop serving `url`; later fetches answer `NotFound`.
    pub fn remove(&self, url: &str) {
        self.entries.remove(url);
    }

    /// How often `url` has been fetched.
    pub fn fetch_count(&self, url: &str) -> usize {
        self.counts.get(url).map(|c| *c).unwrap_or(0)
    }

    /// Total fetches across all URLs.
    pub fn total_fetches(&self) -> usize {
        self.counts.iter().map(|c| *c.value()).sum()
    }

    /// Per-URL counts, sorted by URL.
    pub fn fetch_counts(&self) -> BTreeMap<String, usize> {
        self.counts
            .iter()
            .map(|c| (c.key().clone(), *c.value()))
            .collect()
    }
}

#[async_trait]
impl JsonFetcher for InMemoryFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        *self.counts.entry(url.to_string()).or_insert(0) += 1;
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        // Clone out of the map before returning so no shard lock is held.
        let entry = self.entries.get(url).map(|e| e.value().clone());
        match entry {
            Some(Entry::Document(doc)) => Ok(doc),
            Some(Entry::Failure(err)) => Err(err),
            None => Err(FetchError::NotFound {
                url: url.to_string(),
            }),
        }
    }
}
