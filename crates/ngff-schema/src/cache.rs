//! # Schema Cache
//!
//! Fetched schema documents, keyed by URL. Each URL owns a
//! `tokio::sync::OnceCell`, so concurrent requests for the same URL wait on
//! a single in-flight fetch instead of issuing their own. A failed fetch
//! leaves the cell empty: the next caller fetches again.
//!
//! Every document has its top-level `$schema` key removed before it is
//! stored. The meta-schema reference is not resolvable by the evaluator and
//! would fail compilation.
//!
//! The cache is an ordinary value. Share it through `Arc` and call
//! [`SchemaCache::clear`] between tests.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use ngff_core::SpecVersion;
use ngff_fetch::JsonFetcher;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::error::ValidationError;

/// A fetched and normalized JSON Schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    /// URL the document was fetched from.
    pub url: String,
    /// Version it was first requested for.
    pub version: SpecVersion,
    /// The document's `$id`, if declared.
    pub id: Option<String>,
    /// The schema, without `$schema`.
    pub schema: Value,
}

impl SchemaDocument {
    /// Last path segment of the fetched URL (`image.schema`).
    pub fn file_name(&self) -> &str {
        file_name(&self.url)
    }
}

pub(crate) fn file_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// Single-flight cache of schema documents.
pub struct SchemaCache {
    fetcher: Arc<dyn JsonFetcher>,
    entries: DashMap<String, Arc<OnceCell<Arc<SchemaDocument>>>>,
}

impl fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaCache")
            .field("cached", &self.len())
            .finish_non_exhaustive()
    }
}

impl SchemaCache {
    pub fn new(fetcher: Arc<dyn JsonFetcher>) -> Self {
        Self {
            fetcher,
            entries: DashMap::new(),
        }
    }

    /// The cached document for `url`, fetching it on first use.
    ///
    /// # Errors
    ///
    /// [`ValidationError::SchemaNotFound`] if the fetch fails or the body is
    /// not a JSON object. The failure is not cached.
    pub async fn get_or_fetch(
        &self,
        url: &str,
        version: &SpecVersion,
    ) -> Result<Arc<SchemaDocument>, ValidationError> {
        let cell = self
            .entries
            .entry(url.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .value()
            .clone();

        if let Some(doc) = cell.get() {
            tracing::debug!(url, "schema cache hit");
            return Ok(Arc::clone(doc));
        }

        let doc = cell
            .get_or_try_init(|| self.fetch(url, version))
            .await
            .map_err(|e| {
                tracing::warn!(url, error = %e, "schema fetch failed");
                e
            })?;
        Ok(Arc::clone(doc))
    }

    async fn fetch(
        &self,
        url: &str,
        version: &SpecVersion,
    ) -> Result<Arc<SchemaDocument>, ValidationError> {
        tracing::debug!(url, %version, "fetching schema");
        let not_found = |reason: String| ValidationError::SchemaNotFound {
            version: version.clone(),
            url: url.to_string(),
            reason,
        };

        let mut schema = self
            .fetcher
            .fetch_json(url)
            .await
            .map_err(|e| not_found(e.to_string()))?;
        let map = schema
            .as_object_mut()
            .ok_or_else(|| not_found("not a JSON object".to_string()))?;
        map.remove("$schema");
        let id = map.get("$id").and_then(Value::as_str).map(str::to_string);

        Ok(Arc::new(SchemaDocument {
            url: url.to_string(),
            version: version.clone(),
            id,
            schema,
        }))
    }

    /// Drop every cached document.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of successfully cached documents.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.value().initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if a document for `url` is cached.
    pub fn contains(&self, url: &str) -> bool {
        self.entries
            .get(url)
            .is_some_and(|e| e.value().initialized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngff_fetch::{FetchError, InMemoryFetcher};
    use serde_json::json;
    use std::time::Duration;

    const URL: &str = "mem://schemas/0.4/image.schema";

    fn v04() -> SpecVersion {
        SpecVersion::parse("0.4").unwrap()
    }

    fn setup() -> (InMemoryFetcher, SchemaCache) {
        let fetcher = InMemoryFetcher::new();
        let cache = SchemaCache::new(Arc::new(fetcher.clone()));
        (fetcher, cache)
    }

    #[tokio::test]
    async fn strips_meta_schema_key() {
        let (fetcher, cache) = setup();
        fetcher.insert(
            URL,
            json!({
                "$schema": "https://json-schema.org/draft/2020-12/schema",
                "$id": "https://ngff.openmicroscopy.org/0.4/schemas/image.schema",
                "type": "object"
            }),
        );

        let doc = cache.get_or_fetch(URL, &v04()).await.unwrap();
        assert!(doc.schema.get("$schema").is_none());
        assert_eq!(
            doc.id.as_deref(),
            Some("https://ngff.openmicroscopy.org/0.4/schemas/image.schema")
        );
        assert_eq!(doc.file_name(), "image.schema");
        assert_eq!(doc.version, v04());
    }

    #[tokio::test]
    async fn fetches_each_url_once() {
        let (fetcher, cache) = setup();
        fetcher.insert(URL, json!({"type": "object"}));

        let a = cache.get_or_fetch(URL, &v04()).await.unwrap();
        let b = cache.get_or_fetch(URL, &v04()).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(fetcher.fetch_count(URL), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(URL));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_share_one_fetch() {
        let fetcher = InMemoryFetcher::new().with_latency(Duration::from_millis(50));
        fetcher.insert(URL, json!({"type": "object"}));
        let cache = Arc::new(SchemaCache::new(Arc::new(fetcher.clone())));

        let first = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get_or_fetch(URL, &v04()).await })
        };
        let second = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.get_or_fetch(URL, &v04()).await })
        };
        let (a, b) = (first.await.unwrap().unwrap(), second.await.unwrap().unwrap());

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(fetcher.fetch_count(URL), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let (fetcher, cache) = setup();
        fetcher.fail(
            URL,
            FetchError::Network {
                url: URL.into(),
                reason: "connection reset".into(),
            },
        );

        let err = cache.get_or_fetch(URL, &v04()).await.unwrap_err();
        match &err {
            ValidationError::SchemaNotFound { version, url, reason } => {
                assert_eq!(version, &v04());
                assert_eq!(url, URL);
                assert!(reason.contains("connection reset"));
            }
            other => panic!("expected SchemaNotFound, got {other:?}"),
        }
        assert!(!cache.contains(URL));
        assert!(cache.is_empty());

        // Origin recovers; the next call fetches again and succeeds.
        fetcher.insert(URL, json!({"type": "object"}));
        cache.get_or_fetch(URL, &v04()).await.unwrap();
        assert_eq!(fetcher.fetch_count(URL), 2);
        assert!(cache.contains(URL));
    }

    #[tokio::test]
    async fn non_object_documents_are_not_found() {
        let (fetcher, cache) = setup();
        fetcher.insert(URL, json!(true));
        let err = cache.get_or_fetch(URL, &v04()).await.unwrap_err();
        assert!(err.to_string().contains("not a JSON object"));
    }

    #[tokio::test]
    async fn clear_forces_refetch() {
        let (fetcher, cache) = setup();
        fetcher.insert(URL, json!({}));
        cache.get_or_fetch(URL, &v04()).await.unwrap();
        cache.clear();
        assert!(cache.is_empty());
        cache.get_or_fetch(URL, &v04()).await.unwrap();
        assert_eq!(fetcher.fetch_count(URL), 2);
    }
}
