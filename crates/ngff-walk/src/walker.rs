//! # Hierarchy Walker
//!
//! Walks an NGFF hierarchy from a root URL and validates every node it
//! reaches:
//!
//! ```text
//! plate ──► well (concurrent) ──► first `images_per_well` images
//! image ──► labels/ ──► labels/{name}/ (no further label probing)
//! well  ──► validated alone, images not enumerated
//! ```
//!
//! Reports are streamed over an mpsc channel as branches finish. Wells run
//! as tasks in a `JoinSet`; every metadata fetch holds a permit from one
//! shared semaphore, so at most `max_concurrent_fetches` requests hit the
//! origin at once. Schema fetches go through the engine's cache and are
//! not counted against that limit.
//!
//! A failing node produces a report carrying its [`NodeError`] and the walk
//! continues with its siblings. Dropping the receiver stops delivery; tasks
//! already spawned still run to completion.

use std::sync::Arc;

use ngff_core::{classify, primary_kind, resolve, ArrayMetadata, ObjectKind};
use ngff_fetch::{
    child_url, fetch_array, fetch_group, node_url, FetchError, JsonFetcher, SidecarDocument,
};
use ngff_schema::ValidationEngine;
use serde_json::Value;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::config::WalkerConfig;
use crate::preview::{axis_names, plan_preview, Preview, PreviewSkip};
use crate::report::{DatasetStatus, DatasetSummary, NodeError, NodeReport, NodeRole, NodeStatus};

/// Capacity of the report channel.
const REPORT_BUFFER: usize = 64;

/// A node about to be validated.
#[derive(Debug, Clone)]
struct Node {
    path: String,
    url: String,
    role: NodeRole,
}

impl Node {
    fn child(&self, segment: &str, role: NodeRole) -> Self {
        let segment = segment.trim_matches('/');
        let path = if self.path.is_empty() {
            segment.to_string()
        } else {
            format!("{}/{segment}", self.path)
        };
        Self {
            path,
            url: child_url(&self.url, segment),
            role,
        }
    }

    fn failed(&self, error: NodeError) -> NodeReport {
        NodeReport::failed(self.path.clone(), self.url.clone(), self.role, error)
    }

    fn fetch_failed(&self, source: FetchError) -> NodeReport {
        tracing::warn!(path = %self.path, error = %source, "branch failed");
        self.failed(NodeError::Fetch {
            url: self.url.clone(),
            source,
        })
    }
}

struct Inner {
    engine: ValidationEngine,
    fetcher: Arc<dyn JsonFetcher>,
    config: WalkerConfig,
    permits: Semaphore,
}

/// Validates NGFF hierarchies. Cheap to clone; clones share the engine,
/// fetcher and fetch limit.
#[derive(Clone)]
pub struct HierarchyWalker {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for HierarchyWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HierarchyWalker")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl HierarchyWalker {
    /// `fetcher` reads group and array metadata. `engine` fetches schemas
    /// through its own cache and may use a different fetcher.
    pub fn new(
        engine: ValidationEngine,
        fetcher: Arc<dyn JsonFetcher>,
        config: WalkerConfig,
    ) -> Self {
        let permits = Semaphore::new(config.max_concurrent_fetches.max(1));
        Self {
            inner: Arc::new(Inner {
                engine,
                fetcher,
                config,
                permits,
            }),
        }
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.inner.config
    }

    pub fn engine(&self) -> &ValidationEngine {
        &self.inner.engine
    }

    /// Start walking from `root` and stream reports as they are produced.
    ///
    /// Must be called within a tokio runtime. The stream ends when every
    /// branch has finished.
    pub fn walk(&self, root: &str) -> mpsc::Receiver<NodeReport> {
        let (tx, rx) = mpsc::channel(REPORT_BUFFER);
        let walker = self.clone();
        let root = Node {
            path: String::new(),
            url: node_url(root),
            role: NodeRole::Root,
        };
        tokio::spawn(async move {
            tracing::info!(root = %root.url, "walk started");
            walker.walk_root(root, &tx).await;
            tracing::info!("walk finished");
        });
        rx
    }

    /// Walk `root` to completion and return every report, ordered by path.
    pub async fn walk_collect(&self, root: &str) -> Vec<NodeReport> {
        let mut rx = self.walk(root);
        let mut reports = Vec::new();
        while let Some(report) = rx.recv().await {
            reports.push(report);
        }
        reports.sort_by(|a, b| a.path.cmp(&b.path));
        reports
    }

    async fn walk_root(&self, root: Node, tx: &mpsc::Sender<NodeReport>) {
        let group = match self.fetch_group(&root.url).await {
            Ok(group) => group,
            Err(e) => return emit(tx, root.fetch_failed(e)).await,
        };

        let primary = resolve(&group.doc)
            .ok()
            .and_then(|resolved| primary_kind(&resolved.effective));
        match primary {
            Some(ObjectKind::Plate) => self.walk_plate(root, group, tx).await,
            Some(ObjectKind::Image | ObjectKind::Label) => self.walk_image(root, group, tx).await,
            Some(ObjectKind::Well) | None => {
                let (report, _) = self.validate_node(&root, &group).await;
                emit(tx, report).await;
            }
        }
    }

    async fn walk_plate(&self, plate: Node, group: SidecarDocument, tx: &mpsc::Sender<NodeReport>) {
        let (report, effective) = self.validate_node(&plate, &group).await;
        emit(tx, report).await;

        let wells = effective
            .as_ref()
            .map(|e| declared_paths(e, "/plate/wells"))
            .unwrap_or_default();
        tracing::debug!(wells = wells.len(), "walking plate wells");

        let mut branches = JoinSet::new();
        for well_path in wells {
            let walker = self.clone();
            let tx = tx.clone();
            let well = plate.child(&well_path, NodeRole::Well);
            branches.spawn(async move { walker.walk_well(well, &tx).await });
        }
        while let Some(joined) = branches.join_next().await {
            if let Err(e) = joined {
                tracing::warn!(error = %e, "well branch aborted");
            }
        }
    }

    async fn walk_well(&self, well: Node, tx: &mpsc::Sender<NodeReport>) {
        let group = match self.fetch_group(&well.url).await {
            Ok(group) => group,
            Err(e) => return emit(tx, well.fetch_failed(e)).await,
        };
        let (report, effective) = self.validate_node(&well, &group).await;
        emit(tx, report).await;

        let images = effective
            .as_ref()
            .map(|e| declared_paths(e, "/well/images"))
            .unwrap_or_default();
        for image_path in images.iter().take(self.inner.config.images_per_well) {
            let image = well.child(image_path, NodeRole::WellImage);
            match self.fetch_group(&image.url).await {
                Ok(group) => self.walk_image(image, group, tx).await,
                Err(e) => emit(tx, image.fetch_failed(e)).await,
            }
        }
    }

    /// Validate an image, then each of its labels.
    async fn walk_image(&self, image: Node, group: SidecarDocument, tx: &mpsc::Sender<NodeReport>) {
        self.visit_image(&image, &group, tx).await;
        if !self.inner.config.walk_labels {
            return;
        }

        let labels = image.child("labels", NodeRole::Labels);
        let labels_group = match self.fetch_group(&labels.url).await {
            Ok(group) => group,
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %image.path, "no labels group");
                return;
            }
            Err(e) => return emit(tx, labels.fetch_failed(e)).await,
        };

        for name in label_names(&labels_group.doc) {
            let label = labels.child(&name, NodeRole::Label);
            match self.fetch_group(&label.url).await {
                Ok(group) => self.visit_image(&label, &group, tx).await,
                Err(e) => emit(tx, label.fetch_failed(e)).await,
            }
        }
    }

    /// Validate one image node and, if enabled, inspect its arrays.
    async fn visit_image(
        &self,
        image: &Node,
        group: &SidecarDocument,
        tx: &mpsc::Sender<NodeReport>,
    ) {
        let (mut report, effective) = self.validate_node(image, group).await;
        if self.inner.config.inspect_arrays {
            if let Some(multiscale) = effective.as_ref().and_then(|e| e.pointer("/multiscales/0")) {
                let omero = effective.as_ref().and_then(|e| e.pointer("/omero/channels"));
                let (datasets, preview) = self
                    .inspect_arrays(image, multiscale, omero, group.file.is_v2())
                    .await;
                report.datasets = datasets;
                report.preview = preview;
            }
        }
        emit(tx, report).await;
    }

    /// Read every dataset's array metadata in declaration order and plan a
    /// preview from the last declared (smallest) one. If that level cannot
    /// be read the preview is skipped rather than taken from a larger level.
    async fn inspect_arrays(
        &self,
        image: &Node,
        multiscale: &Value,
        omero_channels: Option<&Value>,
        prefer_v2: bool,
    ) -> (Vec<DatasetSummary>, Option<Preview>) {
        let mut datasets = Vec::new();
        for path in declared_paths(multiscale, "/datasets") {
            let url = child_url(&image.url, &path);
            let status = match self.fetch_array(&url, prefer_v2).await {
                Ok(found) => match ArrayMetadata::from_json(&found.doc) {
                    Ok(metadata) => DatasetStatus::Read {
                        file: found.file,
                        metadata,
                    },
                    Err(e) => DatasetStatus::Failed {
                        error: format!("{}: {e}", found.url),
                    },
                },
                Err(e) => DatasetStatus::Failed {
                    error: e.to_string(),
                },
            };
            datasets.push(DatasetSummary { path, url, status });
        }

        let channels = omero_channels.and_then(Value::as_array).map(Vec::as_slice);
        let preview = datasets.last().map(|smallest| match &smallest.status {
            DatasetStatus::Read { metadata, .. } => match metadata.shape.as_deref() {
                Some(shape) => {
                    let axes = axis_names(multiscale, shape.len());
                    Preview::from(plan_preview(&smallest.path, &axes, shape, channels))
                }
                None => Preview::Skipped(PreviewSkip::NoPlane),
            },
            DatasetStatus::Failed { .. } => Preview::Skipped(PreviewSkip::Unreadable {
                dataset: smallest.path.clone(),
            }),
        });
        (datasets, preview)
    }

    /// Run the engine on one node's metadata. Returns the report and the
    /// effective attributes, when they could be resolved.
    async fn validate_node(
        &self,
        node: &Node,
        group: &SidecarDocument,
    ) -> (NodeReport, Option<Value>) {
        let resolved = resolve(&group.doc).ok();
        let status = match self.inner.engine.validate(&group.doc).await {
            Ok(outcome) => {
                tracing::info!(
                    path = %node.path,
                    version = ?outcome.version.as_ref().map(|v| v.as_str()),
                    kinds = ?outcome.kinds,
                    issues = outcome.result.len(),
                    "node validated"
                );
                NodeStatus::Validated {
                    issues: outcome.result,
                }
            }
            Err(source) => {
                tracing::warn!(path = %node.path, error = %source, "node validation failed");
                NodeStatus::Failed {
                    error: NodeError::Validation {
                        url: node.url.clone(),
                        source,
                    },
                }
            }
        };

        let report = NodeReport {
            path: node.path.clone(),
            url: node.url.clone(),
            role: node.role,
            kinds: resolved
                .as_ref()
                .map(|r| classify(&r.effective))
                .unwrap_or_default(),
            version: resolved.as_ref().map(|r| r.version.clone()),
            metadata_file: Some(group.file),
            status,
            datasets: Vec::new(),
            preview: None,
        };
        (report, resolved.map(|r| r.effective))
    }

    async fn fetch_group(&self, url: &str) -> Result<SidecarDocument, FetchError> {
        let _permit = self.inner.permits.acquire().await.ok();
        fetch_group(self.inner.fetcher.as_ref(), url).await
    }

    async fn fetch_array(&self, url: &str, prefer_v2: bool) -> Result<SidecarDocument, FetchError> {
        let _permit = self.inner.permits.acquire().await.ok();
        fetch_array(self.inner.fetcher.as_ref(), url, prefer_v2).await
    }
}

async fn emit(tx: &mpsc::Sender<NodeReport>, report: NodeReport) {
    if tx.send(report).await.is_err() {
        tracing::debug!("report receiver dropped");
    }
}

/// `path` of every object in the array at `pointer`, in declaration order.
fn declared_paths(attrs: &Value, pointer: &str) -> Vec<String> {
    attrs
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e.get("path").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Names declared by a `labels/` group: `labels` in its effective
/// attributes, or under `attributes.ome` when the group declares no
/// version.
fn label_names(doc: &Value) -> Vec<String> {
    let names = resolve(doc)
        .ok()
        .and_then(|r| r.effective.get("labels").cloned())
        .or_else(|| doc.pointer("/attributes/ome/labels").cloned())
        .or_else(|| doc.get("labels").cloned());
    names
        .as_ref()
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngff_fetch::InMemoryFetcher;
    use ngff_schema::{LocatorConfig, SchemaLocator};
    use serde_json::json;
    use std::collections::BTreeMap;

    const ROOT: &str = "mem://data/";

    /// Permissive schemas for every kind and version the tests use.
    fn schema_host() -> InMemoryFetcher {
        let schemas = InMemoryFetcher::new();
        for version in ["0.3", "0.4", "0.5"] {
            for kind in ["image", "plate", "well", "label"] {
                schemas.insert(
                    format!("mem://schemas/{version}/{kind}.schema"),
                    json!({"type": "object"}),
                );
            }
        }
        schemas.insert("mem://schemas/0.5/_version.schema", json!({"type": "string"}));
        schemas
    }

    fn walker(data: &InMemoryFetcher, config: WalkerConfig) -> HierarchyWalker {
        let locator = SchemaLocator::new(LocatorConfig {
            legacy_template: "mem://schemas/{version}/{kind}.schema".into(),
            dev_template: "mem://schemas/dev/{kind}.schema".into(),
            overrides: BTreeMap::new(),
        });
        let engine = ValidationEngine::new(Arc::new(schema_host()), locator);
        HierarchyWalker::new(engine, Arc::new(data.clone()), config)
    }

    fn image_attrs(version: &str) -> Value {
        json!({
            "multiscales": [{
                "version": version,
                "axes": [{"name": "y", "type": "space"}, {"name": "x", "type": "space"}],
                "datasets": [{"path": "0"}, {"path": "1"}]
            }],
            "omero": {"channels": [{"color": "00FF00", "window": {"start": 0, "end": 100}}]}
        })
    }

    #[tokio::test]
    async fn image_with_labels_visits_each_label_once() {
        let data = InMemoryFetcher::new();
        data.insert("mem://data/.zattrs", image_attrs("0.4"));
        data.insert("mem://data/labels/.zattrs", json!({"labels": ["cells", "nuclei"]}));
        let mut label = image_attrs("0.3");
        label["image-label"] = json!({"colors": []});
        data.insert("mem://data/labels/cells/.zattrs", label.clone());
        data.insert("mem://data/labels/nuclei/.zattrs", label);

        let reports = walker(&data, WalkerConfig::default()).walk_collect(ROOT).await;
        let paths: Vec<_> = reports.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["", "labels/cells", "labels/nuclei"]);
        assert!(reports.iter().all(NodeReport::is_valid));

        let cells = &reports[1];
        assert_eq!(cells.role, NodeRole::Label);
        assert_eq!(cells.kinds, vec![ObjectKind::Image, ObjectKind::Label]);
        assert_eq!(cells.version.as_ref().map(|v| v.as_str()), Some("0.3"));
        // Label images do not look for nested labels.
        assert_eq!(data.fetch_count("mem://data/labels/cells/labels/.zattrs"), 0);
    }

    #[tokio::test]
    async fn missing_labels_group_is_not_reported() {
        let data = InMemoryFetcher::new();
        data.insert("mem://data/.zattrs", image_attrs("0.4"));

        let reports = walker(&data, WalkerConfig::default()).walk_collect(ROOT).await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].role, NodeRole::Root);
        assert_eq!(reports[0].metadata_file, Some(ngff_fetch::MetadataFile::Zattrs));
        assert_eq!(data.fetch_count("mem://data/labels/.zattrs"), 1);
    }

    #[tokio::test]
    async fn plate_limits_images_per_well() {
        let data = InMemoryFetcher::new();
        data.insert(
            "mem://data/.zattrs",
            json!({"plate": {"version": "0.4", "wells": [{"path": "A/1"}]}}),
        );
        data.insert(
            "mem://data/A/1/.zattrs",
            json!({"well": {
                "version": "0.4",
                "images": [{"path": "0"}, {"path": "1"}, {"path": "2"}]
            }}),
        );
        for field in ["0", "1", "2"] {
            data.insert(format!("mem://data/A/1/{field}/.zattrs"), image_attrs("0.4"));
        }

        let default = walker(&data, WalkerConfig::default()).walk_collect(ROOT).await;
        let paths: Vec<_> = default.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["", "A/1", "A/1/0"]);
        assert_eq!(default[2].role, NodeRole::WellImage);

        let config = WalkerConfig {
            images_per_well: 2,
            walk_labels: false,
            ..WalkerConfig::default()
        };
        let two = walker(&data, config).walk_collect(ROOT).await;
        let paths: Vec<_> = two.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["", "A/1", "A/1/0", "A/1/1"]);
    }

    #[tokio::test]
    async fn well_root_is_not_enumerated() {
        let data = InMemoryFetcher::new();
        data.insert(
            "mem://data/.zattrs",
            json!({"well": {"version": "0.4", "images": [{"path": "0"}]}}),
        );
        let reports = walker(&data, WalkerConfig::default()).walk_collect(ROOT).await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].kinds, vec![ObjectKind::Well]);
        assert_eq!(data.fetch_count("mem://data/0/.zattrs"), 0);
    }

    #[tokio::test]
    async fn unrecognized_root_yields_one_report() {
        let data = InMemoryFetcher::new();
        data.insert("mem://data/.zattrs", json!({"bioformats2raw.layout": 3}));

        let reports = walker(&data, WalkerConfig::default()).walk_collect(ROOT).await;
        assert_eq!(reports.len(), 1);
        let issues = reports[0].issues().unwrap();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues.issues()[0].message, ngff_schema::UNRECOGNIZED_MESSAGE);
    }

    #[tokio::test]
    async fn missing_root_is_a_failed_report() {
        let data = InMemoryFetcher::new();
        let reports = walker(&data, WalkerConfig::default()).walk_collect("mem://nothing").await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].url, "mem://nothing/");
        assert!(reports[0].error().is_some_and(NodeError::is_not_found));
    }

    #[tokio::test]
    async fn schema_failures_are_node_scoped() {
        let data = InMemoryFetcher::new();
        data.insert(
            "mem://data/.zattrs",
            json!({"plate": {"version": "0.4", "wells": [{"path": "A/1"}, {"path": "B/1"}]}}),
        );
        // No 0.2 schemas are hosted, so well A/1 cannot be validated.
        data.insert("mem://data/A/1/.zattrs", json!({"well": {"version": "0.2", "images": []}}));
        data.insert("mem://data/B/1/.zattrs", json!({"well": {"version": "0.4", "images": []}}));

        let reports = walker(&data, WalkerConfig::default()).walk_collect(ROOT).await;
        assert_eq!(reports.len(), 3);
        assert!(matches!(
            reports[1].error(),
            Some(NodeError::Validation { .. })
        ));
        assert_eq!(reports[1].kinds, vec![ObjectKind::Well]);
        assert!(reports[2].is_valid());
    }

    #[tokio::test]
    async fn namespaced_image_with_sharded_arrays() {
        let data = InMemoryFetcher::new();
        data.insert(
            "mem://data/zarr.json",
            json!({
                "zarr_format": 3,
                "node_type": "group",
                "attributes": {"ome": {
                    "version": "0.5",
                    "multiscales": [{
                        "axes": [{"name": "c"}, {"name": "z"}, {"name": "y"}, {"name": "x"}],
                        "datasets": [{"path": "0"}, {"path": "1"}]
                    }]
                }}
            }),
        );
        data.insert(
            "mem://data/0/zarr.json",
            json!({
                "zarr_format": 3, "node_type": "array", "shape": [1, 1, 2048, 2048],
                "data_type": "uint8",
                "chunk_grid": {"configuration": {"chunk_shape": [1, 1, 64, 64]}},
                "codecs": [{"name": "sharding_indexed",
                            "configuration": {"chunk_shape": [1, 1, 32, 32]}}]
            }),
        );
        data.insert(
            "mem://data/1/zarr.json",
            json!({
                "zarr_format": 3, "node_type": "array", "shape": [2, 5, 256, 256],
                "data_type": "uint8",
                "chunk_grid": {"configuration": {"chunk_shape": [1, 1, 256, 256]}}
            }),
        );

        let config = WalkerConfig {
            inspect_arrays: true,
            walk_labels: false,
            ..WalkerConfig::default()
        };
        let reports = walker(&data, config).walk_collect(ROOT).await;
        assert_eq!(reports.len(), 1);
        let image = &reports[0];
        assert!(image.is_valid(), "{:?}", image.status);
        assert_eq!(image.datasets.len(), 2);
        match &image.datasets[0].status {
            DatasetStatus::Read { metadata, .. } => {
                assert_eq!(metadata.chunk_shape, vec![1, 1, 32, 32]);
                assert_eq!(metadata.shard_shape, Some(vec![1, 1, 64, 64]));
            }
            other => panic!("expected array metadata, got {other:?}"),
        }
        match &image.preview {
            Some(Preview::Planned(plan)) => {
                assert_eq!(plan.dataset, "1");
                assert_eq!(plan.channels.len(), 2);
                assert_eq!((plan.width, plan.height), (256, 256));
            }
            other => panic!("expected a planned preview, got {other:?}"),
        }
        // v3 group: arrays are looked up at zarr.json only.
        assert_eq!(data.fetch_count("mem://data/0/.zarray"), 0);
    }

    #[tokio::test]
    async fn unreadable_smallest_level_skips_the_preview() {
        let data = InMemoryFetcher::new();
        data.insert("mem://data/.zattrs", image_attrs("0.4"));
        // Only the full-resolution level has metadata; level "1" is missing.
        data.insert(
            "mem://data/0/.zarray",
            json!({"zarr_format": 2, "shape": [64, 64], "chunks": [32, 32], "dtype": "<u2"}),
        );

        let config = WalkerConfig {
            inspect_arrays: true,
            walk_labels: false,
            ..WalkerConfig::default()
        };
        let reports = walker(&data, config).walk_collect(ROOT).await;
        let image = &reports[0];
        assert_eq!(image.datasets.len(), 2);
        assert!(matches!(image.datasets[0].status, DatasetStatus::Read { .. }));
        assert!(matches!(image.datasets[1].status, DatasetStatus::Failed { .. }));
        assert_eq!(
            image.preview,
            Some(Preview::Skipped(PreviewSkip::Unreadable {
                dataset: "1".into()
            }))
        );
    }

    #[test]
    fn label_names_from_legacy_and_namespaced_groups() {
        assert_eq!(label_names(&json!({"labels": ["a", "b"]})), vec!["a", "b"]);
        assert_eq!(
            label_names(&json!({"attributes": {"ome": {"version": "0.5", "labels": ["c"]}}})),
            vec!["c"]
        );
        assert_eq!(label_names(&json!({"attributes": {"ome": {"labels": ["d"]}}})), vec!["d"]);
        assert!(label_names(&json!({})).is_empty());
    }

    #[test]
    fn child_nodes_extend_paths() {
        let root = Node {
            path: String::new(),
            url: "mem://p/".into(),
            role: NodeRole::Root,
        };
        let well = root.child("A/1/", NodeRole::Well);
        assert_eq!(well.path, "A/1");
        assert_eq!(well.url, "mem://p/A/1/");
        let image = well.child("0", NodeRole::WellImage);
        assert_eq!(image.path, "A/1/0");
    }
}
