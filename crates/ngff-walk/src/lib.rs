//! # ngff-walk -- Hierarchy Validation
//!
//! Drives the validation engine across an NGFF containment hierarchy
//! (plate, wells, images, labels) and streams one [`NodeReport`] per node.
//! With array inspection enabled, image reports also carry dataset array
//! metadata and a [`PreviewPlan`] for the smallest resolution level.

pub mod config;
pub mod preview;
pub mod report;
pub mod walker;

pub use config::WalkerConfig;
pub use preview::{plan_preview, Preview, PreviewPlan, PreviewSkip};
pub use report::{DatasetStatus, DatasetSummary, NodeError, NodeReport, NodeRole, NodeStatus};
pub use walker::HierarchyWalker;
