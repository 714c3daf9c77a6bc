//! # Validate Subcommand
//!
//! Walks an OME-NGFF hierarchy from a URL and prints one line per node as
//! reports arrive, followed by a summary. With `--json` every report is
//! written as one JSON object per line and the summary is omitted.
//!
//! Exit codes: 0 when every node validated clean, 2 when any node has
//! issues or could not be validated.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use ngff_fetch::{HttpFetcher, JsonFetcher};
use ngff_schema::{SchemaLocator, ValidationEngine};
use ngff_walk::{DatasetStatus, HierarchyWalker, NodeReport, NodeStatus, Preview};

use crate::config::Settings;

/// Arguments for the `ngff validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// URL of the Zarr group to validate (image, plate, well or label).
    #[arg(value_name = "URL")]
    pub url: String,

    /// Images validated per well of a plate.
    #[arg(long, value_name = "N")]
    pub images_per_well: Option<usize>,

    /// Metadata fetches in flight at once.
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Read dataset array metadata and plan previews.
    #[arg(long)]
    pub inspect_arrays: bool,

    /// Do not look for `labels/` groups below images.
    #[arg(long)]
    pub no_labels: bool,

    /// Emit one JSON report per line.
    #[arg(long)]
    pub json: bool,
}

impl ValidateArgs {
    /// Apply flags on top of the loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(n) = self.images_per_well {
            settings.walker.images_per_well = n;
        }
        if let Some(n) = self.max_concurrency {
            settings.walker.max_concurrent_fetches = n;
        }
        if self.inspect_arrays {
            settings.walker.inspect_arrays = true;
        }
        if self.no_labels {
            settings.walker.walk_labels = false;
        }
    }
}

/// Execute the validate subcommand.
pub async fn run_validate(args: &ValidateArgs, mut settings: Settings) -> Result<u8> {
    args.apply(&mut settings);
    settings.check().context("invalid settings")?;

    let fetcher: Arc<dyn JsonFetcher> =
        Arc::new(HttpFetcher::new(&settings.fetch).context("failed to build HTTP client")?);
    let engine = ValidationEngine::new(Arc::clone(&fetcher), SchemaLocator::new(settings.locator));
    let walker = HierarchyWalker::new(engine, fetcher, settings.walker);

    tracing::info!(url = %args.url, "validating");
    let mut reports = walker.walk(&args.url);
    let mut tally = Tally::default();
    let mut out = std::io::stdout();
    while let Some(report) = reports.recv().await {
        tally.record(&report);
        if args.json {
            let line = serde_json::to_string(&report).context("failed to serialize report")?;
            writeln!(out, "{line}")?;
        } else {
            writeln!(out, "{}", render_report(&report))?;
        }
    }
    if !args.json {
        writeln!(out, "{tally}")?;
    }
    Ok(tally.exit_code())
}

/// Counts of node outcomes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub clean: usize,
    pub with_issues: usize,
    pub failed: usize,
}

impl Tally {
    pub fn record(&mut self, report: &NodeReport) {
        match &report.status {
            NodeStatus::Validated { issues } if issues.is_valid() => self.clean += 1,
            NodeStatus::Validated { .. } => self.with_issues += 1,
            NodeStatus::Failed { .. } => self.failed += 1,
        }
    }

    pub fn exit_code(&self) -> u8 {
        if self.with_issues == 0 && self.failed == 0 {
            0
        } else {
            2
        }
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} node(s): {} valid, {} with issues, {} failed",
            self.clean + self.with_issues + self.failed,
            self.clean,
            self.with_issues,
            self.failed
        )
    }
}

/// Human-readable form of one report. The first line is the node status;
/// issues, datasets and the preview follow indented.
pub fn render_report(report: &NodeReport) -> String {
    let mut lines = Vec::new();
    let kinds = report
        .kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let version = report
        .version
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "?".to_string());

    match &report.status {
        NodeStatus::Validated { issues } if issues.is_valid() => {
            lines.push(format!("OK      {} [{kinds}] v{version}", report.url));
        }
        NodeStatus::Validated { issues } => {
            lines.push(format!(
                "INVALID {} [{kinds}] v{version}: {} issue(s)",
                report.url,
                issues.len()
            ));
            lines.extend(issues.iter().map(|issue| format!("    {issue}")));
        }
        NodeStatus::Failed { error } => {
            lines.push(format!("ERROR   {}: {error}", report.url));
        }
    }

    for dataset in &report.datasets {
        match &dataset.status {
            DatasetStatus::Read { file, metadata } => lines.push(format!(
                "    dataset {}: {file} shape {:?} chunks {:?}{}",
                dataset.path,
                metadata.shape.as_deref().unwrap_or_default(),
                metadata.chunk_shape,
                metadata
                    .data_type
                    .as_ref()
                    .map(|t| format!(" {t}"))
                    .unwrap_or_default()
            )),
            DatasetStatus::Failed { error } => {
                lines.push(format!("    dataset {}: {error}", dataset.path))
            }
        }
    }

    match &report.preview {
        Some(Preview::Planned(plan)) => lines.push(format!(
            "    preview: dataset {} {}x{}, {} channel(s)",
            plan.dataset,
            plan.width,
            plan.height,
            plan.channels.len()
        )),
        Some(Preview::Skipped(skip)) => lines.push(format!("    preview skipped: {skip:?}")),
        None => {}
    }

    lines.join("\n")
}
