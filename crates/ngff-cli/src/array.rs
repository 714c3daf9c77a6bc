//! # Array Subcommand
//!
//! Reads the metadata of one Zarr array (`zarr.json` or `.zarray`) and
//! prints its shape, chunking, sharding and data type. No chunk is read.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use ngff_core::ArrayMetadata;
use ngff_fetch::{fetch_array, HttpFetcher, MetadataFile};

use crate::config::Settings;

/// Arguments for the `ngff array` subcommand.
#[derive(Args, Debug)]
pub struct ArrayArgs {
    /// URL of the array, e.g. `https://host/image.zarr/0`.
    #[arg(value_name = "URL")]
    pub url: String,

    /// Try `.zarray` before `zarr.json`.
    #[arg(long)]
    pub v2: bool,

    /// Print the metadata as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the array subcommand.
pub async fn run_array(args: &ArrayArgs, settings: Settings) -> Result<u8> {
    let fetcher = HttpFetcher::new(&settings.fetch).context("failed to build HTTP client")?;
    let sidecar = fetch_array(&fetcher, &args.url, args.v2)
        .await
        .with_context(|| format!("failed to read array metadata at {}", args.url))?;
    let metadata = ArrayMetadata::from_json(&sidecar.doc)
        .with_context(|| format!("unreadable array metadata at {}", sidecar.url))?;

    let mut out = std::io::stdout();
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&metadata)?)?;
    } else {
        writeln!(out, "{}", describe_array(sidecar.file, &sidecar.url, &metadata))?;
    }
    Ok(0)
}

/// Multi-line summary of an array.
pub fn describe_array(file: MetadataFile, url: &str, metadata: &ArrayMetadata) -> String {
    let mut lines = vec![format!("{url} ({file})")];
    lines.push(format!(
        "  shape:      {}",
        metadata
            .shape
            .as_deref()
            .map(dims)
            .unwrap_or_else(|| "unknown".to_string())
    ));
    lines.push(format!("  chunks:     {}", dims(&metadata.chunk_shape)));
    if let Some(shard) = &metadata.shard_shape {
        lines.push(format!("  shards:     {}", dims(shard)));
    }
    lines.push(format!(
        "  data type:  {}",
        metadata.data_type.as_deref().unwrap_or("unknown")
    ));
    lines.join("\n")
}

fn dims(shape: &[u64]) -> String {
    shape
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" x ")
}
