//! # Schema-URL Subcommand
//!
//! Prints where the schema of a kind and version is fetched from, then the
//! ancillary schemas that version's primary schemas reference.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use ngff_core::{SchemaKind, SpecVersion};
use ngff_schema::SchemaLocator;

/// Arguments for the `ngff schema-url` subcommand.
#[derive(Args, Debug)]
pub struct SchemaUrlArgs {
    /// Schema kind: image, plate, well or label.
    #[arg(value_name = "KIND")]
    pub kind: SchemaKind,

    /// Spec version, e.g. 0.4, 0.5 or 0.6-dev2.
    #[arg(value_name = "VERSION")]
    pub version: SpecVersion,
}

/// Execute the schema-url subcommand.
pub fn run_schema_url(args: &SchemaUrlArgs, locator: &SchemaLocator) -> Result<u8> {
    let mut out = std::io::stdout();
    for line in schema_urls(args, locator) {
        writeln!(out, "{line}")?;
    }
    Ok(0)
}

/// The primary schema URL followed by the ancillary URLs.
pub fn schema_urls(args: &SchemaUrlArgs, locator: &SchemaLocator) -> Vec<String> {
    let mut urls = vec![locator.locate_schema(args.kind, &args.version)];
    urls.extend(locator.locate_ancillary_schemas(&args.version));
    urls
}
