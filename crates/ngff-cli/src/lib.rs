//! # ngff-cli -- Command-Line OME-NGFF Validator
//!
//! Provides the `ngff` command-line interface over the validation crates.
//!
//! ## Subcommands
//!
//! - `ngff validate` -- Walk and validate an image, plate, well or label
//!   hierarchy from a URL.
//! - `ngff schema-url` -- Print the schema URLs used for a kind and version.
//! - `ngff array` -- Summarize the metadata of one Zarr array.
//!
//! ```bash
//! ngff validate https://uk1s3.embassy.ebi.ac.uk/idr/zarr/v0.4/idr0062A/6001240.zarr
//! ngff validate --json --images-per-well 3 https://example.org/plate.zarr
//! ngff schema-url image 0.5
//! ngff array https://example.org/image.zarr/0
//! ```

pub mod array;
pub mod config;
pub mod schema_url;
pub mod validate;

pub use config::Settings;
