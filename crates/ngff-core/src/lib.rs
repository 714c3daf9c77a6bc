//! # ngff-core -- Foundational Types for OME-NGFF Validation
//!
//! This crate is the leaf of the workspace. It holds everything about an
//! NGFF document that can be decided without I/O:
//!
//! - [`SpecVersion`] -- spec version identifiers with a total order.
//! - [`ObjectKind`] / [`SchemaKind`] -- what an attributes object describes
//!   and which schema document validates it.
//! - [`resolve`] -- the attribute/version resolution pipeline that turns a
//!   raw group document (legacy `.zattrs` or namespaced `zarr.json`) into
//!   effective attributes, a validation payload and exactly one version.
//! - [`classify`] / [`primary_kind`] -- structural kind detection.
//! - [`ArrayMetadata`] -- Zarr v2/v3 array metadata, including sharding.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ngff-*` crates.
//! - No I/O, no async, no logging.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod array;
pub mod attributes;
pub mod error;
pub mod kind;
pub mod version;

pub use array::{ArrayMetadata, ZarrFormat, SHARDING_CODEC};
pub use attributes::{resolve, AttributesLayout, ResolvedAttributes};
pub use error::{ArrayMetadataError, ResolveError, VersionParseError};
pub use kind::{classify, primary_kind, ObjectKind, SchemaKind};
pub use version::{SpecVersion, DEFAULT_LEGACY_VERSION, LATEST_RELEASE, NAMESPACED_SINCE};
