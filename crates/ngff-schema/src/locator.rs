//! # Schema Location
//!
//! Maps a (schema kind, spec version) pair to the URL of the schema
//! document. Pure: no network access.
//!
//! ## Template Selection
//!
//! 1. A per-version override, if one matches the version. The 0.5 entry
//!    is an override so that it can be repointed (for example at a draft
//!    branch during a release-candidate period) without touching callers.
//! 2. The dev template for development versions (pre-release tag, or newer
//!    than the latest release).
//! 3. The legacy template otherwise.
//!
//! Templates use the placeholders `{version}` and `{kind}`. `{kind}` is
//! the file stem: `image`, `plate`, `well`, `label`, or an ancillary stem
//! such as `_version` or `axes`.
//!
//! ## Ancillary Schemas
//!
//! From 0.5 on, shared definitions live in separate documents referenced by
//! `$ref`. They must be registered before a primary schema can compile:
//!
//! | Versions | Ancillary stems |
//! |----------|-----------------|
//! | <= 0.4   | none |
//! | 0.5      | `_version` |
//! | dev      | `_version`, `axes`, `coordinate_systems`, `coordinate_transformations` |

use std::collections::BTreeMap;

use ngff_core::{SchemaKind, SpecVersion};
use ngff_fetch::ConfigError;
use serde::{Deserialize, Serialize};

/// Template for releases up to 0.4.
pub const LEGACY_TEMPLATE: &str =
    "https://raw.githubusercontent.com/ome/ngff/main/{version}/schemas/{kind}.schema";

/// Canonical template for 0.5.
pub const V0_5_TEMPLATE: &str = "https://ngff.openmicroscopy.org/0.5/schemas/{kind}.schema";

/// Template for development versions.
pub const DEV_TEMPLATE: &str =
    "https://raw.githubusercontent.com/ome/ngff-spec/main/schemas/{kind}.schema";

const V0_5_ANCILLARY: &[&str] = &["_version"];
const DEV_ANCILLARY: &[&str] = &[
    "_version",
    "axes",
    "coordinate_systems",
    "coordinate_transformations",
];

/// URL templates used by [`SchemaLocator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Template for released versions without an override.
    pub legacy_template: String,
    /// Template for development versions.
    pub dev_template: String,
    /// Per-version templates. Matched by release and pre-release tag, so
    /// "0.5" also covers "0.5.0".
    pub overrides: BTreeMap<SpecVersion, String>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        let mut overrides = BTreeMap::new();
        overrides.insert(SpecVersion::latest_release(), V0_5_TEMPLATE.to_string());
        Self {
            legacy_template: LEGACY_TEMPLATE.to_string(),
            dev_template: DEV_TEMPLATE.to_string(),
            overrides,
        }
    }
}

impl LocatorConfig {
    /// Load templates from environment variables.
    ///
    /// Variables:
    /// - `NGFF_SCHEMA_TEMPLATE_LEGACY`
    /// - `NGFF_SCHEMA_TEMPLATE_DEV`
    /// - `NGFF_SCHEMA_TEMPLATE_0_5`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(template) = std::env::var("NGFF_SCHEMA_TEMPLATE_LEGACY") {
            config.legacy_template = template;
        }
        if let Ok(template) = std::env::var("NGFF_SCHEMA_TEMPLATE_DEV") {
            config.dev_template = template;
        }
        if let Ok(template) = std::env::var("NGFF_SCHEMA_TEMPLATE_0_5") {
            config
                .overrides
                .insert(SpecVersion::latest_release(), template);
        }
        config.check()?;
        Ok(config)
    }

    /// Reject templates without a `{kind}` placeholder: they would map every
    /// kind to the same document.
    pub fn check(&self) -> Result<(), ConfigError> {
        let named = [
            ("legacy_template".to_string(), &self.legacy_template),
            ("dev_template".to_string(), &self.dev_template),
        ];
        let overrides = self
            .overrides
            .iter()
            .map(|(v, t)| (format!("overrides.{v}"), t));
        for (field, template) in named.into_iter().chain(overrides) {
            if !template.contains("{kind}") {
                return Err(ConfigError::InvalidValue {
                    var: field,
                    reason: format!("template '{template}' has no {{kind}} placeholder"),
                });
            }
        }
        Ok(())
    }
}

/// Maps schema kinds and versions to schema URLs.
#[derive(Debug, Clone, Default)]
pub struct SchemaLocator {
    config: LocatorConfig,
}

impl SchemaLocator {
    pub fn new(config: LocatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// URL of the primary schema for `kind` at `version`.
    pub fn locate_schema(&self, kind: SchemaKind, version: &SpecVersion) -> String {
        self.locate_stem(kind.file_stem(), version)
    }

    /// URLs of the ancillary schemas `version` needs registered before a
    /// primary schema compiles. Empty for versions before 0.5.
    pub fn locate_ancillary_schemas(&self, version: &SpecVersion) -> Vec<String> {
        ancillary_stems(version)
            .iter()
            .map(|stem| self.locate_stem(stem, version))
            .collect()
    }

    /// URL of the schema document with file stem `stem`.
    pub fn locate_stem(&self, stem: &str, version: &SpecVersion) -> String {
        self.template_for(version)
            .replace("{version}", version.as_str())
            .replace("{kind}", stem)
    }

    fn template_for(&self, version: &SpecVersion) -> &str {
        let overridden = self
            .config
            .overrides
            .iter()
            .find(|(v, _)| same_version(v, version));
        if let Some((_, template)) = overridden {
            return template;
        }
        if version.is_development() {
            &self.config.dev_template
        } else {
            &self.config.legacy_template
        }
    }
}

/// Ancillary schema stems for `version`.
pub fn ancillary_stems(version: &SpecVersion) -> &'static [&'static str] {
    if !version.is_namespaced() {
        &[]
    } else if version.is_development() {
        DEV_ANCILLARY
    } else {
        V0_5_ANCILLARY
    }
}

fn same_version(a: &SpecVersion, b: &SpecVersion) -> bool {
    a.pre_release() == b.pre_release() && {
        let len = a.release().len().max(b.release().len());
        (0..len).all(|i| a.release().get(i).unwrap_or(&0) == b.release().get(i).unwrap_or(&0))
    }
}
