//! # Settings
//!
//! Layering, lowest to highest precedence:
//!
//! 1. Built-in defaults.
//! 2. Environment variables (`NGFF_*`, see each section's `from_env`).
//! 3. The `--config` YAML file.
//! 4. Subcommand flags.
//!
//! The YAML file mirrors [`Settings`]; every key is optional:
//!
//! ```yaml
//! fetch:
//!   timeout_secs: 10
//! locator:
//!   legacy_template: "https://mirror.example/ngff/{version}/schemas/{kind}.schema"
//!   overrides:
//!     "0.5": "https://mirror.example/0.5/{kind}.schema"
//! walker:
//!   images_per_well: 3
//!   max_concurrent_fetches: 16
//! ```
//!
//! Version keys under `overrides` must be quoted, or YAML reads them as
//! numbers.

use std::path::Path;

use ngff_fetch::{ConfigError, FetchConfig};
use ngff_schema::LocatorConfig;
use ngff_walk::WalkerConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything the subcommands can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fetch: FetchConfig,
    pub locator: LocatorConfig,
    pub walker: WalkerConfig,
}

impl Settings {
    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            fetch: FetchConfig::from_env()?,
            locator: LocatorConfig::from_env()?,
            walker: WalkerConfig::from_env()?,
        })
    }

    /// Environment settings, overlaid with `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = Self::from_env()?;
        match path {
            Some(path) => settings.merge_file(path),
            None => Ok(settings),
        }
    }

    /// Overlay the YAML file at `path`. Keys absent from the file keep
    /// their current value.
    pub fn merge_file(self, path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let merged = self
            .merge_yaml(&text)
            .map_err(|reason| ConfigError::Parse {
                path: display,
                reason,
            })?;
        merged.check()?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(merged)
    }

    fn merge_yaml(self, text: &str) -> Result<Self, String> {
        let overlay: Value = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
        if !(overlay.is_object() || overlay.is_null()) {
            return Err("top level must be a mapping".to_string());
        }
        let mut base = serde_json::to_value(&self).map_err(|e| e.to_string())?;
        overlay_value(&mut base, overlay);
        serde_json::from_value(base).map_err(|e| e.to_string())
    }

    /// Validate every section.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: "fetch.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        self.locator.check()?;
        self.walker.check()
    }
}

/// Recursively replace `base` with `overlay`, descending into objects.
fn overlay_value(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => overlay_value(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
