//! Walker limits.

use ngff_fetch::config::env_parse;
use ngff_fetch::ConfigError;
use serde::{Deserialize, Serialize};

/// Default number of images validated per well.
pub const DEFAULT_IMAGES_PER_WELL: usize = 1;

/// Default cap on concurrent metadata fetches.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Configuration for [`HierarchyWalker`](crate::HierarchyWalker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// Images validated per well, in declaration order. Plates may hold
    /// thousands of fields; the first image stands for the well.
    pub images_per_well: usize,
    /// Metadata fetches in flight at once, across all branches.
    pub max_concurrent_fetches: usize,
    /// Read dataset array metadata and plan previews for images.
    pub inspect_arrays: bool,
    /// Look for a `labels/` group below each image.
    pub walk_labels: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            images_per_well: DEFAULT_IMAGES_PER_WELL,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            inspect_arrays: false,
            walk_labels: true,
        }
    }
}

impl WalkerConfig {
    /// Load limits from environment variables.
    ///
    /// Variables:
    /// - `NGFF_IMAGES_PER_WELL` (default: 1)
    /// - `NGFF_MAX_CONCURRENCY` (default: 8, must be > 0)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(n) = env_parse::<usize>("NGFF_IMAGES_PER_WELL")? {
            config.images_per_well = n;
        }
        if let Some(n) = env_parse::<usize>("NGFF_MAX_CONCURRENCY")? {
            config.max_concurrent_fetches = n;
        }
        config.check()?;
        Ok(config)
    }

    /// A zero fetch limit would deadlock the walk.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_fetches == 0 {
            return Err(ConfigError::InvalidValue {
                var: "max_concurrent_fetches".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
