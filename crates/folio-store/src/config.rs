use std::path::Path;

use folio_core::{
    AUTOPLAY_INTERVAL_MS, DEFAULT_PAGE_SIZE, GalleryConfig, ImageDefaults, ProjectCatalog,
    RESTART_DELAY_MS,
};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Engine tunables, read from an optional `folio.toml`.
///
/// ```toml
/// page_size = 6
/// autoplay_interval_ms = 3500
/// restart_delay_ms = 1000
/// reduced_motion = false
///
/// [defaults]
/// project = "images/projects/defaults/project-default.png"
/// empty = "images/projects/defaults/empty-default.png"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub page_size: usize,
    pub autoplay_interval_ms: u64,
    pub restart_delay_ms: u64,
    pub reduced_motion: bool,
    /// Replaces the data file's fallback images when set.
    pub defaults: Option<ImageDefaults>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            autoplay_interval_ms: AUTOPLAY_INTERVAL_MS,
            restart_delay_ms: RESTART_DELAY_MS,
            reduced_motion: false,
            defaults: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Load from `path`. `None` yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            page_size = config.page_size,
            reduced_motion = config.reduced_motion,
            "loaded engine config"
        );
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(StoreError::InvalidData(
                "page_size must be at least 1".to_string(),
            ));
        }
        if self.autoplay_interval_ms == 0 {
            return Err(StoreError::InvalidData(
                "autoplay_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn gallery_config(&self) -> GalleryConfig {
        GalleryConfig {
            autoplay_interval_ms: self.autoplay_interval_ms,
            restart_delay_ms: self.restart_delay_ms,
            reduced_motion: self.reduced_motion,
        }
    }

    /// Apply configured fallback images onto a loaded catalog.
    pub fn apply(&self, catalog: &mut ProjectCatalog) {
        if let Some(defaults) = &self.defaults {
            catalog.defaults = defaults.clone();
        }
    }
}
