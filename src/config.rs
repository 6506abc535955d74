//! Replacer configuration loaded from TOML.
//!
//! ```toml
//! storage_root = "Assets"
//! include_inactive = true
//! swap_after_replace = true
//! ```
//!
//! Every field is optional and falls back to [`ReplacerConfig::default`].

use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

/// Settings shared by replacement sessions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReplacerConfig {
    /// Storage root stripped from material group keys.
    pub storage_root: String,
    /// Whether scene-wide replacement also discovers inactive subjects.
    pub include_inactive: bool,
    /// Whether scene-wide replacement makes the target the only source
    /// after executing.
    pub swap_after_replace: bool,
}

impl Default for ReplacerConfig {
    fn default() -> Self {
        Self {
            storage_root: "Assets".into(),
            include_inactive: true,
            swap_after_replace: true,
        }
    }
}

impl ReplacerConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            origin: "<memory>".into(),
            source,
        })
    }

    /// Set the storage root.
    #[must_use]
    pub fn with_storage_root(mut self, storage_root: impl Into<String>) -> Self {
        self.storage_root = storage_root.into();
        self
    }
}

/// Load a configuration from a TOML file.
pub fn load_config(path: &Path) -> ConfigResult<ReplacerConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        origin: path.display().to_string(),
        source,
    })
}

/// Load a configuration, falling back to defaults if it cannot be loaded.
pub fn load_or_default(path: &Path) -> ReplacerConfig {
    match load_config(path) {
        Ok(config) => {
            log::info!(
                "Loaded replacer config from {} (storage root {:?})",
                path.display(),
                config.storage_root
            );
            config
        }
        Err(e) => {
            log::warn!("No replacer config ({e}), using defaults");
            ReplacerConfig::default()
        }
    }
}
