//! Error types.
//!
//! Index construction, diffing, transforms and applying never fail: bad
//! input is skipped and drift is reported as a boolean. Only loading the
//! configuration can fail.

use std::path::PathBuf;

use thiserror::Error;

/// Configuration loading error.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {origin}: {source}")]
    Parse {
        /// File path, or `<memory>` for in-memory text.
        origin: String,
        #[source]
        source: toml::de::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
