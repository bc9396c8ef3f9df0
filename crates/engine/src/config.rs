//! Export configuration via `dszip.toml`
//!
//! Every setting has a default, so an empty file (or no file) is a valid
//! configuration apart from the storage root, which must come from the file,
//! the `MCFS_DIR` environment variable, or the command line.

use crate::error::{EngineResult, ExportError};
use dszip_archive::Compression;
use dszip_catalog::DEFAULT_BATCH_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "dszip.toml";

/// Environment variable naming the storage root
pub const ENV_STORAGE_ROOT: &str = "MCFS_DIR";

/// Environment variable naming the catalog database
pub const ENV_CATALOG: &str = "DSZIP_CATALOG";

/// What to do when the membership index cannot be loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexFailurePolicy {
    /// Log a warning and export with an empty index
    #[default]
    Degrade,
    /// Fail the export
    Abort,
}

/// Export configuration loaded from `dszip.toml`.
///
/// # Example
///
/// ```toml
/// storage_root = "/mcfs/data"
/// catalog = "/var/lib/mc/catalog.db"
/// batch_size = 1000
/// progress_interval = 1000
/// compression = "deflated"
/// index_failure = "degrade"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Root of the content store holding file bytes
    #[serde(default)]
    pub storage_root: PathBuf,
    /// Catalog database path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    /// Candidate records fetched per catalog round trip
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Log progress every this many included files (0 disables)
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
    /// Entry compression
    #[serde(default)]
    pub compression: Compression,
    /// Membership index failure policy
    #[serde(default)]
    pub index_failure: IndexFailurePolicy,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_progress_interval() -> u64 {
    1000
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::new(),
            catalog: None,
            batch_size: default_batch_size(),
            progress_interval: default_progress_interval(),
            compression: Compression::default(),
            index_failure: IndexFailurePolicy::default(),
        }
    }
}

impl ExportConfig {
    /// Default configuration rooted at `storage_root`
    pub fn with_storage_root(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            ..Self::default()
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# dszip export configuration
#
# Root of the content store. Overridden by the MCFS_DIR environment variable.
# storage_root = "/mcfs/data"

# Catalog database. Overridden by DSZIP_CATALOG.
# catalog = "/var/lib/mc/catalog.db"

# Records fetched per catalog page (default: 1000)
batch_size = 1000

# Log progress every N included files, 0 to disable (default: 1000)
progress_interval = 1000

# Entry compression: "deflated" (default) or "stored"
compression = "deflated"

# When the dataset's entity files cannot be loaded:
#   "degrade" = continue with an empty membership index (default)
#   "abort"   = fail the export
index_failure = "degrade"
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExportError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content).map_err(|e| {
            ExportError::config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse config from TOML text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> EngineResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                ExportError::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Apply environment overrides.
    ///
    /// `lookup` is usually `|k| std::env::var(k).ok()`; empty values are
    /// ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(ENV_STORAGE_ROOT).filter(|v| !v.is_empty()) {
            self.storage_root = PathBuf::from(root);
        }
        if let Some(catalog) = lookup(ENV_CATALOG).filter(|v| !v.is_empty()) {
            self.catalog = Some(PathBuf::from(catalog));
        }
    }

    /// Check the settings the export depends on.
    pub fn validate(&self) -> EngineResult<()> {
        if self.storage_root.as_os_str().is_empty() {
            return Err(ExportError::config(format!(
                "storage root not set (set storage_root or {})",
                ENV_STORAGE_ROOT
            )));
        }
        if self.batch_size == 0 {
            return Err(ExportError::config("batch_size must be greater than zero"));
        }
        Ok(())
    }
}
