//! Export engine for dszip
//!
//! Ties the catalog and archive crates together into a single export:
//!
//! - [`ExportConfig`]: settings loaded from `dszip.toml` and the environment
//! - [`StorageLayout`]: where a catalog file's bytes live on disk
//! - [`include_in_archive`]: the per-candidate inclusion test
//! - [`Exporter`]: the phase-driven export pipeline
//! - [`ExportReport`]: counters for one completed export

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod report;
pub mod storage;

pub use config::{
    ExportConfig, IndexFailurePolicy, CONFIG_FILE_NAME, ENV_CATALOG, ENV_STORAGE_ROOT,
};
pub use error::{EngineResult, ExportError};
pub use export::{export_dataset, ExportPhase, Exporter};
pub use filter::{exclusion, include_in_archive, Exclusion};
pub use report::{ExclusionCounts, ExportReport, SkipCounts};
pub use storage::StorageLayout;
