//! Export error types
//!
//! Only fatal failures surface here. Per-entry failures are counted in the
//! export report, and a failed size write-back is logged, not returned.

use dszip_archive::ArchiveError;
use dszip_catalog::{CatalogError, IndexLoadError};
use dszip_core::DatasetId;
use thiserror::Error;

/// Fatal export failures
#[derive(Debug, Error)]
pub enum ExportError {
    /// The dataset does not exist in the catalog
    #[error("Unable to find dataset {0}")]
    DatasetNotFound(DatasetId),

    /// The catalog failed while resolving the dataset
    #[error("Catalog error: {0}")]
    Catalog(#[source] CatalogError),

    /// The destination archive could not be created
    #[error("Unable to create zipfile: {0}")]
    DestinationUnwritable(#[source] ArchiveError),

    /// The membership index failed to load and the policy is to abort
    #[error(transparent)]
    IndexLoad(#[from] IndexLoadError),

    /// A candidate page could not be read; the export stopped part way
    #[error("Getting batch of files returned error after {written} files: {source}")]
    BatchRead {
        /// Entries written before the failure
        written: u64,
        /// Underlying catalog failure
        #[source]
        source: CatalogError,
    },

    /// The archive's central directory could not be written
    #[error("Unable to finalize zipfile: {0}")]
    Finalize(#[source] ArchiveError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ExportError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Map a dataset lookup failure
    pub(crate) fn from_lookup(err: CatalogError) -> Self {
        match err {
            CatalogError::DatasetNotFound(id) => Self::DatasetNotFound(id),
            other => Self::Catalog(other),
        }
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, ExportError>;
