//! Catalog error types

use dszip_core::DatasetId;
use thiserror::Error;

/// Errors raised by catalog queries
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No dataset row with this id
    #[error("Dataset not found: {0}")]
    DatasetNotFound(DatasetId),

    /// The backing database rejected or failed a query
    #[error("Catalog query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A row could not be mapped onto a catalog type
    #[error("Invalid catalog record: {0}")]
    InvalidRecord(String),

    /// The catalog could not be reached at all
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    /// Create an invalid record error
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// The membership index for a dataset could not be built
#[derive(Debug, Error)]
#[error("Unable to load entity files for dataset {dataset_id}: {source}")]
pub struct IndexLoadError {
    /// Dataset whose index failed
    pub dataset_id: DatasetId,
    /// Underlying catalog failure
    #[source]
    pub source: CatalogError,
}
