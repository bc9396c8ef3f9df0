//! The catalog query contract
//!
//! Everything the export pipeline needs from the catalog goes through
//! [`Catalog`]. Reads are paged by file id so a caller never holds more than
//! one page in memory.

use crate::error::CatalogResult;
use dszip_core::{CatalogFile, Dataset, DatasetId, FileId, ProjectId};

/// One page of a file listing.
///
/// Pages are keyset-based: `after` is the last file id of the previous page,
/// and results are ordered by ascending file id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Return only files with an id greater than this
    pub after: Option<FileId>,
    /// Maximum number of files in the page
    pub limit: usize,
}

impl PageRequest {
    /// First page of the given size
    pub fn first(limit: usize) -> Self {
        Self { after: None, limit }
    }
}

/// Read/write access to the file catalog.
pub trait Catalog {
    /// Look up a dataset by id.
    ///
    /// # Errors
    ///
    /// `CatalogError::DatasetNotFound` when no such dataset exists.
    fn find_dataset(&self, id: DatasetId) -> CatalogResult<Dataset>;

    /// Page through a project's current, non-directory files, with each
    /// file's directory attached.
    fn project_files(&self, project_id: ProjectId, page: PageRequest)
        -> CatalogResult<Vec<CatalogFile>>;

    /// Page through the curated file list of a dataset.
    fn dataset_files(&self, dataset: &Dataset, page: PageRequest)
        -> CatalogResult<Vec<CatalogFile>>;

    /// Catalog paths (directory path + name) of every file attached to the
    /// dataset's entities.
    fn entity_file_paths(&self, dataset: &Dataset) -> CatalogResult<Vec<String>>;

    /// Record the byte size of the dataset's exported archive.
    fn update_dataset_archive_size(&self, dataset_id: DatasetId, size: u64) -> CatalogResult<()>;
}
