//! Candidate file source
//!
//! Produces the universe of files considered for one export as a lazy,
//! finite sequence. Pages of `batch_size` records are pulled from the
//! catalog on demand, so memory stays bounded by one page however large the
//! project is.
//!
//! The universe depends on publication state:
//! - draft: every current, non-directory file of the dataset's project
//! - published: the dataset's curated file list
//!
//! A failed page read is yielded once as an error and ends the sequence.

use crate::error::{CatalogError, CatalogResult};
use crate::traits::{Catalog, PageRequest};
use dszip_core::{CatalogFile, Dataset, FileId};
use std::collections::VecDeque;
use std::iter::FusedIterator;
use tracing::debug;

/// Records fetched per catalog round trip
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Which listing a dataset's candidates come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateScope {
    /// All current files of the project (unpublished dataset)
    Project,
    /// The dataset's own file list (published dataset)
    Curated,
}

impl CandidateScope {
    /// Scope selected by the dataset's publication state
    pub fn for_dataset(dataset: &Dataset) -> Self {
        if dataset.is_published() {
            CandidateScope::Curated
        } else {
            CandidateScope::Project
        }
    }
}

/// Lazy, single-pass sequence of candidate files
pub struct CandidateFiles<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
    dataset: Dataset,
    scope: CandidateScope,
    batch_size: usize,
    buffer: VecDeque<CatalogFile>,
    cursor: Option<FileId>,
    exhausted: bool,
    batches_read: u64,
}

impl<'a, C: Catalog + ?Sized> CandidateFiles<'a, C> {
    /// Candidates for `dataset`, read `batch_size` records at a time
    pub fn new(catalog: &'a C, dataset: &Dataset, batch_size: usize) -> Self {
        Self {
            catalog,
            dataset: dataset.clone(),
            scope: CandidateScope::for_dataset(dataset),
            batch_size: batch_size.max(1),
            buffer: VecDeque::new(),
            cursor: None,
            exhausted: false,
            batches_read: 0,
        }
    }

    /// Listing these candidates come from
    pub fn scope(&self) -> CandidateScope {
        self.scope
    }

    /// Number of pages fetched so far
    pub fn batches_read(&self) -> u64 {
        self.batches_read
    }

    fn fetch_page(&mut self) -> CatalogResult<()> {
        let page = PageRequest {
            after: self.cursor,
            limit: self.batch_size,
        };
        let files = match self.scope {
            CandidateScope::Project => self.catalog.project_files(self.dataset.project_id, page)?,
            CandidateScope::Curated => self.catalog.dataset_files(&self.dataset, page)?,
        };
        self.batches_read += 1;

        debug!(
            target: "dszip::catalog",
            dataset_id = %self.dataset.id,
            batch = self.batches_read,
            records = files.len(),
            "Read candidate batch"
        );

        if files.len() < self.batch_size {
            self.exhausted = true;
        }
        if let Some(last) = files.last() {
            if self.cursor.is_some_and(|prev| last.id <= prev) {
                return Err(CatalogError::invalid_record(format!(
                    "page after file {:?} did not advance (last id {})",
                    self.cursor, last.id
                )));
            }
            self.cursor = Some(last.id);
        }
        self.buffer.extend(files);
        Ok(())
    }
}

impl<C: Catalog + ?Sized> Iterator for CandidateFiles<'_, C> {
    type Item = CatalogResult<CatalogFile>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(file) = self.buffer.pop_front() {
                return Some(Ok(file));
            }
            if self.exhausted {
                return None;
            }
            if let Err(e) = self.fetch_page() {
                self.exhausted = true;
                self.buffer.clear();
                return Some(Err(e));
            }
        }
    }
}

impl<C: Catalog + ?Sized> FusedIterator for CandidateFiles<'_, C> {}
