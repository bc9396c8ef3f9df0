//! Dataset export orchestration
//!
//! Drives one export through its phases:
//!
//! ```text
//! Init -> Indexing -> Streaming -> Finalizing -> Done
//!            |            |
//!            +------------+--> Failed
//! ```
//!
//! - Init: resolve the dataset and open the destination archive
//! - Indexing: load the membership index (failure degrades or aborts per policy)
//! - Streaming: page through candidates, filter, stream included files
//! - Finalizing: close the archive, stat it, record its size on the dataset
//!
//! Per-file failures are logged and counted, never fatal. A failed page
//! read is fatal, but the archive is still closed so what was written stays
//! readable. Only the final size update writes to the catalog.

use crate::config::{ExportConfig, IndexFailurePolicy};
use crate::error::{EngineResult, ExportError};
use crate::filter::exclusion;
use crate::report::ExportReport;
use crate::storage::StorageLayout;
use dszip_archive::{ArchiveWriter, EntryError};
use dszip_catalog::{CandidateFiles, Catalog, MembershipIndex};
use dszip_core::{CatalogFile, Dataset, DatasetId};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Phase of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExportPhase {
    /// Not started
    Init,
    /// Loading the membership index
    Indexing,
    /// Streaming candidates into the archive
    Streaming,
    /// Closing the archive and recording its size
    Finalizing,
    /// Archive produced
    Done,
    /// Stopped by a fatal error
    Failed,
}

/// Exports datasets from a catalog into zip archives
pub struct Exporter<'a, C: Catalog + ?Sized> {
    catalog: &'a C,
    config: &'a ExportConfig,
    layout: StorageLayout,
    phase: ExportPhase,
}

impl<'a, C: Catalog + ?Sized> Exporter<'a, C> {
    /// Exporter reading from `catalog` with the given settings
    pub fn new(catalog: &'a C, config: &'a ExportConfig) -> Self {
        Self {
            catalog,
            config,
            layout: StorageLayout::new(&config.storage_root),
            phase: ExportPhase::Init,
        }
    }

    /// Phase reached by the last (or current) export
    pub fn phase(&self) -> ExportPhase {
        self.phase
    }

    /// Export the dataset `dataset_id` to an archive at `destination`.
    ///
    /// # Errors
    ///
    /// - Invalid configuration
    /// - Dataset does not exist or the catalog is unreachable
    /// - Destination cannot be created
    /// - A candidate page could not be read
    /// - Membership index failed to load under the abort policy
    pub fn export(&mut self, dataset_id: DatasetId, destination: &Path) -> EngineResult<ExportReport> {
        self.phase = ExportPhase::Init;
        let result = self
            .config
            .validate()
            .and_then(|()| self.catalog.find_dataset(dataset_id).map_err(ExportError::from_lookup))
            .and_then(|dataset| self.run(&dataset, destination));
        self.settle(result)
    }

    /// Export a dataset the caller has already looked up.
    pub fn export_resolved(&mut self, dataset: &Dataset, destination: &Path) -> EngineResult<ExportReport> {
        self.phase = ExportPhase::Init;
        let result = self.config.validate().and_then(|()| self.run(dataset, destination));
        self.settle(result)
    }

    fn settle(&mut self, result: EngineResult<ExportReport>) -> EngineResult<ExportReport> {
        match result {
            Ok(report) => {
                self.transition(ExportPhase::Done);
                Ok(report)
            }
            Err(e) => {
                self.transition(ExportPhase::Failed);
                error!(target: "dszip::export", error = %e, "Export failed");
                Err(e)
            }
        }
    }

    fn transition(&mut self, phase: ExportPhase) {
        debug!(target: "dszip::export", from = ?self.phase, to = ?phase, "Export phase");
        self.phase = phase;
    }

    fn run(&mut self, dataset: &Dataset, destination: &Path) -> EngineResult<ExportReport> {
        let started = Instant::now();
        let mut archive = ArchiveWriter::create(destination, self.config.compression)
            .map_err(ExportError::DestinationUnwritable)?;

        let mut report =
            ExportReport::new(dataset.id, destination.to_path_buf(), dataset.is_published());

        self.transition(ExportPhase::Indexing);
        let index = match MembershipIndex::load(self.catalog, dataset) {
            Ok(index) => index,
            Err(e) => match self.config.index_failure {
                IndexFailurePolicy::Degrade => {
                    warn!(
                        target: "dszip::export",
                        dataset_id = %dataset.id,
                        error = %e,
                        "Unable to load entity files, continuing with an empty membership index"
                    );
                    report.index_degraded = true;
                    MembershipIndex::empty()
                }
                IndexFailurePolicy::Abort => {
                    close_after_failure(archive);
                    return Err(e.into());
                }
            },
        };

        self.transition(ExportPhase::Streaming);
        info!(
            target: "dszip::export",
            dataset_id = %dataset.id,
            published = dataset.is_published(),
            path = %destination.display(),
            "Starting zipfile build"
        );
        if let Err(e) = self.stream(dataset, &index, &mut archive, &mut report) {
            close_after_failure(archive);
            return Err(e);
        }

        self.transition(ExportPhase::Finalizing);
        archive.finish().map_err(ExportError::Finalize)?;
        info!(
            target: "dszip::export",
            dataset_id = %dataset.id,
            files = report.written,
            skipped = report.skipped.total(),
            "Finished building zipfile"
        );

        self.record_size(dataset, destination, &mut report);
        report.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        Ok(report)
    }

    fn stream(
        &self,
        dataset: &Dataset,
        index: &MembershipIndex,
        archive: &mut ArchiveWriter,
        report: &mut ExportReport,
    ) -> EngineResult<()> {
        let candidates = CandidateFiles::new(self.catalog, dataset, self.config.batch_size);

        for candidate in candidates {
            let file = candidate.map_err(|source| ExportError::BatchRead {
                written: report.written,
                source,
            })?;
            report.candidates += 1;

            if let Some(reason) = exclusion(&file, index) {
                debug!(
                    target: "dszip::export",
                    file_id = %file.id,
                    entry = %file.archive_path(),
                    ?reason,
                    "Excluded candidate"
                );
                report.record_excluded(reason);
                continue;
            }
            report.included += 1;
            if progress_due(report.included, self.config.progress_interval) {
                info!(target: "dszip::export", files = report.included, "Added {} files...", report.included);
            }

            match self.write_file(archive, &file) {
                Ok(bytes) => report.record_written(bytes),
                Err(e) => {
                    warn!(
                        target: "dszip::export",
                        file_id = %file.id,
                        entry = %file.archive_path(),
                        error = %e,
                        "Skipping file"
                    );
                    report.record_skipped(e.kind());
                }
            }
        }
        Ok(())
    }

    fn write_file(&self, archive: &mut ArchiveWriter, file: &CatalogFile) -> Result<u64, EntryError> {
        let source = self.layout.resolve(file)?;
        archive.add_file(&file.archive_path(), &source)
    }

    /// Stat the finished archive and store its size on the dataset.
    ///
    /// Failures here leave the archive valid and the export successful.
    fn record_size(&self, dataset: &Dataset, destination: &Path, report: &mut ExportReport) {
        let size = match fs::metadata(destination) {
            Ok(meta) => meta.len(),
            Err(e) => {
                warn!(
                    target: "dszip::export",
                    dataset_id = %dataset.id,
                    error = %e,
                    "Unable to determine zipfile size"
                );
                return;
            }
        };
        report.archive_size = Some(size);
        info!(target: "dszip::export", dataset_id = %dataset.id, size, "Zipfile size");

        match self.catalog.update_dataset_archive_size(dataset.id, size) {
            Ok(()) => report.size_persisted = true,
            Err(e) => warn!(
                target: "dszip::export",
                dataset_id = %dataset.id,
                error = %e,
                "Unable to set zipfile_size"
            ),
        }
    }
}

/// Whether the progress line is due after `included` accepted candidates
fn progress_due(included: u64, interval: u64) -> bool {
    interval > 0 && included % interval == 0
}

/// Close an archive on a fatal path, keeping the original error
fn close_after_failure(archive: ArchiveWriter) {
    let path = archive.path().to_path_buf();
    if let Err(e) = archive.finish() {
        warn!(
            target: "dszip::export",
            path = %path.display(),
            error = %e,
            "Unable to finalize zipfile after failure"
        );
    }
}

/// Export `dataset_id` with a one-off [`Exporter`]
pub fn export_dataset<C: Catalog + ?Sized>(
    catalog: &C,
    config: &ExportConfig,
    dataset_id: DatasetId,
    destination: &Path,
) -> EngineResult<ExportReport> {
    Exporter::new(catalog, config).export(dataset_id, destination)
}
