//! Export report
//!
//! Counters accumulated over one export. A file counts as written only after
//! its entry is complete; failures are tallied by kind and never decrement
//! anything.

use crate::filter::Exclusion;
use dszip_archive::EntryErrorKind;
use dszip_core::DatasetId;
use serde::Serialize;
use std::path::PathBuf;

/// Per-kind count of entries that were included but not written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    /// Source missing or unreadable
    pub source_open: u64,
    /// Entry name rejected by the container
    pub entry_create: u64,
    /// I/O failure mid-copy
    pub copy: u64,
}

impl SkipCounts {
    /// Count one failure
    pub fn record(&mut self, kind: EntryErrorKind) {
        match kind {
            EntryErrorKind::SourceOpen => self.source_open += 1,
            EntryErrorKind::EntryCreate => self.entry_create += 1,
            EntryErrorKind::Copy => self.copy += 1,
        }
    }

    /// All skipped entries
    pub fn total(&self) -> u64 {
        self.source_open + self.entry_create + self.copy
    }
}

/// Per-reason count of candidates the inclusion filter rejected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExclusionCounts {
    /// Directory records
    pub directory: u64,
    /// Superseded revisions
    pub not_current: u64,
    /// Paths outside the membership index
    pub not_member: u64,
}

impl ExclusionCounts {
    /// Count one rejection
    pub fn record(&mut self, reason: Exclusion) {
        match reason {
            Exclusion::Directory => self.directory += 1,
            Exclusion::NotCurrent => self.not_current += 1,
            Exclusion::NotMember => self.not_member += 1,
        }
    }

    /// All rejected candidates
    pub fn total(&self) -> u64 {
        self.directory + self.not_current + self.not_member
    }
}

/// Outcome of a completed export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    /// Exported dataset
    pub dataset_id: DatasetId,
    /// Archive location
    pub path: PathBuf,
    /// Whether the candidates came from the curated list of a published dataset
    pub published: bool,
    /// The membership index failed to load and an empty one was used
    pub index_degraded: bool,
    /// Candidate records read from the catalog
    pub candidates: u64,
    /// Candidates accepted by the inclusion filter
    pub included: u64,
    /// Candidates rejected by the inclusion filter, by reason
    pub exclusions: ExclusionCounts,
    /// Entries fully written to the archive
    pub written: u64,
    /// Included candidates that could not be written
    pub skipped: SkipCounts,
    /// Source bytes streamed into the archive
    pub bytes_copied: u64,
    /// Size of the finished archive, if it could be determined
    pub archive_size: Option<u64>,
    /// Whether the size was recorded on the dataset
    pub size_persisted: bool,
    /// Wall-clock duration in milliseconds
    pub elapsed_ms: u64,
}

impl ExportReport {
    /// Empty report for an export of `dataset_id` to `path`
    pub fn new(dataset_id: DatasetId, path: PathBuf, published: bool) -> Self {
        Self {
            dataset_id,
            path,
            published,
            index_degraded: false,
            candidates: 0,
            included: 0,
            exclusions: ExclusionCounts::default(),
            written: 0,
            skipped: SkipCounts::default(),
            bytes_copied: 0,
            archive_size: None,
            size_persisted: false,
            elapsed_ms: 0,
        }
    }

    pub(crate) fn record_written(&mut self, bytes: u64) {
        self.written += 1;
        self.bytes_copied += bytes;
    }

    pub(crate) fn record_excluded(&mut self, reason: Exclusion) {
        self.exclusions.record(reason);
    }

    pub(crate) fn record_skipped(&mut self, kind: EntryErrorKind) {
        self.skipped.record(kind);
    }

    /// Candidates rejected by the inclusion filter
    pub fn excluded(&self) -> u64 {
        self.candidates.saturating_sub(self.included)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut report = ExportReport::new(DatasetId(1), PathBuf::from("/tmp/x.zip"), false);
        report.candidates = 5;
        report.included = 3;
        report.record_written(10);
        report.record_written(5);
        report.record_skipped(EntryErrorKind::SourceOpen);

        assert_eq!(report.written, 2);
        assert_eq!(report.bytes_copied, 15);
        assert_eq!(report.skipped.total(), 1);
        assert_eq!(report.written + report.skipped.total(), report.included);
        assert_eq!(report.excluded(), 2);
    }

    #[test]
    fn test_skip_counts_by_kind() {
        let mut skips = SkipCounts::default();
        skips.record(EntryErrorKind::Copy);
        skips.record(EntryErrorKind::EntryCreate);
        skips.record(EntryErrorKind::EntryCreate);
        assert_eq!(skips.copy, 1);
        assert_eq!(skips.entry_create, 2);
        assert_eq!(skips.source_open, 0);
        assert_eq!(skips.total(), 3);
    }

    #[test]
    fn test_exclusions_by_reason() {
        let mut report = ExportReport::new(DatasetId(1), PathBuf::from("/tmp/x.zip"), false);
        report.candidates = 4;
        report.included = 1;
        report.record_excluded(Exclusion::NotMember);
        report.record_excluded(Exclusion::NotMember);
        report.record_excluded(Exclusion::Directory);

        assert_eq!(report.exclusions.not_member, 2);
        assert_eq!(report.exclusions.directory, 1);
        assert_eq!(report.exclusions.total(), report.excluded());
    }

    #[test]
    fn test_report_serializes() {
        let report = ExportReport::new(DatasetId(9), PathBuf::from("/tmp/ds.zip"), true);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["dataset_id"], 9);
        assert_eq!(json["published"], true);
        assert_eq!(json["skipped"]["copy"], 0);
    }
}
