//! Inclusion filter
//!
//! Pure predicate deciding whether a candidate goes into the archive. The
//! candidate universe already narrows by project or curated list; this adds
//! the structural and membership checks.

use dszip_catalog::MembershipIndex;
use dszip_core::CatalogFile;

/// Why a candidate was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Record is a directory
    Directory,
    /// Record is an old revision
    NotCurrent,
    /// Path is not attached to any of the dataset's entities
    NotMember,
}

/// Classify a candidate; `None` means it belongs in the archive
pub fn exclusion(file: &CatalogFile, index: &MembershipIndex) -> Option<Exclusion> {
    if !file.is_file() {
        return Some(Exclusion::Directory);
    }
    if !file.current {
        return Some(Exclusion::NotCurrent);
    }
    if !index.contains(&file.archive_path()) {
        return Some(Exclusion::NotMember);
    }
    None
}

/// Whether `file` belongs in the archive
pub fn include_in_archive(file: &CatalogFile, index: &MembershipIndex) -> bool {
    exclusion(file, index).is_none()
}
