//! Archive-internal path handling
//!
//! Catalog paths are absolute within a project (`/raw/run1/a.csv`). Archive
//! entries must be relative, so a composed path has one leading separator
//! stripped. Anything still absolute after that is rejected by
//! [`validate_entry_name`] rather than silently rewritten.

use thiserror::Error;

/// Separator used by catalog paths and zip entry names
pub const SEPARATOR: char = '/';

/// Join a directory path and a file name into a relative archive path.
///
/// Trailing separators on the directory are ignored and exactly one leading
/// separator is removed from the result.
///
/// ```
/// use dszip_core::compose_path;
///
/// assert_eq!(compose_path("/raw/run1", "a.csv"), "raw/run1/a.csv");
/// assert_eq!(compose_path("/", "a.csv"), "a.csv");
/// ```
pub fn compose_path(directory: &str, name: &str) -> String {
    let directory = directory.trim_end_matches(SEPARATOR);
    if directory.is_empty() {
        return normalize_catalog_path(name).to_string();
    }
    let joined = format!("{}{}{}", directory, SEPARATOR, name);
    normalize_catalog_path(&joined).to_string()
}

/// Strip a single leading separator from a catalog path.
pub fn normalize_catalog_path(path: &str) -> &str {
    path.strip_prefix(SEPARATOR).unwrap_or(path)
}

/// Reasons an archive entry name is unusable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryNameError {
    /// Name is empty
    #[error("entry name is empty")]
    Empty,

    /// Name still starts with a separator
    #[error("entry name '{0}' is absolute")]
    Absolute(String),

    /// Name ends with a separator and would denote a directory
    #[error("entry name '{0}' ends with a separator")]
    TrailingSeparator(String),

    /// Name contains an empty, `.` or `..` component
    #[error("entry name '{0}' contains an invalid path component")]
    InvalidComponent(String),
}

/// Check that a composed path can be used as an archive entry name.
pub fn validate_entry_name(name: &str) -> Result<(), EntryNameError> {
    if name.is_empty() {
        return Err(EntryNameError::Empty);
    }
    if name.starts_with(SEPARATOR) {
        return Err(EntryNameError::Absolute(name.to_string()));
    }
    if name.ends_with(SEPARATOR) {
        return Err(EntryNameError::TrailingSeparator(name.to_string()));
    }
    if name
        .split(SEPARATOR)
        .any(|part| part.is_empty() || part == "." || part == "..")
    {
        return Err(EntryNameError::InvalidComponent(name.to_string()));
    }
    Ok(())
}
