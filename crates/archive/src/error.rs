//! Archive error types

use dszip_core::EntryNameError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors affecting the whole archive container
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// Destination (or one of its parents) could not be created
    #[error("Unable to create archive '{}': {source}", path.display())]
    Create {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Central directory could not be written
    #[error("Unable to finalize archive: {0}")]
    Finalize(String),

    /// Archive on disk is unreadable or corrupt
    #[error("Invalid archive: {0}")]
    Invalid(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ArchiveError {
    /// Create a finalize error
    pub fn finalize(msg: impl Into<String>) -> Self {
        Self::Finalize(msg.into())
    }

    /// Create an invalid archive error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

/// Result type for archive-level operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Kinds of per-entry failure, for counting skips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryErrorKind {
    /// Source file missing or unreadable
    SourceOpen,
    /// Entry name rejected or container refused a new entry
    EntryCreate,
    /// I/O failure while streaming content
    Copy,
}

/// A single entry could not be written; the archive remains usable
#[derive(Debug, Error)]
pub enum EntryError {
    /// Source file missing or unreadable
    #[error("Unable to open file '{}' for archive: {source}", path.display())]
    SourceOpen {
        /// Resolved on-disk location
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Duplicate or invalid name, or the container rejected the entry
    #[error("Unable to add file '{name}' to archive: {reason}")]
    EntryCreate {
        /// Entry name
        name: String,
        /// What went wrong
        reason: String,
    },

    /// Streaming the content failed part way
    #[error("Unable to write file '{name}' to archive: {source}")]
    Copy {
        /// Entry name
        name: String,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },
}

impl EntryError {
    /// Kind of this failure
    pub fn kind(&self) -> EntryErrorKind {
        match self {
            EntryError::SourceOpen { .. } => EntryErrorKind::SourceOpen,
            EntryError::EntryCreate { .. } => EntryErrorKind::EntryCreate,
            EntryError::Copy { .. } => EntryErrorKind::Copy,
        }
    }

    /// Create an entry-create error
    pub fn entry_create(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::EntryCreate {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_name(name: &str, err: EntryNameError) -> Self {
        Self::entry_create(name, err.to_string())
    }
}
