//! Archive assembly for dszip
//!
//! Streams source files into named entries of a zip container. Entries are
//! written one at a time by a single writer; a failing entry is rejected or
//! rolled back and the writer stays usable for the next one.
//!
//! ## Error layers
//!
//! - [`ArchiveError`]: the container itself cannot be created or finalized
//! - [`EntryError`]: one entry failed; skip it and carry on

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{ArchiveError, ArchiveResult, EntryError, EntryErrorKind};
pub use reader::ArchiveReader;
pub use writer::{ArchiveSummary, ArchiveWriter, Compression};
