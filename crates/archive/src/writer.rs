//! Streaming zip writer
//!
//! [`ArchiveWriter`] owns the destination file for the lifetime of one
//! export. Entries are streamed straight from their source readers into the
//! container; nothing is buffered beyond the copy buffer.
//!
//! The central directory is written by [`ArchiveWriter::finish`]. A writer
//! dropped without finishing (for instance when the export aborts on a
//! catalog error) still finalizes the container so the entries written so
//! far stay readable.

use crate::error::{ArchiveError, ArchiveResult, EntryError};
use dszip_core::validate_entry_name;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Entries at or above this size need zip64 headers
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Compression applied to entry content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Store bytes as-is
    Stored,
    /// Deflate (the zip default)
    #[default]
    Deflated,
}

impl Compression {
    fn method(self) -> CompressionMethod {
        match self {
            Compression::Stored => CompressionMethod::Stored,
            Compression::Deflated => CompressionMethod::Deflated,
        }
    }
}

/// Outcome of a finished archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Destination path
    pub path: PathBuf,
    /// Number of entries in the central directory
    pub entries: u64,
}

/// Single-writer handle on a zip archive being assembled
pub struct ArchiveWriter {
    path: PathBuf,
    zip: Option<ZipWriter<BufWriter<File>>>,
    compression: Compression,
    names: HashSet<String>,
    entries: u64,
}

impl ArchiveWriter {
    /// Create (or truncate) the archive at `path`, creating missing parent
    /// directories.
    pub fn create(path: &Path, compression: Compression) -> ArchiveResult<Self> {
        let create_err = |source| ArchiveError::Create {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(create_err)?;
            }
        }
        let file = File::create(path).map_err(create_err)?;

        debug!(target: "dszip::archive", path = %path.display(), ?compression, "Created archive");

        Ok(Self {
            path: path.to_path_buf(),
            zip: Some(ZipWriter::new(BufWriter::new(file))),
            compression,
            names: HashSet::new(),
            entries: 0,
        })
    }

    /// Destination path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries successfully written so far
    pub fn entry_count(&self) -> u64 {
        self.entries
    }

    /// Whether an entry with this name has been written
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Open `source` and stream it into the entry `name`.
    ///
    /// The source file is closed before this returns, whatever the outcome.
    pub fn add_file(&mut self, name: &str, source: &Path) -> Result<u64, EntryError> {
        let source_err = |source_err| EntryError::SourceOpen {
            path: source.to_path_buf(),
            source: source_err,
        };
        let mut file = File::open(source).map_err(source_err)?;
        let size = file.metadata().map_err(source_err)?.len();
        self.write_entry(name, &mut file, size)
    }

    /// Stream `reader` into a new entry called `name`.
    ///
    /// `size_hint` selects zip64 headers for large content. Returns the
    /// number of bytes copied. On a copy failure the partial entry is
    /// removed from the container.
    pub fn write_entry<R: Read + ?Sized>(
        &mut self,
        name: &str,
        reader: &mut R,
        size_hint: u64,
    ) -> Result<u64, EntryError> {
        validate_entry_name(name).map_err(|e| EntryError::invalid_name(name, e))?;
        if self.names.contains(name) {
            return Err(EntryError::entry_create(name, "duplicate entry"));
        }

        let options = SimpleFileOptions::default()
            .compression_method(self.compression.method())
            .unix_permissions(0o644)
            .large_file(size_hint >= ZIP64_THRESHOLD);

        let zip = self
            .zip
            .as_mut()
            .ok_or_else(|| EntryError::entry_create(name, "archive already finalized"))?;
        zip.start_file(name, options)
            .map_err(|e| EntryError::entry_create(name, e.to_string()))?;

        match io::copy(reader, zip) {
            Ok(bytes) => {
                self.names.insert(name.to_string());
                self.entries += 1;
                Ok(bytes)
            }
            Err(source) => {
                if let Err(e) = zip.abort_file() {
                    // The partial entry stays in the container; keep the name
                    // reserved so it is never written twice.
                    warn!(
                        target: "dszip::archive",
                        entry = name,
                        error = %e,
                        "Unable to discard partially written entry"
                    );
                    self.names.insert(name.to_string());
                }
                Err(EntryError::Copy {
                    name: name.to_string(),
                    source,
                })
            }
        }
    }

    /// Write the central directory and release the destination file.
    pub fn finish(mut self) -> ArchiveResult<ArchiveSummary> {
        let zip = self
            .zip
            .take()
            .ok_or_else(|| ArchiveError::finalize("archive already finalized"))?;
        Self::finalize(zip)?;

        debug!(
            target: "dszip::archive",
            path = %self.path.display(),
            entries = self.entries,
            "Finalized archive"
        );

        Ok(ArchiveSummary {
            path: self.path.clone(),
            entries: self.entries,
        })
    }

    fn finalize(zip: ZipWriter<BufWriter<File>>) -> ArchiveResult<()> {
        let mut inner = zip
            .finish()
            .map_err(|e| ArchiveError::finalize(e.to_string()))?;
        inner.flush()?;
        Ok(())
    }
}

impl Drop for ArchiveWriter {
    fn drop(&mut self) {
        if let Some(zip) = self.zip.take() {
            match Self::finalize(zip) {
                Ok(()) => warn!(
                    target: "dszip::archive",
                    path = %self.path.display(),
                    entries = self.entries,
                    "Archive closed before export completed"
                ),
                Err(e) => warn!(
                    target: "dszip::archive",
                    path = %self.path.display(),
                    error = %e,
                    "Failed to finalize archive on drop"
                ),
            }
        }
    }
}
