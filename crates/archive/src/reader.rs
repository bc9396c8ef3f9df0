//! Archive reader
//!
//! Re-opens a finished archive to list or read entries. Used to verify an
//! export after the fact.

use crate::error::{ArchiveError, ArchiveResult};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

/// Read-only access to a finished archive
pub struct ArchiveReader;

impl ArchiveReader {
    /// Entry names in central directory order
    pub fn entry_names(path: &Path) -> ArchiveResult<Vec<String>> {
        let mut archive = Self::open(path)?;
        let mut names = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let entry = archive.by_index(i).map_err(zip_err)?;
            names.push(entry.name().to_string());
        }
        Ok(names)
    }

    /// Full content of the entry `name`
    pub fn read_entry(path: &Path, name: &str) -> ArchiveResult<Vec<u8>> {
        let mut archive = Self::open(path)?;
        let mut entry = archive.by_name(name).map_err(zip_err)?;
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        Ok(data)
    }

    fn open(path: &Path) -> ArchiveResult<ZipArchive<BufReader<File>>> {
        let file = File::open(path)?;
        ZipArchive::new(BufReader::new(file)).map_err(zip_err)
    }
}

fn zip_err(e: ZipError) -> ArchiveError {
    match e {
        ZipError::Io(e) => ArchiveError::Io(e),
        other => ArchiveError::invalid(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_garbage_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("junk.zip");
        std::fs::write(&path, b"definitely not a zip file").unwrap();

        let err = ArchiveReader::entry_names(&path).unwrap_err();
        assert!(matches!(err, ArchiveError::Invalid(_)));
    }

    #[test]
    fn test_missing_archive_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = ArchiveReader::entry_names(&temp_dir.path().join("none.zip")).unwrap_err();
        assert!(matches!(err, ArchiveError::Io(_)));
    }
}
