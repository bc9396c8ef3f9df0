//! Content store layout
//!
//! File bytes live under the storage root in a two-level fan-out derived
//! from the content uuid:
//!
//! ```text
//! <root>/<g[0..2]>/<g[2..4]>/<uuid>
//! ```
//!
//! where `g` is the second `-`-separated group of the uuid. Deduplicated
//! revisions resolve through `uses_uuid` to the shared content.

use dszip_archive::EntryError;
use dszip_core::CatalogFile;
use std::io;
use std::path::{Path, PathBuf};

/// Maps catalog files onto their on-disk content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    root: PathBuf,
}

impl StorageLayout {
    /// Layout rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the content named by `uuid`, if the uuid is well formed
    pub fn path_for_uuid(&self, uuid: &str) -> Option<PathBuf> {
        let group = uuid.split('-').nth(1)?;
        let first = group.get(0..2)?;
        let second = group.get(2..4)?;
        Some(self.root.join(first).join(second).join(uuid))
    }

    /// Location of `file`'s content.
    ///
    /// An unresolvable uuid is reported the same way as a missing source.
    pub fn resolve(&self, file: &CatalogFile) -> Result<PathBuf, EntryError> {
        let uuid = file.content_uuid();
        self.path_for_uuid(uuid).ok_or_else(|| EntryError::SourceOpen {
            path: self.root.join(uuid),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("file {} has malformed uuid '{}'", file.id, uuid),
            ),
        })
    }
}
