//! Catalog record types
//!
//! These mirror the rows the export pipeline reads from the catalog. They are
//! plain values: the pipeline never mutates them, it only reads pages of
//! files and writes back a dataset's archive size.

use crate::path::compose_path;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Raw database identifier
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

catalog_id!(
    /// Identifier of a dataset row
    DatasetId
);
catalog_id!(
    /// Identifier of a file (or directory) row
    FileId
);
catalog_id!(
    /// Identifier of the project owning datasets and files
    ProjectId
);

/// A named collection of catalog files, optionally published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Dataset identifier
    pub id: DatasetId,
    /// Owning project
    pub project_id: ProjectId,
    /// Publication timestamp; `None` means the dataset is still a draft
    pub published_at: Option<DateTime<Utc>>,
    /// Byte size of the last exported archive, if one was recorded
    pub zipfile_size: Option<u64>,
}

impl Dataset {
    /// Create a draft dataset
    pub fn draft(id: impl Into<DatasetId>, project_id: impl Into<ProjectId>) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            published_at: None,
            zipfile_size: None,
        }
    }

    /// Whether the dataset has been published.
    ///
    /// Published datasets export their curated file list; drafts export
    /// from the whole project.
    pub fn is_published(&self) -> bool {
        self.published_at.is_some()
    }
}

/// Structural kind of a catalog record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Regular file with content on disk
    File,
    /// Directory record; never exported
    Directory,
}

impl FileKind {
    /// Mime type the catalog uses to mark directory rows
    pub const DIRECTORY_MIME_TYPE: &'static str = "directory";

    /// Classify a catalog row by its mime type
    pub fn from_mime_type(mime_type: &str) -> Self {
        if mime_type == Self::DIRECTORY_MIME_TYPE {
            FileKind::Directory
        } else {
            FileKind::File
        }
    }
}

/// Directory a file is logically nested under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    /// Directory row identifier
    pub id: FileId,
    /// Catalog path, usually absolute within the project (e.g. `/raw/run1`)
    pub path: String,
}

/// A file record read from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    /// File identifier
    pub id: FileId,
    /// Content identifier of this revision
    pub uuid: String,
    /// Content identifier this revision shares storage with, if deduplicated
    pub uses_uuid: Option<String>,
    /// File name within its directory
    pub name: String,
    /// File or directory
    pub kind: FileKind,
    /// Only current revisions are exportable
    pub current: bool,
    /// Size recorded in the catalog
    pub size: u64,
    /// Owning directory
    pub directory: Directory,
}

impl CatalogFile {
    /// True for regular files
    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    /// Relative path of this file inside an export archive
    pub fn archive_path(&self) -> String {
        compose_path(&self.directory.path, &self.name)
    }

    /// The uuid naming this file's content in the storage root.
    ///
    /// Deduplicated revisions point at the content of another upload.
    pub fn content_uuid(&self) -> &str {
        match self.uses_uuid.as_deref() {
            Some(uses) if !uses.is_empty() => uses,
            _ => &self.uuid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(dir: &str, name: &str) -> CatalogFile {
        CatalogFile {
            id: FileId(7),
            uuid: "0a1b2c3d-4e5f-6789-abcd-ef0123456789".to_string(),
            uses_uuid: None,
            name: name.to_string(),
            kind: FileKind::File,
            current: true,
            size: 12,
            directory: Directory {
                id: FileId(1),
                path: dir.to_string(),
            },
        }
    }

    #[test]
    fn test_kind_from_mime_type() {
        assert_eq!(FileKind::from_mime_type("directory"), FileKind::Directory);
        assert_eq!(FileKind::from_mime_type("text/plain"), FileKind::File);
        assert_eq!(FileKind::from_mime_type(""), FileKind::File);
    }

    #[test]
    fn test_archive_path_is_relative() {
        assert_eq!(file("/raw/run1", "a.csv").archive_path(), "raw/run1/a.csv");
        assert_eq!(file("/", "top.txt").archive_path(), "top.txt");
    }

    #[test]
    fn test_content_uuid_prefers_uses_uuid() {
        let mut f = file("/", "x");
        assert_eq!(f.content_uuid(), "0a1b2c3d-4e5f-6789-abcd-ef0123456789");

        f.uses_uuid = Some("11111111-2222-3333-4444-555555555555".to_string());
        assert_eq!(f.content_uuid(), "11111111-2222-3333-4444-555555555555");

        f.uses_uuid = Some(String::new());
        assert_eq!(f.content_uuid(), "0a1b2c3d-4e5f-6789-abcd-ef0123456789");
    }

    #[test]
    fn test_dataset_publication_state() {
        let mut ds = Dataset::draft(3, 9);
        assert!(!ds.is_published());
        ds.published_at = Some(Utc::now());
        assert!(ds.is_published());
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&DatasetId(42)).unwrap();
        assert_eq!(json, "42");
        assert_eq!(FileId::from(5).to_string(), "5");
    }
}
