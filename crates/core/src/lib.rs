//! Core types for dszip
//!
//! This crate defines the foundational types shared by the catalog, archive
//! and export layers:
//! - DatasetId, FileId, ProjectId: catalog identifiers
//! - Dataset: the exported collection and its publication state
//! - CatalogFile, Directory, FileKind: catalog file records
//! - Archive path composition and entry name validation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod path;
pub mod types;

pub use path::{compose_path, normalize_catalog_path, validate_entry_name, EntryNameError};
pub use types::{CatalogFile, Dataset, DatasetId, Directory, FileId, FileKind, ProjectId};
