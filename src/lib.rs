//! dszip - Streaming dataset archive export
//!
//! Exports the files of a catalog dataset into a single zip archive without
//! holding the file set in memory. A bad file is skipped, never fatal.
//!
//! # Quick Start
//!
//! ```ignore
//! use dszip::{DatasetId, ExportConfig, Exporter, SqliteCatalog};
//!
//! let config = ExportConfig::from_file(Path::new("dszip.toml"))?;
//! let catalog = SqliteCatalog::open(Path::new("/var/lib/mc/catalog.db"))?;
//! let report = Exporter::new(&catalog, &config).export(DatasetId(42), Path::new("/tmp/ds-42.zip"))?;
//! println!("{} files, {} bytes", report.written, report.archive_size.unwrap_or(0));
//! ```
//!
//! # Architecture
//!
//! The [`Exporter`] drives the pipeline: membership index, candidate pages,
//! inclusion filter, archive assembler, size write-back. Catalog access goes
//! through the [`Catalog`] trait so other backends can be plugged in.

pub use dszip_archive::{ArchiveReader, ArchiveWriter, Compression, EntryError, EntryErrorKind};
pub use dszip_catalog::{CandidateFiles, Catalog, CatalogError, MembershipIndex, SqliteCatalog};
pub use dszip_core::{CatalogFile, Dataset, DatasetId, Directory, FileId, FileKind};
pub use dszip_engine::*;
