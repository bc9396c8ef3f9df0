//! Catalog fixtures
//!
//! Builds in-memory catalogs for unit and integration tests. Every file gets
//! a deterministic uuid derived from its id (see [`fixture_uuid`]) so tests
//! can place content at the matching storage location.

use crate::error::CatalogResult;
use crate::sqlite::SqliteCatalog;
use dszip_core::{DatasetId, FileId, FileKind};
use rusqlite::params;

/// Deterministic uuid for a fixture file id
pub fn fixture_uuid(id: i64) -> String {
    format!("{:08x}-{:04x}-4000-8000-{:012x}", id, id & 0xffff, id)
}

/// Description of a file row to insert
#[derive(Debug, Clone)]
pub struct NewFile<'a> {
    /// Owning project
    pub project_id: i64,
    /// Directory row id
    pub directory: FileId,
    /// File name
    pub name: &'a str,
    /// Mime type; `"directory"` marks a directory row
    pub mime_type: &'a str,
    /// Whether this is the current revision
    pub current: bool,
    /// Shared content uuid, if deduplicated
    pub uses_uuid: Option<&'a str>,
}

impl<'a> NewFile<'a> {
    /// A current `text/plain` file
    pub fn new(project_id: i64, directory: FileId, name: &'a str) -> Self {
        Self {
            project_id,
            directory,
            name,
            mime_type: "text/plain",
            current: true,
            uses_uuid: None,
        }
    }
}

/// Builder for an in-memory catalog
pub struct CatalogFixture {
    catalog: SqliteCatalog,
}

impl CatalogFixture {
    /// Empty catalog with the schema installed
    pub fn new() -> CatalogResult<Self> {
        Ok(Self {
            catalog: SqliteCatalog::open_in_memory()?,
        })
    }

    /// Insert a directory row
    pub fn add_directory(&mut self, project_id: i64, path: &str) -> CatalogResult<FileId> {
        let conn = self.catalog.connection();
        conn.execute(
            "INSERT INTO files (uuid, project_id, name, path, mime_type, current)
             VALUES ('', ?1, ?2, ?3, ?4, 1)",
            params![
                project_id,
                path.rsplit('/').next().unwrap_or_default(),
                path,
                FileKind::DIRECTORY_MIME_TYPE
            ],
        )?;
        let id = conn.last_insert_rowid();
        conn.execute(
            "UPDATE files SET uuid = ?1 WHERE id = ?2",
            params![fixture_uuid(id), id],
        )?;
        Ok(FileId(id))
    }

    /// Insert a current `text/plain` file
    pub fn add_file(&mut self, project_id: i64, directory: FileId, name: &str) -> CatalogResult<FileId> {
        self.add_file_with(NewFile::new(project_id, directory, name))
    }

    /// Insert a file row described by `file`
    pub fn add_file_with(&mut self, file: NewFile<'_>) -> CatalogResult<FileId> {
        let conn = self.catalog.connection();
        conn.execute(
            "INSERT INTO files (uuid, uses_uuid, project_id, directory_id, name, mime_type, current, size)
             VALUES ('', ?1, ?2, ?3, ?4, ?5, ?6, 0)",
            params![
                file.uses_uuid,
                file.project_id,
                file.directory.get(),
                file.name,
                file.mime_type,
                file.current
            ],
        )?;
        let id = conn.last_insert_rowid();
        conn.execute(
            "UPDATE files SET uuid = ?1 WHERE id = ?2",
            params![fixture_uuid(id), id],
        )?;
        Ok(FileId(id))
    }

    /// Flip the current flag of a file
    pub fn set_current(&mut self, file: FileId, current: bool) -> CatalogResult<()> {
        self.catalog.connection().execute(
            "UPDATE files SET current = ?1 WHERE id = ?2",
            params![current, file.get()],
        )?;
        Ok(())
    }

    /// Insert a dataset; `published_at` is seconds since the epoch
    pub fn add_dataset(
        &mut self,
        id: i64,
        project_id: i64,
        published_at: Option<i64>,
    ) -> CatalogResult<DatasetId> {
        self.catalog.connection().execute(
            "INSERT INTO datasets (id, project_id, published_at) VALUES (?1, ?2, ?3)",
            params![id, project_id, published_at],
        )?;
        Ok(DatasetId(id))
    }

    /// Add a file to a dataset's curated file list
    pub fn add_dataset_file(&mut self, dataset: DatasetId, file: FileId) -> CatalogResult<()> {
        self.catalog.connection().execute(
            "INSERT OR IGNORE INTO dataset2file (dataset_id, file_id) VALUES (?1, ?2)",
            params![dataset.get(), file.get()],
        )?;
        Ok(())
    }

    /// Attach a file to one of the dataset's entities
    pub fn add_entity_file(
        &mut self,
        dataset: DatasetId,
        entity_id: i64,
        file: FileId,
    ) -> CatalogResult<()> {
        let conn = self.catalog.connection();
        conn.execute(
            "INSERT OR IGNORE INTO dataset2entity (dataset_id, entity_id) VALUES (?1, ?2)",
            params![dataset.get(), entity_id],
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO entity2file (entity_id, file_id) VALUES (?1, ?2)",
            params![entity_id, file.get()],
        )?;
        Ok(())
    }

    /// Borrow the catalog being built
    pub fn catalog(&self) -> &SqliteCatalog {
        &self.catalog
    }

    /// Finish building
    pub fn into_catalog(self) -> SqliteCatalog {
        self.catalog
    }
}
