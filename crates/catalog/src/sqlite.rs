//! SQLite catalog backend

use crate::error::{CatalogError, CatalogResult};
use crate::schema::SCHEMA;
use crate::traits::{Catalog, PageRequest};
use chrono::{DateTime, Utc};
use dszip_core::{
    compose_path, CatalogFile, Dataset, DatasetId, Directory, FileId, FileKind, ProjectId,
};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::Path;
use tracing::debug;

/// Columns selected for every file listing, in [`file_from_row`] order
const FILE_COLUMNS: &str =
    "f.id, f.uuid, f.uses_uuid, f.name, f.mime_type, f.current, f.size, d.id, d.path";

/// Catalog backed by a SQLite database
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Open an existing catalog database.
    ///
    /// The file must already exist; a missing catalog is reported as
    /// unavailable rather than silently created empty.
    pub fn open(path: &Path) -> CatalogResult<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|e| {
            CatalogError::unavailable(format!("cannot open '{}': {}", path.display(), e))
        })?;
        debug!(target: "dszip::catalog", path = %path.display(), "Opened catalog");
        Ok(Self { conn })
    }

    /// Open a fresh in-memory catalog with the schema installed
    pub fn open_in_memory() -> CatalogResult<Self> {
        let catalog = Self {
            conn: Connection::open_in_memory()?,
        };
        catalog.create_schema()?;
        Ok(catalog)
    }

    /// Wrap an already opened connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Create the catalog tables if they do not exist
    pub fn create_schema(&self) -> CatalogResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn query_files(
        &self,
        sql: &str,
        scope: i64,
        page: PageRequest,
    ) -> CatalogResult<Vec<CatalogFile>> {
        let after = page.after.map(FileId::get).unwrap_or(i64::MIN);
        let limit = i64::try_from(page.limit).unwrap_or(i64::MAX);

        let mut stmt = self.conn.prepare_cached(sql)?;
        let rows = stmt.query_map(params![scope, after, limit], file_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(|e| match e {
            rusqlite::Error::IntegralValueOutOfRange(column, value) => CatalogError::invalid_record(
                format!("file column {} holds out-of-range value {}", column, value),
            ),
            other => other.into(),
        })
    }
}

impl Catalog for SqliteCatalog {
    fn find_dataset(&self, id: DatasetId) -> CatalogResult<Dataset> {
        let row = self
            .conn
            .query_row(
                "SELECT id, project_id, published_at, zipfile_size FROM datasets WHERE id = ?1",
                params![id.get()],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, Option<i64>>(2)?,
                        row.get::<_, Option<i64>>(3)?,
                    ))
                },
            )
            .optional()?;

        let (id, project_id, published_at, zipfile_size) =
            row.ok_or(CatalogError::DatasetNotFound(id))?;

        // A zero timestamp is how an unpublished dataset is sometimes stored.
        let published_at = match published_at {
            None | Some(0) => None,
            Some(secs) => Some(DateTime::<Utc>::from_timestamp(secs, 0).ok_or_else(|| {
                CatalogError::invalid_record(format!(
                    "dataset {} has out-of-range published_at {}",
                    id, secs
                ))
            })?),
        };

        let zipfile_size = zipfile_size
            .map(|size| {
                u64::try_from(size).map_err(|_| {
                    CatalogError::invalid_record(format!(
                        "dataset {} has negative zipfile_size {}",
                        id, size
                    ))
                })
            })
            .transpose()?;

        Ok(Dataset {
            id: DatasetId(id),
            project_id: ProjectId(project_id),
            published_at,
            zipfile_size,
        })
    }

    fn project_files(
        &self,
        project_id: ProjectId,
        page: PageRequest,
    ) -> CatalogResult<Vec<CatalogFile>> {
        let sql = format!(
            "SELECT {FILE_COLUMNS}
             FROM files f
             JOIN files d ON d.id = f.directory_id
             WHERE f.project_id = ?1
               AND f.current = 1
               AND f.mime_type <> 'directory'
               AND f.id > ?2
             ORDER BY f.id
             LIMIT ?3"
        );
        self.query_files(&sql, project_id.get(), page)
    }

    fn dataset_files(&self, dataset: &Dataset, page: PageRequest) -> CatalogResult<Vec<CatalogFile>> {
        let sql = format!(
            "SELECT {FILE_COLUMNS}
             FROM dataset2file df
             JOIN files f ON f.id = df.file_id
             JOIN files d ON d.id = f.directory_id
             WHERE df.dataset_id = ?1
               AND f.id > ?2
             ORDER BY f.id
             LIMIT ?3"
        );
        self.query_files(&sql, dataset.id.get(), page)
    }

    fn entity_file_paths(&self, dataset: &Dataset) -> CatalogResult<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT DISTINCT d.path, f.name
             FROM dataset2entity de
             JOIN entity2file ef ON ef.entity_id = de.entity_id
             JOIN files f ON f.id = ef.file_id
             JOIN files d ON d.id = f.directory_id
             WHERE de.dataset_id = ?1",
        )?;
        let rows = stmt.query_map(params![dataset.id.get()], |row| {
            let dir: Option<String> = row.get(0)?;
            let name: String = row.get(1)?;
            Ok(compose_path(dir.as_deref().unwrap_or_default(), &name))
        })?;
        let paths = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(paths)
    }

    fn update_dataset_archive_size(&self, dataset_id: DatasetId, size: u64) -> CatalogResult<()> {
        let size = i64::try_from(size).map_err(|_| {
            CatalogError::invalid_record(format!("archive size {} does not fit the catalog", size))
        })?;
        let changed = self.conn.execute(
            "UPDATE datasets SET zipfile_size = ?1 WHERE id = ?2",
            params![size, dataset_id.get()],
        )?;
        if changed == 0 {
            return Err(CatalogError::DatasetNotFound(dataset_id));
        }
        Ok(())
    }
}

/// Map a row selected with [`FILE_COLUMNS`] onto a [`CatalogFile`]
fn file_from_row(row: &Row<'_>) -> rusqlite::Result<CatalogFile> {
    let mime_type: String = row.get(4)?;
    let size: i64 = row.get(6)?;
    let dir_path: Option<String> = row.get(8)?;

    Ok(CatalogFile {
        id: FileId(row.get(0)?),
        uuid: row.get(1)?,
        uses_uuid: row.get(2)?,
        name: row.get(3)?,
        kind: FileKind::from_mime_type(&mime_type),
        current: row.get(5)?,
        size: u64::try_from(size).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(6, size))?,
        directory: Directory {
            id: FileId(row.get(7)?),
            path: dir_path.unwrap_or_default(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CatalogFixture;
    use tempfile::TempDir;

    #[test]
    fn test_find_dataset_states() {
        let mut fx = CatalogFixture::new().unwrap();
        fx.add_dataset(1, 10, None).unwrap();
        fx.add_dataset(2, 10, Some(1_700_000_000)).unwrap();
        fx.add_dataset(3, 10, Some(0)).unwrap();
        let catalog = fx.into_catalog();

        assert!(!catalog.find_dataset(DatasetId(1)).unwrap().is_published());
        assert!(catalog.find_dataset(DatasetId(2)).unwrap().is_published());
        assert!(!catalog.find_dataset(DatasetId(3)).unwrap().is_published());

        let err = catalog.find_dataset(DatasetId(99)).unwrap_err();
        assert!(matches!(err, CatalogError::DatasetNotFound(DatasetId(99))));
    }

    #[test]
    fn test_project_files_filters_and_pages() {
        let mut fx = CatalogFixture::new().unwrap();
        let dir = fx.add_directory(10, "/data").unwrap();
        let a = fx.add_file(10, dir, "a.txt").unwrap();
        let old = fx.add_file(10, dir, "old.txt").unwrap();
        fx.set_current(old, false).unwrap();
        let b = fx.add_file(10, dir, "b.txt").unwrap();
        let c = fx.add_file(10, dir, "c.txt").unwrap();
        let other_dir = fx.add_directory(11, "/").unwrap();
        fx.add_file(11, other_dir, "elsewhere.txt").unwrap();
        let catalog = fx.into_catalog();

        let first = catalog.project_files(ProjectId(10), PageRequest::first(2)).unwrap();
        assert_eq!(first.iter().map(|f| f.id).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(first[0].directory.path, "/data");
        assert!(first.iter().all(|f| f.is_file() && f.current));

        let second = catalog
            .project_files(
                ProjectId(10),
                PageRequest {
                    after: Some(b),
                    limit: 2,
                },
            )
            .unwrap();
        assert_eq!(second.iter().map(|f| f.id).collect::<Vec<_>>(), vec![c]);
    }

    #[test]
    fn test_dataset_files_returns_curated_list() {
        let mut fx = CatalogFixture::new().unwrap();
        let dir = fx.add_directory(10, "/d").unwrap();
        let a = fx.add_file(10, dir, "a").unwrap();
        fx.add_file(10, dir, "b").unwrap();
        let c = fx.add_file(10, dir, "c").unwrap();
        let ds = fx.add_dataset(5, 10, Some(1_700_000_000)).unwrap();
        fx.add_dataset_file(ds, a).unwrap();
        fx.add_dataset_file(ds, c).unwrap();
        let catalog = fx.into_catalog();

        let dataset = catalog.find_dataset(ds).unwrap();
        let files = catalog.dataset_files(&dataset, PageRequest::first(100)).unwrap();
        assert_eq!(files.iter().map(|f| f.id).collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn test_entity_file_paths_are_composed() {
        let mut fx = CatalogFixture::new().unwrap();
        let root = fx.add_directory(10, "/").unwrap();
        let sub = fx.add_directory(10, "/raw/run1").unwrap();
        let top = fx.add_file(10, root, "README").unwrap();
        let nested = fx.add_file(10, sub, "scan.tif").unwrap();
        let ds = fx.add_dataset(1, 10, None).unwrap();
        fx.add_entity_file(ds, 100, top).unwrap();
        fx.add_entity_file(ds, 101, nested).unwrap();
        let catalog = fx.into_catalog();

        let dataset = catalog.find_dataset(ds).unwrap();
        let mut paths = catalog.entity_file_paths(&dataset).unwrap();
        paths.sort();
        assert_eq!(paths, vec!["README".to_string(), "raw/run1/scan.tif".to_string()]);
    }

    #[test]
    fn test_update_archive_size() {
        let mut fx = CatalogFixture::new().unwrap();
        let ds = fx.add_dataset(1, 10, None).unwrap();
        let catalog = fx.into_catalog();

        catalog.update_dataset_archive_size(ds, 4096).unwrap();
        assert_eq!(catalog.find_dataset(ds).unwrap().zipfile_size, Some(4096));

        let err = catalog.update_dataset_archive_size(DatasetId(2), 1).unwrap_err();
        assert!(matches!(err, CatalogError::DatasetNotFound(_)));
    }

    #[test]
    fn test_negative_sizes_are_invalid_records() {
        let mut fx = CatalogFixture::new().unwrap();
        let dir = fx.add_directory(10, "/d").unwrap();
        let file = fx.add_file(10, dir, "f.bin").unwrap();
        let ds = fx.add_dataset(1, 10, None).unwrap();
        let catalog = fx.into_catalog();

        catalog
            .connection()
            .execute("UPDATE files SET size = -5 WHERE id = ?1", params![file.get()])
            .unwrap();
        let err = catalog
            .project_files(ProjectId(10), PageRequest::first(10))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRecord(_)));

        catalog
            .connection()
            .execute("UPDATE datasets SET zipfile_size = -1 WHERE id = ?1", params![ds.get()])
            .unwrap();
        let err = catalog.find_dataset(ds).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRecord(_)));
    }

    #[test]
    fn test_open_missing_database_is_unavailable() {
        let temp_dir = TempDir::new().unwrap();
        let err = SqliteCatalog::open(&temp_dir.path().join("missing.db")).err().unwrap();
        assert!(matches!(err, CatalogError::Unavailable(_)));
    }

    #[test]
    fn test_open_existing_database() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.db");
        {
            let conn = Connection::open(&path).unwrap();
            SqliteCatalog::from_connection(conn).create_schema().unwrap();
        }
        let catalog = SqliteCatalog::open(&path).unwrap();
        let err = catalog.find_dataset(DatasetId(1)).unwrap_err();
        assert!(matches!(err, CatalogError::DatasetNotFound(_)));
    }
}
