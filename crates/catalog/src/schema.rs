//! Catalog schema
//!
//! The catalog is owned and migrated elsewhere. This is the subset of its
//! tables the export reads, used to build fixture databases.
//!
//! Directories are rows in `files` with `mime_type = 'directory'` and a
//! `path`; regular files point at their directory through `directory_id`.

/// DDL for the tables the export pipeline queries
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS datasets (
    id            INTEGER PRIMARY KEY,
    project_id    INTEGER NOT NULL,
    published_at  INTEGER,
    zipfile_size  INTEGER
);

CREATE TABLE IF NOT EXISTS files (
    id            INTEGER PRIMARY KEY,
    uuid          TEXT    NOT NULL,
    uses_uuid     TEXT,
    project_id    INTEGER NOT NULL,
    directory_id  INTEGER,
    name          TEXT    NOT NULL,
    path          TEXT,
    mime_type     TEXT    NOT NULL,
    current       INTEGER NOT NULL DEFAULT 1,
    size          INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS files_project_current
    ON files (project_id, current, id);

CREATE TABLE IF NOT EXISTS dataset2file (
    dataset_id    INTEGER NOT NULL,
    file_id       INTEGER NOT NULL,
    PRIMARY KEY (dataset_id, file_id)
);

CREATE TABLE IF NOT EXISTS dataset2entity (
    dataset_id    INTEGER NOT NULL,
    entity_id     INTEGER NOT NULL,
    PRIMARY KEY (dataset_id, entity_id)
);

CREATE TABLE IF NOT EXISTS entity2file (
    entity_id     INTEGER NOT NULL,
    file_id       INTEGER NOT NULL,
    PRIMARY KEY (entity_id, file_id)
);
"#;
