//! Membership index
//!
//! The set of catalog paths attached to a dataset's entities. Built once per
//! export, before any archive writing, and read-only afterwards.

use crate::error::IndexLoadError;
use crate::traits::Catalog;
use dszip_core::{normalize_catalog_path, Dataset};
use std::collections::HashSet;
use tracing::debug;

/// O(1) path-membership test for one export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipIndex {
    paths: HashSet<String>,
}

impl MembershipIndex {
    /// Index containing no paths
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index from catalog paths.
    ///
    /// Paths are stored relative, so `/a/b` and `a/b` are the same member.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            paths: paths
                .into_iter()
                .map(|p| normalize_catalog_path(p.as_ref()).to_string())
                .collect(),
        }
    }

    /// Load the entity file paths of `dataset` from the catalog
    pub fn load<C: Catalog + ?Sized>(catalog: &C, dataset: &Dataset) -> Result<Self, IndexLoadError> {
        let paths = catalog
            .entity_file_paths(dataset)
            .map_err(|source| IndexLoadError {
                dataset_id: dataset.id,
                source,
            })?;
        let index = Self::from_paths(paths);
        debug!(
            target: "dszip::catalog",
            dataset_id = %dataset.id,
            paths = index.len(),
            "Loaded membership index"
        );
        Ok(index)
    }

    /// Whether `path` belongs to the dataset
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(normalize_catalog_path(path))
    }

    /// Number of distinct paths
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when no path is a member
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CatalogFixture;
    use dszip_core::DatasetId;

    #[test]
    fn test_contains_ignores_leading_separator() {
        let index = MembershipIndex::from_paths(["/raw/a.csv", "b.txt"]);
        assert!(index.contains("raw/a.csv"));
        assert!(index.contains("/raw/a.csv"));
        assert!(index.contains("/b.txt"));
        assert!(!index.contains("raw/b.txt"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_duplicates_collapse() {
        let index = MembershipIndex::from_paths(["/x", "x", "x"]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_empty_index() {
        let index = MembershipIndex::empty();
        assert!(index.is_empty());
        assert!(!index.contains(""));
        assert!(!index.contains("anything"));
    }

    #[test]
    fn test_load_from_catalog() {
        let mut fx = CatalogFixture::new().unwrap();
        let dir = fx.add_directory(1, "/data").unwrap();
        let a = fx.add_file(1, dir, "a.txt").unwrap();
        fx.add_file(1, dir, "b.txt").unwrap();
        let ds = fx.add_dataset(7, 1, None).unwrap();
        fx.add_entity_file(ds, 1, a).unwrap();
        let catalog = fx.into_catalog();

        let dataset = catalog.find_dataset(DatasetId(7)).unwrap();
        let index = MembershipIndex::load(&catalog, &dataset).unwrap();
        assert!(index.contains("data/a.txt"));
        assert!(!index.contains("data/b.txt"));
    }

    #[test]
    fn test_load_failure_reports_dataset() {
        let fx = CatalogFixture::new().unwrap();
        let catalog = fx.into_catalog();
        catalog
            .connection()
            .execute_batch("DROP TABLE entity2file")
            .unwrap();

        let dataset = Dataset::draft(3, 1);
        let err = MembershipIndex::load(&catalog, &dataset).unwrap_err();
        assert_eq!(err.dataset_id, DatasetId(3));
    }
}
