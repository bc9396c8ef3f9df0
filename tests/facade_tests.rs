//! Exports driven through the top-level `dszip` API.

use dszip::{
    export_dataset, ArchiveReader, Catalog, DatasetId, ExportConfig, Exporter, StorageLayout,
};
use dszip_catalog::testing::{fixture_uuid, CatalogFixture};
use std::fs;
use tempfile::TempDir;

fn store(layout: &StorageLayout, id: i64, content: &[u8]) {
    let path = layout.path_for_uuid(&fixture_uuid(id)).unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn published_dataset_exports_curated_members() {
    let temp_dir = TempDir::new().unwrap();
    let config = ExportConfig::with_storage_root(temp_dir.path().join("mcfs"));
    let layout = StorageLayout::new(&config.storage_root);

    let mut fx = CatalogFixture::new().unwrap();
    let dir = fx.add_directory(7, "/results").unwrap();
    let ds = fx.add_dataset(3, 7, Some(1_700_000_000)).unwrap();

    let kept = fx.add_file(7, dir, "run1.csv").unwrap();
    let outside = fx.add_file(7, dir, "run2.csv").unwrap();
    let not_curated = fx.add_file(7, dir, "run3.csv").unwrap();
    for id in [kept, outside, not_curated] {
        store(&layout, id.get(), b"x,y\n1,2\n");
    }
    fx.add_dataset_file(ds, kept).unwrap();
    fx.add_dataset_file(ds, outside).unwrap();
    fx.add_entity_file(ds, 1, kept).unwrap();
    fx.add_entity_file(ds, 1, not_curated).unwrap();
    let catalog = fx.into_catalog();

    let dest = temp_dir.path().join("ds-3.zip");
    let report = export_dataset(&catalog, &config, ds, &dest).unwrap();

    assert!(report.published);
    assert_eq!(report.candidates, 2);
    assert_eq!(report.written, 1);
    assert_eq!(
        ArchiveReader::entry_names(&dest).unwrap(),
        vec!["results/run1.csv"]
    );

    let size = fs::metadata(&dest).unwrap().len();
    assert_eq!(report.archive_size, Some(size));
    assert_eq!(catalog.find_dataset(ds).unwrap().zipfile_size, Some(size));
}

#[test]
fn exporter_is_reusable_across_datasets() {
    let temp_dir = TempDir::new().unwrap();
    let config = ExportConfig::with_storage_root(temp_dir.path().join("mcfs"));
    let layout = StorageLayout::new(&config.storage_root);

    let mut fx = CatalogFixture::new().unwrap();
    let dir = fx.add_directory(1, "/").unwrap();
    let first = fx.add_dataset(1, 1, None).unwrap();
    let second = fx.add_dataset(2, 1, None).unwrap();
    let a = fx.add_file(1, dir, "a.txt").unwrap();
    let b = fx.add_file(1, dir, "b.txt").unwrap();
    store(&layout, a.get(), b"a");
    store(&layout, b.get(), b"b");
    fx.add_entity_file(first, 10, a).unwrap();
    fx.add_entity_file(second, 20, b).unwrap();
    let catalog = fx.into_catalog();

    let mut exporter = Exporter::new(&catalog, &config);
    let one = exporter
        .export(first, &temp_dir.path().join("1.zip"))
        .unwrap();
    let two = exporter
        .export(second, &temp_dir.path().join("2.zip"))
        .unwrap();

    assert_eq!(one.written, 1);
    assert_eq!(two.written, 1);
    assert_eq!(
        ArchiveReader::read_entry(&temp_dir.path().join("2.zip"), "b.txt").unwrap(),
        b"b"
    );
    assert!(exporter
        .export(DatasetId(99), &temp_dir.path().join("99.zip"))
        .is_err());
}
