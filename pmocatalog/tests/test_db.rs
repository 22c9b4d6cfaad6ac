use chrono::{TimeZone, Utc};
use pmocatalog::{BookDB, CatalogError};
use pmopages::{archive_identity, ArchiveCatalog, PageCache};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// Crée une DB temporaire pour les tests
fn create_test_db() -> (TempDir, BookDB) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db = BookDB::init(&temp_dir.path().join("books.db")).unwrap();
    (temp_dir, db)
}

/// Écrit une archive contenant un dossier et `pages` images PNG 8x8
fn write_archive(path: &Path, pages: usize) {
    let mut png = std::io::Cursor::new(Vec::new());
    image::DynamicImage::new_rgb8(8, 8)
        .write_to(&mut png, image::ImageFormat::Png)
        .unwrap();
    let png = png.into_inner();

    let mut zip = zip::ZipWriter::new(std::fs::File::create(path).unwrap());
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    zip.add_directory("pages/", options).unwrap();
    for i in 0..pages {
        zip.start_file(format!("pages/{i:03}.png"), options).unwrap();
        zip.write_all(&png).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn test_db_init() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("books.db");
    let db = BookDB::init(&db_path);
    assert!(db.is_ok());
    assert!(db_path.exists());
}

#[test]
fn test_insert_and_get() {
    let (_temp_dir, db) = create_test_db();
    let mod_time = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let hash = db
        .insert_book("folder", "/comics/a.zip", 1024, 12, mod_time)
        .unwrap();
    assert_eq!(hash, archive_identity("/comics/a.zip"));

    let entry = db.get_by_hash(&hash).unwrap().unwrap();
    assert_eq!(entry.file_path, "/comics/a.zip");
    assert_eq!(entry.folder_hash, "folder");
    assert_eq!(entry.file_size, 1024);
    assert_eq!(entry.page, 12);
    assert_eq!(entry.mod_time, "2024-05-01T12:00:00Z");

    assert_eq!(db.get_by_path("/comics/a.zip").unwrap(), Some(entry));
}

#[test]
fn test_empty_path_is_rejected() {
    let (_temp_dir, db) = create_test_db();
    let err = db.insert_book("folder", "", 0, 0, Utc::now()).unwrap_err();
    assert!(matches!(err, CatalogError::InvalidPath(_)));
}

#[test]
fn test_duplicate_path_is_rejected() {
    let (_temp_dir, db) = create_test_db();
    db.insert_book("f", "/comics/a.zip", 1, 1, Utc::now()).unwrap();
    let err = db.insert_book("f", "/comics/a.zip", 1, 1, Utc::now()).unwrap_err();
    assert!(matches!(err, CatalogError::Sqlite(_)));
}

#[test]
fn test_update_book() {
    let (_temp_dir, db) = create_test_db();
    db.insert_book("f", "/comics/a.zip", 1, 1, Utc::now()).unwrap();

    assert!(db.update_book("/comics/a.zip", 2048, 30, Utc::now()).unwrap());
    assert!(!db.update_book("/comics/unknown.zip", 1, 1, Utc::now()).unwrap());

    let entry = db.get_by_path("/comics/a.zip").unwrap().unwrap();
    assert_eq!(entry.file_size, 2048);
    assert_eq!(entry.page, 30);
}

#[test]
fn test_delete_book() {
    let (_temp_dir, db) = create_test_db();
    let hash = db.insert_book("f", "/comics/a.zip", 1, 1, Utc::now()).unwrap();
    let entry = db.get_by_hash(&hash).unwrap().unwrap();

    db.delete_book(entry.id).unwrap();

    assert_eq!(db.get_by_hash(&hash).unwrap(), None);
    assert_eq!(db.count().unwrap(), 0);
}

#[test]
fn test_list_by_folder() {
    let (_temp_dir, db) = create_test_db();
    db.insert_book("one", "/comics/b.zip", 1, 1, Utc::now()).unwrap();
    db.insert_book("one", "/comics/a.zip", 1, 1, Utc::now()).unwrap();
    db.insert_book("two", "/other/c.zip", 1, 1, Utc::now()).unwrap();

    let paths: Vec<_> = db
        .list_by_folder("one")
        .unwrap()
        .into_iter()
        .map(|e| e.file_path)
        .collect();
    assert_eq!(paths, vec!["/comics/a.zip", "/comics/b.zip"]);
    assert_eq!(db.list_all().unwrap().len(), 3);
}

#[test]
fn test_register_archive_counts_entries() {
    let (temp_dir, db) = create_test_db();
    let path = temp_dir.path().join("book.zip");
    write_archive(&path, 3);

    let entry = db.register_archive(&path).unwrap();

    assert_eq!(entry.hash, archive_identity(&path));
    assert_eq!(entry.page, 4);
    assert_eq!(entry.folder_hash, archive_identity(temp_dir.path()));
    assert_eq!(entry.file_size as u64, std::fs::metadata(&path).unwrap().len());
}

#[test]
fn test_register_archive_refreshes_existing_row() {
    let (temp_dir, db) = create_test_db();
    let path = temp_dir.path().join("book.zip");
    write_archive(&path, 1);
    let first = db.register_archive(&path).unwrap();

    write_archive(&path, 5);
    let second = db.register_archive(&path).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.page, 6);
    assert_eq!(db.count().unwrap(), 1);
}

#[test]
fn test_register_missing_archive_fails() {
    let (temp_dir, db) = create_test_db();
    let err = db
        .register_archive(&temp_dir.path().join("missing.zip"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::Io(_)));
}

#[test]
fn test_resolve_path_through_catalog_trait() {
    let (_temp_dir, db) = create_test_db();
    let hash = db.insert_book("f", "/comics/a.zip", 1, 1, Utc::now()).unwrap();

    assert_eq!(
        db.resolve_path(&hash).unwrap(),
        Some(PathBuf::from("/comics/a.zip"))
    );
    assert_eq!(db.resolve_path("unknown").unwrap(), None);
    assert_eq!(db.compute_identity(Path::new("/comics/a.zip")), hash);
}

#[tokio::test]
async fn test_page_cache_over_catalog() {
    let (temp_dir, db) = create_test_db();
    let path = temp_dir.path().join("book.zip");
    write_archive(&path, 2);
    let db = Arc::new(db);
    let entry = db.register_archive(&path).unwrap();

    let cache = PageCache::new(
        temp_dir.path().join("pages"),
        temp_dir.path().join("thumbs"),
        db.clone(),
    )
    .unwrap();

    let page = cache.resolve_page(&entry.hash, 1, 4, 0).await.unwrap();
    assert_eq!(image::image_dimensions(&page).unwrap(), (4, 4));

    let thumb = cache.generate_thumbnail(&entry.hash).await.unwrap().unwrap();
    assert_eq!(image::image_dimensions(thumb).unwrap(), (512, 512));
}
