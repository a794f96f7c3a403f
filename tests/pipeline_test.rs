//! # Fetch Pipeline Tests
//!
//! Exercise the fetch-and-save loop with stub downloaders so no network
//! access is needed: successful runs, skip-on-failure, unsupported
//! categories, and count normalization.
//!
//! ## Running the Tests
//!
//! ```bash
//! cargo test --test pipeline_test
//! ```

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use fetch_animal_pics::db;
use fetch_animal_pics::download::ImageDownloader;
use fetch_animal_pics::error::ServiceError;
use fetch_animal_pics::pipeline::{
    fetch_and_save, generate_picture_filename, last_saved, normalize_count,
};
use fetch_animal_pics::source::Animal;

/// Writes fixed bytes to the destination, always succeeding
struct FixedBytesDownloader(Vec<u8>);

#[async_trait]
impl ImageDownloader for FixedBytesDownloader {
    async fn download(&self, _url: &str, dest: &Path) -> bool {
        tokio::fs::write(dest, &self.0).await.is_ok()
    }
}

/// Simulates a downed placeholder host
struct AlwaysFailsDownloader;

#[async_trait]
impl ImageDownloader for AlwaysFailsDownloader {
    async fn download(&self, _url: &str, _dest: &Path) -> bool {
        false
    }
}

/// Fails every second download to simulate network flakiness
struct FlakyDownloader {
    calls: AtomicUsize,
}

#[async_trait]
impl ImageDownloader for FlakyDownloader {
    async fn download(&self, _url: &str, dest: &Path) -> bool {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call % 2 == 1 {
            return false;
        }
        tokio::fs::write(dest, b"flaky").await.is_ok()
    }
}

async fn setup() -> (SqlitePool, PathBuf, tempfile::TempDir) {
    let (pool, guard) = db::create_test_connection_in_temporary_file()
        .await
        .unwrap();
    db::init_database_schema(&pool).await.unwrap();
    let images_dir = guard.path().join("images");
    std::fs::create_dir_all(&images_dir).unwrap();
    (pool, images_dir, guard)
}

#[tokio::test]
async fn test_fetch_saves_count_records_with_files_on_disk() {
    let (pool, images_dir, _guard) = setup().await;
    let downloader = FixedBytesDownloader(b"X".to_vec());

    let saved = fetch_and_save(&pool, &images_dir, &downloader, "cat", 3)
        .await
        .unwrap();

    assert_eq!(saved.len(), 3);
    let filenames: HashSet<&str> = saved.iter().map(|r| r.filename.as_str()).collect();
    assert_eq!(filenames.len(), 3, "filenames should be distinct");

    for record in &saved {
        assert_eq!(record.animal, "cat");
        let contents = std::fs::read(images_dir.join(&record.filename)).unwrap();
        assert_eq!(contents, b"X");
    }
    assert_eq!(db::count_pictures(&pool).await.unwrap(), 3);
}

#[tokio::test]
async fn test_fetch_normalizes_animal_to_lowercase() {
    let (pool, images_dir, _guard) = setup().await;
    let downloader = FixedBytesDownloader(b"X".to_vec());

    let saved = fetch_and_save(&pool, &images_dir, &downloader, "CAT", 1)
        .await
        .unwrap();

    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].animal, "cat");
}

#[tokio::test]
async fn test_fetch_unsupported_animal_persists_nothing() {
    let (pool, images_dir, _guard) = setup().await;
    let downloader = FixedBytesDownloader(b"X".to_vec());

    let result = fetch_and_save(&pool, &images_dir, &downloader, "fish", 3).await;

    assert!(matches!(result, Err(ServiceError::UnsupportedAnimal(_))));
    assert_eq!(db::count_pictures(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_fetch_skips_failed_downloads_and_continues() {
    let (pool, images_dir, _guard) = setup().await;
    let downloader = FlakyDownloader {
        calls: AtomicUsize::new(0),
    };

    let saved = fetch_and_save(&pool, &images_dir, &downloader, "dog", 4)
        .await
        .unwrap();

    assert_eq!(saved.len(), 2, "every second download fails, two survive");
    assert_eq!(db::count_pictures(&pool).await.unwrap(), 2);
}

#[tokio::test]
async fn test_fetch_all_downloads_failed_returns_empty() {
    let (pool, images_dir, _guard) = setup().await;

    let saved = fetch_and_save(&pool, &images_dir, &AlwaysFailsDownloader, "bear", 3)
        .await
        .unwrap();

    assert!(saved.is_empty());
    assert_eq!(db::count_pictures(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn test_last_saved_returns_latest_record() {
    let (pool, images_dir, _guard) = setup().await;
    let downloader = FixedBytesDownloader(b"X".to_vec());

    let saved = fetch_and_save(&pool, &images_dir, &downloader, "cat", 2)
        .await
        .unwrap();

    let latest = last_saved(&pool, "CAT").await.unwrap().unwrap();
    assert_eq!(latest.filename, saved[1].filename);
    assert_eq!(latest.id, saved[1].id);
}

#[tokio::test]
async fn test_last_saved_absent_returns_none() {
    let (pool, _images_dir, _guard) = setup().await;

    let latest = last_saved(&pool, "dog").await.unwrap();
    assert!(latest.is_none());
}

#[test]
fn test_normalize_count_defaults_and_parsing() {
    assert_eq!(normalize_count(None), 1);
    assert_eq!(normalize_count(Some("")), 1);
    assert_eq!(normalize_count(Some("abc")), 1);
    assert_eq!(normalize_count(Some("0")), 1);
    assert_eq!(normalize_count(Some("-3")), 1);
    assert_eq!(normalize_count(Some("5")), 5);
    assert_eq!(normalize_count(Some(" 2 ")), 2);
}

#[test]
fn test_normalize_count_saturates_above_u32_range() {
    // A positive count larger than u32 must clamp, not wrap to zero
    assert_eq!(normalize_count(Some("4294967296")), u32::MAX);
    assert_eq!(normalize_count(Some("99999999999")), u32::MAX);
    assert_eq!(normalize_count(Some("4294967295")), u32::MAX);
}

#[test]
fn test_generate_picture_filename_shape() {
    let filename = generate_picture_filename(Animal::Bear);

    let stem = filename.strip_suffix(".jpg").expect("should end in .jpg");
    let parts: Vec<&str> = stem.split('_').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "bear");
    assert!(parts[1].parse::<i64>().unwrap() > 0, "unix timestamp");
    assert_eq!(parts[2].len(), 4);
    assert!(parts[2].parse::<u32>().is_ok(), "4-digit random suffix");
}
