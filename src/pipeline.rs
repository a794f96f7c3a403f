use chrono::Utc;
use log::warn;
use rand::Rng;
use sqlx::SqlitePool;
use std::path::Path;

use crate::constants::DEFAULT_FETCH_COUNT;
use crate::db::{self, PictureRecord};
use crate::download::ImageDownloader;
use crate::error::ServiceError;
use crate::source::{image_source_url, Animal};

/// Outcome of a single fetch iteration. A failed download is an expected,
/// frequent event and is tagged rather than raised.
enum FetchOutcome {
    Saved(PictureRecord),
    Skipped,
}

/// Normalize a raw count parameter
/// Missing, non-numeric, or non-positive input silently becomes the default
pub fn normalize_count(raw: Option<&str>) -> u32 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => DEFAULT_FETCH_COUNT,
    }
}

/// Generate a filename embedding the animal, a coarse timestamp, and a
/// random suffix. Collisions are possible but practically negligible.
pub fn generate_picture_filename(animal: Animal) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(1000..=9999);
    format!(
        "{}_{}_{}.jpg",
        animal.as_str(),
        Utc::now().timestamp(),
        suffix
    )
}

async fn fetch_one(
    pool: &SqlitePool,
    images_dir: &Path,
    downloader: &dyn ImageDownloader,
    animal: Animal,
) -> Result<FetchOutcome, ServiceError> {
    let source_url = image_source_url(animal);
    let filename = generate_picture_filename(animal);
    let dest = images_dir.join(&filename);

    if !downloader.download(&source_url, &dest).await {
        warn!("skipping {}: download failed from {}", filename, source_url);
        return Ok(FetchOutcome::Skipped);
    }

    let record = db::insert_picture(pool, animal.as_str(), &filename, &source_url).await?;
    Ok(FetchOutcome::Saved(record))
}

/// Fetch `count` images for an animal and persist a record per success.
///
/// Iterations run strictly sequentially; each one commits independently.
/// A failed download skips its iteration, so the returned list may be
/// shorter than `count` (or empty). An unsupported category fails the whole
/// call before anything is persisted.
pub async fn fetch_and_save(
    pool: &SqlitePool,
    images_dir: &Path,
    downloader: &dyn ImageDownloader,
    animal: &str,
    count: u32,
) -> Result<Vec<PictureRecord>, ServiceError> {
    let animal: Animal = animal.to_lowercase().parse()?;

    let mut saved = Vec::new();
    for _ in 0..count {
        match fetch_one(pool, images_dir, downloader, animal).await? {
            FetchOutcome::Saved(record) => saved.push(record),
            FetchOutcome::Skipped => {}
        }
    }
    Ok(saved)
}

/// Look up the most recently saved picture for an animal.
///
/// The category is not validated here: an unknown animal simply has no
/// records, which callers map to a not-found response.
pub async fn last_saved(
    pool: &SqlitePool,
    animal: &str,
) -> Result<Option<PictureRecord>, ServiceError> {
    let record = db::most_recent_picture(pool, &animal.to_lowercase()).await?;
    Ok(record)
}
