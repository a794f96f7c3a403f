use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;

use crate::queries::{ddl, pictures};

/// A persisted description of one successfully fetched image.
/// Rows are immutable once created; there are no update or delete paths.
#[derive(Debug, Clone, Serialize)]
pub struct PictureRecord {
    pub id: i64,
    pub animal: String,
    pub filename: String,
    pub source_url: String,
    pub saved_at: String,
}

/// Open a file-based database pool for production use
/// Enables WAL mode and creates the file if missing
pub async fn open_database_pool(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Initialize the database schema
/// Idempotent - safe to call on every process start
pub async fn init_database_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(&ddl::create_pictures_table())
        .execute(pool)
        .await?;
    sqlx::query(&ddl::create_pictures_animal_saved_at_index())
        .execute(pool)
        .await?;
    Ok(())
}

/// Insert a picture row with saved_at set to the current UTC time
/// Returns the full record including the store-assigned id
pub async fn insert_picture(
    pool: &SqlitePool,
    animal: &str,
    filename: &str,
    source_url: &str,
) -> Result<PictureRecord, sqlx::Error> {
    let saved_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
    let sql = pictures::insert(animal, filename, source_url, &saved_at);
    let result = sqlx::query(&sql).execute(pool).await?;

    Ok(PictureRecord {
        id: result.last_insert_rowid(),
        animal: animal.to_string(),
        filename: filename.to_string(),
        source_url: source_url.to_string(),
        saved_at,
    })
}

/// Fetch the most recent picture for an animal, or None when no row matches
/// Ties on saved_at are broken by the highest id
pub async fn most_recent_picture(
    pool: &SqlitePool,
    animal: &str,
) -> Result<Option<PictureRecord>, sqlx::Error> {
    let sql = pictures::select_most_recent(animal);
    let row = sqlx::query(&sql).fetch_optional(pool).await?;

    Ok(row.map(|row| PictureRecord {
        id: row.get(0),
        animal: row.get(1),
        filename: row.get(2),
        source_url: row.get(3),
        saved_at: row.get(4),
    }))
}

/// Total number of picture rows (used by tests to verify persistence)
pub async fn count_pictures(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let sql = pictures::select_count();
    sqlx::query_scalar(&sql).fetch_one(pool).await
}

/// Create a file-backed pool in a temporary directory for testing
/// The returned guard keeps the directory alive for the pool's lifetime
pub async fn create_test_connection_in_temporary_file(
) -> Result<(SqlitePool, tempfile::TempDir), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let pool = open_database_pool(&dir.path().join("test.sqlite")).await?;
    Ok((pool, dir))
}
