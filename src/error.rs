use thiserror::Error;

/// Errors surfaced by the fetch pipeline and record store.
///
/// Per-image download failures are not represented here - the downloader
/// collapses them to a boolean and the affected iteration is skipped.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested category is not one of cat, dog, or bear
    #[error("unknown animal: {0}")]
    UnsupportedAnimal(String),

    /// A database operation failed
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    /// A filesystem I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
