/// Timeout for a single image download, in seconds
pub const FETCH_TIMEOUT_SECS: u64 = 10;

/// Number of images fetched per request when count is missing or invalid
pub const DEFAULT_FETCH_COUNT: u32 = 1;

/// Placeholder image dimensions are sampled from this inclusive range (pixels)
pub const MIN_IMAGE_DIMENSION: u32 = 200;
pub const MAX_IMAGE_DIMENSION: u32 = 600;
