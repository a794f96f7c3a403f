// Library interface for testing

// Declare all modules
pub mod config;
pub mod constants;
pub mod db;
pub mod download;
pub mod error;
pub mod pipeline;
pub mod queries;
pub mod schema;
pub mod serve;
pub mod source;

pub use error::ServiceError;
