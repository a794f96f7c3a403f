use serde::Deserialize;
use std::path::{Path, PathBuf};

fn default_api_port() -> u16 {
    3000
}

fn default_database_path() -> PathBuf {
    PathBuf::from("data/pictures.sqlite")
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("data/images")
}

/// Service configuration file structure
///
/// Both paths are injectable so tests can point the service at temporary
/// directories instead of the defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// SQLite database file path (default: data/pictures.sqlite)
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Directory where downloaded images are stored (default: data/images)
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
    /// API server port (default: 3000)
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            images_dir: default_images_dir(),
            api_port: default_api_port(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServiceConfig = toml::from_str(&contents)?;
        Ok(config)
    }
}
