use clap::Parser;
use std::path::PathBuf;

use fetch_animal_pics::config::ServiceConfig;
use fetch_animal_pics::serve::serve_pictures;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Fetch placeholder animal pictures, save them, and serve them back"
)]
struct Args {
    /// Path to config file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database path (overrides config file)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Directory where downloaded images are stored (overrides config file)
    #[arg(long)]
    images_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(port) = args.port {
        config.api_port = port;
    }
    if let Some(database) = args.database {
        config.database_path = database;
    }
    if let Some(images_dir) = args.images_dir {
        config.images_dir = images_dir;
    }

    serve_pictures(config)
}
