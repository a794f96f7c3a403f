use async_trait::async_trait;
use log::warn;
use reqwest::{Client, StatusCode};
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_stream::StreamExt;

use crate::constants::FETCH_TIMEOUT_SECS;

type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Downloads a single image to a local file.
///
/// All failure modes collapse to a boolean so callers can treat a failed
/// download as a skippable event rather than an error. Tests substitute
/// their own implementation to avoid the network.
#[async_trait]
pub trait ImageDownloader: Send + Sync {
    async fn download(&self, url: &str, dest: &Path) -> bool;
}

/// Production downloader backed by reqwest with a bounded per-request timeout
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }

    async fn try_download(&self, url: &str, dest: &Path) -> Result<(), DynError> {
        let response = self.client.get(url).send().await?;
        if response.status() != StatusCode::OK {
            return Err(format!("unexpected status {}", response.status()).into());
        }

        let mut file = File::create(dest).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if !chunk.is_empty() {
                file.write_all(&chunk).await?;
            }
        }
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl ImageDownloader for HttpDownloader {
    async fn download(&self, url: &str, dest: &Path) -> bool {
        match self.try_download(url, dest).await {
            Ok(()) => true,
            Err(e) => {
                warn!("download failed for {}: {}", url, e);
                // Don't leave a partial file behind as a valid asset
                let _ = tokio::fs::remove_file(dest).await;
                false
            }
        }
    }
}
