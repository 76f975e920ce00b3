use crate::error::ScrapeError;
use log::debug;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

/// Downloads remote files (recipe images) to local paths.
pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self, ScrapeError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; cookidump/0.1)")
            .build()?;

        Ok(Self { client })
    }

    /// Fetch `url` and write the body to `path`, creating parent directories.
    /// Returns the number of bytes written.
    pub async fn download(&self, url: &str, path: &Path) -> Result<usize, ScrapeError> {
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &bytes).await?;

        debug!("Saved {} ({} bytes) to {}", url, bytes.len(), path.display());
        Ok(bytes.len())
    }
}
