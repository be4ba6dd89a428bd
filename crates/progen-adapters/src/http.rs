//! HTTP downloader backed by a blocking `reqwest` client.

use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

use progen_core::{
    application::{ApplicationError, ports::Downloader, ports::ProbeOutcome},
    error::{Context, ProgenError, ProgenResult},
};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!("progen/", env!("CARGO_PKG_VERSION"));

/// Production [`Downloader`]. Each request is bounded by the client timeout.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// `timeout` of `None` waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> ProgenResult<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

impl Downloader for HttpDownloader {
    #[instrument(skip(self, dest), fields(dest = %dest.display()))]
    fn download(&self, url: &str, dest: &Path) -> ProgenResult<()> {
        let failed = |reason: String| -> ProgenError {
            ApplicationError::DownloadFailed {
                url: url.to_string(),
                reason,
            }
            .into()
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| failed(e.to_string()))?;

        let mut file = File::create(dest).map_err(|e| ProgenError::from(
            ApplicationError::FilesystemError {
                path: dest.to_path_buf(),
                reason: format!("Failed to create file: {e}"),
            },
        ))?;

        if let Err(e) = response.copy_to(&mut file) {
            drop(file);
            // A partial file would count as cached next time.
            let _ = fs::remove_file(dest);
            return Err(failed(e.to_string()));
        }

        debug!("Downloaded");
        Ok(())
    }

    #[instrument(skip(self))]
    fn probe(&self, url: &str) -> ProgenResult<ProbeOutcome> {
        let response = self.client.head(url).send().map_err(|e| {
            ProgenError::from(ApplicationError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(ProbeOutcome::NotFound),
            s if s.is_success() || s.is_redirection() => Ok(ProbeOutcome::Reachable),
            s => Err(ApplicationError::DownloadFailed {
                url: url.to_string(),
                reason: format!("HTTP {s}"),
            }
            .into()),
        }
    }
}
