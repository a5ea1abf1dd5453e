use std::path::{Path, PathBuf};
use std::pin::pin;

use futures::stream::{FuturesUnordered, Stream, StreamExt};
use percent_encoding::percent_decode_str;
use reqwest::{Client, Url};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::check_status;
use crate::error::CatalogError;

/// A finished download waiting to be relocated.
///
/// `temp_path` lives in the fetcher's staging directory until something
/// moves it; nothing deletes it automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub url: Url,
    /// Name the file is stored under
    pub key: String,
    pub temp_path: PathBuf,
    pub bytes: u64,
}

impl DownloadTask {
    pub fn destination_key(&self) -> &str {
        &self.key
    }
}

/// The remote file name: the URL's last path segment, percent-decoded.
/// Segments that do not decode to UTF-8 are rejected rather than
/// replaced, so two different names never collapse into one.
pub fn destination_key(url: &Url) -> Result<String, CatalogError> {
    let raw = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    percent_decode_str(raw)
        .decode_utf8()
        .map(|key| key.into_owned())
        .map_err(|_| CatalogError::InvalidFileName(url.to_string()))
}

/// Outcome of one URL: the download task, or why it failed.
pub type DownloadOutcome = (Url, Result<DownloadTask, CatalogError>);

/// Receives download results as each one finishes.
pub trait DownloadHandler {
    fn on_download_complete(&mut self, task: DownloadTask);

    fn on_download_failed(&mut self, url: Url, error: CatalogError);
}

/// Issues one concurrent download per URL into a staging directory.
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    client: Client,
    staging_dir: PathBuf,
}

impl AssetFetcher {
    pub fn new(client: Client, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            staging_dir: staging_dir.into(),
        }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Start every download at once. Items arrive in completion order; a
    /// failed URL never cancels the others.
    pub fn fetch_all(&self, urls: Vec<Url>) -> impl Stream<Item = DownloadOutcome> + '_ {
        urls.into_iter()
            .map(|url| async move {
                let result = self.download(&url).await;
                (url, result)
            })
            .collect::<FuturesUnordered<_>>()
    }

    /// Run [`fetch_all`](Self::fetch_all) to completion, handing each
    /// result to `handler` as soon as it is available.
    pub async fn drive<H: DownloadHandler>(&self, urls: Vec<Url>, handler: &mut H) {
        let mut outcomes = pin!(self.fetch_all(urls));
        while let Some((url, result)) = outcomes.next().await {
            match result {
                Ok(task) => handler.on_download_complete(task),
                Err(e) => {
                    warn!("Download of {} failed: {}", url, e);
                    handler.on_download_failed(url, e);
                }
            }
        }
    }

    async fn download(&self, url: &Url) -> Result<DownloadTask, CatalogError> {
        let key = destination_key(url)?;
        let response = self.client.get(url.clone()).send().await?;
        let response = check_status(response).await?;

        tokio::fs::create_dir_all(&self.staging_dir)
            .await
            .map_err(|e| CatalogError::Io(self.staging_dir.clone(), e))?;
        let temp_path = self.staging_dir.join(format!("{}.download", Uuid::new_v4()));

        match write_body(response, &temp_path).await {
            Ok(bytes) => {
                debug!("Downloaded {} ({} bytes) to {}", url, bytes, temp_path.display());
                Ok(DownloadTask {
                    url: url.clone(),
                    key,
                    temp_path,
                    bytes,
                })
            }
            Err(e) => {
                // Partial files are never handed on.
                if let Err(rm) = tokio::fs::remove_file(&temp_path).await {
                    debug!("Could not remove partial download {}: {}", temp_path.display(), rm);
                }
                Err(e)
            }
        }
    }
}

async fn write_body(response: reqwest::Response, path: &Path) -> Result<u64, CatalogError> {
    let io_err = |e| CatalogError::Io(path.to_path_buf(), e);

    let mut file = tokio::fs::File::create(path).await.map_err(io_err)?;
    let mut body = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(io_err)?;
    file.sync_all().await.map_err(io_err)?;
    Ok(written)
}
