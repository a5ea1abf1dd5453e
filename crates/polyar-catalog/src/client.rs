use reqwest::{Client, Url};
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::locator::CatalogConfig;
use crate::types::{decode_asset, RemoteAsset};

/// API client for catalog lookups
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
}

impl CatalogClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build the shared HTTP client used for lookups and downloads.
    ///
    /// The timeout bounds connecting and each read, not the whole transfer.
    pub fn http_client(config: &CatalogConfig) -> Result<Client, CatalogError> {
        Client::builder()
            .connect_timeout(config.timeout())
            .read_timeout(config.timeout())
            .build()
            .map_err(|e| CatalogError::Network(format!("Failed to create HTTP client: {}", e)))
    }

    /// Fetch and decode the catalog entry at `url`
    pub async fn lookup(&self, url: &Url) -> Result<RemoteAsset, CatalogError> {
        debug!("Catalog lookup: {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let body = check_status(response).await?.bytes().await?;

        let asset = decode_asset(&body)?;
        info!("Catalog entry '{}' ({} formats)", asset.display_name, asset.formats.len());
        Ok(asset)
    }
}

pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::ServerError {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    Ok(response)
}
