//! PolyAR Catalog - Remote asset catalog client
//!
//! Resolves asset identifiers to catalog URLs, decodes catalog entries and
//! downloads the listed files concurrently into a staging directory.

pub mod client;
pub mod error;
pub mod fetch;
pub mod locator;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::CatalogClient;
pub use error::CatalogError;
pub use fetch::{destination_key, AssetFetcher, DownloadHandler, DownloadOutcome, DownloadTask};
pub use locator::{AssetLocator, CatalogConfig, DEFAULT_ENDPOINT};
pub use reqwest::Url;
pub use types::*;
