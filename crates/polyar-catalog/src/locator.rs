use std::time::Duration;

use polyar_core::AssetIdentifier;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub const DEFAULT_ENDPOINT: &str = "https://poly.googleapis.com/v1/assets/";

/// Catalog service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL; the identifier is appended as the last path segment
    pub endpoint: String,
    /// Sent as the `key` query parameter when present
    pub api_key: Option<String>,
    /// Connect and per-read timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Builds catalog lookup URLs from asset identifiers.
#[derive(Debug, Clone)]
pub struct AssetLocator {
    endpoint: Url,
    api_key: Option<String>,
}

impl AssetLocator {
    pub fn new(endpoint: Url, api_key: Option<String>) -> Result<Self, CatalogError> {
        if endpoint.cannot_be_a_base() {
            return Err(CatalogError::InvalidEndpoint(endpoint.to_string()));
        }
        Ok(Self { endpoint, api_key })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|_| CatalogError::InvalidEndpoint(config.endpoint.clone()))?;
        Self::new(endpoint, config.api_key.clone())
    }

    /// Catalog URL for `identifier`, with the identifier percent-encoded as
    /// the final path segment.
    pub fn resolve_asset(&self, identifier: &AssetIdentifier) -> Result<Url, CatalogError> {
        let id = identifier.as_str();
        validate_identifier(id)?;

        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::InvalidEndpoint(self.endpoint.to_string()))?
            .pop_if_empty()
            .push(id);

        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }
}

fn validate_identifier(id: &str) -> Result<(), CatalogError> {
    let reason = if id.is_empty() {
        "identifier is empty"
    } else if id == "." || id == ".." {
        "identifier is a relative path segment"
    } else if id.chars().any(char::is_control) {
        // URL parsing strips tab and newlines instead of encoding them.
        "identifier contains control characters"
    } else {
        return Ok(());
    };
    Err(CatalogError::InvalidIdentifier(id.to_string(), reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    fn locator() -> AssetLocator {
        AssetLocator::from_config(&CatalogConfig::default()).unwrap()
    }

    fn last_segment(url: &Url) -> String {
        let raw = url.path_segments().unwrap().last().unwrap();
        percent_decode_str(raw).decode_utf8().unwrap().into_owned()
    }

    #[test]
    fn test_resolve_appends_identifier() {
        let url = locator().resolve_asset(&"1la6FabVzzB".into()).unwrap();
        assert_eq!(url.as_str(), "https://poly.googleapis.com/v1/assets/1la6FabVzzB");
    }

    #[test]
    fn test_resolve_adds_api_key() {
        let config = CatalogConfig {
            api_key: Some("secret".into()),
            ..Default::default()
        };
        let url = AssetLocator::from_config(&config)
            .unwrap()
            .resolve_asset(&"abc123".into())
            .unwrap();
        assert_eq!(url.path(), "/v1/assets/abc123");
        assert_eq!(url.query(), Some("key=secret"));
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let locator = AssetLocator::new(Url::parse("http://127.0.0.1:9000/v1/assets").unwrap(), None).unwrap();
        let url = locator.resolve_asset(&"abc123".into()).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/v1/assets/abc123");
    }

    #[test]
    fn test_reserved_characters_are_encoded_into_one_segment() {
        for id in ["a/b", "x?y#z", "50%", "ünïcödé"] {
            let url = locator().resolve_asset(&id.into()).unwrap();
            assert_eq!(url.path_segments().unwrap().count(), 3, "{id}");
            assert_eq!(last_segment(&url), id);
            assert!(url.query().is_none());
        }
    }

    #[test]
    fn test_spaces_are_percent_encoded() {
        let url = locator().resolve_asset(&"has space".into()).unwrap();
        assert_eq!(url.as_str(), "https://poly.googleapis.com/v1/assets/has%20space");
        assert_eq!(last_segment(&url), "has space");
    }

    #[test]
    fn test_invalid_identifiers_are_rejected() {
        for id in ["", ".", "..", "tab\there", "nl\n", "cr\r", "nul\0"] {
            assert!(
                matches!(
                    locator().resolve_asset(&id.into()),
                    Err(CatalogError::InvalidIdentifier(..))
                ),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_opaque_endpoint_is_rejected() {
        let result = AssetLocator::new(Url::parse("mailto:someone@example.com").unwrap(), None);
        assert!(matches!(result, Err(CatalogError::InvalidEndpoint(_))));
    }
}
