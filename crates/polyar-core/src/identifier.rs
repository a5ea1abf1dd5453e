use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque name of a remote asset collection in the catalog.
///
/// Immutable once created. Validation of whether it can be embedded in a
/// request URL happens in the locator, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetIdentifier(String);

impl AssetIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetIdentifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AssetIdentifier {
    fn from(id: String) -> Self {
        Self(id)
    }
}
