use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Formats tried in order when picking which files to fetch.
pub const FORMAT_PREFERENCE: [FormatType; 3] = [FormatType::Obj, FormatType::Gltf2, FormatType::Gltf];

/// Asset entry returned by the catalog for `GET {endpoint}/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RemoteAsset {
    /// Catalog resource name, e.g. `assets/abc123`
    pub name: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    pub formats: Vec<AssetFormat>,
}

/// One downloadable representation of an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssetFormat {
    pub format_type: FormatType,
    /// The main file: geometry for OBJ, the scene file for glTF
    pub root: AssetFile,
    /// Files the root refers to (materials, textures, buffers)
    #[serde(default)]
    pub resources: Vec<AssetFile>,
}

/// A single remote file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AssetFile {
    pub relative_path: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatType {
    #[serde(rename = "OBJ")]
    Obj,
    #[serde(rename = "GLTF2")]
    Gltf2,
    #[serde(rename = "GLTF")]
    Gltf,
    #[serde(rename = "FBX")]
    Fbx,
    #[serde(rename = "TILT")]
    Tilt,
    #[serde(untagged)]
    Other(String),
}

/// Role a file is declared to play by the catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileRole {
    Object,
    Material,
    Texture,
    Other,
}

/// A parsed remote URL together with its declared role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    pub url: Url,
    pub role: FileRole,
}

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tga", "gif"];

impl AssetFile {
    /// Declared role of a resource file (the format root is always `Object`).
    pub fn resource_role(&self) -> FileRole {
        let ext = self
            .relative_path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if ext == "mtl" {
            FileRole::Material
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str())
            || self.content_type.as_deref().is_some_and(|ct| ct.starts_with("image/"))
        {
            FileRole::Texture
        } else {
            FileRole::Other
        }
    }

    fn parse_url(&self) -> Result<Url, CatalogError> {
        Url::parse(&self.url).map_err(|e| {
            CatalogError::MalformedResponse(format!("bad file url '{}': {}", self.url, e))
        })
    }
}

impl RemoteAsset {
    /// The first format in [`FORMAT_PREFERENCE`] this asset offers.
    pub fn preferred_format(&self) -> Option<&AssetFormat> {
        FORMAT_PREFERENCE
            .iter()
            .find_map(|wanted| self.formats.iter().find(|f| &f.format_type == wanted))
    }

    /// Every file of the preferred format with its declared role, root first.
    pub fn file_references(&self) -> Result<Vec<FileReference>, CatalogError> {
        let format = self.preferred_format().ok_or_else(|| {
            CatalogError::MalformedResponse(format!("asset '{}' has no loadable format", self.name))
        })?;

        let mut files = Vec::with_capacity(format.resources.len() + 1);
        files.push(FileReference {
            url: format.root.parse_url()?,
            role: FileRole::Object,
        });
        for resource in &format.resources {
            files.push(FileReference {
                url: resource.parse_url()?,
                role: resource.resource_role(),
            });
        }
        Ok(files)
    }

    /// URLs to download for this asset.
    pub fn download_urls(&self) -> Result<Vec<Url>, CatalogError> {
        Ok(self.file_references()?.into_iter().map(|f| f.url).collect())
    }
}

/// Decode a catalog response body. Missing, mistyped, or unexpected fields
/// all fail with `MalformedResponse`.
pub fn decode_asset(bytes: &[u8]) -> Result<RemoteAsset, CatalogError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAIR_JSON: &str = r#"{
        "name": "assets/abc123",
        "displayName": "Chair",
        "authorName": "Pixygon",
        "license": "CREATIVE_COMMONS_BY",
        "formats": [
            {
                "formatType": "FBX",
                "root": { "relativePath": "chair.fbx", "url": "https://cdn.example.com/abc123/chair.fbx" }
            },
            {
                "formatType": "OBJ",
                "root": { "relativePath": "chair.obj", "url": "https://cdn.example.com/abc123/chair.obj", "contentType": "text/plain" },
                "resources": [
                    { "relativePath": "chair.mtl", "url": "https://cdn.example.com/abc123/chair.mtl", "contentType": "text/plain" },
                    { "relativePath": "wood.png", "url": "https://cdn.example.com/abc123/wood.png", "contentType": "image/png" }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_decode_picks_obj_format() {
        let asset = decode_asset(CHAIR_JSON.as_bytes()).unwrap();
        assert_eq!(asset.display_name, "Chair");
        assert_eq!(asset.preferred_format().unwrap().format_type, FormatType::Obj);

        let files = asset.file_references().unwrap();
        let roles: Vec<FileRole> = files.iter().map(|f| f.role).collect();
        assert_eq!(roles, vec![FileRole::Object, FileRole::Material, FileRole::Texture]);
        assert_eq!(files[0].url.as_str(), "https://cdn.example.com/abc123/chair.obj");
    }

    #[test]
    fn test_decode_roundtrip() {
        let asset = decode_asset(CHAIR_JSON.as_bytes()).unwrap();
        let encoded = serde_json::to_vec(&asset).unwrap();
        let decoded = decode_asset(&encoded).unwrap();
        assert_eq!(asset, decoded);
    }

    #[test]
    fn test_unknown_format_type_is_kept() {
        let json = r#"{
            "name": "assets/x",
            "displayName": "X",
            "formats": [{ "formatType": "USDZ", "root": { "relativePath": "x.usdz", "url": "https://e.com/x.usdz" } }]
        }"#;
        let asset = decode_asset(json.as_bytes()).unwrap();
        assert_eq!(asset.formats[0].format_type, FormatType::Other("USDZ".into()));
        assert!(matches!(
            asset.download_urls(),
            Err(CatalogError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_truncated_json_is_malformed() {
        let truncated = &CHAIR_JSON[..CHAIR_JSON.len() / 2];
        assert!(matches!(
            decode_asset(truncated.as_bytes()),
            Err(CatalogError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extra_field_is_malformed() {
        let json = r#"{
            "name": "assets/x",
            "displayName": "X",
            "thumbnail": { "url": "https://e.com/t.png" },
            "formats": []
        }"#;
        assert!(matches!(
            decode_asset(json.as_bytes()),
            Err(CatalogError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let json = r#"{ "name": "assets/x", "formats": [] }"#;
        assert!(matches!(
            decode_asset(json.as_bytes()),
            Err(CatalogError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let json = r#"{ "name": "assets/x", "displayName": 7, "formats": [] }"#;
        assert!(matches!(
            decode_asset(json.as_bytes()),
            Err(CatalogError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_bad_file_url_is_malformed() {
        let json = r#"{
            "name": "assets/x",
            "displayName": "X",
            "formats": [{ "formatType": "OBJ", "root": { "relativePath": "x.obj", "url": "not a url" } }]
        }"#;
        let asset = decode_asset(json.as_bytes()).unwrap();
        assert!(matches!(
            asset.download_urls(),
            Err(CatalogError::MalformedResponse(_))
        ));
    }
}
