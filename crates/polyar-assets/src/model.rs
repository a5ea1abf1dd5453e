use std::path::Path;

use crate::error::AssetError;
use crate::mesh::MeshAsset;
use crate::texture::TextureAsset;
use crate::{gltf_loader, obj_loader};

/// Everything loaded from one model file.
#[derive(Debug, Clone, Default)]
pub struct ModelContents {
    pub meshes: Vec<MeshAsset>,
    pub textures: Vec<TextureAsset>,
}

/// Load an OBJ (with its materials and textures) or a glTF 2.0 file,
/// chosen by extension.
pub fn load_model(path: &Path) -> Result<ModelContents, AssetError> {
    if !path.exists() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("obj") => obj_loader::load_obj(path),
        Some("gltf" | "glb") => gltf_loader::load_gltf(path),
        _ => Err(AssetError::UnsupportedFormat(path.to_path_buf())),
    }
}
