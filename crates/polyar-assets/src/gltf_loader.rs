use std::path::Path;

use tracing::debug;

use crate::error::AssetError;
use crate::mesh::{MeshAsset, MeshPrimitive};
use crate::model::ModelContents;
use crate::texture::TextureAsset;

/// Load a glTF 2.0 file (.gltf or .glb) and extract all meshes and textures.
pub fn load_gltf(path: &Path) -> Result<ModelContents, AssetError> {
    let (document, buffers, images) = gltf::import(path)
        .map_err(|e| AssetError::GltfLoadFailed(path.to_path_buf(), e.to_string()))?;

    // Image index -> texture index; unsupported pixel formats map to None.
    let mut textures = Vec::new();
    let mut image_slots = Vec::with_capacity(images.len());
    for image_data in &images {
        let slot = convert_image(image_data).map(|tex| {
            textures.push(tex);
            textures.len() - 1
        });
        image_slots.push(slot);
    }

    let mut meshes = Vec::new();
    for mesh in document.meshes() {
        let name = mesh.name().unwrap_or("unnamed").to_string();

        let mut primitives = Vec::new();
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .map(|iter| iter.collect())
                .unwrap_or_default();

            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|iter| iter.collect())
                .unwrap_or_default();

            let tex_coords: Option<Vec<[f32; 2]>> = reader
                .read_tex_coords(0)
                .map(|tc| tc.into_f32().collect());

            let indices: Option<Vec<u32>> = reader
                .read_indices()
                .map(|idx| idx.into_u32().collect());

            let texture = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_texture()
                .and_then(|info| image_slots.get(info.texture().source().index()).copied().flatten());

            primitives.push(MeshPrimitive {
                positions,
                normals,
                tex_coords,
                indices,
                texture,
            });
        }

        debug!("Loaded mesh '{}' with {} primitives", name, primitives.len());
        meshes.push(MeshAsset { name, primitives });
    }

    debug!(
        "glTF '{}': {} meshes, {} textures",
        path.display(),
        meshes.len(),
        textures.len()
    );

    Ok(ModelContents { meshes, textures })
}

fn convert_image(image_data: &gltf::image::Data) -> Option<TextureAsset> {
    let (width, height) = (image_data.width, image_data.height);
    let data = match image_data.format {
        gltf::image::Format::R8G8B8A8 => image_data.pixels.clone(),
        gltf::image::Format::R8G8B8 => {
            let mut rgba = Vec::with_capacity(image_data.pixels.len() / 3 * 4);
            for chunk in image_data.pixels.chunks(3) {
                rgba.extend_from_slice(chunk);
                rgba.push(255);
            }
            rgba
        }
        other => {
            debug!("Skipping unsupported glTF image format {:?}", other);
            return None;
        }
    };

    Some(TextureAsset {
        width,
        height,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // One triangle, positions only, buffer embedded as a data URI.
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0 }],
        "meshes": [{ "name": "tri", "primitives": [{ "attributes": { "POSITION": 0 } }] }],
        "buffers": [{ "byteLength": 36, "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA" }],
        "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }],
        "accessors": [{
            "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
            "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
        }]
    }"#;

    #[test]
    fn test_load_embedded_triangle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tri.gltf");
        std::fs::write(&path, TRIANGLE_GLTF).unwrap();

        let contents = load_gltf(&path).unwrap();
        assert_eq!(contents.meshes.len(), 1);
        assert_eq!(contents.meshes[0].name, "tri");
        assert_eq!(contents.meshes[0].primitives[0].positions[1], [1.0, 0.0, 0.0]);
        assert!(contents.textures.is_empty());
    }

    #[test]
    fn test_invalid_gltf_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.gltf");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_gltf(&path), Err(AssetError::GltfLoadFailed(..))));
    }
}
