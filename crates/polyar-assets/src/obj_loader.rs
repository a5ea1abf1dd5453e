use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::AssetError;
use crate::mesh::{MeshAsset, MeshPrimitive};
use crate::model::ModelContents;
use crate::texture::{load_texture, TextureAsset};

/// Load a Wavefront OBJ file. `mtllib` references and their diffuse maps
/// are resolved relative to the OBJ file's directory.
///
/// Missing material libraries or unreadable textures are logged and
/// skipped; only the geometry itself has to parse.
pub fn load_obj(path: &Path) -> Result<ModelContents, AssetError> {
    let (models, materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            single_index: true,
            triangulate: true,
            ..Default::default()
        },
    )
    .map_err(|e| AssetError::ObjLoadFailed(path.to_path_buf(), e.to_string()))?;

    let materials = materials.unwrap_or_else(|e| {
        warn!("Materials for '{}' unavailable: {}", path.display(), e);
        Vec::new()
    });

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let (textures, material_textures) = load_material_textures(base_dir, &materials);

    let meshes = models
        .into_iter()
        // An object with no faces draws nothing.
        .filter(|model| !model.mesh.indices.is_empty())
        .map(|model| {
            let mesh = model.mesh;
            let texture = mesh
                .material_id
                .and_then(|id| material_textures.get(id).copied().flatten());

            let tex_coords = (!mesh.texcoords.is_empty())
                .then(|| mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect());

            let primitive = MeshPrimitive {
                positions: mesh.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect(),
                normals: mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]).collect(),
                tex_coords,
                indices: Some(mesh.indices),
                texture,
            };

            MeshAsset {
                name: model.name,
                primitives: vec![primitive],
            }
        })
        .collect::<Vec<_>>();

    debug!(
        "OBJ '{}': {} meshes, {} materials, {} textures",
        path.display(),
        meshes.len(),
        materials.len(),
        textures.len()
    );

    Ok(ModelContents { meshes, textures })
}

/// Load each distinct diffuse map once. Returns the textures and, per
/// material, the index of its texture.
fn load_material_textures(
    base_dir: &Path,
    materials: &[tobj::Material],
) -> (Vec<TextureAsset>, Vec<Option<usize>>) {
    let mut textures = Vec::new();
    let mut by_path: HashMap<PathBuf, Option<usize>> = HashMap::new();

    let slots = materials
        .iter()
        .map(|material| {
            let name = material.diffuse_texture.as_deref()?;
            let tex_path = base_dir.join(name);

            *by_path.entry(tex_path.clone()).or_insert_with(|| {
                match load_texture(&tex_path) {
                    Ok(tex) => {
                        textures.push(tex);
                        Some(textures.len() - 1)
                    }
                    Err(e) => {
                        warn!("Skipping texture for material '{}': {}", material.name, e);
                        None
                    }
                }
            })
        })
        .collect();

    (textures, slots)
}
