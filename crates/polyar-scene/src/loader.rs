use std::path::Path;
use std::sync::Arc;

use polyar_assets::load_model;
use tracing::info;

use crate::error::SceneError;
use crate::graph::SceneInsert;
use crate::node::{Presentation, SceneObject};

/// Loads object files and hands them to the scene with the fixed
/// presentation transform.
#[derive(Clone)]
pub struct SceneLoader {
    scene: Arc<dyn SceneInsert>,
    presentation: Presentation,
}

impl SceneLoader {
    pub fn new(scene: Arc<dyn SceneInsert>, presentation: Presentation) -> Self {
        Self {
            scene,
            presentation,
        }
    }

    /// Load the model at `path` with its textures and insert it.
    /// Nothing is inserted unless the whole load succeeds.
    pub fn place_in_scene(&self, path: &Path) -> Result<(), SceneError> {
        let object = self.build_object(path)?;
        let (meshes, vertices) = (object.meshes.len(), object.vertex_count());
        self.scene.insert(object)?;
        info!(
            "Placed '{}' ({} meshes, {} vertices)",
            path.display(),
            meshes,
            vertices
        );
        Ok(())
    }

    fn build_object(&self, path: &Path) -> Result<SceneObject, SceneError> {
        let load_failed = |reason: String| SceneError::LoadFailed {
            path: path.to_path_buf(),
            reason,
        };

        let contents = load_model(path).map_err(|e| load_failed(e.to_string()))?;
        if contents.meshes.is_empty() {
            return Err(load_failed("model contains no scene objects".into()));
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("asset")
            .to_string();

        Ok(SceneObject {
            name,
            meshes: contents.meshes,
            textures: contents.textures,
            transform: self.presentation.transform(),
            spin: Some(self.presentation.spin),
        })
    }
}
