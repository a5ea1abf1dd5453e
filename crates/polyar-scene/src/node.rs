//! Scene objects and the fixed presentation applied to placed assets

use std::f32::consts::PI;
use std::time::Duration;

use glam::Vec3;
use polyar_assets::{MeshAsset, TextureAsset};
use polyar_core::{Spin, Transform};

/// Placement applied to every loaded asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    /// Uniform scale factor
    pub scale: f32,
    /// Offset from the viewer's origin (in front of and below)
    pub offset: Vec3,
    /// Perpetual rotation
    pub spin: Spin,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            scale: 0.15,
            offset: Vec3::new(0.0, -0.2, -0.8),
            // Half a turn every 3 seconds about the vertical axis.
            spin: Spin::new(Vec3::Y, PI, Duration::from_secs(3)),
        }
    }
}

impl Presentation {
    pub fn transform(&self) -> Transform {
        Transform::from_position(self.offset).with_uniform_scale(self.scale)
    }
}

/// A renderable node built from a loaded asset, ready to be handed to the
/// scene. The scene takes ownership on insertion.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub meshes: Vec<MeshAsset>,
    pub textures: Vec<TextureAsset>,
    pub transform: Transform,
    pub spin: Option<Spin>,
}

impl SceneObject {
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(MeshAsset::vertex_count).sum()
    }
}
