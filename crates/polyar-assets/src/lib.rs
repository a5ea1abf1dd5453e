//! PolyAR Assets - Local storage and loading of downloaded assets
//!
//! Relocates finished downloads into the storage root, classifies stored
//! files by role, and loads OBJ (with materials and textures) or glTF 2.0
//! models into renderer-agnostic meshes.

mod classify;
mod error;
mod gltf_loader;
mod mesh;
mod model;
mod obj_loader;
mod store;
mod texture;

pub use classify::{classify, Role};
pub use error::{AssetError, StoreError};
pub use gltf_loader::load_gltf;
pub use mesh::{MeshAsset, MeshPrimitive};
pub use model::{load_model, ModelContents};
pub use obj_loader::load_obj;
pub use store::{AssetStore, StoredAsset};
pub use texture::{load_texture, TextureAsset};
