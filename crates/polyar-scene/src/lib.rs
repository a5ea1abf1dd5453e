//! PolyAR Scene - Placement of loaded assets into the live scene
//!
//! The rendering/tracking engine itself is external. This crate describes
//! the session configuration it is started with, builds scene objects from
//! stored model files, and queues them for insertion on the engine's own
//! update turn. A headless [`Scene`] stands in for the engine's graph.

pub mod error;
pub mod graph;
pub mod loader;
pub mod node;
pub mod session;

pub use error::SceneError;
pub use graph::{scene_channel, Scene, SceneInbox, SceneInsert, SceneNode, SceneQueue};
pub use loader::SceneLoader;
pub use node::{Presentation, SceneObject};
pub use session::{HeadlessSession, PlaneDetection, SessionConfig, TrackingSession};
