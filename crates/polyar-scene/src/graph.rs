//! Headless scene graph and the insertion queue feeding it

use std::sync::mpsc;

use glam::{Mat4, Quat};
use polyar_core::NodeId;
use tracing::debug;

use crate::error::SceneError;
use crate::node::SceneObject;

/// Capability to add an object to the live scene.
///
/// Implementations must not mutate the scene graph from the caller's
/// thread while the engine may be traversing it.
pub trait SceneInsert: Send + Sync {
    fn insert(&self, object: SceneObject) -> Result<(), SceneError>;
}

/// Create a queue whose insertions are applied by the scene on its own
/// update turn.
pub fn scene_channel() -> (SceneQueue, SceneInbox) {
    let (sender, receiver) = mpsc::channel();
    (SceneQueue { sender }, SceneInbox { receiver })
}

/// Sending half: cloneable, usable from any thread.
#[derive(Debug, Clone)]
pub struct SceneQueue {
    sender: mpsc::Sender<SceneObject>,
}

impl SceneInsert for SceneQueue {
    fn insert(&self, object: SceneObject) -> Result<(), SceneError> {
        self.sender
            .send(object)
            .map_err(|_| SceneError::EngineUnavailable)
    }
}

/// Receiving half, owned by whoever drives the scene.
#[derive(Debug)]
pub struct SceneInbox {
    receiver: mpsc::Receiver<SceneObject>,
}

/// A node in the scene
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub object: SceneObject,
    base_rotation: Quat,
    inserted_at: f32,
}

impl SceneNode {
    /// Model matrix for the node's current transform
    pub fn matrix(&self) -> Mat4 {
        self.object.transform.matrix()
    }
}

/// Flat scene graph: every placed asset is a child of the root.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    elapsed: f32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object directly. Only call from the update turn.
    pub fn add_child(&mut self, object: SceneObject) -> NodeId {
        let id = NodeId::new();
        debug!("Scene node {:?} added: '{}'", id.0, object.name);
        self.nodes.push(SceneNode {
            id,
            base_rotation: object.transform.rotation,
            inserted_at: self.elapsed,
            object,
        });
        id
    }

    /// Insert everything queued since the last call.
    pub fn apply_pending(&mut self, inbox: &SceneInbox) -> Vec<NodeId> {
        let mut added = Vec::new();
        while let Ok(object) = inbox.receiver.try_recv() {
            added.push(self.add_child(object));
        }
        added
    }

    /// Advance animations by `delta` seconds.
    pub fn update(&mut self, delta: f32) {
        self.elapsed += delta;
        for node in &mut self.nodes {
            if let Some(spin) = node.object.spin {
                let t = self.elapsed - node.inserted_at;
                node.object.transform.rotation = spin.rotation_at(t) * node.base_rotation;
            }
        }
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Seconds of animation time simulated so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
