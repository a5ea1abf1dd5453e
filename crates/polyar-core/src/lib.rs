//! PolyAR Core - Core types shared by the asset pipeline
//!
//! This crate provides the foundational types used throughout the pipeline:
//! - Mathematical primitives (re-exported from glam)
//! - The opaque asset identifier supplied at startup
//! - Transform and spin animation for placed scene nodes

pub mod identifier;
pub mod types;

pub use glam::{Mat4, Quat, Vec3};
pub use identifier::AssetIdentifier;
pub use types::{NodeId, Spin, Transform};
