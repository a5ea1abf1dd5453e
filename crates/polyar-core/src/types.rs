//! Core types used throughout the asset pipeline

use std::f32::consts::TAU;
use std::time::Duration;

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node inserted into the scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set a uniform scale factor on all three axes
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Compute the model matrix for this transform
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Perpetual rotation about a fixed axis.
///
/// `angle` radians are covered every `duration`, repeating forever.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spin {
    /// Rotation axis (normalized)
    pub axis: Vec3,
    /// Radians turned per `duration`
    pub angle: f32,
    /// Time taken to turn `angle`
    pub duration: Duration,
}

impl Spin {
    pub fn new(axis: Vec3, angle: f32, duration: Duration) -> Self {
        Self {
            axis: axis.normalize(),
            angle,
            duration,
        }
    }

    /// Time for one full 360° revolution
    pub fn period(&self) -> Duration {
        if self.angle == 0.0 {
            return Duration::MAX;
        }
        Duration::try_from_secs_f32(self.duration.as_secs_f32() * TAU / self.angle.abs())
            .unwrap_or(Duration::MAX)
    }

    /// Rotation offset after `elapsed` seconds, wrapped into one revolution
    pub fn rotation_at(&self, elapsed: f32) -> Quat {
        let secs = self.duration.as_secs_f32();
        if secs <= 0.0 {
            return Quat::IDENTITY;
        }
        let radians = (elapsed / secs * self.angle).rem_euclid(TAU);
        Quat::from_axis_angle(self.axis, radians)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_transform_matrix() {
        let transform = Transform::from_position(Vec3::new(0.0, -0.2, -0.8)).with_uniform_scale(0.15);
        let matrix = transform.matrix();
        let translation = matrix.col(3).truncate();
        assert_eq!(translation, Vec3::new(0.0, -0.2, -0.8));
        assert!((matrix.col(0).x - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_spin_period_is_full_turn() {
        let spin = Spin::new(Vec3::Y, PI, Duration::from_secs(3));
        assert!((spin.period().as_secs_f32() - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_spin_rotation_wraps_each_period() {
        let spin = Spin::new(Vec3::Y, PI, Duration::from_secs(3));
        let half = spin.rotation_at(3.0) * Vec3::X;
        assert!((half - Vec3::NEG_X).length() < 1e-4);

        let start = spin.rotation_at(0.0) * Vec3::X;
        let next_turn = spin.rotation_at(6.0) * Vec3::X;
        assert!((start - next_turn).length() < 1e-4);
    }

    #[test]
    fn test_spin_keeps_vertical_axis_fixed() {
        let spin = Spin::new(Vec3::Y, PI, Duration::from_secs(3));
        let up = spin.rotation_at(1.7) * Vec3::Y;
        assert!((up - Vec3::Y).length() < 1e-5);
    }
}
