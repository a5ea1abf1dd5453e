//! Tracking session configuration handed to the rendering engine

use serde::{Deserialize, Serialize};
use tracing::info;

/// Which real-world planes the engine should detect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaneDetection {
    None,
    Horizontal,
    Vertical,
    HorizontalAndVertical,
}

/// World-tracking session settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub plane_detection: PlaneDetection,
    /// Estimate real-world lighting and apply it to placed nodes
    pub light_estimation: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            plane_detection: PlaneDetection::Horizontal,
            light_estimation: true,
        }
    }
}

/// Engine-side camera/tracking session.
pub trait TrackingSession {
    fn run(&mut self, config: SessionConfig);

    fn pause(&mut self);

    fn is_running(&self) -> bool;
}

/// Session without a camera; records what it was asked to do.
#[derive(Debug, Default)]
pub struct HeadlessSession {
    config: Option<SessionConfig>,
    running: bool,
}

impl HeadlessSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration of the most recent `run`
    pub fn config(&self) -> Option<SessionConfig> {
        self.config
    }
}

impl TrackingSession for HeadlessSession {
    fn run(&mut self, config: SessionConfig) {
        info!(
            "Tracking session started (planes: {:?}, light estimation: {})",
            config.plane_detection, config.light_estimation
        );
        self.config = Some(config);
        self.running = true;
    }

    fn pause(&mut self) {
        info!("Tracking session paused");
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
