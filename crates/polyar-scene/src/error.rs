use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to load '{path}': {reason}")]
    LoadFailed { path: PathBuf, reason: String },

    #[error("rendering engine is no longer accepting scene insertions")]
    EngineUnavailable,
}
