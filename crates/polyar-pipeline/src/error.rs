use polyar_assets::StoreError;
use polyar_catalog::CatalogError;
use polyar_scene::SceneError;
use thiserror::Error;

/// Why a pipeline stage aborted. Terminal for the asset or file it
/// concerns, never for the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Deletion failed: {0}")]
    DeletionFailed(String),

    #[error("Move failed: {0}")]
    MoveFailed(String),

    #[error("Load failed: {0}")]
    LoadFailed(String),
}

impl From<CatalogError> for PipelineError {
    fn from(err: CatalogError) -> Self {
        let message = err.to_string();
        match err {
            CatalogError::InvalidIdentifier(..) | CatalogError::InvalidEndpoint(_) => {
                PipelineError::InvalidIdentifier(message)
            }
            CatalogError::MalformedResponse(_) => PipelineError::MalformedResponse(message),
            CatalogError::Network(_)
            | CatalogError::ServerError { .. }
            | CatalogError::Offline
            | CatalogError::Timeout => PipelineError::NetworkError(message),
            // Local disk trouble while staging, or a name that cannot be stored.
            CatalogError::Io(..) | CatalogError::InvalidFileName(_) => {
                PipelineError::MoveFailed(message)
            }
        }
    }
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        match err {
            StoreError::DeletionFailed { .. } => PipelineError::DeletionFailed(message),
            StoreError::InvalidKey(_) | StoreError::MoveFailed { .. } | StoreError::Io(..) => {
                PipelineError::MoveFailed(message)
            }
        }
    }
}

impl From<SceneError> for PipelineError {
    fn from(err: SceneError) -> Self {
        PipelineError::LoadFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_catalog_errors_map_to_taxonomy() {
        let err: PipelineError = CatalogError::ServerError {
            status: 500,
            url: "http://x/abc".into(),
        }
        .into();
        assert!(matches!(err, PipelineError::NetworkError(ref m) if m.contains("500")));

        let err: PipelineError = CatalogError::Offline.into();
        assert!(matches!(err, PipelineError::NetworkError(_)));

        let err: PipelineError = CatalogError::MalformedResponse("eof".into()).into();
        assert!(matches!(err, PipelineError::MalformedResponse(_)));

        let err: PipelineError = CatalogError::InvalidIdentifier("".into(), "identifier is empty").into();
        assert!(matches!(err, PipelineError::InvalidIdentifier(_)));
    }

    #[test]
    fn test_local_staging_failures_are_not_network_errors() {
        let disk_full = std::io::Error::new(std::io::ErrorKind::Other, "no space left on device");
        let err: PipelineError =
            CatalogError::Io(PathBuf::from("/a/.staging/1.download"), disk_full).into();
        assert!(matches!(err, PipelineError::MoveFailed(ref m) if m.contains("1.download")));

        let err: PipelineError = CatalogError::InvalidFileName("https://cdn/%FF.obj".into()).into();
        assert!(matches!(err, PipelineError::MoveFailed(_)));
    }

    #[test]
    fn test_store_errors_map_to_taxonomy() {
        let io = || std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PipelineError = StoreError::DeletionFailed {
            path: PathBuf::from("/a/chair.obj"),
            temp_path: PathBuf::from("/a/.staging/1.download"),
            source: io(),
        }
        .into();
        assert!(matches!(err, PipelineError::DeletionFailed(ref m) if m.contains("chair.obj")));

        let err: PipelineError = StoreError::MoveFailed {
            path: PathBuf::from("/a/chair.obj"),
            temp_path: PathBuf::from("/a/.staging/1.download"),
            source: io(),
        }
        .into();
        assert!(matches!(err, PipelineError::MoveFailed(_)));
    }

    #[test]
    fn test_scene_errors_are_load_failures() {
        let err: PipelineError = SceneError::EngineUnavailable.into();
        assert!(matches!(err, PipelineError::LoadFailed(_)));
    }
}
