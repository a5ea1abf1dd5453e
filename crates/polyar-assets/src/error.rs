use std::path::PathBuf;

/// Errors that can occur while storing a downloaded file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no usable file name in destination key '{0}'")]
    InvalidKey(String),

    #[error("failed to remove existing '{path}' (download kept at '{temp_path}'): {source}")]
    DeletionFailed {
        path: PathBuf,
        temp_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move '{temp_path}' to '{path}': {source}")]
    MoveFailed {
        path: PathBuf,
        temp_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error preparing '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),
}

/// Errors that can occur during model loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(PathBuf),

    #[error("unsupported model format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("failed to load OBJ file '{0}': {1}")]
    ObjLoadFailed(PathBuf, String),

    #[error("failed to load glTF file '{0}': {1}")]
    GltfLoadFailed(PathBuf, String),

    #[error("failed to load image '{0}': {1}")]
    ImageLoadFailed(PathBuf, String),
}
