use std::path::Path;

/// What a stored file is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// 3D geometry that gets placed in the scene
    Object,
    /// `.mtl` material library, resolved by the geometry loader
    Material,
    Unknown,
}

impl Role {
    /// Whether a file with this role is handed to the scene loader.
    pub fn triggers_placement(self) -> bool {
        matches!(self, Role::Object)
    }
}

/// Classify a file by its extension (case-insensitive).
pub fn classify(path: &Path) -> Role {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("obj" | "gltf" | "glb") => Role::Object,
        Some("mtl") => Role::Material,
        _ => Role::Unknown,
    }
}
