use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::classify::{classify, Role};
use crate::error::StoreError;

const STAGING_DIR: &str = ".staging";

/// A relocated file and its classified role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAsset {
    pub path: PathBuf,
    pub role: Role,
}

/// Owns the local storage root. Files are named by their remote file name;
/// a newer download of the same name replaces the old file.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Create a new AssetStore rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        info!("AssetStore created with root: {}", root.display());
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where downloads are written before relocation. Same filesystem as the
    /// root so that relocation is a rename.
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    /// Create the root and staging directories if missing.
    pub fn ensure_dirs(&self) -> Result<(), StoreError> {
        let staging = self.staging_dir();
        fs::create_dir_all(&staging).map_err(|e| StoreError::Io(staging, e))
    }

    /// Final location for `key`. Only the key's last path component is used.
    pub fn final_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let name = Path::new(key)
            .file_name()
            .filter(|name| name.to_str() != Some(STAGING_DIR))
            .ok_or_else(|| StoreError::InvalidKey(key.to_string()))?;
        Ok(self.root.join(name))
    }

    /// Move a finished download into place, replacing any previous file of
    /// the same name.
    ///
    /// On failure the temp file is left where it is.
    pub fn relocate(&self, temp_path: &Path, key: &str) -> Result<StoredAsset, StoreError> {
        let path = self.final_path(key)?;
        fs::create_dir_all(&self.root).map_err(|e| StoreError::Io(self.root.clone(), e))?;

        // symlink_metadata so a dangling link still counts as occupying the path
        if fs::symlink_metadata(&path).is_ok() {
            debug!("Removing existing {}", path.display());
            match fs::remove_file(&path) {
                Ok(()) => {}
                // Someone else already removed it.
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(StoreError::DeletionFailed {
                        path,
                        temp_path: temp_path.to_path_buf(),
                        source,
                    })
                }
            }
        }

        fs::rename(temp_path, &path).map_err(|source| StoreError::MoveFailed {
            path: path.clone(),
            temp_path: temp_path.to_path_buf(),
            source,
        })?;

        let role = classify(&path);
        debug!("Stored {} as {:?}", path.display(), role);
        Ok(StoredAsset { path, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn setup() -> (TempDir, AssetStore) {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path().join("assets"));
        store.ensure_dirs().unwrap();
        (dir, store)
    }

    fn stage(store: &AssetStore, name: &str, content: &[u8]) -> PathBuf {
        let path = store.staging_dir().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn stored_files(store: &AssetStore) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(store.root())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_final_path_uses_last_component() {
        let store = AssetStore::new("/data/assets");
        assert_eq!(
            store.final_path("abc123/chair.obj").unwrap(),
            PathBuf::from("/data/assets/chair.obj")
        );
        assert_eq!(
            store.final_path("chair.mtl").unwrap(),
            PathBuf::from("/data/assets/chair.mtl")
        );
    }

    #[test]
    fn test_final_path_rejects_keys_without_a_name() {
        let store = AssetStore::new("/data/assets");
        for key in ["", "..", "/", "a/..", ".staging"] {
            assert!(
                matches!(store.final_path(key), Err(StoreError::InvalidKey(_))),
                "{key:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_relocate_moves_and_classifies() {
        let (_dir, store) = setup();
        let temp = stage(&store, "1.download", b"v 0 0 0\n");

        let stored = store.relocate(&temp, "chair.obj").unwrap();
        assert_eq!(stored.path, store.root().join("chair.obj"));
        assert_eq!(stored.role, Role::Object);
        assert_eq!(fs::read(&stored.path).unwrap(), b"v 0 0 0\n");
        assert!(!temp.exists());
    }

    #[test]
    fn test_relocate_twice_keeps_second_content() {
        let (_dir, store) = setup();

        let first = stage(&store, "1.download", b"first");
        store.relocate(&first, "chair.mtl").unwrap();
        let second = stage(&store, "2.download", b"second");
        let stored = store.relocate(&second, "chair.mtl").unwrap();

        assert_eq!(stored_files(&store), vec!["chair.mtl".to_string()]);
        assert_eq!(fs::read(&stored.path).unwrap(), b"second");
        assert_eq!(fs::read_dir(store.staging_dir()).unwrap().count(), 0);
    }

    #[test]
    fn test_relocate_replaces_dangling_symlink() {
        #[cfg(unix)]
        {
            let (_dir, store) = setup();
            let link = store.root().join("chair.obj");
            std::os::unix::fs::symlink(store.root().join("gone.obj"), &link).unwrap();

            let temp = stage(&store, "1.download", b"o chair\n");
            let stored = store.relocate(&temp, "chair.obj").unwrap();
            assert!(!fs::symlink_metadata(&stored.path).unwrap().file_type().is_symlink());
            assert_eq!(fs::read(&stored.path).unwrap(), b"o chair\n");
        }
    }

    #[test]
    fn test_deletion_failed_keeps_temp_file() {
        let (_dir, store) = setup();
        // A non-empty directory cannot be removed with remove_file.
        let blocker = store.root().join("chair.obj");
        fs::create_dir_all(blocker.join("inner")).unwrap();

        let temp = stage(&store, "1.download", b"v 0 0 0\n");
        let err = store.relocate(&temp, "chair.obj").unwrap_err();

        assert!(matches!(err, StoreError::DeletionFailed { .. }));
        assert!(temp.exists());
        assert!(blocker.is_dir());
    }

    #[test]
    fn test_move_failed_when_temp_missing() {
        let (_dir, store) = setup();
        let missing = store.staging_dir().join("never-written.download");

        let err = store.relocate(&missing, "chair.obj").unwrap_err();
        assert!(matches!(err, StoreError::MoveFailed { .. }));
        assert!(!store.root().join("chair.obj").exists());
    }

    #[test]
    fn test_reader_never_sees_partial_file() {
        const SIZE: usize = 256 * 1024;
        let (_dir, store) = setup();
        let target = store.final_path("chair.obj").unwrap();
        let first = stage(&store, "seed.download", &vec![b'a'; SIZE]);
        store.relocate(&first, "chair.obj").unwrap();

        let done = Arc::new(AtomicBool::new(false));
        let reader = {
            let done = Arc::clone(&done);
            let target = target.clone();
            std::thread::spawn(move || {
                let mut observed = 0;
                while !done.load(Ordering::Acquire) {
                    // Missing is acceptable between delete and rename.
                    if let Ok(bytes) = fs::read(&target) {
                        assert_eq!(bytes.len(), SIZE);
                        assert!(bytes.iter().all(|b| *b == bytes[0]));
                        observed += 1;
                    }
                }
                observed
            })
        };

        for i in 0..50 {
            let fill = if i % 2 == 0 { b'b' } else { b'a' };
            let temp = stage(&store, &format!("{i}.download"), &vec![fill; SIZE]);
            store.relocate(&temp, "chair.obj").unwrap();
        }
        done.store(true, Ordering::Release);

        reader.join().unwrap();
        assert_eq!(fs::read(&target).unwrap().len(), SIZE);
    }
}
