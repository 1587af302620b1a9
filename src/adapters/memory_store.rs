use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{AppError, RenderedArtifact};
use crate::ports::{ArtifactStore, FileState};

/// In-memory artifact store for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactStore {
    // Arc<Mutex> so clones share state
    files: Arc<Mutex<BTreeMap<PathBuf, FileState>>>,
    failing: Arc<Mutex<HashSet<PathBuf>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file as if it already existed on the target.
    pub fn insert(&self, path: &Path, state: FileState) {
        lock(&self.files).insert(path.to_path_buf(), state);
    }

    pub fn get(&self, path: &Path) -> Option<FileState> {
        lock(&self.files).get(path).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        lock(&self.files).keys().cloned().collect()
    }

    /// Make every write to `path` fail with a permission error.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        lock(&self.failing).insert(path.into());
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        *lock(&self.writes)
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn inspect(&self, path: &Path) -> Result<Option<FileState>, AppError> {
        Ok(self.get(path))
    }

    fn write(&self, artifact: &RenderedArtifact) -> Result<(), AppError> {
        if lock(&self.failing).contains(&artifact.path) {
            return Err(AppError::write_error(&artifact.path, "permission denied"));
        }
        self.insert(
            &artifact.path,
            FileState {
                content: artifact.content.as_bytes().to_vec(),
                owner: Some(artifact.owner.clone()),
                group: Some(artifact.group.clone()),
                mode: artifact.mode,
            },
        );
        *lock(&self.writes) += 1;
        Ok(())
    }
}

// A poisoned lock only means another test thread panicked mid-update.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
