//! Write primitive for rendered artifacts.
//!
//! The reconciler decides *whether* to write; a store only knows how to
//! observe current file state and how to replace it.

use std::path::Path;

use crate::domain::{AppError, RenderedArtifact};

/// Observed state of a file on the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileState {
    /// Raw bytes on the target; never decoded before comparison.
    pub content: Vec<u8>,
    /// `None` when the store does not track ownership.
    pub owner: Option<String>,
    /// `None` when the store does not track ownership.
    pub group: Option<String>,
    pub mode: u32,
}

impl FileState {
    /// Whether this state already satisfies the artifact.
    pub fn matches(&self, artifact: &RenderedArtifact) -> bool {
        self.content == artifact.content.as_bytes()
            && self.mode == artifact.mode
            && self.owner.as_deref().is_none_or(|owner| owner == artifact.owner)
            && self.group.as_deref().is_none_or(|group| group == artifact.group)
    }
}

/// Port for reading and replacing artifact files.
pub trait ArtifactStore {
    /// Current state at `path`, or `None` if no file exists there.
    fn inspect(&self, path: &Path) -> Result<Option<FileState>, AppError>;

    /// Replace the file at `artifact.path` with the artifact's content and metadata.
    ///
    /// Must fail with `AppError::Write` without leaving a partially written file.
    fn write(&self, artifact: &RenderedArtifact) -> Result<(), AppError>;
}
