//! Ports: traits at the boundary between pipeline logic and the target system.

mod artifact_store;

pub use artifact_store::{ArtifactStore, FileState};
