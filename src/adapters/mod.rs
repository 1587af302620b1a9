pub mod filesystem_store;
pub mod memory_store;

pub use filesystem_store::{FilesystemStore, OwnershipPolicy};
pub use memory_store::MemoryArtifactStore;
