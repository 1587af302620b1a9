//! `ArtifactStore` backed by the local filesystem.

use std::fs::{self, Permissions};
use std::io::{self, Write};
use std::os::unix::fs::{MetadataExt, PermissionsExt};
use std::path::{Path, PathBuf};

use nix::unistd::{Gid, Group, Uid, User, chown};
use tempfile::NamedTempFile;

use crate::domain::{AppError, RenderedArtifact};
use crate::ports::{ArtifactStore, FileState};

/// Whether the store applies and compares owner/group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipPolicy {
    Enforce,
    /// For unprivileged staging into a scratch root.
    Ignore,
}

/// Filesystem store rooted at `root`.
///
/// Artifact paths are absolute target paths and are re-anchored under `root`,
/// so `/etc/pulp/server.conf` with root `/tmp/stage` lands at
/// `/tmp/stage/etc/pulp/server.conf`.
#[derive(Debug, Clone)]
pub struct FilesystemStore {
    root: PathBuf,
    ownership: OwnershipPolicy,
}

impl FilesystemStore {
    pub fn new(root: impl Into<PathBuf>, ownership: OwnershipPolicy) -> Self {
        Self { root: root.into(), ownership }
    }

    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        self.root.join(path.strip_prefix("/").unwrap_or(path))
    }

    fn resolve_owner(&self, target: &Path, artifact: &RenderedArtifact) -> Result<Option<(Uid, Gid)>, AppError> {
        if self.ownership == OwnershipPolicy::Ignore {
            return Ok(None);
        }
        let user = User::from_name(&artifact.owner)
            .map_err(|err| AppError::write_error(target, err))?
            .ok_or_else(|| {
                AppError::write_error(target, format!("unknown user '{}'", artifact.owner))
            })?;
        let group = Group::from_name(&artifact.group)
            .map_err(|err| AppError::write_error(target, err))?
            .ok_or_else(|| {
                AppError::write_error(target, format!("unknown group '{}'", artifact.group))
            })?;
        Ok(Some((user.uid, group.gid)))
    }
}

impl ArtifactStore for FilesystemStore {
    fn inspect(&self, path: &Path) -> Result<Option<FileState>, AppError> {
        let target = self.resolve_path(path);
        let metadata = match fs::metadata(&target) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AppError::write_error(&target, err)),
        };
        if !metadata.is_file() {
            return Err(AppError::write_error(&target, "target exists and is not a regular file"));
        }

        let bytes = fs::read(&target).map_err(|err| AppError::write_error(&target, err))?;
        let (owner, group) = match self.ownership {
            OwnershipPolicy::Enforce => (
                Some(user_name(Uid::from_raw(metadata.uid()))),
                Some(group_name(Gid::from_raw(metadata.gid()))),
            ),
            OwnershipPolicy::Ignore => (None, None),
        };

        Ok(Some(FileState {
            content: bytes,
            owner,
            group,
            mode: metadata.mode() & 0o7777,
        }))
    }

    fn write(&self, artifact: &RenderedArtifact) -> Result<(), AppError> {
        let target = self.resolve_path(&artifact.path);
        let parent = target
            .parent()
            .ok_or_else(|| AppError::write_error(&target, "target has no parent directory"))?;
        if !parent.is_dir() {
            return Err(AppError::write_error(
                &target,
                format!("parent directory {} is missing or inaccessible", parent.display()),
            ));
        }

        let ownership = self.resolve_owner(&target, artifact)?;

        // Stage next to the target so the final rename stays on one filesystem.
        let mut staged =
            NamedTempFile::new_in(parent).map_err(|err| AppError::write_error(&target, err))?;
        staged
            .write_all(artifact.content.as_bytes())
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|err| AppError::write_error(&target, err))?;
        fs::set_permissions(staged.path(), Permissions::from_mode(artifact.mode))
            .map_err(|err| AppError::write_error(&target, err))?;
        if let Some((uid, gid)) = ownership {
            chown(staged.path(), Some(uid), Some(gid)).map_err(|err| {
                AppError::write_error(
                    &target,
                    format!("cannot set owner {}:{}: {}", artifact.owner, artifact.group, err),
                )
            })?;
        }

        staged.persist(&target).map_err(|err| AppError::write_error(&target, err.error))?;
        Ok(())
    }
}

fn user_name(uid: Uid) -> String {
    match User::from_uid(uid) {
        Ok(Some(user)) => user.name,
        _ => uid.to_string(),
    }
}

fn group_name(gid: Gid) -> String {
    match Group::from_gid(gid) {
        Ok(Some(group)) => group.name,
        _ => gid.to_string(),
    }
}
