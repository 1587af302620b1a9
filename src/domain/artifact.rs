//! Artifact kinds and their fixed on-disk targets.

use std::fmt;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use super::Plugin;

pub const WORKER_DEFAULTS_PATH: &str = "/etc/default/pulp_workers";
pub const SERVER_CONFIG_PATH: &str = "/etc/pulp/server.conf";
pub const IMPORTER_CONFIG_DIR: &str = "/etc/pulp/server/plugins.conf.d";

/// One configuration file this crate is responsible for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArtifactKind {
    WorkerDefaults,
    ServerConfig,
    Importer(Plugin),
}

impl ArtifactKind {
    pub fn path(&self) -> PathBuf {
        match self {
            ArtifactKind::WorkerDefaults => PathBuf::from(WORKER_DEFAULTS_PATH),
            ArtifactKind::ServerConfig => PathBuf::from(SERVER_CONFIG_PATH),
            ArtifactKind::Importer(plugin) => {
                PathBuf::from(IMPORTER_CONFIG_DIR).join(plugin.importer_file_name())
            }
        }
    }

    pub fn owner(&self) -> &'static str {
        match self {
            ArtifactKind::ServerConfig => "apache",
            ArtifactKind::WorkerDefaults | ArtifactKind::Importer(_) => "root",
        }
    }

    pub fn group(&self) -> &'static str {
        self.owner()
    }

    pub fn mode(&self) -> u32 {
        match self {
            ArtifactKind::ServerConfig => 0o600,
            ArtifactKind::WorkerDefaults | ArtifactKind::Importer(_) => 0o644,
        }
    }

    /// Whether diffs of this artifact follow the `show_conf_diff` parameter.
    ///
    /// Worker defaults carry no secrets and are always diff-visible.
    pub fn diff_follows_show_conf_diff(&self) -> bool {
        !matches!(self, ArtifactKind::WorkerDefaults)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::WorkerDefaults => f.write_str("worker-defaults"),
            ArtifactKind::ServerConfig => f.write_str("server-config"),
            ArtifactKind::Importer(plugin) => write!(f, "{}-importer", plugin),
        }
    }
}

/// Desired state of a single file, computed fresh on every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub content: String,
    pub owner: String,
    pub group: String,
    pub mode: u32,
    pub show_diff: bool,
}

impl RenderedArtifact {
    /// Build an artifact at the kind's fixed target with its fixed metadata.
    pub fn for_kind(kind: ArtifactKind, content: String, show_conf_diff: bool) -> Self {
        let show_diff = if kind.diff_follows_show_conf_diff() { show_conf_diff } else { true };
        Self {
            kind,
            path: kind.path(),
            content,
            owner: kind.owner().to_string(),
            group: kind.group().to_string(),
            mode: kind.mode(),
            show_diff,
        }
    }

    /// Hex SHA-256 of the desired content.
    pub fn content_digest(&self) -> String {
        format!("{:x}", Sha256::digest(self.content.as_bytes()))
    }
}
