use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Library-wide error type for pulpconf operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure outside of artifact writes.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// A parameter or fact failed validation.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Database version string is not a dotted numeric version.
    #[error("Invalid version '{0}': expected dotted numeric components such as 2.6.1")]
    InvalidVersion(String),

    /// An artifact could not be written with the requested content or metadata.
    #[error("Failed to write {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    /// One or more artifacts failed during reconciliation.
    #[error("{failed} of {total} artifact(s) failed to reconcile")]
    Reconcile { failed: usize, total: usize },

    /// Template rendering failed.
    #[error("Failed to render template '{template}': {reason}")]
    Render { template: String, reason: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    YamlParseError(#[from] serde_yaml::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::InvalidParameter { name: name.into(), reason: reason.into() }
    }

    pub fn write_error(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        AppError::Write { path: path.into(), reason: reason.to_string() }
    }

    /// Provide an `io::ErrorKind`-like view for callers mapping to exit statuses.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::InvalidParameter { .. }
            | AppError::InvalidVersion(_)
            | AppError::TomlParseError(_)
            | AppError::YamlParseError(_) => io::ErrorKind::InvalidInput,
            AppError::Write { .. } => io::ErrorKind::PermissionDenied,
            AppError::Reconcile { .. } | AppError::Render { .. } | AppError::Json(_) => {
                io::ErrorKind::Other
            }
        }
    }

    /// Process exit status: 2 for rejected input, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            io::ErrorKind::InvalidInput => 2,
            _ => 1,
        }
    }
}
