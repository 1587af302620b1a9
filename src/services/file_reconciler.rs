//! Idempotent reconciliation of rendered artifacts against a store.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::domain::{AppError, RenderedArtifact};
use crate::ports::ArtifactStore;

use super::content_diff::line_diff;

/// How a content change is exposed to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffView {
    /// Only ownership or mode changed.
    NoContentChange,
    /// Content changed and the artifact allows showing it.
    Visible(String),
    /// Content changed but the artifact carries secrets.
    Suppressed,
}

/// Per-artifact result of a reconciliation pass.
#[derive(Debug)]
pub enum ArtifactStatus {
    Created { diff: DiffView },
    Updated { diff: DiffView },
    Unchanged,
    Failed(AppError),
}

impl ArtifactStatus {
    pub fn is_change(&self) -> bool {
        matches!(self, ArtifactStatus::Created { .. } | ArtifactStatus::Updated { .. })
    }

    pub fn diff(&self) -> Option<&DiffView> {
        match self {
            ArtifactStatus::Created { diff } | ArtifactStatus::Updated { diff } => Some(diff),
            ArtifactStatus::Unchanged | ArtifactStatus::Failed(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct ArtifactOutcome {
    pub path: PathBuf,
    /// SHA-256 of the desired content.
    pub digest: String,
    pub status: ArtifactStatus,
}

/// Aggregate of one reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub outcomes: Vec<ArtifactOutcome>,
}

impl ReconcileReport {
    pub fn changed(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.status.is_change())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.outcomes.iter().filter(|outcome| matches!(outcome.status, ArtifactStatus::Failed(_)))
    }

    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Collapse the report into an error if any artifact failed.
    pub fn into_result(self) -> Result<Self, AppError> {
        let failed = self.failures().count();
        if failed == 0 {
            Ok(self)
        } else {
            Err(AppError::Reconcile { failed, total: self.outcomes.len() })
        }
    }
}

/// Brings on-disk state in line with rendered artifacts, writing only on divergence.
pub struct FileReconciler<'a, S: ArtifactStore> {
    store: &'a S,
}

impl<'a, S: ArtifactStore> FileReconciler<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Reconcile each artifact independently; a failure never stops the rest.
    pub fn reconcile(&self, artifacts: Vec<RenderedArtifact>) -> ReconcileReport {
        let outcomes = artifacts
            .into_iter()
            .map(|artifact| {
                let status = match self.reconcile_one(&artifact) {
                    Ok(status) => status,
                    Err(err) => {
                        warn!(path = %artifact.path.display(), error = %err, "artifact failed");
                        ArtifactStatus::Failed(err)
                    }
                };
                ArtifactOutcome { digest: artifact.content_digest(), path: artifact.path, status }
            })
            .collect();
        ReconcileReport { outcomes }
    }

    fn reconcile_one(&self, artifact: &RenderedArtifact) -> Result<ArtifactStatus, AppError> {
        let current = self.store.inspect(&artifact.path)?;

        if let Some(state) = &current
            && state.matches(artifact)
        {
            debug!(path = %artifact.path.display(), "artifact unchanged");
            return Ok(ArtifactStatus::Unchanged);
        }

        self.store.write(artifact)?;

        let previous_content = current.as_ref().map(|state| state.content.as_slice());
        let diff = diff_view(artifact, previous_content);
        info!(
            path = %artifact.path.display(),
            mode = format_args!("{:04o}", artifact.mode),
            created = current.is_none(),
            "artifact written"
        );

        Ok(match current {
            None => ArtifactStatus::Created { diff },
            Some(_) => ArtifactStatus::Updated { diff },
        })
    }
}

fn diff_view(artifact: &RenderedArtifact, previous: Option<&[u8]>) -> DiffView {
    if previous == Some(artifact.content.as_bytes()) {
        return DiffView::NoContentChange;
    }
    if !artifact.show_diff {
        return DiffView::Suppressed;
    }
    // Lossy decoding is for display only.
    let previous = String::from_utf8_lossy(previous.unwrap_or_default());
    DiffView::Visible(line_diff(&previous, &artifact.content))
}
