//! Apply command - renders everything, then reconciles against a store.

use tracing::info;

use crate::domain::{AppError, ParameterSet};
use crate::ports::ArtifactStore;
use crate::services::{FileReconciler, ReconcileReport};

/// Render the full plan before the first write, then reconcile each artifact.
///
/// Rendering errors abort with nothing written. Write errors are reported
/// per artifact in the returned report.
pub fn execute<S: ArtifactStore>(
    params: &ParameterSet,
    store: &S,
) -> Result<ReconcileReport, AppError> {
    let artifacts = super::render::execute(params)?;
    info!(artifacts = artifacts.len(), "reconciling rendered artifacts");
    Ok(FileReconciler::new(store).reconcile(artifacts))
}
