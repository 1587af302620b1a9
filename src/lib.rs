//! pulpconf: Render and reconcile Pulp server configuration files.
//!
//! A run validates declared parameters and host facts into a
//! [`ParameterSet`], plans and renders every artifact, and only then
//! reconciles them against an [`ArtifactStore`].

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;

use app::commands::{apply, plan, render};
use app::config::load_parameters;

pub use app::config::ParameterOverrides;
pub use adapters::{FilesystemStore, MemoryArtifactStore, OwnershipPolicy};
pub use domain::{
    AppError, ArtifactKind, ParameterInput, ParameterSet, Plugin, RenderedArtifact,
};
pub use ports::{ArtifactStore, FileState};
pub use services::{ArtifactOutcome, ArtifactStatus, DiffView, ReconcileReport};

/// Load and validate parameters from an optional file plus overrides.
pub fn load(path: Option<&Path>, overrides: &ParameterOverrides) -> Result<ParameterSet, AppError> {
    let input = load_parameters(path, overrides)?;
    ParameterSet::from_input(&input)
}

/// Artifacts a run would manage, in canonical order.
pub fn plan_artifacts(params: &ParameterSet) -> Vec<ArtifactKind> {
    plan::execute(params)
}

/// Render every planned artifact without writing.
pub fn render_artifacts(params: &ParameterSet) -> Result<Vec<RenderedArtifact>, AppError> {
    render::execute(params)
}

/// Render and reconcile every planned artifact against `store`.
///
/// Callers must inspect the per-artifact outcomes; use
/// [`ReconcileReport::into_result`] to treat any failure as an error.
pub fn apply_artifacts<S: ArtifactStore>(
    params: &ParameterSet,
    store: &S,
) -> Result<ReconcileReport, AppError> {
    apply::execute(params, store)
}
