//! Pipeline services: derive, gate, plan, render, reconcile.

pub mod artifact_planner;
pub mod capability_gate;
pub mod concurrency;
pub mod config_renderer;
pub mod content_diff;
pub mod file_reconciler;

pub use artifact_planner::ArtifactPlanner;
pub use capability_gate::CapabilityGate;
pub use concurrency::ConcurrencyResolver;
pub use config_renderer::ConfigRenderer;
pub use file_reconciler::{
    ArtifactOutcome, ArtifactStatus, DiffView, FileReconciler, ReconcileReport,
};
