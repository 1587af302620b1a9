//! Render command - computes every planned artifact without touching disk.

use crate::domain::{AppError, ParameterSet, RenderedArtifact};
use crate::services::{ArtifactPlanner, ConfigRenderer};

/// Render all planned artifacts. Fails as a whole if any artifact fails.
pub fn execute(params: &ParameterSet) -> Result<Vec<RenderedArtifact>, AppError> {
    let plan = ArtifactPlanner::plan(&params.enabled_plugins);
    let renderer = ConfigRenderer::new()?;
    renderer.render_all(&plan, params)
}
