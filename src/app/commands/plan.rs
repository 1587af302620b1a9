//! Plan command - lists the artifacts a run would manage.

use crate::domain::{ArtifactKind, ParameterSet};
use crate::services::ArtifactPlanner;

/// Planned artifacts in canonical order.
pub fn execute(params: &ParameterSet) -> Vec<ArtifactKind> {
    ArtifactPlanner::plan(&params.enabled_plugins).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParameterInput, Plugin};

    #[test]
    fn plans_enabled_importers() {
        let mut input = ParameterInput::default();
        input.facts.processor_count = Some(1);
        input.plugins.docker = true;
        let params = ParameterSet::from_input(&input).unwrap();

        assert_eq!(
            execute(&params),
            vec![
                ArtifactKind::WorkerDefaults,
                ArtifactKind::ServerConfig,
                ArtifactKind::Importer(Plugin::Iso),
                ArtifactKind::Importer(Plugin::Docker),
            ]
        );
    }
}
