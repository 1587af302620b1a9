use std::collections::BTreeSet;

use crate::domain::{ArtifactKind, Plugin};

/// Decides which artifacts must exist for a set of enabled plugins.
pub struct ArtifactPlanner;

impl ArtifactPlanner {
    /// Worker defaults, server config and the `iso` importer are always planned.
    /// Each enabled optional plugin adds its importer. Iteration follows the
    /// derived `Ord` on `ArtifactKind`.
    pub fn plan(enabled_plugins: &BTreeSet<Plugin>) -> BTreeSet<ArtifactKind> {
        let mut planned = BTreeSet::from([
            ArtifactKind::WorkerDefaults,
            ArtifactKind::ServerConfig,
            ArtifactKind::Importer(Plugin::Iso),
        ]);
        planned.extend(
            Plugin::OPTIONAL
                .into_iter()
                .filter(|plugin| enabled_plugins.contains(plugin))
                .map(ArtifactKind::Importer),
        );
        planned
    }
}
