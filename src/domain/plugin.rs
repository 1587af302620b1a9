use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AppError;

/// Pulp content plugins that ship an importer configuration.
///
/// Declaration order is the canonical ordering used for planning and output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plugin {
    Iso,
    Rpm,
    Puppet,
    Docker,
    Ostree,
}

impl Plugin {
    pub const ALL: [Plugin; 5] =
        [Plugin::Iso, Plugin::Rpm, Plugin::Puppet, Plugin::Docker, Plugin::Ostree];

    /// Plugins that must be enabled explicitly.
    pub const OPTIONAL: [Plugin; 4] = [Plugin::Rpm, Plugin::Puppet, Plugin::Docker, Plugin::Ostree];

    pub fn name(&self) -> &'static str {
        match self {
            Plugin::Iso => "iso",
            Plugin::Rpm => "rpm",
            Plugin::Puppet => "puppet",
            Plugin::Docker => "docker",
            Plugin::Ostree => "ostree",
        }
    }

    /// File name of the importer configuration for this plugin.
    pub fn importer_file_name(&self) -> String {
        format!("{}_importer.json", self.name())
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Plugin {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Plugin::ALL.into_iter().find(|plugin| plugin.name() == normalized).ok_or_else(|| {
            AppError::invalid_parameter(
                "plugins",
                format!("unknown plugin '{}': must be one of iso, rpm, puppet, docker, ostree", s),
            )
        })
    }
}
