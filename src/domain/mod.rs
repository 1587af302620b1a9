pub mod artifact;
pub mod error;
pub mod parameters;
pub mod plugin;
pub mod version;

pub use artifact::{
    ArtifactKind, IMPORTER_CONFIG_DIR, RenderedArtifact, SERVER_CONFIG_PATH, WORKER_DEFAULTS_PATH,
};
pub use error::AppError;
pub use parameters::{
    DbCredentials, ParameterInput, ParameterSet, PluginToggles, ProxySettings, TOPIC_EXCHANGE,
};
pub use plugin::Plugin;
pub use version::Version;
