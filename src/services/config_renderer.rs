//! Content rendering for each artifact kind.
//!
//! Text artifacts come from templates embedded under `src/assets/templates`;
//! importer artifacts are serialized JSON objects.

use std::collections::BTreeSet;

use include_dir::{Dir, include_dir};
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

use crate::domain::{AppError, ArtifactKind, ParameterSet, RenderedArtifact};

use super::{CapabilityGate, ConcurrencyResolver};

static TEMPLATES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/templates");

const WORKER_DEFAULTS_TEMPLATE: &str = "pulp_workers.j2";
const SERVER_CONFIG_TEMPLATE: &str = "server.conf.j2";

/// Produces the content of every artifact kind from a `ParameterSet`.
pub struct ConfigRenderer {
    env: Environment<'static>,
}

#[derive(Serialize)]
struct WorkerDefaultsContext {
    concurrency: u32,
    max_tasks_per_child: Option<u32>,
}

#[derive(Serialize)]
struct ServerConfigContext<'a> {
    database: DatabaseContext<'a>,
    auth: Option<AuthContext<'a>>,
    server: ServerContext<'a>,
    messaging: MessagingContext<'a>,
    tasks: TasksContext<'a>,
    topic_exchange: &'a str,
}

#[derive(Serialize)]
struct DatabaseContext<'a> {
    name: &'a str,
    seeds: &'a str,
    ssl: bool,
}

#[derive(Serialize)]
struct AuthContext<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct ServerContext<'a> {
    server_name: Option<&'a str>,
    default_login: &'a str,
    default_password: Option<&'a str>,
}

#[derive(Serialize)]
struct MessagingContext<'a> {
    url: &'a str,
    transport: &'a str,
}

#[derive(Serialize)]
struct TasksContext<'a> {
    broker_url: &'a str,
    celery_require_ssl: bool,
}

/// Importer configuration; absent proxy settings are omitted, never null.
#[derive(Serialize)]
struct ImporterConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy_host: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy_username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy_password: Option<&'a str>,
}

impl ConfigRenderer {
    pub fn new() -> Result<Self, AppError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        for file in TEMPLATES_DIR.files() {
            let name = file.path().to_str().ok_or_else(|| {
                AppError::config_error(format!("Template path {:?} is not UTF-8", file.path()))
            })?;
            let source = file
                .contents_utf8()
                .ok_or_else(|| AppError::config_error(format!("Template {} is not UTF-8", name)))?;
            env.add_template(name, source).map_err(|err| template_error(name, err))?;
        }

        Ok(Self { env })
    }

    /// Render every planned artifact. Nothing is returned unless all succeed.
    pub fn render_all(
        &self,
        plan: &BTreeSet<ArtifactKind>,
        params: &ParameterSet,
    ) -> Result<Vec<RenderedArtifact>, AppError> {
        plan.iter().map(|kind| self.render(*kind, params)).collect()
    }

    pub fn render(
        &self,
        kind: ArtifactKind,
        params: &ParameterSet,
    ) -> Result<RenderedArtifact, AppError> {
        let content = match kind {
            ArtifactKind::WorkerDefaults => self.worker_defaults(params)?,
            ArtifactKind::ServerConfig => self.server_config(params)?,
            ArtifactKind::Importer(_) => importer_config(params)?,
        };
        Ok(RenderedArtifact::for_kind(kind, content, params.show_conf_diff))
    }

    fn worker_defaults(&self, params: &ParameterSet) -> Result<String, AppError> {
        let context = WorkerDefaultsContext {
            concurrency: ConcurrencyResolver::resolve(params.processor_count)?,
            max_tasks_per_child: params.max_tasks_per_child,
        };
        self.render_template(WORKER_DEFAULTS_TEMPLATE, &context)
    }

    fn server_config(&self, params: &ParameterSet) -> Result<String, AppError> {
        let auth = if CapabilityGate::auth_allowed(params.database_version.as_deref())? {
            params.db_credentials.as_ref().map(|credentials| AuthContext {
                username: &credentials.username,
                password: &credentials.password,
            })
        } else {
            None
        };

        let context = ServerConfigContext {
            database: DatabaseContext {
                name: &params.database.name,
                seeds: &params.database.seeds,
                ssl: params.database.ssl,
            },
            auth,
            server: ServerContext {
                server_name: params.server.server_name.as_deref(),
                default_login: &params.server.default_login,
                default_password: params.server.default_password.as_deref(),
            },
            messaging: MessagingContext {
                url: &params.messaging.url,
                transport: &params.messaging.transport,
            },
            tasks: TasksContext {
                broker_url: &params.tasks.broker_url,
                celery_require_ssl: params.tasks.celery_require_ssl,
            },
            topic_exchange: params.topic_exchange(),
        };
        self.render_template(SERVER_CONFIG_TEMPLATE, &context)
    }

    fn render_template<S: Serialize>(&self, name: &str, context: &S) -> Result<String, AppError> {
        let template = self.env.get_template(name).map_err(|err| template_error(name, err))?;
        template.render(context).map_err(|err| template_error(name, err))
    }
}

fn importer_config(params: &ParameterSet) -> Result<String, AppError> {
    let proxy = params.proxy.as_ref();
    let config = ImporterConfig {
        proxy_host: proxy.map(|proxy| proxy.url.as_str()),
        proxy_port: proxy.and_then(|proxy| proxy.port),
        proxy_username: proxy.and_then(|proxy| proxy.username.as_deref()),
        proxy_password: proxy.and_then(|proxy| proxy.password.as_deref()),
    };
    let mut content = serde_json::to_string_pretty(&config)?;
    content.push('\n');
    Ok(content)
}

fn template_error(template_name: &str, err: impl std::fmt::Display) -> AppError {
    AppError::Render { template: template_name.to_string(), reason: err.to_string() }
}
