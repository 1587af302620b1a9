//! Declared parameters and host facts.
//!
//! `ParameterInput` is the unvalidated shape read from parameter files and
//! CLI flags. `ParameterSet::from_input` is the single validation point; every
//! later stage works from a `ParameterSet` and never re-checks its invariants.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{AppError, Plugin, Version};

/// Exchange name Pulp publishes task status events to.
pub const TOPIC_EXCHANGE: &str = "amq.topic";

pub const DEFAULT_DB_NAME: &str = "pulp_database";
pub const DEFAULT_DB_SEEDS: &str = "localhost:27017";
pub const DEFAULT_LOGIN: &str = "admin";
pub const DEFAULT_MESSAGING_URL: &str = "tcp://localhost:5672";
pub const DEFAULT_MESSAGING_TRANSPORT: &str = "qpid";
pub const DEFAULT_BROKER_URL: &str = "qpid://localhost/";

/// Raw parameter file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterInput {
    pub show_conf_diff: bool,
    pub facts: FactsInput,
    pub database: DatabaseInput,
    pub proxy: ProxyInput,
    pub plugins: PluginToggles,
    pub server: ServerInput,
    pub messaging: MessagingInput,
    pub tasks: TasksInput,
    pub workers: WorkersInput,
}

/// Host facts supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FactsInput {
    pub processor_count: Option<i64>,
    pub mongodb_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseInput {
    pub name: Option<String>,
    pub seeds: Option<String>,
    pub ssl: bool,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyInput {
    pub url: Option<String>,
    pub port: Option<i64>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Optional plugin toggles. `iso` is always enabled and has no toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginToggles {
    pub rpm: bool,
    pub puppet: bool,
    pub docker: bool,
    pub ostree: bool,
}

impl PluginToggles {
    pub fn enable(&mut self, plugin: Plugin) {
        match plugin {
            Plugin::Iso => {}
            Plugin::Rpm => self.rpm = true,
            Plugin::Puppet => self.puppet = true,
            Plugin::Docker => self.docker = true,
            Plugin::Ostree => self.ostree = true,
        }
    }

    pub fn is_enabled(&self, plugin: Plugin) -> bool {
        match plugin {
            Plugin::Iso => true,
            Plugin::Rpm => self.rpm,
            Plugin::Puppet => self.puppet,
            Plugin::Docker => self.docker,
            Plugin::Ostree => self.ostree,
        }
    }

    /// Enabled plugins in canonical order, `iso` included.
    pub fn enabled(&self) -> BTreeSet<Plugin> {
        Plugin::ALL.into_iter().filter(|plugin| self.is_enabled(*plugin)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerInput {
    pub server_name: Option<String>,
    pub default_login: Option<String>,
    pub default_password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessagingInput {
    pub url: Option<String>,
    pub transport: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TasksInput {
    pub broker_url: Option<String>,
    pub celery_require_ssl: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkersInput {
    pub max_tasks_per_child: Option<i64>,
}

/// Database credentials; only ever both present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbCredentials {
    pub username: String,
    pub password: String,
}

/// Proxy settings, anchored on the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub url: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub name: String,
    pub seeds: String,
    pub ssl: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub server_name: Option<String>,
    pub default_login: String,
    pub default_password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagingSettings {
    pub url: String,
    pub transport: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TasksSettings {
    pub broker_url: String,
    pub celery_require_ssl: bool,
}

/// Validated, immutable view of all parameters and facts for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    pub processor_count: i64,
    pub database_version: Option<String>,
    pub db_credentials: Option<DbCredentials>,
    pub database: DatabaseSettings,
    pub proxy: Option<ProxySettings>,
    pub show_conf_diff: bool,
    pub enabled_plugins: BTreeSet<Plugin>,
    pub server: ServerSettings,
    pub messaging: MessagingSettings,
    pub tasks: TasksSettings,
    pub max_tasks_per_child: Option<u32>,
}

impl ParameterSet {
    /// Validate raw input into a `ParameterSet`.
    ///
    /// Fails with `InvalidParameter` or `InvalidVersion`; nothing is rendered
    /// or written when this fails.
    pub fn from_input(input: &ParameterInput) -> Result<Self, AppError> {
        let processor_count = input.facts.processor_count.ok_or_else(|| {
            AppError::invalid_parameter("facts.processor_count", "fact is required")
        })?;
        if processor_count < 1 {
            return Err(AppError::invalid_parameter(
                "facts.processor_count",
                format!("must be at least 1, got {}", processor_count),
            ));
        }

        let database_version = non_empty("facts.mongodb_version", &input.facts.mongodb_version)?;
        if let Some(version) = &database_version {
            Version::parse(version)?;
        }

        let db_credentials = validate_credentials(&input.database)?;
        let proxy = validate_proxy(&input.proxy)?;

        let max_tasks_per_child = match input.workers.max_tasks_per_child {
            None => None,
            Some(value) if value >= 1 => Some(u32::try_from(value).map_err(|_| {
                AppError::invalid_parameter("workers.max_tasks_per_child", "value is too large")
            })?),
            Some(value) => {
                return Err(AppError::invalid_parameter(
                    "workers.max_tasks_per_child",
                    format!("must be at least 1, got {}", value),
                ));
            }
        };

        Ok(Self {
            processor_count,
            database_version,
            db_credentials,
            database: DatabaseSettings {
                name: or_default("database.name", &input.database.name, DEFAULT_DB_NAME)?,
                seeds: or_default("database.seeds", &input.database.seeds, DEFAULT_DB_SEEDS)?,
                ssl: input.database.ssl,
            },
            proxy,
            show_conf_diff: input.show_conf_diff,
            enabled_plugins: input.plugins.enabled(),
            server: ServerSettings {
                server_name: single_line("server.server_name", &input.server.server_name)?,
                default_login: or_default(
                    "server.default_login",
                    &input.server.default_login,
                    DEFAULT_LOGIN,
                )?,
                default_password: single_line(
                    "server.default_password",
                    &input.server.default_password,
                )?,
            },
            messaging: MessagingSettings {
                url: or_default("messaging.url", &input.messaging.url, DEFAULT_MESSAGING_URL)?,
                transport: or_default(
                    "messaging.transport",
                    &input.messaging.transport,
                    DEFAULT_MESSAGING_TRANSPORT,
                )?,
            },
            tasks: TasksSettings {
                broker_url: or_default(
                    "tasks.broker_url",
                    &input.tasks.broker_url,
                    DEFAULT_BROKER_URL,
                )?,
                celery_require_ssl: input.tasks.celery_require_ssl,
            },
            max_tasks_per_child,
        })
    }

    pub fn topic_exchange(&self) -> &'static str {
        TOPIC_EXCHANGE
    }
}

fn validate_credentials(database: &DatabaseInput) -> Result<Option<DbCredentials>, AppError> {
    let username = single_line("database.username", &database.username)?;
    let password = single_line("database.password", &database.password)?;
    match (username, password) {
        (Some(username), Some(password)) => Ok(Some(DbCredentials { username, password })),
        (None, None) => Ok(None),
        (Some(_), None) => Err(AppError::invalid_parameter(
            "database.password",
            "must be set together with database.username",
        )),
        (None, Some(_)) => Err(AppError::invalid_parameter(
            "database.username",
            "must be set together with database.password",
        )),
    }
}

fn validate_proxy(proxy: &ProxyInput) -> Result<Option<ProxySettings>, AppError> {
    let url = non_empty("proxy.url", &proxy.url)?;
    let username = non_empty("proxy.username", &proxy.username)?;
    let password = non_empty("proxy.password", &proxy.password)?;
    let port = match proxy.port {
        None => None,
        Some(port) => Some(
            u16::try_from(port)
                .ok()
                .filter(|port| *port != 0)
                .ok_or_else(|| {
                    AppError::invalid_parameter(
                        "proxy.port",
                        format!("must be between 1 and 65535, got {}", port),
                    )
                })?,
        ),
    };

    let Some(url) = url else {
        if port.is_some() || username.is_some() || password.is_some() {
            return Err(AppError::invalid_parameter(
                "proxy.url",
                "is required when any other proxy setting is given",
            ));
        }
        return Ok(None);
    };

    Ok(Some(ProxySettings { url, port, username, password }))
}

fn non_empty(name: &str, value: &Option<String>) -> Result<Option<String>, AppError> {
    match value {
        Some(value) if value.trim().is_empty() => {
            Err(AppError::invalid_parameter(name, "must not be empty"))
        }
        Some(value) => Ok(Some(value.clone())),
        None => Ok(None),
    }
}

/// Values rendered into line-oriented files must stay on one line.
fn single_line(name: &str, value: &Option<String>) -> Result<Option<String>, AppError> {
    let value = non_empty(name, value)?;
    if let Some(value) = &value
        && value.contains(['\n', '\r'])
    {
        return Err(AppError::invalid_parameter(name, "must not contain line breaks"));
    }
    Ok(value)
}

fn or_default(name: &str, value: &Option<String>, default: &str) -> Result<String, AppError> {
    Ok(single_line(name, value)?.unwrap_or_else(|| default.to_string()))
}
