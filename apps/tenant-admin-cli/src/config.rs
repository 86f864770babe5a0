use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use lifecycle_db::LifecycleConfig;
use serde::{Deserialize, Serialize};

/// Effective configuration: defaults, then the YAML file, then `APP__*` env vars.
///
/// ```yaml
/// database:
///   url: "sqlite://tenant-admin.db?mode=rwc"
/// logging:
///   level: debug
/// lifecycle:
///   timestamp_precision: 3
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub lifecycle: LifecycleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_conns: Option<u32>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_owned(),
            max_conns: Some(1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl AppConfig {
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed("APP__").split("__"))
    }

    /// Load the layered configuration.
    ///
    /// # Errors
    /// Returns an error if a layer cannot be read or the merged result does not deserialize.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Ok(Self::figment(path).extract()?)
    }

    /// Apply `-v` flags: one raises the level to `debug`, two or more to `trace`.
    pub fn apply_verbosity(&mut self, verbose: u8) {
        match verbose {
            0 => {}
            1 => self.logging.level = "debug".to_owned(),
            _ => self.logging.level = "trace".to_owned(),
        }
    }
}
