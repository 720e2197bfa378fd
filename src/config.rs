//! Database-wide options.
//!
//! [`QueryConfig`] carries the defaults a [`Database`](crate::Database) applies
//! to every table it creates. Load it from `config/config.toml` or environment
//! variables with `QueryConfig::load()`:
//!
//! ```toml
//! [schema]
//! create_tables = true
//! alter_tables = false
//! verbose = false
//! ```
//!
//! The same keys can be set through `SCHEMAQUERY__SCHEMA__CREATE_TABLES=true`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
const ENV_PREFIX: &str = "SCHEMAQUERY";

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct QueryConfig {
    /// Issue `CREATE TABLE IF NOT EXISTS` when a table is initialized
    #[serde(default, alias = "createTables")]
    pub create_tables: bool,
    /// Issue per-column `ALTER TABLE` statements when a table is initialized
    #[serde(default, alias = "alterTables")]
    pub alter_tables: bool,
    /// Log every statement and its parameters before execution
    #[serde(default)]
    pub verbose: bool,
}

impl QueryConfig {
    /// Load from `config/config.toml`, falling back to env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(DEFAULT_CONFIG_PATH)
    }

    /// Load the `[schema]` section from `path` (optional) and `SCHEMAQUERY__*` env vars.
    pub fn from_sources(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // The file exists but could not be parsed; env vars alone may still be enough
                if std::path::Path::new(path).exists() {
                    log::warn!("failed to load config file {path}, falling back to env: {err}");
                }
                Config::builder()
                    .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {err}, then env-only error: {env_err}"
                        ))
                    })?
            }
        };

        match settings.get::<QueryConfig>("schema") {
            Ok(cfg) => Ok(cfg),
            // A missing section means "all defaults"
            Err(ConfigError::NotFound(_)) => Ok(QueryConfig::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Schema configuration could not be loaded from file or environment: {e}"
            ))),
        }
    }
}
