//! Application configuration
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. a `.env` file in the working directory (never overrides variables
//!    already set in the process environment)
//! 4. environment variables `PALADIN_<SECTION>__<KEY>`, e.g.
//!    `PALADIN_LOG__LEVEL=DEBUG` or `PALADIN_DB__DATABASE=app.db`
//! 5. explicit overrides set on the builder

use crate::errors::{PaladinError, Result};
use crate::logging_facility::{self, LogConfig};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "PALADIN";
pub const ENV_NESTED_DELIMITER: &str = "__";

/// Defaults applied to every HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Request timeout in seconds; 0 disables the timeout
    pub timeout: u64,
    /// Extra attempts after a connection failure
    pub retries: u32,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: 60,
            retries: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    #[default]
    Sqlite,
}

/// Backing store settings (`[db]` section)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub driver: Driver,
    /// Database file, or `:memory:`
    pub database: String,
    /// Maximum pooled connections (forced to 1 for `:memory:`)
    pub pool_size: u32,
    /// Create registered tables on setup
    pub auto_create_tables: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            driver: Driver::Sqlite,
            database: ":memory:".to_string(),
            pool_size: 4,
            auto_create_tables: false,
        }
    }
}

impl DbConfig {
    pub fn is_in_memory(&self) -> bool {
        self.database == ":memory:"
    }
}

/// Base application configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub httpclient: HttpClientConfig,
    pub log: LogConfig,
    pub db: DbConfig,
}

impl AppConfig {
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load from the default sources
    ///
    /// # Errors
    ///
    /// Fails when a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self> {
        Self::builder().build()
    }

    /// Load from the default sources and initialize logging
    ///
    /// # Errors
    ///
    /// Fails like [`AppConfig::load`], or when logging cannot be set up.
    pub fn setup() -> Result<Self> {
        let conf = Self::load()?;
        logging_facility::init_with_config(&conf.log)?;
        Ok(conf)
    }

    fn validate(&self) -> Result<()> {
        if self.db.database.is_empty() {
            return Err(config_error("db.database must not be empty"));
        }
        if self.db.pool_size == 0 {
            return Err(config_error("db.pool_size must be at least 1"));
        }
        self.log.level_directive()?;
        Ok(())
    }
}

/// Builder selecting which configuration sources are read
#[derive(Debug)]
pub struct AppConfigBuilder {
    file: Option<PathBuf>,
    dotenv: bool,
    env: Option<HashMap<String, String>>,
    overrides: Vec<(String, config::Value)>,
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self {
            file: None,
            dotenv: true,
            env: None,
            overrides: Vec::new(),
        }
    }
}

impl AppConfigBuilder {
    /// Read a TOML file; it must exist
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Enable or disable loading `.env`
    pub fn dotenv(mut self, enabled: bool) -> Self {
        self.dotenv = enabled;
        self
    }

    /// Use these variables instead of the process environment
    pub fn env_source(mut self, vars: HashMap<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Override a dotted key, e.g. `("db.auto_create_tables", true)`
    pub fn set_override(mut self, key: impl Into<String>, value: impl Into<config::Value>) -> Self {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// # Errors
    ///
    /// Returns a `Config` error when a source is unreadable or a value does
    /// not deserialize.
    pub fn build(self) -> Result<AppConfig> {
        if self.dotenv && self.env.is_none() {
            dotenvy::dotenv().ok();
        }

        let mut builder = config::Config::builder();
        if let Some(path) = &self.file {
            builder = builder.add_source(
                config::File::from(path.as_path())
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_NESTED_DELIMITER)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("log.custom_extra")
                .source(self.env),
        );
        for (key, value) in self.overrides {
            builder = builder
                .set_override(key, value)
                .map_err(|e| config_error(e.to_string()))?;
        }

        let conf: AppConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| config_error(e.to_string()))?;
        conf.validate()?;
        Ok(conf)
    }
}

fn config_error(message: impl Into<String>) -> crate::errors::ExError {
    PaladinError::Config {
        message: message.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let conf = AppConfig::default();
        assert_eq!(conf.httpclient.timeout, 60);
        assert_eq!(conf.httpclient.retries, 0);
        assert_eq!(conf.log.level, "INFO");
        assert!(conf.db.is_in_memory());
        assert!(!conf.db.auto_create_tables);
    }

    #[test]
    fn test_empty_env_gives_defaults() {
        let conf = AppConfig::builder()
            .env_source(HashMap::new())
            .build()
            .unwrap();
        assert_eq!(conf, AppConfig::default());
    }
}
