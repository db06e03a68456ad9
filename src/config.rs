use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::voter::ValidationRules;

/// Default location of the configuration file.
pub const CONFIG_FILE: &str = "Election.toml";

/// Prefix for environment variable overrides, e.g. `ELECTION_MIN_AGE`.
pub const ENV_PREFIX: &str = "ELECTION_";

/// Application configuration, derived from `Election.toml` and `ELECTION_*`
/// environment variables layered over the built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    min_age: u32,
    required_fields: Vec<String>,
    max_region_depth: usize,
    log_config: String,
}

impl Default for Config {
    fn default() -> Self {
        let rules = ValidationRules::default();
        Self {
            min_age: rules.min_age,
            required_fields: rules.required_fields,
            max_region_depth: 64,
            log_config: "log4rs.yaml".to_string(),
        }
    }
}

impl Config {
    /// Load the config from the default file and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load the config from the given file and the environment.
    /// A missing file is not an error; the defaults are used instead.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::figment(path.as_ref()).extract()?;
        Ok(config)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Minimum age a voter must have reached to register.
    /// Configured via `MIN_AGE`.
    pub fn min_age(&self) -> u32 {
        self.min_age
    }

    /// Fields a raw voter record must contain.
    /// Configured via `REQUIRED_FIELDS`.
    pub fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    /// Deepest region nesting accepted by the bounded aggregator.
    /// Configured via `MAX_REGION_DEPTH`.
    pub fn max_region_depth(&self) -> usize {
        self.max_region_depth
    }

    /// Path of the log4rs configuration file.
    /// Configured via `LOG_CONFIG`.
    pub fn log_config(&self) -> &str {
        &self.log_config
    }

    /// The voter eligibility rules described by this config.
    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules {
            min_age: self.min_age,
            required_fields: self.required_fields.clone(),
        }
    }
}
