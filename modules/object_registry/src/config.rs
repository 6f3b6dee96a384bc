//! Configuration for the object registry module

use crate::domain::ValidationMode;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::Deserialize;
use std::path::Path;

/// Prefix of environment variables overriding file configuration
pub const ENV_PREFIX: &str = "OBJECT_REGISTRY_";

/// Object registry configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database URL; schema sync and metadata persistence are skipped without one
    #[serde(default)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Create tables for every registered class on start
    #[serde(default = "default_true")]
    pub sync_schema_on_start: bool,

    /// Write class summaries to the system table on start
    #[serde(default = "default_true")]
    pub persist_metadata_on_start: bool,

    /// Default reporting mode for instance validation
    #[serde(default)]
    pub validation_mode: ValidationMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: default_max_connections(),
            sync_schema_on_start: true,
            persist_metadata_on_start: true,
            validation_mode: ValidationMode::default(),
        }
    }
}

impl Config {
    /// Load from an optional YAML file, then `OBJECT_REGISTRY_*` environment variables
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config = figment.merge(Env::prefixed(ENV_PREFIX)).extract()?;
        Ok(config)
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}
