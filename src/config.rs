//! Configuration management for registry checks
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (registry-check.toml)
//! - Environment variables (REGISTRY_CHECK__*)
//!
//! ## Example config file (registry-check.toml):
//! ```toml
//! [paths]
//! schema = "just-install-schema.json"
//! registry = "just-install.json"
//!
//! [reachability]
//! short = false
//! user_agent = "registry-check/0.1"
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

/// Main configuration for a validation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Document locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Link checking settings
    #[serde(default)]
    pub reachability: ReachabilityConfig,
}

/// Where the schema and registry documents live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_schema_path")]
    pub schema: PathBuf,

    #[serde(default = "default_registry_path")]
    pub registry: PathBuf,
}

/// Reachability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReachabilityConfig {
    /// Skip all network checks
    #[serde(default)]
    pub short: bool,

    /// User-Agent sent with every probe
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_schema_path() -> PathBuf {
    PathBuf::from("registry-schema.json")
}

fn default_registry_path() -> PathBuf {
    PathBuf::from("registry.json")
}

fn default_user_agent() -> String {
    format!("registry-check/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            schema: default_schema_path(),
            registry: default_registry_path(),
        }
    }
}

impl Default for ReachabilityConfig {
    fn default() -> Self {
        Self {
            short: false,
            user_agent: default_user_agent(),
        }
    }
}

impl CheckConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "registry-check.toml",
            ".registry-check.toml",
            "config/registry-check.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "registry", "registry-check") {
            let xdg_config = config_dir.config_dir().join("registry-check.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("REGISTRY_CHECK")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = self
            .to_toml()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}
