use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use reqpin_util::errors::ReqpinError;

use crate::marker::MarkerEnvironment;

/// Environment variable that relocates the reqpin data directory.
pub const HOME_ENV: &str = "REQPIN_HOME";

/// Global user configuration loaded from `~/.reqpin/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub compile: CompileConfig,

    /// Overrides for environment-marker variables.
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

/// Compile defaults from `[compile]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompileConfig {
    #[serde(default, rename = "allow-double")]
    pub allow_double: bool,
    #[serde(default)]
    pub flat: bool,
    #[serde(default)]
    pub index: Option<String>,
}

impl GlobalConfig {
    /// Load the global configuration, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from an explicit path; a missing file means defaults.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ReqpinError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| {
            ReqpinError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Marker environment for the host with the `[environment]` overrides applied.
    pub fn marker_environment(&self) -> MarkerEnvironment {
        MarkerEnvironment::host().with_overrides(&self.environment)
    }
}

/// Returns the reqpin data directory: `$REQPIN_HOME`, or `~/.reqpin/`.
pub fn dirs_path() -> PathBuf {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    Path::new(&home).join(".reqpin")
}
