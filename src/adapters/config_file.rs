//! JSON file configuration adapter.
//!
//! Implements [`ConfigPort`] over a JSON document whose keys mirror
//! [`SystemConfig`].  Missing keys take their defaults; every loaded
//! config is validated before it is returned.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::ConfigPort;
use crate::config::SystemConfig;
use crate::error::ConfigError;

/// Environment variable consulted when no path is passed on the command line.
pub const CONFIG_ENV: &str = "GARDEN_CONFIG";

pub struct JsonFileConfig {
    path: Option<PathBuf>,
}

impl JsonFileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Path from the first CLI argument, else `$GARDEN_CONFIG`, else none.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Self {
        let path = args
            .nth(1)
            .or_else(|| env::var(CONFIG_ENV).ok())
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl ConfigPort for JsonFileConfig {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let Some(path) = &self.path else {
            return Err(ConfigError::NotFound);
        };
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(ConfigError::NotFound),
            Err(e) => return Err(ConfigError::IoError(format!("{}: {e}", path.display()))),
        };
        let config: SystemConfig =
            serde_json::from_str(&text).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        config.validate()?;
        info!("config loaded from {}", path.display());
        Ok(config)
    }
}

/// Load through `port`, falling back to defaults when nothing is stored.
/// Any other failure is returned to the caller.
pub fn load_or_default(port: &impl ConfigPort) -> Result<SystemConfig, ConfigError> {
    match port.load() {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound) => {
            warn!("no config file found, using defaults");
            Ok(SystemConfig::default())
        }
        Err(e) => Err(e),
    }
}
