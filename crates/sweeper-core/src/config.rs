//! Configuration for the sweeper bridge.
//!
//! Values come from an optional TOML file followed by environment variables
//! prefixed with `COOKIE_SWEEPER` (nested keys separated by `__`). Every key
//! has a default, so running without any configuration is the normal case.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::SweeperError;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "COOKIE_SWEEPER";

/// Root configuration.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct SweeperConfig {
    /// Program used for the drawing-to-raster stage.
    #[validate(length(min = 1))]
    pub exporter_command: String,

    /// Directory holding the platform binary directories and the profile image.
    ///
    /// If not set, the current working directory at startup is used.
    pub install_dir: Option<PathBuf>,

    /// Parent directory for per-invocation workspaces.
    ///
    /// If not set, the system temporary directory is used.
    pub temp_root: Option<PathBuf>,

    /// Logging settings.
    #[validate(nested)]
    pub logging: LoggingConfig,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            exporter_command: default_exporter_command(),
            install_dir: None,
            temp_root: None,
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging and tracing configuration.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `"trace"`, `"debug"`, `"info"`, `"warn"`, `"error"`.
    #[validate(length(min = 1))]
    pub level: String,
    /// Log output format.
    pub format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human-readable output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_exporter_command() -> String {
    "inkscape".to_string()
}

fn default_level() -> String {
    "warn".to_string()
}

impl SweeperConfig {
    /// Load configuration from an optional file and the environment.
    ///
    /// A file passed explicitly must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, SweeperError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| SweeperError::Configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config.try_deserialize().map_err(|e| {
            SweeperError::Configuration(format!("Failed to deserialize config: {e}"))
        })?;

        loaded
            .validate()
            .map_err(|e| SweeperError::Configuration(format!("Invalid config: {e}")))?;

        Ok(loaded)
    }
}
