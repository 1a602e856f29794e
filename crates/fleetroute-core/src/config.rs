//! Configuration loading and typed config structures for the routing service.
//!
//! The service reads a single YAML file (by default `fleetroute.yaml` in the
//! working directory). Every section is optional and falls back to the
//! defaults below:
//!
//! ```yaml
//! server:  { host: "0.0.0.0", port: 8000 }
//! routing: { default_algorithm: dijkstra, avg_speed_cm_s: 12.0, turn_penalty_s: 1.2 }
//! hub:     { subscriber_buffer: 256 }
//! maps:    { default_path: "data/map.json", preload: [] }
//! logging: { level: "info", json: false }
//! ```

use std::path::{Path, PathBuf};

use fleetroute_types::Algorithm;
use serde::Deserialize;

use crate::eta::EtaModel;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override holds an unusable value.
    #[error("invalid value for {var}: {message}")]
    Env {
        /// The offending variable.
        var: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ServiceConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Route computation and ETA parameters.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Broadcast hub settings.
    #[serde(default)]
    pub hub: HubConfig,

    /// Map file locations.
    #[serde(default)]
    pub maps: MapsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `FLEETROUTE_HOST` overrides `server.host`
    /// - `FLEETROUTE_PORT` overrides `server.port`
    /// - `FLEETROUTE_MAP_PATH` overrides `maps.default_path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Env`] if an override cannot be parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Env`] if an override cannot be parsed.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if `FLEETROUTE_PORT` is not a valid port.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if `FLEETROUTE_PORT` is not a valid port.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("FLEETROUTE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("FLEETROUTE_PORT") {
            self.server.port = port.parse().map_err(|e| ConfigError::Env {
                var: "FLEETROUTE_PORT",
                message: format!("{port:?}: {e}"),
            })?;
        }
        if let Some(path) = lookup("FLEETROUTE_MAP_PATH") {
            self.maps.default_path = PathBuf::from(path);
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: String,
    /// The TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Route computation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RoutingConfig {
    /// Algorithm used when a request does not name one.
    #[serde(default)]
    pub default_algorithm: Algorithm,
    /// ETA parameters.
    #[serde(flatten)]
    pub eta: EtaModel,
}

/// Broadcast hub settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HubConfig {
    /// Outbound queue depth per subscriber. A subscriber whose queue is
    /// full when an update is broadcast is dropped.
    #[serde(default = "default_subscriber_buffer")]
    pub subscriber_buffer: usize,
}

const fn default_subscriber_buffer() -> usize {
    256
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            subscriber_buffer: default_subscriber_buffer(),
        }
    }
}

/// Map file locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MapsConfig {
    /// File read by `POST /maps/import` when no path is given.
    #[serde(default = "default_map_path")]
    pub default_path: PathBuf,
    /// Map files imported at startup.
    #[serde(default)]
    pub preload: Vec<PathBuf>,
}

fn default_map_path() -> PathBuf {
    PathBuf::from("data/map.json")
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            default_path: default_map_path(),
            preload: Vec::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    String::from("info")
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
