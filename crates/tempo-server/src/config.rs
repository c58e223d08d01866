//! Configuration loading for the Tempo server.
//!
//! The canonical configuration lives in `tempo.yaml` at the working
//! directory, parsed into [`ServerConfig`]. Every field has a default,
//! so a missing file means defaults across the board. The Redis URL
//! can additionally be overridden through the environment.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

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
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: String,

    /// The TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Simulated opponent thinking time in milliseconds.
    #[serde(default = "default_opponent_delay_ms")]
    pub opponent_delay_ms: u64,

    /// Redis connection URL. When absent the server runs on the
    /// in-memory store, which is fine for a single process.
    #[serde(default)]
    pub redis_url: Option<String>,
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8080
}

const fn default_opponent_delay_ms() -> u64 {
    2000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            opponent_delay_ms: default_opponent_delay_ms(),
            redis_url: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `REDIS_URL` in the environment overrides `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from `tempo.yaml` if present, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] only when the file exists but cannot be
    /// read or parsed; absence is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new("tempo.yaml");
        if path.exists() {
            Self::from_file(path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// The opponent delay as a [`Duration`].
    #[must_use]
    pub const fn opponent_delay(&self) -> Duration {
        Duration::from_millis(self.opponent_delay_ms)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("REDIS_URL") {
            if !url.is_empty() {
                self.redis_url = Some(url);
            }
        }
    }
}
