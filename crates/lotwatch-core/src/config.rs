//! Configuration loading and typed config structures.
//!
//! Both binaries read the same YAML file (`lotwatch.yaml` by default, or the
//! path in `LOTWATCH_CONFIG`). Every field has a default, so a partial file
//! or no file at all is valid. Selected fields can be overridden from the
//! environment after the file is parsed:
//!
//! - `LOTWATCH_HOST` overrides `server.host`
//! - `LOTWATCH_PORT` overrides `server.port`
//! - `LOTWATCH_DATA_FILE` overrides `server.data_file`
//! - `LOTWATCH_SERVER_URL` overrides `client.server_url`
//! - `LOTWATCH_REQUESTER` overrides `client.requester`

use std::path::{Path, PathBuf};
use std::time::Duration;

use lotwatch_types::RequesterClass;
use serde::Deserialize;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "LOTWATCH_CONFIG";

/// Config file used when `LOTWATCH_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "lotwatch.yaml";

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

    /// A value is present but unusable.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// The offending field or environment variable.
        field: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LotwatchConfig {
    /// Sync service settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Polling client settings.
    #[serde(default)]
    pub client: ClientSection,
}

impl LotwatchConfig {
    /// Load configuration from the file named by `LOTWATCH_CONFIG`, or
    /// `lotwatch.yaml`, then apply environment overrides. A missing file
    /// yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or
    /// parsed, or if a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_yml::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is unusable.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides looked up by environment variable name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if an override cannot be parsed.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("LOTWATCH_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("LOTWATCH_PORT") {
            self.server.port = port.parse().map_err(|e| ConfigError::Invalid {
                field: "LOTWATCH_PORT".to_owned(),
                reason: format!("{e}"),
            })?;
        }
        if let Some(path) = lookup("LOTWATCH_DATA_FILE") {
            self.server.data_file = PathBuf::from(path);
        }
        if let Some(url) = lookup("LOTWATCH_SERVER_URL") {
            self.client.server_url = url;
        }
        if let Some(requester) = lookup("LOTWATCH_REQUESTER") {
            self.client.requester = requester.parse().map_err(|e| ConfigError::Invalid {
                field: "LOTWATCH_REQUESTER".to_owned(),
                reason: format!("{e}"),
            })?;
        }
        Ok(())
    }

    /// Check that timing values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero refresh interval or
    /// fetch timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "client.refresh_interval_secs".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }
        if self.client.fetch_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "client.fetch_timeout_ms".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Sync service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Durable snapshot file.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_file: default_data_file(),
        }
    }
}

/// Polling client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSection {
    /// Base URL of the sync service.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Seconds between background refreshes.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Per-fetch timeout in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Requester class selected at startup.
    #[serde(default = "default_requester")]
    pub requester: RequesterClass,
}

impl ClientSection {
    /// Refresh period as a [`Duration`].
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Fetch timeout as a [`Duration`].
    pub const fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            refresh_interval_secs: default_refresh_interval_secs(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            requester: default_requester(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    5000
}

fn default_data_file() -> PathBuf {
    PathBuf::from("parking_data.json")
}

fn default_server_url() -> String {
    "http://localhost:5000".to_owned()
}

const fn default_refresh_interval_secs() -> u64 {
    10
}

const fn default_fetch_timeout_ms() -> u64 {
    2000
}

const fn default_requester() -> RequesterClass {
    RequesterClass::Student
}
