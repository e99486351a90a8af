//! Bootstrap configuration loading and config file resolution
//!
//! Configuration file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`JFMP_CONFIG`)
//! 3. OS-dependent default location (fallback)
//!
//! A missing configuration file is not an error: the loader logs a warning
//! and continues with built-in defaults. A file that exists but cannot be
//! parsed is a configuration error.

use crate::policy::PolicyConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "JFMP_CONFIG";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Playback policy flags backing the policy store
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Spatial audio controller tuning
    #[serde(default)]
    pub spatial: SpatialConfig,

    /// Event bus sizing
    #[serde(default)]
    pub events: EventsConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Spatial audio controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialConfig {
    /// Delay before the single bind retry when the audio session is not ready
    #[serde(default = "default_bind_retry_delay_ms")]
    pub bind_retry_delay_ms: u64,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            bind_retry_delay_ms: default_bind_retry_delay_ms(),
        }
    }
}

impl SpatialConfig {
    pub fn bind_retry_delay(&self) -> Duration {
        Duration::from_millis(self.bind_retry_delay_ms)
    }
}

/// Event bus configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsConfig {
    /// Number of events buffered before slow subscribers lag
    #[serde(default = "default_event_capacity")]
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: default_event_capacity(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bind_retry_delay_ms() -> u64 {
    500
}

fn default_event_capacity() -> usize {
    100
}

impl TomlConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file path
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {:?}: {}", path, e)))?;
        info!("Loaded TOML configuration from {:?}", path);
        Ok(config)
    }

    /// Resolve the config file location and load it, falling back to defaults
    ///
    /// Only a file that exists but is invalid produces an error.
    pub fn load_or_default(cli_path: Option<&Path>) -> Result<Self> {
        match resolve_config_path(cli_path) {
            Some(path) if path.exists() => Self::load(&path),
            Some(path) => {
                warn!(
                    "Config file {:?} not found, using built-in defaults",
                    path
                );
                Ok(Self::default())
            }
            None => {
                warn!("No config file location available, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.events.capacity == 0 {
            return Err(Error::Config(
                "events.capacity must be greater than zero".to_string(),
            ));
        }
        if self.spatial.bind_retry_delay_ms > 10_000 {
            return Err(Error::Config(format!(
                "spatial.bind_retry_delay_ms too large: {}",
                self.spatial.bind_retry_delay_ms
            )));
        }
        Ok(())
    }
}

/// Config file path resolution: CLI argument > environment > default location
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_path {
        debug!("Config path from command line: {:?}", path);
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            debug!("Config path from {}: {}", CONFIG_ENV_VAR, path);
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: OS-dependent default
    default_config_path()
}

/// Default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("jfmp").join("config.toml"))
}
