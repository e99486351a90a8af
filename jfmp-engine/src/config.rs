//! Engine runtime settings derived from the bootstrap TOML configuration

use jfmp_common::config::TomlConfig;
use std::time::Duration;

/// Tunables the engine reads at construction time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Delay before the single spatial audio bind retry
    pub bind_retry_delay: Duration,
    /// Event bus buffer size
    pub event_capacity: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&TomlConfig::default())
    }
}

impl From<&TomlConfig> for EngineSettings {
    fn from(config: &TomlConfig) -> Self {
        Self {
            bind_retry_delay: config.spatial.bind_retry_delay(),
            event_capacity: config.events.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_follow_toml() {
        let config =
            TomlConfig::from_toml_str("[spatial]\nbind_retry_delay_ms = 250\n[events]\ncapacity = 8\n")
                .unwrap();
        let settings = EngineSettings::from(&config);
        assert_eq!(settings.bind_retry_delay, Duration::from_millis(250));
        assert_eq!(settings.event_capacity, 8);
        assert_eq!(EngineSettings::default().bind_retry_delay, Duration::from_millis(500));
    }
}
