//! Read-only playback policy store
//!
//! The UI layer owns the user's playback preferences. The playback engine only
//! reads them, once per operation, through the [`PolicyStore`] trait. Policy may
//! change between calls, so nothing here is cached by the engine.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Decoder ordering preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecoderPriority {
    /// Hardware first for video, software first for audio
    #[default]
    Auto,
    HardwareFirst,
    SoftwareFirst,
}

impl std::fmt::Display for DecoderPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecoderPriority::Auto => write!(f, "auto"),
            DecoderPriority::HardwareFirst => write!(f, "hardware_first"),
            DecoderPriority::SoftwareFirst => write!(f, "software_first"),
        }
    }
}

impl std::str::FromStr for DecoderPriority {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "auto" => Ok(DecoderPriority::Auto),
            "hardware_first" | "hardware" => Ok(DecoderPriority::HardwareFirst),
            "software_first" | "software" => Ok(DecoderPriority::SoftwareFirst),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown decoder priority '{}'",
                other
            ))),
        }
    }
}

/// Policy flags as persisted in the `[policy]` table of the bootstrap config
///
/// Every field has a built-in default so a partial (or missing) table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_true")]
    pub hardware_acceleration: bool,

    #[serde(default)]
    pub decoder_priority: DecoderPriority,

    #[serde(default = "default_true")]
    pub hdr_enabled: bool,

    #[serde(default)]
    pub spatial_audio: bool,

    #[serde(default)]
    pub battery_optimization: bool,

    #[serde(default)]
    pub buffer_optimization: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            hardware_acceleration: true,
            decoder_priority: DecoderPriority::Auto,
            hdr_enabled: true,
            spatial_audio: false,
            battery_optimization: false,
            buffer_optimization: false,
        }
    }
}

/// Snapshot of the flags consumed by decoder selection and format resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderSelectionPolicy {
    pub hardware_acceleration_enabled: bool,
    pub priority: DecoderPriority,
    pub hdr_enabled: bool,
}

impl Default for DecoderSelectionPolicy {
    fn default() -> Self {
        Self {
            hardware_acceleration_enabled: true,
            priority: DecoderPriority::Auto,
            hdr_enabled: true,
        }
    }
}

impl From<&PolicyConfig> for DecoderSelectionPolicy {
    fn from(config: &PolicyConfig) -> Self {
        Self {
            hardware_acceleration_enabled: config.hardware_acceleration,
            priority: config.decoder_priority,
            hdr_enabled: config.hdr_enabled,
        }
    }
}

/// Read-only accessors for playback policy
///
/// There is no write path from the engine. Implementations must be cheap and
/// non-blocking: they are read on the decoder format-negotiation path.
pub trait PolicyStore: Send + Sync {
    fn hardware_acceleration_enabled(&self) -> bool;
    fn decoder_priority(&self) -> DecoderPriority;
    fn hdr_enabled(&self) -> bool;
    fn spatial_audio_enabled(&self) -> bool;
    fn battery_optimization_enabled(&self) -> bool;
    fn buffer_optimization_enabled(&self) -> bool;

    /// Read the decoder-related flags together
    fn decoder_selection_policy(&self) -> DecoderSelectionPolicy {
        DecoderSelectionPolicy {
            hardware_acceleration_enabled: self.hardware_acceleration_enabled(),
            priority: self.decoder_priority(),
            hdr_enabled: self.hdr_enabled(),
        }
    }
}

/// Immutable policy snapshot
#[derive(Debug, Clone, Default)]
pub struct StaticPolicyStore {
    config: PolicyConfig,
}

impl StaticPolicyStore {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }
}

impl PolicyStore for StaticPolicyStore {
    fn hardware_acceleration_enabled(&self) -> bool {
        self.config.hardware_acceleration
    }

    fn decoder_priority(&self) -> DecoderPriority {
        self.config.decoder_priority
    }

    fn hdr_enabled(&self) -> bool {
        self.config.hdr_enabled
    }

    fn spatial_audio_enabled(&self) -> bool {
        self.config.spatial_audio
    }

    fn battery_optimization_enabled(&self) -> bool {
        self.config.battery_optimization
    }

    fn buffer_optimization_enabled(&self) -> bool {
        self.config.buffer_optimization
    }
}

/// Policy store shared with the UI layer
///
/// The UI replaces values through [`SharedPolicyStore::update`]; the engine
/// observes the new values on its next read.
#[derive(Debug, Clone, Default)]
pub struct SharedPolicyStore {
    inner: Arc<RwLock<PolicyConfig>>,
}

impl SharedPolicyStore {
    pub fn new(config: PolicyConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Apply a change from the preferences screen
    pub fn update(&self, change: impl FnOnce(&mut PolicyConfig)) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        change(&mut guard);
    }

    /// Copy of the current values
    pub fn snapshot(&self) -> PolicyConfig {
        self.read(|c| c.clone())
    }

    fn read<T>(&self, f: impl FnOnce(&PolicyConfig) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }
}

impl PolicyStore for SharedPolicyStore {
    fn hardware_acceleration_enabled(&self) -> bool {
        self.read(|c| c.hardware_acceleration)
    }

    fn decoder_priority(&self) -> DecoderPriority {
        self.read(|c| c.decoder_priority)
    }

    fn hdr_enabled(&self) -> bool {
        self.read(|c| c.hdr_enabled)
    }

    fn spatial_audio_enabled(&self) -> bool {
        self.read(|c| c.spatial_audio)
    }

    fn battery_optimization_enabled(&self) -> bool {
        self.read(|c| c.battery_optimization)
    }

    fn buffer_optimization_enabled(&self) -> bool {
        self.read(|c| c.buffer_optimization)
    }

    fn decoder_selection_policy(&self) -> DecoderSelectionPolicy {
        self.read(|c| DecoderSelectionPolicy::from(c))
    }
}
