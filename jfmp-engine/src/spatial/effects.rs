//! Audio effect handles and the per-session effect chain
//!
//! The platform exposes effects as native handles attached to an audio
//! session. Each handle type is a trait so the controller can be driven by a
//! real platform binding or by test doubles.

use crate::oracle::AudioSessionId;
use thiserror::Error;
use tracing::{debug, warn};

/// Strength range accepted by virtualizer and bass boost
pub const MAX_STRENGTH: u16 = 1000;

/// Failure of a native effect operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    /// The platform does not offer this effect type
    #[error("Effect not supported: {0}")]
    Unsupported(String),

    /// Native instantiation failed
    #[error("Effect creation failed: {0}")]
    CreationFailed(String),

    /// A parameter call on a live handle failed
    #[error("Effect operation failed: {0}")]
    OperationFailed(String),
}

pub type EffectResult<T> = std::result::Result<T, EffectError>;

/// Common surface of every native effect handle
pub trait AudioEffect: Send {
    fn set_enabled(&mut self, enabled: bool) -> EffectResult<()>;

    /// Free the native handle. Called at most once by [`SpatialEffectChain`].
    fn release(&mut self);
}

pub trait Virtualizer: AudioEffect {
    /// Strength in `0..=1000`
    fn set_strength(&mut self, strength: u16) -> EffectResult<()>;
}

pub trait BassBoost: AudioEffect {
    /// Strength in `0..=1000`
    fn set_strength(&mut self, strength: u16) -> EffectResult<()>;
}

pub trait Equalizer: AudioEffect {
    fn band_count(&self) -> u16;

    /// Center frequency of `band` in Hz
    fn center_frequency_hz(&self, band: u16) -> EffectResult<u32>;

    /// Supported `(min, max)` band level in millibels
    fn band_level_range(&self) -> EffectResult<(i16, i16)>;

    fn set_band_level(&mut self, band: u16, millibels: i16) -> EffectResult<()>;
}

/// Platform effect instantiation for one audio session
pub trait EffectFactory: Send + Sync {
    fn create_virtualizer(&self, session: AudioSessionId) -> EffectResult<Box<dyn Virtualizer>>;

    fn create_bass_boost(&self, session: AudioSessionId) -> EffectResult<Box<dyn BassBoost>>;

    fn create_equalizer(&self, session: AudioSessionId) -> EffectResult<Box<dyn Equalizer>>;
}

/// Factory for platforms without audio effect support
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEffectFactory;

impl EffectFactory for NullEffectFactory {
    fn create_virtualizer(&self, _session: AudioSessionId) -> EffectResult<Box<dyn Virtualizer>> {
        Err(EffectError::Unsupported("virtualizer".to_string()))
    }

    fn create_bass_boost(&self, _session: AudioSessionId) -> EffectResult<Box<dyn BassBoost>> {
        Err(EffectError::Unsupported("bass boost".to_string()))
    }

    fn create_equalizer(&self, _session: AudioSessionId) -> EffectResult<Box<dyn Equalizer>> {
        Err(EffectError::Unsupported("equalizer".to_string()))
    }
}

/// Effects currently owned by a bound chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct ActiveEffects {
    pub virtualizer: bool,
    pub bass_boost: bool,
    pub equalizer: bool,
}

/// Effects bound to one audio session, each individually optional
pub struct SpatialEffectChain {
    session: AudioSessionId,
    pub(crate) virtualizer: Option<Box<dyn Virtualizer>>,
    pub(crate) bass_boost: Option<Box<dyn BassBoost>>,
    pub(crate) equalizer: Option<Box<dyn Equalizer>>,
    released: bool,
}

impl SpatialEffectChain {
    pub fn new(session: AudioSessionId) -> Self {
        Self {
            session,
            virtualizer: None,
            bass_boost: None,
            equalizer: None,
            released: false,
        }
    }

    pub fn session(&self) -> AudioSessionId {
        self.session
    }

    pub fn is_empty(&self) -> bool {
        self.virtualizer.is_none() && self.bass_boost.is_none() && self.equalizer.is_none()
    }

    pub fn active_effects(&self) -> ActiveEffects {
        ActiveEffects {
            virtualizer: self.virtualizer.is_some(),
            bass_boost: self.bass_boost.is_some(),
            equalizer: self.equalizer.is_some(),
        }
    }

    /// Toggle every owned effect; failures are logged per effect
    pub fn set_enabled(&mut self, enabled: bool) {
        if let Some(v) = self.virtualizer.as_mut() {
            if let Err(e) = v.set_enabled(enabled) {
                warn!("Virtualizer set_enabled({}) failed: {}", enabled, e);
            }
        }
        if let Some(b) = self.bass_boost.as_mut() {
            if let Err(e) = b.set_enabled(enabled) {
                warn!("Bass boost set_enabled({}) failed: {}", enabled, e);
            }
        }
        if let Some(eq) = self.equalizer.as_mut() {
            if let Err(e) = eq.set_enabled(enabled) {
                warn!("Equalizer set_enabled({}) failed: {}", enabled, e);
            }
        }
    }

    /// Release all native handles. Safe to call repeatedly.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        if let Some(mut v) = self.virtualizer.take() {
            v.release();
        }
        if let Some(mut b) = self.bass_boost.take() {
            b.release();
        }
        if let Some(mut eq) = self.equalizer.take() {
            eq.release();
        }
        self.released = true;
        debug!("Released effect chain for session {}", self.session);
    }
}

impl Drop for SpatialEffectChain {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for SpatialEffectChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialEffectChain")
            .field("session", &self.session)
            .field("active", &self.active_effects())
            .field("released", &self.released)
            .finish()
    }
}
