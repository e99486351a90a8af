//! # JFMP Playback Engine (jfmp-engine)
//!
//! Capability negotiation and enhancement for media playback: decides which
//! format and decoder to use for a stream on the current device, manages the
//! spatial audio effect chain for the active session, and exposes track
//! enumeration and selection.
//!
//! The engine never touches the platform directly. Everything it learns comes
//! through the [`oracle::CapabilityOracle`] and [`spatial::EffectFactory`]
//! traits, and all policy flags are read from a [`jfmp_common::PolicyStore`].

pub mod config;
pub mod decoder;
pub mod error;
pub mod events;
pub mod format;
pub mod oracle;
pub mod playback;
pub mod spatial;
pub mod tracks;

pub use config::EngineSettings;
pub use error::{Error, Result};
pub use playback::{
    parse_track_kind, EngineDeps, PlaybackEngine, PlaybackPlan, PlaybackRequest, PlaybackSession,
};
