//! # JFMP Common Library
//!
//! Shared code for the JFMP media client playback crates including:
//! - Error types
//! - TOML bootstrap configuration loading
//! - Read-only playback policy store
//! - Engine event types (EngineEvent enum) and the EventBus

pub mod config;
pub mod error;
pub mod events;
pub mod media;
pub mod policy;

pub use error::{Error, Result};
pub use media::{AudioSinkClass, HdrTier, SpatialAudioState, TrackKind};
pub use policy::{
    DecoderPriority, DecoderSelectionPolicy, PolicyConfig, PolicyStore, SharedPolicyStore,
    StaticPolicyStore,
};
