//! Spatial audio: effect chain lifecycle, presets and content eligibility

pub mod content;
pub mod controller;
pub mod effects;
pub mod presets;

pub use content::{
    format_is_spatial, is_spatial_eligible, AssumeMovieClassifier, ContentClass,
    ContentClassifier, HintContentClassifier, SpatialContent,
};
pub use controller::{SpatialAudioController, SpatialAudioStatus};
pub use effects::{
    ActiveEffects, AudioEffect, BassBoost, EffectError, EffectFactory, EffectResult, Equalizer,
    NullEffectFactory, SpatialEffectChain, Virtualizer, MAX_STRENGTH,
};
pub use presets::{EffectPreset, EqualizerCurve};
