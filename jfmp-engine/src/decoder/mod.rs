//! Decoder selection
//!
//! Ranks concrete decoder candidates for a mime type under the user's
//! hardware-acceleration policy, walking the Dolby Vision → H.265 → H.264
//! cascade when no direct candidate exists.

pub mod classifier;
pub mod selector;

pub use classifier::{HardwareClassifier, NameHeuristicClassifier, PlatformFlagClassifier};
pub use selector::{rank_candidates, DecoderSelector};
