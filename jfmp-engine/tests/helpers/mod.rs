//! Test helper modules for jfmp-engine integration tests
//!
//! Provides in-memory stand-ins for the platform:
//! - MockOracle: scripted display, decoder and audio-route answers
//! - MockEffectFactory: effect handles that count every native call
//! - FakeDecodeSession: track groups with a recorded override log

#![allow(dead_code)]

pub mod fake_session;
pub mod mock_effects;
pub mod mock_oracle;

pub use fake_session::{FakeDecodeSession, TrackFormatBuilder};
pub use mock_effects::{EffectCounters, EffectKind, MockEffectFactory};
pub use mock_oracle::MockOracle;

use jfmp_common::{PolicyConfig, SharedPolicyStore};
use jfmp_engine::{EngineDeps, EngineSettings, PlaybackEngine};
use std::sync::Arc;
use std::time::Duration;

/// Retry delay used by tests; matches the built-in default
pub const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Policy with spatial audio switched on
pub fn spatial_policy() -> SharedPolicyStore {
    SharedPolicyStore::new(PolicyConfig {
        spatial_audio: true,
        ..PolicyConfig::default()
    })
}

/// Engine wired to the given test doubles
pub fn engine_with(
    oracle: Arc<MockOracle>,
    effects: Arc<MockEffectFactory>,
    policy: SharedPolicyStore,
) -> PlaybackEngine {
    let deps = EngineDeps::new(oracle, effects, Arc::new(policy)).with_settings(EngineSettings {
        bind_retry_delay: RETRY_DELAY,
        event_capacity: 64,
    });
    PlaybackEngine::new(deps)
}
