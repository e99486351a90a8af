//! Spatial audio controller
//!
//! Owns the effect chain for one playback session. All mutations go through a
//! single async mutex, so bind, apply, disable and release are serialized.
//!
//! When the audio session is not ready at bind time the controller enters
//! `PendingBind` and spawns exactly one delayed retry. The retry is guarded by
//! a cancellation token and an epoch counter: `release()`, `disable()` or a
//! newer bind invalidates it even if its timer already fired.

use super::content::{is_spatial_eligible, ContentClass, ContentClassifier, SpatialContent};
use super::effects::{ActiveEffects, AudioEffect, EffectFactory, SpatialEffectChain, MAX_STRENGTH};
use super::presets::EffectPreset;
use crate::events::{self, EventBus};
use crate::oracle::{audio_sink_class_or_default, AudioSessionId, CapabilityOracle};
use jfmp_common::{AudioSinkClass, PolicyStore, SpatialAudioState};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Diagnostics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialAudioStatus {
    pub state: SpatialAudioState,
    /// Session the chain is bound to, 0 if none
    pub session_id: i32,
    pub sink_class: Option<AudioSinkClass>,
    pub content_class: Option<ContentClass>,
    pub active_effects: ActiveEffects,
}

/// Collaborators shared with the retry task
struct Shared {
    oracle: Arc<dyn CapabilityOracle>,
    effects: Arc<dyn EffectFactory>,
    policy: Arc<dyn PolicyStore>,
    classifier: Arc<dyn ContentClassifier>,
    event_bus: EventBus,
    retry_delay: Duration,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    state: SpatialAudioState,
    chain: Option<SpatialEffectChain>,
    content: SpatialContent,
    sink_class: Option<AudioSinkClass>,
    content_class: Option<ContentClass>,
    retry: Option<CancellationToken>,
    epoch: u64,
}

impl Inner {
    fn session_id(&self) -> i32 {
        self.chain.as_ref().map(|c| c.session().get()).unwrap_or(0)
    }

    fn cancel_retry(&mut self) {
        if let Some(token) = self.retry.take() {
            token.cancel();
            debug!("Cancelled pending spatial audio bind retry");
        }
        self.epoch += 1;
    }

    fn release_chain(&mut self) {
        if let Some(mut chain) = self.chain.take() {
            chain.release();
        }
    }
}

impl Shared {
    fn set_state(&self, inner: &mut Inner, new_state: SpatialAudioState) {
        let old_state = inner.state;
        if old_state == new_state {
            return;
        }
        inner.state = new_state;
        debug!("Spatial audio state: {} -> {}", old_state, new_state);
        self.event_bus.emit_lossy(events::spatial_state_changed(
            old_state,
            new_state,
            inner.session_id(),
        ));
    }

    /// Bind attempt; schedules the single retry when the session is not ready
    fn bind_locked(self: &Arc<Self>, inner: &mut Inner) {
        if !self.policy.spatial_audio_enabled() {
            if inner.chain.is_some() {
                info!("Spatial audio disabled by policy, disabling bound effects");
                self.disable_locked(inner);
            } else {
                debug!("Spatial audio disabled by policy, not binding");
                inner.cancel_retry();
                if inner.state == SpatialAudioState::PendingBind {
                    self.set_state(inner, SpatialAudioState::Unbound);
                }
            }
            return;
        }

        inner.cancel_retry();

        let session = self.oracle.audio_session_id();
        if session.is_available() {
            self.apply_locked(inner, session);
            return;
        }

        info!(
            "Audio session not ready, retrying spatial audio bind in {:?}",
            self.retry_delay
        );
        let token = CancellationToken::new();
        inner.retry = Some(token.clone());
        let epoch = inner.epoch;
        // Drop the prior chain before waiting; it belongs to an older session
        inner.release_chain();
        self.set_state(inner, SpatialAudioState::PendingBind);

        let weak = Arc::downgrade(self);
        let delay = self.retry_delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    retry_bind(weak, epoch).await;
                }
            }
        });
    }

    /// Build a fresh effect chain for `session`
    fn apply_locked(&self, inner: &mut Inner, session: AudioSessionId) {
        inner.release_chain();

        let sink = audio_sink_class_or_default(self.oracle.as_ref());
        let content_class = self.classifier.classify(&inner.content);
        let preset = EffectPreset::select(sink, content_class);

        let chain = self.build_chain(session, &preset);
        info!(
            "Spatial audio bound to session {} (sink={}, content={}, effects={:?})",
            session,
            sink,
            content_class,
            chain.active_effects()
        );

        inner.sink_class = Some(sink);
        inner.content_class = Some(content_class);
        inner.chain = Some(chain);
        self.set_state(inner, SpatialAudioState::Bound);
    }

    fn build_chain(&self, session: AudioSessionId, preset: &EffectPreset) -> SpatialEffectChain {
        let mut chain = SpatialEffectChain::new(session);

        if let Some(strength) = preset.virtualizer_strength {
            match self.effects.create_virtualizer(session) {
                Ok(mut virtualizer) => {
                    if let Err(e) = virtualizer.set_strength(strength.min(MAX_STRENGTH)) {
                        warn!("Virtualizer strength {} rejected: {}", strength, e);
                    }
                    if let Err(e) = virtualizer.set_enabled(true) {
                        warn!("Virtualizer enable failed: {}", e);
                    }
                    chain.virtualizer = Some(virtualizer);
                }
                Err(e) => warn!("Virtualizer unavailable for session {}: {}", session, e),
            }
        }

        if let Some(strength) = preset.bass_boost_strength {
            match self.effects.create_bass_boost(session) {
                Ok(mut bass_boost) => {
                    if let Err(e) = bass_boost.set_strength(strength.min(MAX_STRENGTH)) {
                        warn!("Bass boost strength {} rejected: {}", strength, e);
                    }
                    if let Err(e) = bass_boost.set_enabled(true) {
                        warn!("Bass boost enable failed: {}", e);
                    }
                    chain.bass_boost = Some(bass_boost);
                }
                Err(e) => warn!("Bass boost unavailable for session {}: {}", session, e),
            }
        }

        if let Some(curve) = preset.equalizer {
            match self.effects.create_equalizer(session) {
                Ok(mut equalizer) => {
                    match equalizer.band_level_range() {
                        Ok(range) => {
                            for band in 0..equalizer.band_count() {
                                let level = match equalizer.center_frequency_hz(band) {
                                    Ok(freq) => curve.level_for(freq, range),
                                    Err(e) => {
                                        warn!("Equalizer band {} frequency unknown: {}", band, e);
                                        continue;
                                    }
                                };
                                if let Err(e) = equalizer.set_band_level(band, level) {
                                    warn!("Equalizer band {} level {} rejected: {}", band, level, e);
                                }
                            }
                        }
                        Err(e) => warn!("Equalizer level range unknown, leaving flat: {}", e),
                    }
                    if let Err(e) = equalizer.set_enabled(true) {
                        warn!("Equalizer enable failed: {}", e);
                    }
                    chain.equalizer = Some(equalizer);
                }
                Err(e) => warn!("Equalizer unavailable for session {}: {}", session, e),
            }
        }

        chain
    }

    /// Whether the kept chain already matches what a fresh apply would build
    fn can_resume(&self, inner: &Inner, content: &SpatialContent) -> bool {
        let Some(chain) = inner.chain.as_ref() else {
            return false;
        };
        inner.state == SpatialAudioState::Disabled
            && self.policy.spatial_audio_enabled()
            && chain.session() == self.oracle.audio_session_id()
            && inner.sink_class == Some(audio_sink_class_or_default(self.oracle.as_ref()))
            && inner.content_class == Some(self.classifier.classify(content))
    }

    /// Re-enable the kept chain without touching native handles
    fn resume_locked(&self, inner: &mut Inner) {
        if let Some(chain) = inner.chain.as_mut() {
            chain.set_enabled(true);
        }
        debug!("Spatial audio re-enabled on session {}", inner.session_id());
        self.set_state(inner, SpatialAudioState::Bound);
    }

    fn disable_locked(&self, inner: &mut Inner) {
        inner.cancel_retry();
        if let Some(chain) = inner.chain.as_mut() {
            chain.set_enabled(false);
        }
        self.set_state(inner, SpatialAudioState::Disabled);
    }
}

async fn retry_bind(weak: Weak<Shared>, epoch: u64) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let mut inner = shared.inner.lock().await;
    if inner.epoch != epoch || inner.state != SpatialAudioState::PendingBind {
        debug!("Stale spatial audio bind retry ignored");
        return;
    }
    inner.retry = None;

    if !shared.policy.spatial_audio_enabled() {
        debug!("Spatial audio disabled by policy during bind retry");
        shared.set_state(&mut inner, SpatialAudioState::Unbound);
        return;
    }

    let session = shared.oracle.audio_session_id();
    if session.is_available() {
        shared.apply_locked(&mut inner, session);
    } else {
        info!("Audio session still not ready after retry, spatial audio stays unbound");
        shared.set_state(&mut inner, SpatialAudioState::Unbound);
    }
}

/// Per-session owner of the spatial effect chain
pub struct SpatialAudioController {
    shared: Arc<Shared>,
}

impl SpatialAudioController {
    pub fn new(
        oracle: Arc<dyn CapabilityOracle>,
        effects: Arc<dyn EffectFactory>,
        policy: Arc<dyn PolicyStore>,
        classifier: Arc<dyn ContentClassifier>,
        event_bus: EventBus,
        retry_delay: Duration,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                oracle,
                effects,
                policy,
                classifier,
                event_bus,
                retry_delay,
                inner: Mutex::new(Inner::default()),
            }),
        }
    }

    /// Bind to the live audio session for `content`
    ///
    /// No-op while spatial audio is disabled by policy.
    pub async fn bind(&self, content: SpatialContent) {
        let mut inner = self.shared.inner.lock().await;
        inner.content = content;
        self.shared.bind_locked(&mut inner);
    }

    /// Re-check eligibility for new content, then (re)apply or disable
    pub async fn configure_for_content(&self, content: SpatialContent) {
        let mut inner = self.shared.inner.lock().await;
        let eligible = is_spatial_eligible(&content);
        inner.content = content;

        if eligible {
            self.shared.bind_locked(&mut inner);
        } else {
            info!("Content not eligible for spatial audio, disabling");
            self.shared.disable_locked(&mut inner);
        }
    }

    /// Turn spatial audio on for `content`
    ///
    /// Ineligible content disables. A disabled chain that still matches the
    /// session, sink and content class is re-enabled in place; anything else
    /// goes through a full apply.
    pub async fn enable_for_content(&self, content: SpatialContent) {
        let mut inner = self.shared.inner.lock().await;
        if !is_spatial_eligible(&content) {
            info!("Content not eligible for spatial audio, disabling");
            inner.content = content;
            self.shared.disable_locked(&mut inner);
            return;
        }

        if self.shared.can_resume(&inner, &content) {
            inner.content = content;
            self.shared.resume_locked(&mut inner);
        } else {
            inner.content = content;
            self.shared.bind_locked(&mut inner);
        }
    }

    /// Re-enable a disabled chain, or bind if none exists
    pub async fn enable(&self) {
        let mut inner = self.shared.inner.lock().await;
        let state = inner.state;
        match state {
            SpatialAudioState::Bound | SpatialAudioState::PendingBind => {}
            SpatialAudioState::Disabled if inner.chain.is_some() => {
                if !self.shared.policy.spatial_audio_enabled() {
                    debug!("Spatial audio disabled by policy, not re-enabling");
                    return;
                }
                self.shared.resume_locked(&mut inner);
            }
            _ => self.shared.bind_locked(&mut inner),
        }
    }

    /// Turn effects off without releasing native handles
    pub async fn disable(&self) {
        let mut inner = self.shared.inner.lock().await;
        if inner.state == SpatialAudioState::Released {
            return;
        }
        self.shared.disable_locked(&mut inner);
    }

    /// Release all native handles and invalidate any pending retry
    ///
    /// Safe to call repeatedly.
    pub async fn release(&self) {
        let mut inner = self.shared.inner.lock().await;
        inner.cancel_retry();
        if inner.state == SpatialAudioState::Released {
            debug!("Spatial audio already released");
            return;
        }
        inner.release_chain();
        inner.sink_class = None;
        inner.content_class = None;
        self.shared.set_state(&mut inner, SpatialAudioState::Released);
    }

    pub async fn state(&self) -> SpatialAudioState {
        self.shared.inner.lock().await.state
    }

    pub async fn status(&self) -> SpatialAudioStatus {
        let inner = self.shared.inner.lock().await;
        SpatialAudioStatus {
            state: inner.state,
            session_id: inner.session_id(),
            sink_class: inner.sink_class,
            content_class: inner.content_class,
            active_effects: inner
                .chain
                .as_ref()
                .map(|c| c.active_effects())
                .unwrap_or_default(),
        }
    }
}

impl Drop for SpatialAudioController {
    fn drop(&mut self) {
        if let Ok(mut inner) = self.shared.inner.try_lock() {
            inner.cancel_retry();
        }
    }
}
