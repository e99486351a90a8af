//! Playback engine facade
//!
//! Entry point used by the repository/UI layer. `PlaybackEngine` answers the
//! stateless negotiation questions (format, decoders) and hands out one
//! `PlaybackSession` per playback start. A session owns its spatial audio
//! controller and track manager and is torn down by `stop()`.

use crate::config::EngineSettings;
use crate::decoder::{DecoderSelector, HardwareClassifier, NameHeuristicClassifier};
use crate::error::{Error, Result};
use crate::events::{EngineEvent, EventBus};
use crate::format::{analyze, resolve, PlaybackFormatResolution};
use crate::oracle::{device_hdr_capability_or_default, CapabilityOracle, DecoderCandidate};
use crate::spatial::{
    ContentClassifier, EffectFactory, HintContentClassifier, SpatialAudioController,
    SpatialAudioStatus, SpatialContent,
};
use crate::tracks::{DecodeSession, TrackDescriptor, TrackManager};
use jfmp_common::{PolicyStore, TrackKind};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Everything the engine needs from the platform and the app
#[derive(Clone)]
pub struct EngineDeps {
    pub oracle: Arc<dyn CapabilityOracle>,
    pub effects: Arc<dyn EffectFactory>,
    pub policy: Arc<dyn PolicyStore>,
    pub hardware_classifier: Arc<dyn HardwareClassifier>,
    pub content_classifier: Arc<dyn ContentClassifier>,
    pub event_bus: EventBus,
    pub settings: EngineSettings,
}

impl EngineDeps {
    /// Dependencies with the default classifiers and settings
    pub fn new(
        oracle: Arc<dyn CapabilityOracle>,
        effects: Arc<dyn EffectFactory>,
        policy: Arc<dyn PolicyStore>,
    ) -> Self {
        let settings = EngineSettings::default();
        Self {
            oracle,
            effects,
            policy,
            hardware_classifier: Arc::new(NameHeuristicClassifier),
            content_classifier: Arc::new(HintContentClassifier),
            event_bus: EventBus::new(settings.event_capacity),
            settings,
        }
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.event_bus = EventBus::new(settings.event_capacity);
        self.settings = settings;
        self
    }

    pub fn with_hardware_classifier(mut self, classifier: Arc<dyn HardwareClassifier>) -> Self {
        self.hardware_classifier = classifier;
        self
    }

    pub fn with_content_classifier(mut self, classifier: Arc<dyn ContentClassifier>) -> Self {
        self.content_classifier = classifier;
        self
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = event_bus;
        self
    }
}

/// Content description for one playback start
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackRequest {
    pub mime_type: Option<String>,
    pub codec: Option<String>,
    pub color_info: Option<String>,
    pub requires_secure_decoder: bool,
    pub requires_tunneling_decoder: bool,
}

/// Negotiated format and ranked decoders for one playback start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackPlan {
    pub resolution: PlaybackFormatResolution,
    pub decoders: Vec<DecoderCandidate>,
}

impl PlaybackPlan {
    /// Decoder the pipeline should try first
    pub fn preferred_decoder(&self) -> Option<&DecoderCandidate> {
        self.decoders.first()
    }
}

pub struct PlaybackEngine {
    deps: EngineDeps,
    selector: DecoderSelector,
}

impl PlaybackEngine {
    pub fn new(deps: EngineDeps) -> Self {
        let selector =
            DecoderSelector::new(deps.oracle.clone(), deps.hardware_classifier.clone());
        Self { deps, selector }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.deps.event_bus
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.deps.event_bus.subscribe()
    }

    /// Classify the content and decide the format that will be decoded
    pub fn resolve_playback_format(
        &self,
        mime_type: Option<&str>,
        codec: Option<&str>,
        color_info: Option<&str>,
    ) -> PlaybackFormatResolution {
        let content = analyze(mime_type, codec, color_info);
        let device = device_hdr_capability_or_default(self.deps.oracle.as_ref());
        let resolution = resolve(&content, device, self.deps.policy.hdr_enabled());

        self.deps.event_bus.emit_lossy(EngineEvent::FormatResolved {
            requested_tier: resolution.requested.tier,
            effective_tier: resolution.effective.tier,
            effective_mime: resolution.effective.mime_type.clone(),
            downgraded: resolution.downgraded,
            timestamp: chrono::Utc::now(),
        });
        resolution
    }

    /// Ranked decoders for `mime_type` under the current policy
    pub fn select_decoders(
        &self,
        mime_type: &str,
        requires_secure_decoder: bool,
        requires_tunneling_decoder: bool,
    ) -> Vec<DecoderCandidate> {
        let policy = self.deps.policy.decoder_selection_policy();
        let decoders = self.selector.select_decoders(
            mime_type,
            requires_secure_decoder,
            requires_tunneling_decoder,
            &policy,
        );

        let event = if decoders.is_empty() {
            EngineEvent::NoDecoderAvailable {
                mime_type: mime_type.to_string(),
                timestamp: chrono::Utc::now(),
            }
        } else {
            EngineEvent::DecodersSelected {
                mime_type: mime_type.to_string(),
                decoders: decoders.iter().map(|d| d.name.clone()).collect(),
                timestamp: chrono::Utc::now(),
            }
        };
        self.deps.event_bus.emit_lossy(event);
        decoders
    }

    pub fn has_hardware_decoder(&self, mime_type: &str) -> bool {
        self.selector.has_hardware_decoder(mime_type)
    }

    /// Resolve the format and rank decoders for it
    ///
    /// # Errors
    ///
    /// `Error::NoDecoderAvailable` when the fallback cascade finds nothing;
    /// playback of this content cannot start.
    pub fn prepare_playback(&self, request: &PlaybackRequest) -> Result<PlaybackPlan> {
        let resolution = self.resolve_playback_format(
            request.mime_type.as_deref(),
            request.codec.as_deref(),
            request.color_info.as_deref(),
        );
        let mime_type = resolution.effective_mime_type().to_string();
        let decoders = self.select_decoders(
            &mime_type,
            request.requires_secure_decoder,
            request.requires_tunneling_decoder,
        );

        if decoders.is_empty() {
            warn!("No decoder available for {}", mime_type);
            return Err(Error::NoDecoderAvailable { mime_type });
        }

        info!(
            "Playback plan: {} via {}",
            resolution.effective.describe(),
            decoders[0].name
        );
        Ok(PlaybackPlan {
            resolution,
            decoders,
        })
    }

    /// Create the per-playback session state
    pub fn start_session(&self, decode_session: Arc<dyn DecodeSession>) -> PlaybackSession {
        debug!("Starting playback session");
        let spatial = SpatialAudioController::new(
            self.deps.oracle.clone(),
            self.deps.effects.clone(),
            self.deps.policy.clone(),
            self.deps.content_classifier.clone(),
            self.deps.event_bus.clone(),
            self.deps.settings.bind_retry_delay,
        );
        PlaybackSession {
            spatial,
            tracks: TrackManager::new(decode_session, self.deps.event_bus.clone()),
            stopped: AtomicBool::new(false),
        }
    }
}

/// Parse a caller-supplied track kind name
pub fn parse_track_kind(kind: &str) -> Result<TrackKind> {
    kind.parse::<TrackKind>()
        .map_err(|_| Error::InvalidTrackKind(kind.to_string()))
}

/// State owned by one playback from start to stop
pub struct PlaybackSession {
    spatial: SpatialAudioController,
    tracks: TrackManager,
    stopped: AtomicBool,
}

impl PlaybackSession {
    fn ensure_active(&self) -> Result<()> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(Error::InvalidState("playback session stopped".to_string()));
        }
        Ok(())
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Turn spatial audio on for `content`, or off
    ///
    /// Enabling checks content eligibility first; ineligible content leaves
    /// spatial audio disabled. Re-enabling after a disable keeps the existing
    /// effect handles when nothing about the route or content changed.
    pub async fn enable_spatial_audio(&self, enabled: bool, content: SpatialContent) -> Result<()> {
        self.ensure_active()?;
        if enabled {
            self.spatial.enable_for_content(content).await;
        } else {
            self.spatial.disable().await;
        }
        Ok(())
    }

    /// Content changed mid-session (e.g. next episode)
    pub async fn on_content_changed(&self, content: SpatialContent) -> Result<()> {
        self.ensure_active()?;
        self.spatial.configure_for_content(content).await;
        Ok(())
    }

    pub async fn spatial_status(&self) -> SpatialAudioStatus {
        self.spatial.status().await
    }

    /// Returns whether an override was applied; unknown ids are ignored
    pub fn select_track(&self, kind: TrackKind, track_id: &str) -> Result<bool> {
        self.ensure_active()?;
        Ok(self.tracks.select_track(kind, track_id))
    }

    pub fn get_tracks(&self, kind: TrackKind) -> Vec<TrackDescriptor> {
        self.tracks.get_tracks(kind)
    }

    pub fn get_current_track(&self, kind: TrackKind) -> Option<TrackDescriptor> {
        self.tracks.get_current_track(kind)
    }

    /// Release native effect handles. Safe to call repeatedly.
    pub async fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            debug!("Playback session already stopped");
        }
        self.spatial.release().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_track_kind() {
        assert_eq!(parse_track_kind("subtitle").unwrap(), TrackKind::Subtitle);
        assert!(matches!(
            parse_track_kind("chapter"),
            Err(Error::InvalidTrackKind(kind)) if kind == "chapter"
        ));
    }
}
