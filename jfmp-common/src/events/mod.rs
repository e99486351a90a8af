//! Event types for the JFMP playback engine
//!
//! Provides the engine event definitions and the EventBus used to broadcast
//! them to the UI layer and diagnostics.

use crate::media::{HdrTier, SpatialAudioState, TrackKind};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Playback engine events
///
/// Events are broadcast via EventBus and can be serialized for diagnostics
/// overlays and logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    /// A playable format was resolved for a content item
    FormatResolved {
        /// Tier the content was mastered in
        requested_tier: HdrTier,
        /// Tier that will actually be decoded
        effective_tier: HdrTier,
        /// Mime type handed to decoder selection
        effective_mime: String,
        /// True when the effective format is lower than the requested one
        downgraded: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Ranked decoder list produced for a mime type
    DecodersSelected {
        mime_type: String,
        /// Decoder names in ranked order
        decoders: Vec<String>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Fallback cascade exhausted; playback of this content cannot start
    NoDecoderAvailable {
        mime_type: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Spatial audio controller changed state
    SpatialAudioStateChanged {
        old_state: SpatialAudioState,
        new_state: SpatialAudioState,
        /// Audio session the chain is (or was) bound to, 0 if none
        session_id: i32,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Track selection override applied
    TrackSelected {
        kind: TrackKind,
        track_id: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Track selection ignored because the id is no longer present
    TrackSelectionIgnored {
        kind: TrackKind,
        track_id: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl EngineEvent {
    /// Event type name (matches the serialized `type` tag)
    pub fn event_type(&self) -> &'static str {
        match self {
            EngineEvent::FormatResolved { .. } => "FormatResolved",
            EngineEvent::DecodersSelected { .. } => "DecodersSelected",
            EngineEvent::NoDecoderAvailable { .. } => "NoDecoderAvailable",
            EngineEvent::SpatialAudioStateChanged { .. } => "SpatialAudioStateChanged",
            EngineEvent::TrackSelected { .. } => "TrackSelected",
            EngineEvent::TrackSelectionIgnored { .. } => "TrackSelectionIgnored",
        }
    }
}

/// Central event distribution bus
///
/// Wraps a tokio broadcast channel. Cloning the bus shares the channel.
///
/// # Examples
///
/// ```
/// use jfmp_common::events::{EngineEvent, EventBus};
/// use jfmp_common::TrackKind;
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(EngineEvent::TrackSelected {
///     kind: TrackKind::Audio,
///     track_id: "audio_1".to_string(),
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<EngineEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// * `capacity` - Number of events to buffer before dropping old events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: EngineEvent,
    ) -> Result<usize, broadcast::error::SendError<EngineEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_without_subscribers_is_err() {
        let bus = EventBus::new(10);
        let result = bus.emit(EngineEvent::NoDecoderAvailable {
            mime_type: "video/avc".to_string(),
            timestamp: chrono::Utc::now(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_subscriber_receives_event() {
        let bus = EventBus::new(10);
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.emit_lossy(EngineEvent::SpatialAudioStateChanged {
            old_state: SpatialAudioState::Unbound,
            new_state: SpatialAudioState::Bound,
            session_id: 7,
            timestamp: chrono::Utc::now(),
        });

        let event = rx.try_recv().unwrap();
        assert_eq!(event.event_type(), "SpatialAudioStateChanged");
    }

    #[test]
    fn test_serialized_tag() {
        let event = EngineEvent::FormatResolved {
            requested_tier: HdrTier::DolbyVision,
            effective_tier: HdrTier::Hdr10,
            effective_mime: "video/hevc".to_string(),
            downgraded: true,
            timestamp: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "FormatResolved");
        assert_eq!(json["requested_tier"], "dolby_vision");
        assert_eq!(json["effective_tier"], "hdr10");
    }
}
