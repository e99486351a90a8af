//! Event system for the playback engine
//!
//! Re-exports the shared event types from jfmp-common and adds the small
//! helpers the engine components use to publish them.

pub use jfmp_common::events::{EngineEvent, EventBus};

use jfmp_common::{SpatialAudioState, TrackKind};

pub(crate) fn spatial_state_changed(
    old_state: SpatialAudioState,
    new_state: SpatialAudioState,
    session_id: i32,
) -> EngineEvent {
    EngineEvent::SpatialAudioStateChanged {
        old_state,
        new_state,
        session_id,
        timestamp: chrono::Utc::now(),
    }
}

pub(crate) fn track_selected(kind: TrackKind, track_id: &str) -> EngineEvent {
    EngineEvent::TrackSelected {
        kind,
        track_id: track_id.to_string(),
        timestamp: chrono::Utc::now(),
    }
}

pub(crate) fn track_selection_ignored(kind: TrackKind, track_id: &str) -> EngineEvent {
    EngineEvent::TrackSelectionIgnored {
        kind,
        track_id: track_id.to_string(),
        timestamp: chrono::Utc::now(),
    }
}
