//! Track manager
//!
//! Enumerates audio, video and subtitle tracks from the live decode session
//! and applies selection overrides. Nothing is cached: every query rebuilds
//! descriptors from the session's current track groups, and selection looks
//! ids up again with the same scheme.

use crate::events::{self, EventBus};
use jfmp_common::TrackKind;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Id of the synthetic subtitle entry that turns subtitles off
pub const SUBTITLE_OFF_ID: &str = "off";

/// One track as reported by the decode pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackFormat {
    /// Platform format id, when the container provides one
    pub id: Option<String>,
    pub label: Option<String>,
    pub language: Option<String>,
    pub channel_count: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub codec: Option<String>,
    pub is_forced: bool,
    pub is_default: bool,
    pub selected: bool,
}

/// Group of alternative tracks of one kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackGroup {
    pub kind: TrackKind,
    pub tracks: Vec<TrackFormat>,
}

/// Selection change sent to the decode pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOverride {
    /// Select one track, replacing any prior selection for its kind
    Select {
        kind: TrackKind,
        group_index: usize,
        track_index: usize,
    },
    /// Disable the whole track type
    DisableKind(TrackKind),
}

/// The decode pipeline's view of the current media item
pub trait DecodeSession: Send + Sync {
    fn track_groups(&self) -> Vec<TrackGroup>;

    /// Apply a selection override atomically
    fn apply_override(&self, track_override: TrackOverride);
}

/// Read-only track snapshot handed to the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub id: String,
    pub kind: TrackKind,
    pub label: String,
    pub language: Option<String>,
    pub channel_count: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub codec: Option<String>,
    pub is_forced: bool,
    pub is_default: bool,
    pub is_selected: bool,
}

impl TrackDescriptor {
    /// The synthetic "subtitles off" entry
    pub fn subtitle_off(selected: bool) -> Self {
        Self {
            id: SUBTITLE_OFF_ID.to_string(),
            kind: TrackKind::Subtitle,
            label: "Off".to_string(),
            language: None,
            channel_count: None,
            width: None,
            height: None,
            codec: None,
            is_forced: false,
            is_default: false,
            is_selected: selected,
        }
    }

    pub fn is_subtitle_off(&self) -> bool {
        self.kind == TrackKind::Subtitle && self.id == SUBTITLE_OFF_ID
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn track_label(kind: TrackKind, format: &TrackFormat, position: usize) -> String {
    match (non_empty(&format.label), non_empty(&format.language)) {
        (Some(label), Some(language)) => format!("{} ({})", label, language),
        (None, Some(language)) => language.to_string(),
        (Some(label), None) => label.to_string(),
        (None, None) => format!("{} Track {}", kind.title(), position + 1),
    }
}

fn track_id(kind: TrackKind, format: &TrackFormat, position: usize) -> String {
    match non_empty(&format.id) {
        Some(native) => format!("{}_{}", kind.id_prefix(), native),
        None => format!("{}_{}", kind.id_prefix(), position),
    }
}

/// Descriptor plus where it lives in the session's groups
struct TrackEntry {
    descriptor: TrackDescriptor,
    group_index: usize,
    track_index: usize,
}

pub struct TrackManager {
    session: Arc<dyn DecodeSession>,
    event_bus: EventBus,
}

impl TrackManager {
    pub fn new(session: Arc<dyn DecodeSession>, event_bus: EventBus) -> Self {
        Self { session, event_bus }
    }

    fn entries(&self, kind: TrackKind) -> Vec<TrackEntry> {
        let mut entries = Vec::new();
        let mut position = 0;
        for (group_index, group) in self.session.track_groups().iter().enumerate() {
            if group.kind != kind {
                continue;
            }
            for (track_index, format) in group.tracks.iter().enumerate() {
                entries.push(TrackEntry {
                    descriptor: TrackDescriptor {
                        id: track_id(kind, format, position),
                        kind,
                        label: track_label(kind, format, position),
                        language: non_empty(&format.language).map(str::to_string),
                        channel_count: format.channel_count,
                        width: format.width,
                        height: format.height,
                        codec: format.codec.clone(),
                        is_forced: format.is_forced,
                        is_default: format.is_default,
                        is_selected: format.selected,
                    },
                    group_index,
                    track_index,
                });
                position += 1;
            }
        }
        entries
    }

    /// All tracks of `kind`; subtitles start with the "Off" entry
    pub fn get_tracks(&self, kind: TrackKind) -> Vec<TrackDescriptor> {
        let tracks: Vec<_> = self.entries(kind).into_iter().map(|e| e.descriptor).collect();
        if kind != TrackKind::Subtitle {
            return tracks;
        }
        let none_selected = !tracks.iter().any(|t| t.is_selected);
        std::iter::once(TrackDescriptor::subtitle_off(none_selected))
            .chain(tracks)
            .collect()
    }

    /// Selected track of `kind`; for subtitles the "Off" entry when none is
    pub fn get_current_track(&self, kind: TrackKind) -> Option<TrackDescriptor> {
        let current = self
            .entries(kind)
            .into_iter()
            .map(|e| e.descriptor)
            .find(|t| t.is_selected);
        match (current, kind) {
            (None, TrackKind::Subtitle) => Some(TrackDescriptor::subtitle_off(true)),
            (current, _) => current,
        }
    }

    /// Select the track with `track_id`
    ///
    /// Returns false when the id is not in the current enumeration; tracks may
    /// change between enumeration and selection, so that is not an error.
    pub fn select_track(&self, kind: TrackKind, track_id: &str) -> bool {
        if kind == TrackKind::Subtitle && track_id == SUBTITLE_OFF_ID {
            self.session.apply_override(TrackOverride::DisableKind(kind));
            info!("Subtitles turned off");
            self.event_bus
                .emit_lossy(events::track_selected(kind, track_id));
            return true;
        }

        let Some(entry) = self
            .entries(kind)
            .into_iter()
            .find(|e| e.descriptor.id == track_id)
        else {
            debug!("Ignoring selection of unknown {} track '{}'", kind, track_id);
            self.event_bus
                .emit_lossy(events::track_selection_ignored(kind, track_id));
            return false;
        };

        self.session.apply_override(TrackOverride::Select {
            kind,
            group_index: entry.group_index,
            track_index: entry.track_index,
        });
        info!("Selected {} track '{}' ({})", kind, track_id, entry.descriptor.label);
        self.event_bus.emit_lossy(events::track_selected(kind, track_id));
        true
    }
}
