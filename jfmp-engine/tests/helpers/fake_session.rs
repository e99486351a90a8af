//! Decode session double with mutable track state
//!
//! Applies overrides the way the pipeline would: selecting a track clears the
//! other selections of its kind, disabling a kind clears all of them.

use jfmp_common::TrackKind;
use jfmp_engine::tracks::{DecodeSession, TrackFormat, TrackGroup, TrackOverride};
use std::sync::Mutex;

pub struct FakeDecodeSession {
    groups: Mutex<Vec<TrackGroup>>,
    overrides: Mutex<Vec<TrackOverride>>,
}

impl FakeDecodeSession {
    pub fn new(groups: Vec<TrackGroup>) -> Self {
        Self {
            groups: Mutex::new(groups),
            overrides: Mutex::new(Vec::new()),
        }
    }

    /// Movie with two audio languages and two subtitle tracks, English
    /// audio and English subtitles selected
    pub fn movie() -> Self {
        Self::new(vec![
            TrackGroup {
                kind: TrackKind::Video,
                tracks: vec![TrackFormatBuilder::new()
                    .id("1")
                    .codec("hevc")
                    .size(3840, 2160)
                    .selected()
                    .build()],
            },
            TrackGroup {
                kind: TrackKind::Audio,
                tracks: vec![
                    TrackFormatBuilder::new()
                        .id("2")
                        .label("TrueHD Atmos")
                        .language("en")
                        .channels(8)
                        .selected()
                        .build(),
                    TrackFormatBuilder::new().id("3").language("de").channels(6).build(),
                ],
            },
            TrackGroup {
                kind: TrackKind::Subtitle,
                tracks: vec![TrackFormatBuilder::new()
                    .id("4")
                    .language("en")
                    .selected()
                    .build()],
            },
            TrackGroup {
                kind: TrackKind::Subtitle,
                tracks: vec![TrackFormatBuilder::new().label("Signs").forced().build()],
            },
        ])
    }

    pub fn overrides(&self) -> Vec<TrackOverride> {
        self.overrides.lock().unwrap().clone()
    }

    /// Replace the track groups, as a content change would
    pub fn replace_groups(&self, groups: Vec<TrackGroup>) {
        *self.groups.lock().unwrap() = groups;
    }
}

impl DecodeSession for FakeDecodeSession {
    fn track_groups(&self) -> Vec<TrackGroup> {
        self.groups.lock().unwrap().clone()
    }

    fn apply_override(&self, track_override: TrackOverride) {
        let mut groups = self.groups.lock().unwrap();
        match track_override {
            TrackOverride::Select {
                kind,
                group_index,
                track_index,
            } => {
                for (g, group) in groups.iter_mut().enumerate() {
                    if group.kind != kind {
                        continue;
                    }
                    for (t, track) in group.tracks.iter_mut().enumerate() {
                        track.selected = g == group_index && t == track_index;
                    }
                }
            }
            TrackOverride::DisableKind(kind) => {
                for group in groups.iter_mut().filter(|g| g.kind == kind) {
                    for track in group.tracks.iter_mut() {
                        track.selected = false;
                    }
                }
            }
        }
        self.overrides.lock().unwrap().push(track_override);
    }
}

/// Builder for [`TrackFormat`] test data
#[derive(Default)]
pub struct TrackFormatBuilder {
    format: TrackFormat,
}

impl TrackFormatBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: &str) -> Self {
        self.format.id = Some(id.to_string());
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.format.label = Some(label.to_string());
        self
    }

    pub fn language(mut self, language: &str) -> Self {
        self.format.language = Some(language.to_string());
        self
    }

    pub fn channels(mut self, channels: u32) -> Self {
        self.format.channel_count = Some(channels);
        self
    }

    pub fn codec(mut self, codec: &str) -> Self {
        self.format.codec = Some(codec.to_string());
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.format.width = Some(width);
        self.format.height = Some(height);
        self
    }

    pub fn forced(mut self) -> Self {
        self.format.is_forced = true;
        self
    }

    pub fn selected(mut self) -> Self {
        self.format.selected = true;
        self
    }

    pub fn build(self) -> TrackFormat {
        self.format
    }
}
