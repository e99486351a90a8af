//! Effect parameter presets keyed by output route and content class

use super::content::ContentClass;
use jfmp_common::AudioSinkClass;
use serde::{Deserialize, Serialize};

/// Equalizer shape applied on headphones
///
/// Three regions: below `low_edge_hz`, `low_edge_hz..=presence_edge_hz`, and
/// above `presence_edge_hz`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualizerCurve {
    pub low_edge_hz: u32,
    pub presence_edge_hz: u32,
    pub low_millibels: i16,
    pub presence_millibels: i16,
    pub high_millibels: i16,
}

impl EqualizerCurve {
    /// Tames sub-bass and lifts the vocal/presence range
    pub const HEADPHONE_CLARITY: EqualizerCurve = EqualizerCurve {
        low_edge_hz: 250,
        presence_edge_hz: 4_000,
        low_millibels: -200,
        presence_millibels: 300,
        high_millibels: 0,
    };

    /// Level for a band centered at `freq_hz`, clamped to `range`
    pub fn level_for(&self, freq_hz: u32, range: (i16, i16)) -> i16 {
        let level = if freq_hz < self.low_edge_hz {
            self.low_millibels
        } else if freq_hz <= self.presence_edge_hz {
            self.presence_millibels
        } else {
            self.high_millibels
        };
        let (min, max) = if range.0 <= range.1 {
            range
        } else {
            (range.1, range.0)
        };
        level.clamp(min, max)
    }
}

/// Parameters for one effect chain; `None` leaves that effect out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectPreset {
    pub virtualizer_strength: Option<u16>,
    pub bass_boost_strength: Option<u16>,
    pub equalizer: Option<EqualizerCurve>,
}

impl EffectPreset {
    pub fn select(sink: AudioSinkClass, content: ContentClass) -> EffectPreset {
        match sink {
            AudioSinkClass::Headphones => EffectPreset {
                virtualizer_strength: Some(match content {
                    ContentClass::Movie => 1000,
                    ContentClass::Music => 800,
                    ContentClass::Speech => 600,
                }),
                bass_boost_strength: Some(200),
                equalizer: Some(EqualizerCurve::HEADPHONE_CLARITY),
            },
            AudioSinkClass::Speaker => EffectPreset {
                virtualizer_strength: Some(300),
                bass_boost_strength: Some(100),
                equalizer: None,
            },
            AudioSinkClass::Bluetooth
            | AudioSinkClass::Usb
            | AudioSinkClass::Hdmi
            | AudioSinkClass::Unknown => EffectPreset {
                virtualizer_strength: Some(500),
                bass_boost_strength: None,
                equalizer: None,
            },
        }
    }
}
