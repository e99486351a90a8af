//! Shared media classification types
//!
//! Closed enums used by the playback engine and carried on engine events:
//! HDR tiers, audio sink classes, track kinds and spatial audio states.

use serde::{Deserialize, Serialize};

/// H.264 / AVC
pub const MIME_H264: &str = "video/avc";
/// H.265 / HEVC
pub const MIME_H265: &str = "video/hevc";
/// Dolby Vision
pub const MIME_DOLBY_VISION: &str = "video/dolby-vision";

/// True for `audio/*` mime types
pub fn is_audio_mime(mime_type: &str) -> bool {
    mime_type.trim().to_ascii_lowercase().starts_with("audio/")
}

/// Dynamic-range tier, most capable first
///
/// The derived ordering is the capability order: `DolbyVision < Hdr10Plus <
/// Hdr10 < Hlg < Sdr`. A device reporting tier `D` can display content of tier
/// `T` when `D <= T`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HdrTier {
    DolbyVision,
    Hdr10Plus,
    Hdr10,
    Hlg,
    #[default]
    Sdr,
}

impl HdrTier {
    /// All tiers, most capable first
    pub const ALL: [HdrTier; 5] = [
        HdrTier::DolbyVision,
        HdrTier::Hdr10Plus,
        HdrTier::Hdr10,
        HdrTier::Hlg,
        HdrTier::Sdr,
    ];

    /// Position in the capability order (0 = most capable)
    pub fn rank(self) -> u8 {
        match self {
            HdrTier::DolbyVision => 0,
            HdrTier::Hdr10Plus => 1,
            HdrTier::Hdr10 => 2,
            HdrTier::Hlg => 3,
            HdrTier::Sdr => 4,
        }
    }

    pub fn is_hdr(self) -> bool {
        self != HdrTier::Sdr
    }

    /// Whether a display of this tier can show content of tier `content`
    pub fn supports(self, content: HdrTier) -> bool {
        self.rank() <= content.rank()
    }

    /// Single-step degradation target mime type for content of this tier
    pub fn fallback_mime_type(self) -> Option<&'static str> {
        match self {
            HdrTier::DolbyVision | HdrTier::Hdr10Plus => Some(MIME_H265),
            HdrTier::Hdr10 => Some(MIME_H264),
            HdrTier::Hlg | HdrTier::Sdr => None,
        }
    }

    /// Human readable name for diagnostics screens
    pub fn display_name(self) -> &'static str {
        match self {
            HdrTier::DolbyVision => "Dolby Vision",
            HdrTier::Hdr10Plus => "HDR10+",
            HdrTier::Hdr10 => "HDR10",
            HdrTier::Hlg => "HLG",
            HdrTier::Sdr => "SDR",
        }
    }
}

impl std::fmt::Display for HdrTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl std::str::FromStr for HdrTier {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '+')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "dolbyvision" | "dv" => Ok(HdrTier::DolbyVision),
            "hdr10plus" | "hdr10+" => Ok(HdrTier::Hdr10Plus),
            "hdr10" | "hdr" => Ok(HdrTier::Hdr10),
            "hlg" => Ok(HdrTier::Hlg),
            "sdr" => Ok(HdrTier::Sdr),
            _ => Err(crate::Error::InvalidInput(format!("unknown HDR tier '{}'", s))),
        }
    }
}

/// Coarse category of the active audio output device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioSinkClass {
    Headphones,
    Speaker,
    Bluetooth,
    Usb,
    Hdmi,
    #[default]
    Unknown,
}

impl AudioSinkClass {
    /// Classify an output device from its product or route name
    ///
    /// Wireless tokens are checked before wired ones: "Buds" headsets report
    /// names containing "headset" too. Short tokens such as "tv" only match
    /// whole words of the name.
    pub fn from_device_name(name: &str) -> AudioSinkClass {
        let name = name.to_ascii_lowercase();
        let words: Vec<&str> = name
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let has = |tokens: &[&str]| {
            tokens.iter().any(|t| {
                if t.len() <= 3 {
                    words.contains(t)
                } else {
                    name.contains(t)
                }
            })
        };

        if has(&["bluetooth", "a2dp", "airpods", "buds"]) {
            AudioSinkClass::Bluetooth
        } else if has(&["headphone", "headset", "wired", "earphone"]) {
            AudioSinkClass::Headphones
        } else if has(&["usb"]) {
            AudioSinkClass::Usb
        } else if has(&["hdmi", "arc", "tv"]) {
            AudioSinkClass::Hdmi
        } else if has(&["speaker", "builtin", "built-in"]) {
            AudioSinkClass::Speaker
        } else {
            AudioSinkClass::Unknown
        }
    }
}

impl std::fmt::Display for AudioSinkClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioSinkClass::Headphones => write!(f, "headphones"),
            AudioSinkClass::Speaker => write!(f, "speaker"),
            AudioSinkClass::Bluetooth => write!(f, "bluetooth"),
            AudioSinkClass::Usb => write!(f, "usb"),
            AudioSinkClass::Hdmi => write!(f, "hdmi"),
            AudioSinkClass::Unknown => write!(f, "unknown"),
        }
    }
}

/// Kind of selectable track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Audio,
    Video,
    Subtitle,
}

impl TrackKind {
    /// Prefix used in track ids
    pub fn id_prefix(self) -> &'static str {
        match self {
            TrackKind::Audio => "audio",
            TrackKind::Video => "video",
            TrackKind::Subtitle => "subtitle",
        }
    }

    /// Capitalised name used in placeholder labels
    pub fn title(self) -> &'static str {
        match self {
            TrackKind::Audio => "Audio",
            TrackKind::Video => "Video",
            TrackKind::Subtitle => "Subtitle",
        }
    }
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id_prefix())
    }
}

impl std::str::FromStr for TrackKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "audio" => Ok(TrackKind::Audio),
            "video" => Ok(TrackKind::Video),
            "subtitle" | "subtitles" | "text" => Ok(TrackKind::Subtitle),
            _ => Err(crate::Error::InvalidInput(format!("unknown track kind '{}'", s))),
        }
    }
}

/// Spatial audio controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialAudioState {
    /// No effect chain exists
    #[default]
    Unbound,
    /// Waiting for the single bind retry
    PendingBind,
    /// Effect chain bound to a live session and enabled
    Bound,
    /// Effect chain (if any) kept but disabled
    Disabled,
    /// Native effect handles released
    Released,
}

impl std::fmt::Display for SpatialAudioState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpatialAudioState::Unbound => write!(f, "unbound"),
            SpatialAudioState::PendingBind => write!(f, "pending_bind"),
            SpatialAudioState::Bound => write!(f, "bound"),
            SpatialAudioState::Disabled => write!(f, "disabled"),
            SpatialAudioState::Released => write!(f, "released"),
        }
    }
}
