//! Content classification for spatial audio
//!
//! Two questions are answered here: whether content is worth spatializing at
//! all, and which preset family fits it.

use serde::{Deserialize, Serialize};

/// Coarse content category used to pick effect presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentClass {
    #[default]
    Movie,
    Music,
    Speech,
}

impl std::fmt::Display for ContentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentClass::Movie => write!(f, "movie"),
            ContentClass::Music => write!(f, "music"),
            ContentClass::Speech => write!(f, "speech"),
        }
    }
}

/// What the caller knows about the content being played
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialContent {
    /// Audio format string as reported by the server, e.g. "TrueHD Atmos 7.1"
    pub format: Option<String>,
    pub has_dolby_atmos: bool,
    pub has_surround: bool,
    /// Platform spatializer reports it can process this stream
    pub can_spatialize: bool,
    /// No video track
    pub audio_only: bool,
    /// Free-form genre or media type hint, e.g. "podcast"
    pub content_hint: Option<String>,
}

const SPATIAL_FORMAT_TOKENS: &[&str] = &[
    "atmos",
    "dts:x",
    "dts-x",
    "5.1",
    "7.1",
    "360 reality",
    "mpeg-h",
    "auro-3d",
];

/// True when `format` names a channel count of three or more ("6ch", "8 channels")
fn has_multichannel_token(format: &str) -> bool {
    let bytes = format.as_bytes();
    let mut search_from = 0;
    while let Some(offset) = format[search_from..].find("ch") {
        let at = search_from + offset;
        search_from = at + 2;

        let mut end = at;
        while end > 0 && matches!(bytes[end - 1], b' ' | b'-' | b'_') {
            end -= 1;
        }
        let mut start = end;
        while start > 0 && bytes[start - 1].is_ascii_digit() {
            start -= 1;
        }
        if start == end {
            continue;
        }
        if let Ok(channels) = format[start..end].parse::<u32>() {
            if channels >= 3 {
                return true;
            }
        }
    }
    false
}

/// Whether a format string names a spatial or multichannel audio format
pub fn format_is_spatial(format: &str) -> bool {
    let format = format.to_ascii_lowercase();
    SPATIAL_FORMAT_TOKENS.iter().any(|t| format.contains(t))
        || has_multichannel_token(&format)
        || (format.contains("object") && format.contains("audio"))
}

/// Whether spatial processing should run for this content
pub fn is_spatial_eligible(content: &SpatialContent) -> bool {
    content.has_dolby_atmos
        || content.has_surround
        || content.can_spatialize
        || content.format.as_deref().is_some_and(format_is_spatial)
}

/// Strategy deciding the content class for preset selection
pub trait ContentClassifier: Send + Sync {
    fn classify(&self, content: &SpatialContent) -> ContentClass;
}

/// Treats everything as a movie
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeMovieClassifier;

impl ContentClassifier for AssumeMovieClassifier {
    fn classify(&self, _content: &SpatialContent) -> ContentClass {
        ContentClass::Movie
    }
}

/// Uses the caller's hints: speech hints win, then audio-only means music
#[derive(Debug, Clone, Copy, Default)]
pub struct HintContentClassifier;

const SPEECH_HINTS: &[&str] = &["podcast", "audiobook", "speech", "talk", "news", "lecture"];

impl ContentClassifier for HintContentClassifier {
    fn classify(&self, content: &SpatialContent) -> ContentClass {
        let hint = content
            .content_hint
            .as_deref()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if SPEECH_HINTS.iter().any(|t| hint.contains(t)) {
            ContentClass::Speech
        } else if content.audio_only || hint.contains("music") {
            ContentClass::Music
        } else {
            ContentClass::Movie
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_format(format: &str) -> SpatialContent {
        SpatialContent {
            format: Some(format.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_spatial_format_tokens() {
        for format in [
            "TrueHD Atmos",
            "DTS:X",
            "dts-x master audio",
            "AC3 5.1",
            "EAC3 7.1",
            "Sony 360 Reality Audio",
            "MPEG-H 3D",
            "Auro-3D",
            "PCM 8ch",
            "FLAC 6 channels",
            "Object-based audio",
        ] {
            assert!(format_is_spatial(format), "{} should be spatial", format);
        }
    }

    #[test]
    fn test_plain_formats_not_spatial() {
        for format in ["AAC stereo", "MP3", "PCM 2ch", "FLAC 1 channel", "object"] {
            assert!(!format_is_spatial(format), "{} should not be spatial", format);
        }
    }

    #[test]
    fn test_eligibility_flags() {
        assert!(!is_spatial_eligible(&with_format("AAC stereo")));
        assert!(is_spatial_eligible(&SpatialContent {
            can_spatialize: true,
            ..with_format("AAC stereo")
        }));
        assert!(is_spatial_eligible(&SpatialContent {
            has_dolby_atmos: true,
            ..Default::default()
        }));
        assert!(!is_spatial_eligible(&SpatialContent::default()));
    }

    #[test]
    fn test_hint_classifier() {
        let classifier = HintContentClassifier;
        assert_eq!(classifier.classify(&SpatialContent::default()), ContentClass::Movie);
        assert_eq!(
            classifier.classify(&SpatialContent {
                audio_only: true,
                ..Default::default()
            }),
            ContentClass::Music
        );
        assert_eq!(
            classifier.classify(&SpatialContent {
                audio_only: true,
                content_hint: Some("Podcast".to_string()),
                ..Default::default()
            }),
            ContentClass::Speech
        );
        assert_eq!(
            AssumeMovieClassifier.classify(&SpatialContent {
                audio_only: true,
                ..Default::default()
            }),
            ContentClass::Movie
        );
    }
}
