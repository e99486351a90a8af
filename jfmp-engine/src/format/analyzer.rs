//! Format analyzer
//!
//! Pure, total classification of a content item's video format. Absent or
//! unrecognised inputs degrade to H.264/SDR; nothing here can fail.

use jfmp_common::media::{MIME_DOLBY_VISION, MIME_H264, MIME_H265};
use jfmp_common::HdrTier;
use serde::{Deserialize, Serialize};

/// Classified video format of one content item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoFormatDescriptor {
    pub mime_type: String,
    pub codec_tag: Option<String>,
    pub color_transfer: Option<String>,
    pub color_space: Option<String>,
    pub tier: HdrTier,
    /// Single-step degradation target for `tier`
    pub fallback_mime_type: Option<String>,
}

impl VideoFormatDescriptor {
    /// Universally playable baseline: H.264/SDR
    pub fn baseline() -> Self {
        Self {
            mime_type: MIME_H264.to_string(),
            codec_tag: None,
            color_transfer: None,
            color_space: None,
            tier: HdrTier::Sdr,
            fallback_mime_type: None,
        }
    }

    /// Format reached by degrading to `mime_type`
    ///
    /// H.265 keeps the static HDR10 base layer; anything else is SDR.
    pub fn degraded_to(&self, mime_type: &str) -> Self {
        if mime_type.eq_ignore_ascii_case(MIME_H265) {
            let tier = HdrTier::Hdr10;
            Self {
                mime_type: MIME_H265.to_string(),
                codec_tag: None,
                color_transfer: self.color_transfer.clone(),
                color_space: self.color_space.clone(),
                tier,
                fallback_mime_type: tier.fallback_mime_type().map(str::to_string),
            }
        } else {
            Self {
                mime_type: mime_type.to_ascii_lowercase(),
                ..Self::baseline()
            }
        }
    }

    /// UI label, e.g. `"HDR10 (video/hevc)"`
    pub fn describe(&self) -> String {
        format!("{} ({})", self.tier.display_name(), self.mime_type)
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Tier classification cascade, first match wins
fn classify_tier(mime: &str, codec: &str, color: &str) -> HdrTier {
    if mime == MIME_DOLBY_VISION || contains_any(codec, &["dvhe", "dvh1", "dolby"]) {
        HdrTier::DolbyVision
    } else if contains_any(codec, &["hev1", "hvc1"]) || contains_any(color, &["smpte2084", "bt2020"])
    {
        HdrTier::Hdr10Plus
    } else if mime == MIME_H265 || contains_any(codec, &["hev", "h265"]) {
        HdrTier::Hdr10
    } else if contains_any(color, &["arib-std-b67", "hlg"]) {
        HdrTier::Hlg
    } else {
        HdrTier::Sdr
    }
}

fn color_transfer_of(color: &str) -> Option<String> {
    if color.contains("smpte2084") || color.contains("pq") {
        Some("smpte2084".to_string())
    } else if color.contains("arib-std-b67") || color.contains("hlg") {
        Some("arib-std-b67".to_string())
    } else if color.contains("bt709") {
        Some("bt709".to_string())
    } else {
        None
    }
}

fn color_space_of(color: &str) -> Option<String> {
    if color.contains("bt2020") {
        Some("bt2020".to_string())
    } else if color.contains("bt709") {
        Some("bt709".to_string())
    } else {
        None
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Classify a content item's video format
///
/// `mime_type` defaults to H.264 when absent. Matching on codec and color
/// strings is case-insensitive.
pub fn analyze(
    mime_type: Option<&str>,
    codec: Option<&str>,
    color_info: Option<&str>,
) -> VideoFormatDescriptor {
    let mime = non_blank(mime_type)
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| MIME_H264.to_string());
    let codec_tag = non_blank(codec).map(str::to_string);
    let codec_lc = codec_tag.as_deref().unwrap_or("").to_ascii_lowercase();
    let color_lc = non_blank(color_info).unwrap_or("").to_ascii_lowercase();

    let tier = classify_tier(&mime, &codec_lc, &color_lc);

    VideoFormatDescriptor {
        mime_type: mime,
        codec_tag,
        color_transfer: color_transfer_of(&color_lc),
        color_space: color_space_of(&color_lc),
        tier,
        fallback_mime_type: tier.fallback_mime_type().map(str::to_string),
    }
}
