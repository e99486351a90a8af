//! Format resolver
//!
//! Decides which format will actually be decoded given the content format,
//! the display's strongest tier and the user's HDR switch. Never fails: the
//! worst case is H.264/SDR, which every device is assumed to play.

use super::analyzer::VideoFormatDescriptor;
use jfmp_common::media::{MIME_H264, MIME_H265};
use jfmp_common::HdrTier;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Outcome of format resolution for one playback start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackFormatResolution {
    pub requested: VideoFormatDescriptor,
    pub effective: VideoFormatDescriptor,
    pub downgraded: bool,
}

impl PlaybackFormatResolution {
    /// Mime type handed to decoder selection
    pub fn effective_mime_type(&self) -> &str {
        &self.effective.mime_type
    }
}

/// Resolve the playable format for `content` on a display of tier `device`
pub fn resolve(
    content: &VideoFormatDescriptor,
    device: HdrTier,
    hdr_enabled: bool,
) -> PlaybackFormatResolution {
    if !hdr_enabled && content.tier.is_hdr() {
        // HDR switched off: one step straight to an SDR path
        let mime = if content.tier == HdrTier::DolbyVision {
            MIME_H265
        } else {
            MIME_H264
        };
        let effective = VideoFormatDescriptor {
            tier: HdrTier::Sdr,
            fallback_mime_type: None,
            color_transfer: None,
            color_space: None,
            ..content.degraded_to(mime)
        };
        info!(
            "HDR disabled by policy: {} -> {}",
            content.describe(),
            effective.describe()
        );
        return PlaybackFormatResolution {
            requested: content.clone(),
            effective,
            downgraded: true,
        };
    }

    if device.supports(content.tier) {
        debug!(
            "Display ({}) supports {}, no downgrade",
            device,
            content.describe()
        );
        return PlaybackFormatResolution {
            requested: content.clone(),
            effective: content.clone(),
            downgraded: false,
        };
    }

    let mut effective = content.clone();
    while effective.tier.rank() < device.rank() {
        effective = match effective.fallback_mime_type.as_deref() {
            Some(mime) => effective.degraded_to(mime),
            // No table entry left: drop to the universal baseline
            None => VideoFormatDescriptor::baseline(),
        };
        debug!("Fallback step -> {}", effective.describe());
    }

    info!(
        "Display ({}) cannot show {}, downgraded to {}",
        device,
        content.describe(),
        effective.describe()
    );

    PlaybackFormatResolution {
        requested: content.clone(),
        effective,
        downgraded: true,
    }
}
