//! Decoder selector
//!
//! Pure and synchronous: runs on the decode pipeline's format-negotiation
//! callback, so it performs no I/O beyond the oracle's in-memory queries and
//! never blocks. An empty result is a valid answer; the caller turns it into a
//! playback-start failure.

use super::classifier::HardwareClassifier;
use crate::oracle::{decoder_candidates_or_default, CapabilityOracle, DecoderCandidate};
use jfmp_common::media::{is_audio_mime, MIME_DOLBY_VISION, MIME_H264, MIME_H265};
use jfmp_common::{DecoderPriority, DecoderSelectionPolicy};
use std::sync::Arc;
use tracing::{debug, info};

/// Cascade walked when Dolby Vision cannot be decoded directly
const DOLBY_VISION_CASCADE: [&str; 2] = [MIME_H265, MIME_H264];

fn is_dolby_vision(mime_type: &str) -> bool {
    mime_type.eq_ignore_ascii_case(MIME_DOLBY_VISION)
}

fn is_hdr_tagged(mime_type: &str) -> bool {
    let mime = mime_type.to_ascii_lowercase();
    is_dolby_vision(&mime) || mime.contains("hdr") || mime.contains("dolby-vision")
}

/// Stable partition of `candidates` into hardware and software subsets,
/// concatenated in policy order
///
/// Each subset keeps its input order.
pub fn rank_candidates(
    candidates: Vec<DecoderCandidate>,
    mime_type: &str,
    policy: &DecoderSelectionPolicy,
    classifier: &dyn HardwareClassifier,
) -> Vec<DecoderCandidate> {
    let (hardware, software): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| classifier.is_hardware(c));

    let software_first = if !policy.hardware_acceleration_enabled {
        true
    } else {
        match policy.priority {
            DecoderPriority::SoftwareFirst => true,
            DecoderPriority::HardwareFirst => false,
            // Reference software decoders for audio quality, hardware for video throughput
            DecoderPriority::Auto => is_audio_mime(mime_type),
        }
    };

    let (first, second) = if software_first {
        (software, hardware)
    } else {
        (hardware, software)
    };
    first.into_iter().chain(second).collect()
}

/// Selects and ranks decoders through the capability oracle
#[derive(Clone)]
pub struct DecoderSelector {
    oracle: Arc<dyn CapabilityOracle>,
    classifier: Arc<dyn HardwareClassifier>,
}

impl DecoderSelector {
    pub fn new(oracle: Arc<dyn CapabilityOracle>, classifier: Arc<dyn HardwareClassifier>) -> Self {
        Self { oracle, classifier }
    }

    /// Ranked decoder candidates for `mime_type`, possibly empty
    pub fn select_decoders(
        &self,
        mime_type: &str,
        requires_secure_decoder: bool,
        requires_tunneling_decoder: bool,
        policy: &DecoderSelectionPolicy,
    ) -> Vec<DecoderCandidate> {
        let query = |mime: &str| {
            decoder_candidates_or_default(
                self.oracle.as_ref(),
                mime,
                requires_secure_decoder,
                requires_tunneling_decoder,
            )
        };

        let candidates = if !policy.hdr_enabled && is_hdr_tagged(mime_type) {
            debug!("HDR disabled, skipping direct lookup for {}", mime_type);
            self.cascade(&query)
        } else {
            let direct = query(mime_type);
            if direct.is_empty() && is_dolby_vision(mime_type) {
                info!("No Dolby Vision decoder, falling back through H.265/H.264");
                self.cascade(&query)
            } else {
                direct
            }
        };

        if candidates.is_empty() {
            debug!("No decoder candidates for {}", mime_type);
            return candidates;
        }

        let ranked = rank_candidates(candidates, mime_type, policy, self.classifier.as_ref());
        debug!(
            "Ranked decoders for {} ({:?}, hw={}): {:?}",
            mime_type,
            policy.priority,
            policy.hardware_acceleration_enabled,
            ranked.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
        );
        ranked
    }

    /// Whether any hardware decoder exists for `mime_type`
    pub fn has_hardware_decoder(&self, mime_type: &str) -> bool {
        decoder_candidates_or_default(self.oracle.as_ref(), mime_type, false, false)
            .iter()
            .any(|c| self.classifier.is_hardware(c))
    }

    fn cascade(&self, query: &dyn Fn(&str) -> Vec<DecoderCandidate>) -> Vec<DecoderCandidate> {
        for mime in DOLBY_VISION_CASCADE {
            let candidates = query(mime);
            if !candidates.is_empty() {
                debug!("Fallback cascade settled on {}", mime);
                return candidates;
            }
        }
        Vec::new()
    }
}
