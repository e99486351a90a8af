//! Capability oracle
//!
//! Narrow query surface over the OS media framework: display HDR capability,
//! decoder enumeration, the live audio session id and the active audio sink.
//! The engine owns no state behind these queries. Failed queries are never
//! surfaced to callers; the `*_or_default` helpers map them to the weakest
//! capability.

mod profile;

pub use profile::{DecoderEntry, DeviceProfile, DeviceProfileOracle};

use jfmp_common::{AudioSinkClass, HdrTier};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Platform audio session identifier, `0` while the session is not ready
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AudioSessionId(pub i32);

impl AudioSessionId {
    pub const UNAVAILABLE: AudioSessionId = AudioSessionId(0);

    pub fn is_available(self) -> bool {
        self.0 != 0
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for AudioSessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A concrete decoder implementation reported by the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderCandidate {
    pub name: String,
    pub mime_type: String,
    /// Platform-reported acceleration flag, when the platform provides one
    pub is_hardware_accelerated: bool,
}

impl DecoderCandidate {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, hardware: bool) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            is_hardware_accelerated: hardware,
        }
    }
}

/// Failure of a single platform query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// Platform version does not offer the query
    #[error("Query unsupported on this platform: {0}")]
    Unsupported(String),

    /// The query was attempted and failed
    #[error("Capability query failed: {0}")]
    QueryFailed(String),
}

/// Platform capability queries
pub trait CapabilityOracle: Send + Sync {
    /// Strongest HDR tier the active display reports
    fn query_device_hdr_capability(&self) -> Result<HdrTier, OracleError>;

    /// Decoders able to handle `mime_type` under the given constraints, in
    /// platform enumeration order
    fn query_decoder_candidates(
        &self,
        mime_type: &str,
        secure: bool,
        tunneling: bool,
    ) -> Result<Vec<DecoderCandidate>, OracleError>;

    /// Live audio session id, [`AudioSessionId::UNAVAILABLE`] until playback
    /// has created one
    fn audio_session_id(&self) -> AudioSessionId;

    /// Class of the currently connected audio output
    fn connected_audio_sink_class(&self) -> Result<AudioSinkClass, OracleError>;
}

/// Display tier, `Sdr` when unknown
pub fn device_hdr_capability_or_default(oracle: &dyn CapabilityOracle) -> HdrTier {
    oracle.query_device_hdr_capability().unwrap_or_else(|e| {
        debug!("HDR capability unknown ({}), assuming SDR", e);
        HdrTier::Sdr
    })
}

/// Decoder candidates, empty when the query fails
pub fn decoder_candidates_or_default(
    oracle: &dyn CapabilityOracle,
    mime_type: &str,
    secure: bool,
    tunneling: bool,
) -> Vec<DecoderCandidate> {
    oracle
        .query_decoder_candidates(mime_type, secure, tunneling)
        .unwrap_or_else(|e| {
            debug!("Decoder enumeration for {} failed ({}), treating as none", mime_type, e);
            Vec::new()
        })
}

/// Audio sink class, `Unknown` when the query fails
pub fn audio_sink_class_or_default(oracle: &dyn CapabilityOracle) -> AudioSinkClass {
    oracle.connected_audio_sink_class().unwrap_or_else(|e| {
        debug!("Audio sink unknown ({})", e);
        AudioSinkClass::Unknown
    })
}
