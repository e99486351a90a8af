//! Device-profile backed capability oracle
//!
//! Loads a device description from TOML and answers oracle queries from it.
//! Used by the `jfmp-negotiate` tool to reproduce a device's negotiation
//! offline, and by tests. Session id and sink can be changed at runtime to
//! model playback creating a session or a headset being unplugged.

use super::{AudioSessionId, CapabilityOracle, DecoderCandidate, OracleError};
use crate::error::{Error, Result};
use jfmp_common::{AudioSinkClass, HdrTier};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::RwLock;
use tracing::{debug, info};

/// Device description as written in a profile file
///
/// ```toml
/// display_hdr = "hdr10"
/// audio_session_id = 0
/// audio_sink = "headphones"
///
/// [[decoders]]
/// name = "c2.qti.hevc.decoder"
/// mime_types = ["video/hevc"]
/// hardware = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Strongest tier the display reports; absent or unrecognised means unknown
    #[serde(default)]
    pub display_hdr: Option<String>,

    #[serde(default)]
    pub audio_session_id: i32,

    /// Sink class name, or a device name classified heuristically
    #[serde(default)]
    pub audio_sink: Option<String>,

    #[serde(default)]
    pub decoders: Vec<DecoderEntry>,
}

/// One decoder in a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoderEntry {
    pub name: String,
    pub mime_types: Vec<String>,
    #[serde(default)]
    pub hardware: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default)]
    pub tunneling: bool,
}

impl DecoderEntry {
    fn handles(&self, mime_type: &str, secure: bool, tunneling: bool) -> bool {
        self.mime_types
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mime_type))
            && (!secure || self.secure)
            && (!tunneling || self.tunneling)
    }
}

impl DeviceProfile {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid device profile: {}", e)))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let profile = Self::from_toml_str(&content)?;
        info!(
            "Loaded device profile from {:?} ({} decoders)",
            path,
            profile.decoders.len()
        );
        Ok(profile)
    }
}

fn parse_sink(value: &str) -> AudioSinkClass {
    match value.trim().to_ascii_lowercase().as_str() {
        "headphones" => AudioSinkClass::Headphones,
        "speaker" => AudioSinkClass::Speaker,
        "bluetooth" => AudioSinkClass::Bluetooth,
        "usb" => AudioSinkClass::Usb,
        "hdmi" => AudioSinkClass::Hdmi,
        "unknown" => AudioSinkClass::Unknown,
        _ => AudioSinkClass::from_device_name(value),
    }
}

/// Oracle answering from a [`DeviceProfile`]
#[derive(Debug)]
pub struct DeviceProfileOracle {
    display_hdr: Option<HdrTier>,
    decoders: Vec<DecoderEntry>,
    audio_session_id: AtomicI32,
    audio_sink: RwLock<Option<AudioSinkClass>>,
}

impl DeviceProfileOracle {
    pub fn new(profile: DeviceProfile) -> Self {
        let display_hdr = profile.display_hdr.as_deref().and_then(|s| {
            s.parse::<HdrTier>()
                .map_err(|e| debug!("Ignoring display_hdr in profile: {}", e))
                .ok()
        });
        Self {
            display_hdr,
            decoders: profile.decoders,
            audio_session_id: AtomicI32::new(profile.audio_session_id),
            audio_sink: RwLock::new(profile.audio_sink.as_deref().map(parse_sink)),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Ok(Self::new(DeviceProfile::load(path)?))
    }

    /// Model the decode pipeline creating (or dropping) its audio session
    pub fn set_audio_session_id(&self, session: AudioSessionId) {
        self.audio_session_id.store(session.get(), Ordering::SeqCst);
    }

    /// Model an output route change
    pub fn set_audio_sink(&self, sink: AudioSinkClass) {
        let mut guard = self.audio_sink.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(sink);
    }
}

impl CapabilityOracle for DeviceProfileOracle {
    fn query_device_hdr_capability(&self) -> std::result::Result<HdrTier, OracleError> {
        self.display_hdr
            .ok_or_else(|| OracleError::Unsupported("display HDR capability not reported".into()))
    }

    fn query_decoder_candidates(
        &self,
        mime_type: &str,
        secure: bool,
        tunneling: bool,
    ) -> std::result::Result<Vec<DecoderCandidate>, OracleError> {
        Ok(self
            .decoders
            .iter()
            .filter(|d| d.handles(mime_type, secure, tunneling))
            .map(|d| DecoderCandidate::new(d.name.clone(), mime_type, d.hardware))
            .collect())
    }

    fn audio_session_id(&self) -> AudioSessionId {
        AudioSessionId(self.audio_session_id.load(Ordering::SeqCst))
    }

    fn connected_audio_sink_class(&self) -> std::result::Result<AudioSinkClass, OracleError> {
        let guard = self.audio_sink.read().unwrap_or_else(|e| e.into_inner());
        guard.ok_or_else(|| OracleError::QueryFailed("audio route not reported".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"
display_hdr = "HDR10"
audio_sink = "Pixel Buds Pro"

[[decoders]]
name = "c2.qti.hevc.decoder"
mime_types = ["video/hevc"]
hardware = true
secure = true

[[decoders]]
name = "c2.android.hevc.decoder"
mime_types = ["video/hevc"]

[[decoders]]
name = "c2.android.avc.decoder"
mime_types = ["video/avc"]
"#;

    #[test]
    fn test_profile_queries() {
        let oracle = DeviceProfileOracle::new(DeviceProfile::from_toml_str(PROFILE).unwrap());

        assert_eq!(oracle.query_device_hdr_capability().unwrap(), HdrTier::Hdr10);
        assert_eq!(
            oracle.connected_audio_sink_class().unwrap(),
            AudioSinkClass::Bluetooth
        );
        assert!(!oracle.audio_session_id().is_available());

        let hevc = oracle.query_decoder_candidates("video/HEVC", false, false).unwrap();
        let names: Vec<_> = hevc.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["c2.qti.hevc.decoder", "c2.android.hevc.decoder"]);

        let secure = oracle.query_decoder_candidates("video/hevc", true, false).unwrap();
        assert_eq!(secure.len(), 1);
        assert!(secure[0].is_hardware_accelerated);

        assert!(oracle
            .query_decoder_candidates("video/hevc", false, true)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_unrecognised_display_tier_is_unknown() {
        let oracle = DeviceProfileOracle::new(
            DeviceProfile::from_toml_str("display_hdr = \"ultra\"").unwrap(),
        );
        assert!(oracle.query_device_hdr_capability().is_err());
        assert!(oracle.connected_audio_sink_class().is_err());
    }

    #[test]
    fn test_runtime_session_and_route_changes() {
        let oracle = DeviceProfileOracle::new(DeviceProfile::default());
        oracle.set_audio_session_id(AudioSessionId(42));
        oracle.set_audio_sink(AudioSinkClass::Speaker);
        assert_eq!(oracle.audio_session_id(), AudioSessionId(42));
        assert_eq!(
            oracle.connected_audio_sink_class().unwrap(),
            AudioSinkClass::Speaker
        );
    }
}
