//! Scripted capability oracle

use jfmp_common::{AudioSinkClass, HdrTier};
use jfmp_engine::oracle::{AudioSessionId, CapabilityOracle, DecoderCandidate, OracleError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Oracle answering from in-memory tables
///
/// `display_hdr` of `None` and `sink` of `None` model failing queries.
pub struct MockOracle {
    display_hdr: Mutex<Option<HdrTier>>,
    decoders: Mutex<HashMap<String, Vec<DecoderCandidate>>>,
    session_id: AtomicI32,
    sink: Mutex<Option<AudioSinkClass>>,
    decoder_queries: AtomicUsize,
}

impl MockOracle {
    pub fn new() -> Self {
        Self {
            display_hdr: Mutex::new(None),
            decoders: Mutex::new(HashMap::new()),
            session_id: AtomicI32::new(0),
            sink: Mutex::new(None),
            decoder_queries: AtomicUsize::new(0),
        }
    }

    pub fn with_display(self, tier: HdrTier) -> Self {
        *self.display_hdr.lock().unwrap() = Some(tier);
        self
    }

    /// Register decoders for `mime`: `(name, hardware flag)` in enumeration order
    pub fn with_decoders(self, mime: &str, decoders: &[(&str, bool)]) -> Self {
        let list = decoders
            .iter()
            .map(|(name, hw)| DecoderCandidate::new(*name, mime, *hw))
            .collect();
        self.decoders.lock().unwrap().insert(mime.to_string(), list);
        self
    }

    pub fn with_session(self, id: i32) -> Self {
        self.session_id.store(id, Ordering::SeqCst);
        self
    }

    pub fn with_sink(self, sink: AudioSinkClass) -> Self {
        *self.sink.lock().unwrap() = Some(sink);
        self
    }

    pub fn set_session(&self, id: i32) {
        self.session_id.store(id, Ordering::SeqCst);
    }

    pub fn set_sink(&self, sink: AudioSinkClass) {
        *self.sink.lock().unwrap() = Some(sink);
    }

    pub fn decoder_queries(&self) -> usize {
        self.decoder_queries.load(Ordering::SeqCst)
    }
}

impl CapabilityOracle for MockOracle {
    fn query_device_hdr_capability(&self) -> Result<HdrTier, OracleError> {
        self.display_hdr
            .lock()
            .unwrap()
            .ok_or_else(|| OracleError::Unsupported("no display info".to_string()))
    }

    fn query_decoder_candidates(
        &self,
        mime_type: &str,
        _secure: bool,
        _tunneling: bool,
    ) -> Result<Vec<DecoderCandidate>, OracleError> {
        self.decoder_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .decoders
            .lock()
            .unwrap()
            .get(mime_type)
            .cloned()
            .unwrap_or_default())
    }

    fn audio_session_id(&self) -> AudioSessionId {
        AudioSessionId(self.session_id.load(Ordering::SeqCst))
    }

    fn connected_audio_sink_class(&self) -> Result<AudioSinkClass, OracleError> {
        self.sink
            .lock()
            .unwrap()
            .ok_or_else(|| OracleError::QueryFailed("no route".to_string()))
    }
}
