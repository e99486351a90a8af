//! Effect handles that record every native call

use jfmp_engine::oracle::AudioSessionId;
use jfmp_engine::spatial::{
    AudioEffect, BassBoost, EffectError, EffectFactory, EffectResult, Equalizer, Virtualizer,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Virtualizer,
    BassBoost,
    Equalizer,
}

/// Call log shared by the factory and every handle it creates
#[derive(Debug, Default)]
pub struct EffectCounters {
    created: Mutex<HashMap<EffectKind, usize>>,
    released: Mutex<HashMap<EffectKind, usize>>,
    enabled: Mutex<HashMap<EffectKind, bool>>,
    strengths: Mutex<Vec<(EffectKind, u16)>>,
    band_levels: Mutex<Vec<(u16, i16)>>,
    sessions: Mutex<Vec<i32>>,
}

impl EffectCounters {
    pub fn created(&self, kind: EffectKind) -> usize {
        *self.created.lock().unwrap().get(&kind).unwrap_or(&0)
    }

    pub fn released(&self, kind: EffectKind) -> usize {
        *self.released.lock().unwrap().get(&kind).unwrap_or(&0)
    }

    pub fn total_created(&self) -> usize {
        self.created.lock().unwrap().values().sum()
    }

    pub fn total_released(&self) -> usize {
        self.released.lock().unwrap().values().sum()
    }

    /// Last enabled flag set on `kind`, `None` if never set
    pub fn is_enabled(&self, kind: EffectKind) -> Option<bool> {
        self.enabled.lock().unwrap().get(&kind).copied()
    }

    pub fn strength(&self, kind: EffectKind) -> Option<u16> {
        self.strengths
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(k, _)| *k == kind)
            .map(|(_, s)| *s)
    }

    pub fn band_levels(&self) -> Vec<(u16, i16)> {
        self.band_levels.lock().unwrap().clone()
    }

    /// Sessions effects were created for, in order
    pub fn sessions(&self) -> Vec<i32> {
        self.sessions.lock().unwrap().clone()
    }

    fn bump(map: &Mutex<HashMap<EffectKind, usize>>, kind: EffectKind) {
        *map.lock().unwrap().entry(kind).or_insert(0) += 1;
    }
}

struct MockHandle {
    kind: EffectKind,
    counters: Arc<EffectCounters>,
}

impl AudioEffect for MockHandle {
    fn set_enabled(&mut self, enabled: bool) -> EffectResult<()> {
        self.counters
            .enabled
            .lock()
            .unwrap()
            .insert(self.kind, enabled);
        Ok(())
    }

    fn release(&mut self) {
        EffectCounters::bump(&self.counters.released, self.kind);
    }
}

impl Virtualizer for MockHandle {
    fn set_strength(&mut self, strength: u16) -> EffectResult<()> {
        self.counters
            .strengths
            .lock()
            .unwrap()
            .push((self.kind, strength));
        Ok(())
    }
}

impl BassBoost for MockHandle {
    fn set_strength(&mut self, strength: u16) -> EffectResult<()> {
        self.counters
            .strengths
            .lock()
            .unwrap()
            .push((self.kind, strength));
        Ok(())
    }
}

/// Five-band equalizer with typical platform center frequencies
const EQ_CENTERS_HZ: [u32; 5] = [60, 230, 910, 3_600, 14_000];

impl Equalizer for MockHandle {
    fn band_count(&self) -> u16 {
        EQ_CENTERS_HZ.len() as u16
    }

    fn center_frequency_hz(&self, band: u16) -> EffectResult<u32> {
        EQ_CENTERS_HZ
            .get(band as usize)
            .copied()
            .ok_or_else(|| EffectError::OperationFailed(format!("no band {}", band)))
    }

    fn band_level_range(&self) -> EffectResult<(i16, i16)> {
        Ok((-1500, 1500))
    }

    fn set_band_level(&mut self, band: u16, millibels: i16) -> EffectResult<()> {
        self.counters
            .band_levels
            .lock()
            .unwrap()
            .push((band, millibels));
        Ok(())
    }
}

/// Factory producing [`MockHandle`]s; selected kinds can be made to fail
#[derive(Default)]
pub struct MockEffectFactory {
    counters: Arc<EffectCounters>,
    failing: Mutex<HashSet<EffectKind>>,
}

impl MockEffectFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(self, kind: EffectKind) -> Self {
        self.failing.lock().unwrap().insert(kind);
        self
    }

    pub fn counters(&self) -> Arc<EffectCounters> {
        self.counters.clone()
    }

    fn create(&self, kind: EffectKind, session: AudioSessionId) -> EffectResult<MockHandle> {
        if self.failing.lock().unwrap().contains(&kind) {
            return Err(EffectError::CreationFailed(format!("{:?} refused", kind)));
        }
        EffectCounters::bump(&self.counters.created, kind);
        self.counters.sessions.lock().unwrap().push(session.get());
        Ok(MockHandle {
            kind,
            counters: self.counters.clone(),
        })
    }
}

impl EffectFactory for MockEffectFactory {
    fn create_virtualizer(&self, session: AudioSessionId) -> EffectResult<Box<dyn Virtualizer>> {
        Ok(Box::new(self.create(EffectKind::Virtualizer, session)?))
    }

    fn create_bass_boost(&self, session: AudioSessionId) -> EffectResult<Box<dyn BassBoost>> {
        Ok(Box::new(self.create(EffectKind::BassBoost, session)?))
    }

    fn create_equalizer(&self, session: AudioSessionId) -> EffectResult<Box<dyn Equalizer>> {
        Ok(Box::new(self.create(EffectKind::Equalizer, session)?))
    }
}
