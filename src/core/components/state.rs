use crate::core::types::{ModuleId, PulseLevel};
use serde::Serialize;
use std::collections::HashMap;

/// Power state of a flip-flop module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FlipFlopState {
    #[default]
    Off,
    On,
}

impl FlipFlopState {
    pub fn toggled(self) -> Self {
        match self {
            FlipFlopState::Off => FlipFlopState::On,
            FlipFlopState::On => FlipFlopState::Off,
        }
    }

    /// Level a flip-flop emits right after entering this state
    pub fn output_level(self) -> PulseLevel {
        match self {
            FlipFlopState::On => PulseLevel::High,
            FlipFlopState::Off => PulseLevel::Low,
        }
    }
}

/// Last level seen from each feeder of a conjunction.
///
/// The key set is fixed when the graph is built; `record` refuses sources
/// outside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConjunctionMemory {
    remembered: HashMap<ModuleId, PulseLevel>,
}

impl ConjunctionMemory {
    /// Seed every feeder with `Low`
    pub fn new<I>(feeders: I) -> Self
    where
        I: IntoIterator<Item = ModuleId>,
    {
        Self {
            remembered: feeders
                .into_iter()
                .map(|feeder| (feeder, PulseLevel::Low))
                .collect(),
        }
    }

    /// Store the latest level from `source`. Returns false if `source` is not a feeder.
    pub fn record(&mut self, source: &ModuleId, level: PulseLevel) -> bool {
        match self.remembered.get_mut(source) {
            Some(slot) => {
                *slot = level;
                true
            }
            None => false,
        }
    }

    pub fn all_high(&self) -> bool {
        self.remembered.values().all(|level| level.is_high())
    }

    pub fn get(&self, source: &str) -> Option<PulseLevel> {
        self.remembered.get(source).copied()
    }

    pub fn feeder_count(&self) -> usize {
        self.remembered.len()
    }

    /// Feeder ids in sorted order
    pub fn feeders(&self) -> Vec<&ModuleId> {
        let mut feeders: Vec<&ModuleId> = self.remembered.keys().collect();
        feeders.sort();
        feeders
    }
}

/// Pulses received by a sink module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SinkCounts {
    pub high: u64,
    pub low: u64,
}

impl SinkCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, level: PulseLevel) {
        match level {
            PulseLevel::High => self.high += 1,
            PulseLevel::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.high + self.low
    }
}
