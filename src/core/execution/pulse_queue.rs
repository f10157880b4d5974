use crate::core::types::Pulse;
use std::collections::VecDeque;

/// FIFO of pulses waiting to be delivered.
///
/// Pulses leave in exactly the order they were scheduled; every scheduled
/// pulse gets a sequence number so log lines can be matched up.
#[derive(Debug, Default)]
pub struct PulseQueue {
    pending: VecDeque<(u64, Pulse)>,
    sequence_counter: u64,
}

impl PulseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pulse to the back of the queue
    pub fn schedule(&mut self, pulse: Pulse) {
        self.pending.push_back((self.sequence_counter, pulse));
        self.sequence_counter += 1;
    }

    /// Take the oldest pending pulse with its sequence number
    pub fn next(&mut self) -> Option<(u64, Pulse)> {
        self.pending.pop_front()
    }

    pub fn has_pulses(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Total pulses ever scheduled
    pub fn scheduled_total(&self) -> u64 {
        self.sequence_counter
    }
}
