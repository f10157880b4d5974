use crate::core::execution::simulation_context::PulseObserver;
use crate::core::graph::ModuleGraph;
use crate::core::types::{ModuleId, Pulse};
use std::collections::BTreeMap;

/// Records the first press at which each feeder of a hub conjunction sends it a high pulse.
///
/// Combining those presses with `lcm` gives the first press at which all
/// feeders are high together, provided each feeder repeats with a fixed period
/// from its first high onward. That holds for counter-style circuits, not for
/// arbitrary graphs.
#[derive(Debug, Clone)]
pub struct CycleDetector {
    hub: ModuleId,
    first_high: BTreeMap<ModuleId, Option<u64>>,
}

impl CycleDetector {
    pub fn new<I>(hub: ModuleId, feeders: I) -> Self
    where
        I: IntoIterator<Item = ModuleId>,
    {
        Self {
            hub,
            first_high: feeders.into_iter().map(|feeder| (feeder, None)).collect(),
        }
    }

    /// Build a detector for `target` if it is fed by exactly one conjunction.
    ///
    /// Returns `None` when the shortcut does not apply.
    pub fn for_target(graph: &ModuleGraph, target: &str) -> Option<Self> {
        let hub = match graph.feeders(target) {
            [only] => only,
            _ => return None,
        };
        let memory = graph.module(hub.as_str())?.conjunction_memory()?;
        let feeders = memory.feeders().into_iter().cloned();
        Some(Self::new(hub.clone(), feeders))
    }

    pub fn hub(&self) -> &ModuleId {
        &self.hub
    }

    /// Number of feeders being tracked
    pub fn tracked(&self) -> usize {
        self.first_high.len()
    }

    pub fn is_complete(&self) -> bool {
        self.first_high.values().all(Option::is_some)
    }

    /// Feeders with their first high press, in id order
    pub fn first_highs(&self) -> Vec<(ModuleId, u64)> {
        self.first_high
            .iter()
            .filter_map(|(feeder, press)| press.map(|press| (feeder.clone(), press)))
            .collect()
    }

    /// LCM of all recorded presses, once every feeder has been seen.
    ///
    /// `None` while incomplete, or if the product overflows `u64`.
    pub fn combined_period(&self) -> Option<u64> {
        if !self.is_complete() {
            return None;
        }
        self.first_high
            .values()
            .flatten()
            .try_fold(1u64, |acc, &period| checked_lcm(acc, period))
    }
}

impl PulseObserver for CycleDetector {
    fn on_pulse(&mut self, press: u64, pulse: &Pulse) {
        if pulse.destination != self.hub || !pulse.level.is_high() {
            return;
        }
        if let Some(slot) = self.first_high.get_mut(&pulse.source) {
            if slot.is_none() {
                *slot = Some(press);
            }
        }
    }
}

pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Least common multiple; `None` on overflow. `lcm(0, x)` is 0.
pub fn checked_lcm(a: u64, b: u64) -> Option<u64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)
}
