use super::config::SimulationConfig;
use super::cycle_detector::CycleDetector;
use super::pulse_queue::PulseQueue;
use crate::core::errors::{SimError, SimResult};
use crate::core::graph::ModuleGraph;
use crate::core::types::{ModuleId, Pulse, PulseLevel};
use log::{debug, info, trace};
use serde::Serialize;
use uuid::Uuid;

/// Observer trait for pulse deliveries
pub trait PulseObserver {
    /// Called after each pulse is delivered during press `press`
    fn on_pulse(&mut self, press: u64, pulse: &Pulse);

    /// Called once the queue has drained for press `press`
    fn on_press_complete(&mut self, _press: u64, _delivered: u64) {}
}

/// Low and high pulses delivered during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PulseCounts {
    pub low: u64,
    pub high: u64,
}

impl PulseCounts {
    pub fn record(&mut self, level: PulseLevel) {
        match level {
            PulseLevel::Low => self.low += 1,
            PulseLevel::High => self.high += 1,
        }
    }

    /// `low + high`; `None` on overflow
    pub fn total(&self) -> Option<u64> {
        self.low.checked_add(self.high)
    }

    /// `low * high`; `None` on overflow
    pub fn product(&self) -> Option<u64> {
        self.low.checked_mul(self.high)
    }
}

/// How an activation press count was obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ActivationMethod {
    /// LCM over the first high press of every feeder of `hub`
    CycleDetection {
        hub: ModuleId,
        first_highs: Vec<(ModuleId, u64)>,
    },
    /// Pressed until the target saw a low pulse
    Simulation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivationReport {
    pub target: ModuleId,
    pub presses: u64,
    pub method: ActivationMethod,
}

/// Watches for a low pulse arriving at one module
struct LowPulseWatch {
    target: ModuleId,
    seen: bool,
}

impl PulseObserver for LowPulseWatch {
    fn on_pulse(&mut self, _press: u64, pulse: &Pulse) {
        if pulse.level == PulseLevel::Low && pulse.destination == self.target {
            self.seen = true;
        }
    }
}

/// One simulation run over a module graph.
///
/// Owns the graph, the pulse queue and the run counters. Create one per run
/// and drop it afterwards; nothing is shared between contexts.
pub struct SimulationContext {
    run_id: Uuid,
    graph: ModuleGraph,
    config: SimulationConfig,
    queue: PulseQueue,
    counts: PulseCounts,
    presses: u64,
    observers: Vec<Box<dyn PulseObserver>>,
}

impl SimulationContext {
    pub fn new(graph: ModuleGraph) -> Self {
        Self::with_config(graph, SimulationConfig::default())
    }

    pub fn with_config(graph: ModuleGraph, config: SimulationConfig) -> Self {
        let run_id = Uuid::new_v4();
        info!(
            "[{}] New simulation over {} modules",
            run_id,
            graph.len()
        );
        Self {
            run_id,
            graph,
            config,
            queue: PulseQueue::new(),
            counts: PulseCounts::default(),
            presses: 0,
            observers: Vec::new(),
        }
    }

    /// Add an observer that sees every pulse for the rest of the run
    pub fn add_observer(&mut self, observer: Box<dyn PulseObserver>) {
        self.observers.push(observer);
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn counts(&self) -> PulseCounts {
        self.counts
    }

    /// Presses made so far
    pub fn press_count(&self) -> u64 {
        self.presses
    }

    /// Press the button once and let the circuit settle
    pub fn press(&mut self) -> SimResult<u64> {
        self.settle(None)
    }

    /// Press the button once, also reporting every pulse to `observer`
    pub fn press_with(&mut self, observer: &mut dyn PulseObserver) -> SimResult<u64> {
        self.settle(Some(observer))
    }

    /// Inject one button pulse and drain the queue completely.
    /// Returns the number of pulses delivered during this press.
    fn settle(&mut self, mut extra: Option<&mut dyn PulseObserver>) -> SimResult<u64> {
        let broadcaster = ModuleId::from(self.config.broadcaster.as_str());
        if !self.graph.contains(broadcaster.as_str()) {
            return Err(SimError::UnknownModule(broadcaster));
        }

        self.presses += 1;
        let press = self.presses;
        self.queue.schedule(Pulse::new(
            PulseLevel::Low,
            ModuleId::from(self.config.button.as_str()),
            broadcaster,
        ));

        let mut delivered = 0u64;
        while let Some((seq, pulse)) = self.queue.next() {
            trace!("[{}] press {} #{}: {}", self.run_id, press, seq, pulse);

            let emitted = self.graph.deliver(&pulse)?;
            self.counts.record(pulse.level);
            delivered += 1;

            for observer in &mut self.observers {
                observer.on_pulse(press, &pulse);
            }
            if let Some(observer) = extra.as_deref_mut() {
                observer.on_pulse(press, &pulse);
            }

            for next in emitted {
                self.queue.schedule(next);
            }
        }

        for observer in &mut self.observers {
            observer.on_press_complete(press, delivered);
        }
        if let Some(observer) = extra.as_deref_mut() {
            observer.on_press_complete(press, delivered);
        }

        debug!(
            "[{}] press {} settled: {} pulses (low={}, high={})",
            self.run_id, press, delivered, self.counts.low, self.counts.high
        );
        Ok(delivered)
    }

    /// Press the button `n` times and return the counts accumulated by this run
    pub fn run_presses(&mut self, n: u64) -> SimResult<PulseCounts> {
        for _ in 0..n {
            self.press()?;
        }
        info!(
            "[{}] {} presses: low={}, high={}",
            self.run_id, n, self.counts.low, self.counts.high
        );
        Ok(self.counts)
    }

    /// Run the configured number of presses
    pub fn run_configured_presses(&mut self) -> SimResult<PulseCounts> {
        self.run_presses(self.config.press_count)
    }

    /// Find the first press at which `target` receives a low pulse.
    ///
    /// When `target` is fed by a single conjunction, the feeders of that
    /// conjunction are assumed to fire periodically and their first high
    /// presses are combined with LCM. Otherwise presses are simulated one by
    /// one, up to the configured fallback limit.
    ///
    /// Press indices are counted from the initial state, so the context must
    /// not have been pressed yet.
    pub fn run_until_activation(&mut self, target: &str) -> SimResult<ActivationReport> {
        if !self.graph.contains(target) {
            return Err(SimError::UnknownModule(ModuleId::from(target)));
        }
        if self.presses > 0 {
            return Err(SimError::ContextNotFresh {
                presses: self.presses,
            });
        }

        match CycleDetector::for_target(&self.graph, target) {
            Some(detector) => self.detect_cycles(target, detector),
            None => {
                info!(
                    "[{}] '{}' is not fed by a single conjunction, simulating presses",
                    self.run_id, target
                );
                self.simulate_until_low(target)
            }
        }
    }

    fn detect_cycles(
        &mut self,
        target: &str,
        mut detector: CycleDetector,
    ) -> SimResult<ActivationReport> {
        info!(
            "[{}] Tracking {} feeders of '{}'",
            self.run_id,
            detector.tracked(),
            detector.hub()
        );

        while !detector.is_complete() {
            self.check_press_limit()?;
            self.press_with(&mut detector)?;
        }

        let presses = detector.combined_period().ok_or_else(|| {
            SimError::GraphInvariant(format!(
                "activation period of '{}' does not fit in u64",
                target
            ))
        })?;
        let first_highs = detector.first_highs();
        info!(
            "[{}] First high presses {:?}, activation at {}",
            self.run_id, first_highs, presses
        );

        Ok(ActivationReport {
            target: ModuleId::from(target),
            presses,
            method: ActivationMethod::CycleDetection {
                hub: detector.hub().clone(),
                first_highs,
            },
        })
    }

    fn simulate_until_low(&mut self, target: &str) -> SimResult<ActivationReport> {
        let mut watch = LowPulseWatch {
            target: ModuleId::from(target),
            seen: false,
        };
        while !watch.seen {
            self.check_press_limit()?;
            self.press_with(&mut watch)?;
        }

        info!(
            "[{}] '{}' activated after {} presses",
            self.run_id, target, self.presses
        );
        Ok(ActivationReport {
            target: watch.target,
            presses: self.presses,
            method: ActivationMethod::Simulation,
        })
    }

    fn check_press_limit(&self) -> SimResult<()> {
        match self.config.fallback_press_limit {
            Some(limit) if self.presses >= limit => Err(SimError::PressLimitExceeded { limit }),
            _ => Ok(()),
        }
    }
}

/// Run `n` presses on a fresh context and discard it
pub fn run_presses(graph: ModuleGraph, n: u64) -> SimResult<PulseCounts> {
    SimulationContext::new(graph).run_presses(n)
}

/// Search for the activation press of `target` on a fresh context and discard it
pub fn run_until_activation(graph: ModuleGraph, target: &str) -> SimResult<u64> {
    SimulationContext::new(graph)
        .run_until_activation(target)
        .map(|report| report.presses)
}
