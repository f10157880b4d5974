use super::state::{ConjunctionMemory, FlipFlopState, SinkCounts};
use crate::core::errors::{SimError, SimResult};
use crate::core::types::{ModuleId, PulseLevel};

/// Behavioural variant of a module together with the state that variant needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleKind {
    Broadcaster,
    FlipFlop(FlipFlopState),
    Conjunction(ConjunctionMemory),
    Sink(SinkCounts),
}

impl ModuleKind {
    pub fn is_conjunction(&self) -> bool {
        matches!(self, ModuleKind::Conjunction(_))
    }

    pub fn is_sink(&self) -> bool {
        matches!(self, ModuleKind::Sink(_))
    }
}

/// A named node in the module graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    id: ModuleId,
    kind: ModuleKind,
    outputs: Vec<ModuleId>,
}

impl Module {
    pub fn new(id: ModuleId, kind: ModuleKind, outputs: Vec<ModuleId>) -> Self {
        Self { id, kind, outputs }
    }

    pub fn broadcaster(id: impl Into<ModuleId>, outputs: Vec<ModuleId>) -> Self {
        Self::new(id.into(), ModuleKind::Broadcaster, outputs)
    }

    pub fn flip_flop(id: impl Into<ModuleId>, outputs: Vec<ModuleId>) -> Self {
        Self::new(id.into(), ModuleKind::FlipFlop(FlipFlopState::Off), outputs)
    }

    pub fn conjunction<I>(id: impl Into<ModuleId>, feeders: I, outputs: Vec<ModuleId>) -> Self
    where
        I: IntoIterator<Item = ModuleId>,
    {
        Self::new(
            id.into(),
            ModuleKind::Conjunction(ConjunctionMemory::new(feeders)),
            outputs,
        )
    }

    pub fn sink(id: impl Into<ModuleId>) -> Self {
        Self::new(id.into(), ModuleKind::Sink(SinkCounts::new()), Vec::new())
    }

    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    pub fn kind(&self) -> &ModuleKind {
        &self.kind
    }

    pub fn outputs(&self) -> &[ModuleId] {
        &self.outputs
    }

    pub fn flip_flop_state(&self) -> Option<FlipFlopState> {
        match &self.kind {
            ModuleKind::FlipFlop(state) => Some(*state),
            _ => None,
        }
    }

    pub fn conjunction_memory(&self) -> Option<&ConjunctionMemory> {
        match &self.kind {
            ModuleKind::Conjunction(memory) => Some(memory),
            _ => None,
        }
    }

    pub fn sink_counts(&self) -> Option<SinkCounts> {
        match &self.kind {
            ModuleKind::Sink(counts) => Some(*counts),
            _ => None,
        }
    }

    /// Deliver one pulse and return what the module emits, in output order.
    pub fn receive(
        &mut self,
        level: PulseLevel,
        source: &ModuleId,
    ) -> SimResult<Vec<(PulseLevel, ModuleId)>> {
        let emitted = match &mut self.kind {
            ModuleKind::Broadcaster => Some(level),
            ModuleKind::FlipFlop(state) => match level {
                PulseLevel::High => None,
                PulseLevel::Low => {
                    *state = state.toggled();
                    Some(state.output_level())
                }
            },
            ModuleKind::Conjunction(memory) => {
                if !memory.record(source, level) {
                    return Err(SimError::GraphInvariant(format!(
                        "Conjunction '{}' received a pulse from '{}', which is not one of its feeders",
                        self.id, source
                    )));
                }
                if memory.all_high() {
                    Some(PulseLevel::Low)
                } else {
                    Some(PulseLevel::High)
                }
            }
            ModuleKind::Sink(counts) => {
                counts.increment(level);
                None
            }
        };

        Ok(match emitted {
            Some(out) => self.outputs.iter().map(|dest| (out, dest.clone())).collect(),
            None => Vec::new(),
        })
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ModuleKind::Broadcaster => write!(f, "Module({} - broadcaster)", self.id),
            ModuleKind::FlipFlop(state) => write!(f, "Module({} - {:?})", self.id, state),
            ModuleKind::Conjunction(memory) => {
                let remembered: Vec<String> = memory
                    .feeders()
                    .into_iter()
                    .map(|feeder| {
                        let level = memory.get(feeder.as_str()).unwrap_or(PulseLevel::Low);
                        format!("{}={}", feeder, level)
                    })
                    .collect();
                write!(f, "Module({} - {{{}}})", self.id, remembered.join(", "))
            }
            ModuleKind::Sink(counts) => write!(
                f,
                "Module({} - low={}, high={})",
                self.id, counts.low, counts.high
            ),
        }
    }
}
