use crate::core::builder::graph_builder::GraphBuilder;
use crate::core::components::module::{Module, ModuleKind};
use crate::core::errors::{SimError, SimResult};
use crate::core::types::{ModuleId, Pulse};
use std::collections::HashMap;

/// All modules of a circuit keyed by id, plus the in-edges of every module.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    modules: HashMap<ModuleId, Module>,
    /// module -> sorted list of modules whose outputs include it
    feeders: HashMap<ModuleId, Vec<ModuleId>>,
}

impl ModuleGraph {
    /// Assemble a graph, checking that every destination resolves and that
    /// every conjunction has at least one feeder.
    pub fn new(
        modules: HashMap<ModuleId, Module>,
        mut feeders: HashMap<ModuleId, Vec<ModuleId>>,
    ) -> SimResult<Self> {
        for module in modules.values() {
            for dest in module.outputs() {
                if !modules.contains_key(dest) {
                    return Err(SimError::UnknownModule(dest.clone()));
                }
            }
            if let Some(memory) = module.conjunction_memory() {
                if memory.feeder_count() == 0 {
                    return Err(SimError::GraphInvariant(format!(
                        "Conjunction '{}' has no feeders",
                        module.id()
                    )));
                }
            }
        }

        for list in feeders.values_mut() {
            list.sort();
            list.dedup();
        }

        Ok(Self { modules, feeders })
    }

    /// Parse wiring text and build the graph in one step
    pub fn parse(text: &str) -> SimResult<Self> {
        GraphBuilder::parse(text)?.build()
    }

    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    /// Modules whose outputs include `id`, sorted by id
    pub fn feeders(&self, id: &str) -> &[ModuleId] {
        self.feeders.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All module ids, sorted
    pub fn module_ids(&self) -> Vec<&ModuleId> {
        let mut ids: Vec<&ModuleId> = self.modules.keys().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Deliver a pulse to its destination and return the pulses it causes
    pub(crate) fn deliver(&mut self, pulse: &Pulse) -> SimResult<Vec<Pulse>> {
        let module = self
            .modules
            .get_mut(&pulse.destination)
            .ok_or_else(|| SimError::UnknownModule(pulse.destination.clone()))?;

        let emitted = module.receive(pulse.level, &pulse.source)?;
        Ok(emitted
            .into_iter()
            .map(|(level, dest)| Pulse::new(level, pulse.destination.clone(), dest))
            .collect())
    }

    /// Count modules by variant
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            total_modules: self.modules.len(),
            ..GraphStats::default()
        };
        for module in self.modules.values() {
            match module.kind() {
                ModuleKind::Broadcaster => stats.broadcasters += 1,
                ModuleKind::FlipFlop(_) => stats.flip_flops += 1,
                ModuleKind::Conjunction(_) => stats.conjunctions += 1,
                ModuleKind::Sink(_) => stats.sinks += 1,
            }
            stats.total_edges += module.outputs().len();
        }
        stats
    }
}

/// Statistics about a module graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub total_modules: usize,
    pub broadcasters: usize,
    pub flip_flops: usize,
    pub conjunctions: usize,
    pub sinks: usize,
    pub total_edges: usize,
}
