use crate::core::components::module::{Module, ModuleKind};
use crate::core::components::state::SinkCounts;
use crate::core::errors::{SimError, SimResult};
use crate::core::graph::ModuleGraph;
use crate::core::types::ModuleId;
use log::debug;
use std::collections::{BTreeSet, HashMap, HashSet};

const BROADCASTER_NAME: &str = "broadcaster";
const FLIP_FLOP_PREFIX: char = '%';
const CONJUNCTION_PREFIX: char = '&';
const SEPARATOR: &str = "->";

/// Variant requested by a wiring declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredKind {
    Broadcaster,
    FlipFlop,
    Conjunction,
    /// No prefix and not the broadcaster; instantiated as a sink
    Untyped,
}

impl DeclaredKind {
    /// Split a raw source token like `%a` into its variant and bare name
    fn from_token(token: &str) -> (Self, &str) {
        if let Some(name) = token.strip_prefix(FLIP_FLOP_PREFIX) {
            (DeclaredKind::FlipFlop, name)
        } else if let Some(name) = token.strip_prefix(CONJUNCTION_PREFIX) {
            (DeclaredKind::Conjunction, name)
        } else if token == BROADCASTER_NAME {
            (DeclaredKind::Broadcaster, token)
        } else {
            (DeclaredKind::Untyped, token)
        }
    }
}

#[derive(Debug, Clone)]
struct Declaration {
    name: ModuleId,
    kind: DeclaredKind,
    outputs: Vec<ModuleId>,
}

/// Two-pass constructor for a [`ModuleGraph`].
///
/// Declarations are accumulated first so that every conjunction can be
/// seeded with its complete feeder set when `build` instantiates modules.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    declarations: Vec<Declaration>,
    declared: HashSet<ModuleId>,
    /// destination -> modules whose outputs include it
    feeder_index: HashMap<ModuleId, BTreeSet<ModuleId>>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run pass 1 over a whole wiring text
    pub fn parse(text: &str) -> SimResult<Self> {
        let mut builder = Self::new();
        for (index, raw) in text.lines().enumerate() {
            builder.add_line(index + 1, raw)?;
        }
        Ok(builder)
    }

    /// Parse one `<prefix><name> -> <dest>, <dest>` line. Blank lines are skipped.
    pub fn add_line(&mut self, line_number: usize, raw: &str) -> SimResult<()> {
        let line = raw.trim();
        if line.is_empty() {
            return Ok(());
        }

        let (source, destinations) = line
            .split_once(SEPARATOR)
            .ok_or_else(|| SimError::parse(line_number, line, "missing '->' separator"))?;

        let (kind, name) = DeclaredKind::from_token(source.trim());
        if name.is_empty() {
            return Err(SimError::parse(line_number, line, "empty module name"));
        }

        let mut outputs = Vec::new();
        for dest in destinations.split(',') {
            let dest = dest.trim().trim_start_matches([FLIP_FLOP_PREFIX, CONJUNCTION_PREFIX]);
            if dest.is_empty() {
                return Err(SimError::parse(line_number, line, "empty destination name"));
            }
            outputs.push(ModuleId::from(dest));
        }

        self.declare(kind, name, outputs)
            .map_err(|reason| SimError::parse(line_number, line, reason))
    }

    /// Add one module declaration and record its out-edges in the feeder index
    pub fn declare(
        &mut self,
        kind: DeclaredKind,
        name: &str,
        outputs: Vec<ModuleId>,
    ) -> Result<(), String> {
        let name = ModuleId::from(name);
        if !self.declared.insert(name.clone()) {
            return Err(format!("module '{}' is declared more than once", name));
        }

        for dest in &outputs {
            self.feeder_index
                .entry(dest.clone())
                .or_default()
                .insert(name.clone());
        }

        self.declarations.push(Declaration {
            name,
            kind,
            outputs,
        });
        Ok(())
    }

    /// Modules pointing at `id`, as known so far
    pub fn feeders_of(&self, id: &str) -> Vec<&ModuleId> {
        self.feeder_index
            .get(id)
            .map(|feeders| feeders.iter().collect())
            .unwrap_or_default()
    }

    /// Pass 2: instantiate every module and resolve dangling destinations to sinks
    pub fn build(self) -> SimResult<ModuleGraph> {
        let mut modules: HashMap<ModuleId, Module> = HashMap::new();

        for decl in &self.declarations {
            let module = match decl.kind {
                DeclaredKind::Broadcaster => {
                    Module::broadcaster(decl.name.clone(), decl.outputs.clone())
                }
                DeclaredKind::FlipFlop => {
                    Module::flip_flop(decl.name.clone(), decl.outputs.clone())
                }
                DeclaredKind::Conjunction => {
                    let feeders = self
                        .feeder_index
                        .get(&decl.name)
                        .map(|feeders| feeders.iter().cloned().collect::<Vec<_>>())
                        .unwrap_or_default();
                    Module::conjunction(decl.name.clone(), feeders, decl.outputs.clone())
                }
                // keeps its outputs so the feeder index matches, but never emits
                DeclaredKind::Untyped => Module::new(
                    decl.name.clone(),
                    ModuleKind::Sink(SinkCounts::new()),
                    decl.outputs.clone(),
                ),
            };
            modules.insert(decl.name.clone(), module);
        }

        let mut implicit_sinks = 0;
        for decl in &self.declarations {
            for dest in &decl.outputs {
                if !modules.contains_key(dest) {
                    modules.insert(dest.clone(), Module::sink(dest.clone()));
                    implicit_sinks += 1;
                }
            }
        }

        debug!(
            "Built module graph: {} declared, {} implicit sinks",
            self.declarations.len(),
            implicit_sinks
        );

        let feeders = self
            .feeder_index
            .into_iter()
            .map(|(dest, feeders)| (dest, feeders.into_iter().collect()))
            .collect();

        ModuleGraph::new(modules, feeders)
    }
}
