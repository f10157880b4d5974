pub mod core;

// Re-export commonly used types
pub use crate::core::builder::GraphBuilder;
pub use crate::core::components::{Module, ModuleKind};
pub use crate::core::errors::{SimError, SimResult};
pub use crate::core::execution::{
    run_presses, run_until_activation, ActivationReport, PulseCounts, SimulationConfig,
    SimulationContext,
};
pub use crate::core::graph::ModuleGraph;
pub use crate::core::types::{ModuleId, Pulse, PulseLevel};
