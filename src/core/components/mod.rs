pub mod module;
pub mod state;

// Re-export commonly used types
pub use module::{Module, ModuleKind};
pub use state::{ConjunctionMemory, FlipFlopState, SinkCounts};
