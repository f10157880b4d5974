pub mod config;
pub mod cycle_detector;
pub mod pulse_queue;
pub mod simulation_context;

// Re-export commonly used types
pub use config::SimulationConfig;
pub use cycle_detector::CycleDetector;
pub use pulse_queue::PulseQueue;
pub use simulation_context::{
    run_presses, run_until_activation, ActivationMethod, ActivationReport, PulseCounts,
    PulseObserver, SimulationContext,
};
