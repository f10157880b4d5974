//! Configuration for pulse simulation runs
//!
//! A `SimulationContext` reads the number of presses for the counting run,
//! the broadcaster and button names, and how far the activation fallback may search.

use serde::{Deserialize, Serialize};

/// Presses made by the pulse-counting run
pub const DEFAULT_PRESS_COUNT: u64 = 1000;
/// Upper bound on presses for the unbounded activation fallback
pub const DEFAULT_FALLBACK_PRESS_LIMIT: u64 = 10_000_000;

/// Configuration for a simulation run
///
/// Names are plain strings so the configuration can be deserialized from any
/// serde format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of button presses for the counting run
    pub press_count: u64,
    /// Module that receives the button pulse
    pub broadcaster: String,
    /// Synthetic sender of the button pulse
    pub button: String,
    /// Module whose activation is searched for
    pub activation_target: String,
    /// Maximum presses the activation fallback simulates; `None` means no limit
    pub fallback_press_limit: Option<u64>,
}

impl SimulationConfig {
    /// Create a new simulation configuration with default values
    pub fn new() -> Self {
        Self {
            press_count: DEFAULT_PRESS_COUNT,
            broadcaster: "broadcaster".to_string(),
            button: "button".to_string(),
            activation_target: "rx".to_string(),
            fallback_press_limit: Some(DEFAULT_FALLBACK_PRESS_LIMIT),
        }
    }

    /// Set the number of presses for the counting run
    pub fn with_press_count(mut self, presses: u64) -> Self {
        self.press_count = presses;
        self
    }

    /// Set the module that receives button pulses
    pub fn with_broadcaster(mut self, name: impl Into<String>) -> Self {
        self.broadcaster = name.into();
        self
    }

    /// Set the module whose activation is searched for
    pub fn with_activation_target(mut self, name: impl Into<String>) -> Self {
        self.activation_target = name.into();
        self
    }

    /// Bound the activation fallback
    ///
    /// # Note
    /// Only used when the target is not fed by a single conjunction.
    pub fn with_fallback_press_limit(mut self, limit: Option<u64>) -> Self {
        self.fallback_press_limit = limit;
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}
