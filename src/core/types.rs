use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Unique module name within a graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(String);

impl ModuleId {
    /// Create a new module ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ModuleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Two-level signal carried by a pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PulseLevel {
    Low,
    High,
}

impl PulseLevel {
    pub fn is_high(self) -> bool {
        matches!(self, PulseLevel::High)
    }
}

impl std::fmt::Display for PulseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PulseLevel::Low => write!(f, "low"),
            PulseLevel::High => write!(f, "high"),
        }
    }
}

/// A single pulse in flight between two modules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pulse {
    pub level: PulseLevel,
    pub source: ModuleId,
    pub destination: ModuleId,
}

impl Pulse {
    pub fn new(level: PulseLevel, source: ModuleId, destination: ModuleId) -> Self {
        Self {
            level,
            source,
            destination,
        }
    }
}

impl std::fmt::Display for Pulse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -{}-> {}", self.source, self.level, self.destination)
    }
}
