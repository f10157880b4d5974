use super::types::ModuleId;

/// Errors raised while building or simulating a module graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Malformed wiring declaration
    Parse {
        line_number: usize,
        line: String,
        reason: String,
    },
    /// The graph breaks a structural rule the simulator depends on
    GraphInvariant(String),
    /// An operation referenced a module that is not in the graph
    UnknownModule(ModuleId),
    /// The fallback activation search ran out of presses
    PressLimitExceeded { limit: u64 },
    /// Activation search started on a context that has already been pressed
    ContextNotFresh { presses: u64 },
}

impl SimError {
    pub(crate) fn parse(line_number: usize, line: &str, reason: impl Into<String>) -> Self {
        SimError::Parse {
            line_number,
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::Parse {
                line_number,
                line,
                reason,
            } => write!(f, "Parse error on line {} ({:?}): {}", line_number, line, reason),
            SimError::GraphInvariant(msg) => write!(f, "Graph invariant violated: {}", msg),
            SimError::UnknownModule(id) => write!(f, "Unknown module: {}", id),
            SimError::PressLimitExceeded { limit } => {
                write!(f, "Target not activated within {} presses", limit)
            }
            SimError::ContextNotFresh { presses } => write!(
                f,
                "Activation search needs a fresh context, {} presses already made",
                presses
            ),
        }
    }
}

impl std::error::Error for SimError {}

pub type SimResult<T> = Result<T, SimError>;
