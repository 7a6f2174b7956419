/// Error types.
///
/// Only `CommandError` ever reaches the host. Hardware failures are logged
/// and turned into a cancelled session; a missing actuator is not an error
/// at all (every operation degrades to a no-op).

/// A primitive actuator call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActuatorError {
    #[error("waveform rejected: {0}")]
    Waveform(String),
    #[error("one-shot actuation failed: {0}")]
    Actuate(String),
    #[error("stop failed: {0}")]
    Stop(String),
    #[error("actuator unavailable")]
    Unavailable,
}

/// Argument validation failure at the command boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("{0} is required")]
    MissingArgument(&'static str),
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
}

impl CommandError {
    /// Stable code surfaced to the host alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::MissingArgument(_) | CommandError::InvalidArgument { .. } => "INVALID_ARGS",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("haptic engine must be initialised inside a tokio runtime")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
