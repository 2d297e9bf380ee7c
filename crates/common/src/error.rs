//! Error types shared across Drillcraft crates.

/// Top-level error type for formation engine operations.
///
/// Every operator that returns one of these has left the timeline untouched.
#[derive(Debug, thiserror::Error)]
pub enum DrillError {
    #[error("Count {count} is already owned by {owner}")]
    Conflict { count: u32, owner: String },

    #[error("{operation} needs at least one selected performer")]
    EmptySelection { operation: String },

    #[error("Set not found: {id}")]
    SetNotFound { id: String },

    #[error("No active set")]
    NoActiveSet,

    #[error("No curve binding is active")]
    CurveInactive,

    #[error("Control point index {index} out of range (expected 0..3)")]
    InvalidControlPoint { index: usize },

    #[error("No set covers count {count}")]
    NoSetForCount { count: u32 },

    #[error("Rotation was captured on set {captured} but set {active} is active")]
    BaselineMismatch { captured: String, active: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using DrillError.
pub type DrillResult<T> = Result<T, DrillError>;

impl DrillError {
    pub fn conflict(count: u32, owner: impl Into<String>) -> Self {
        Self::Conflict {
            count,
            owner: owner.into(),
        }
    }

    pub fn empty_selection(operation: impl Into<String>) -> Self {
        Self::EmptySelection {
            operation: operation.into(),
        }
    }

    pub fn set_not_found(id: impl Into<String>) -> Self {
        Self::SetNotFound { id: id.into() }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error should be shown to the user as a blocking message
    /// rather than a passive hint.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Self::EmptySelection { .. } | Self::CurveInactive)
    }
}
