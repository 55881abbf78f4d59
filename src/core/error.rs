//! Typed errors for the pure computation core.

/// Errors returned by the computation routines in `core`.
///
/// The fetch and rendering layers carry errors as `anyhow`; this enum exists
/// so callers of the pure functions can tell malformed input apart from a
/// too-short series without string matching.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComputeError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("insufficient data: need {needed} values, got {got}")]
    InsufficientData { needed: usize, got: usize },
}

impl ComputeError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        ComputeError::InvalidInput {
            reason: reason.into(),
        }
    }
}
