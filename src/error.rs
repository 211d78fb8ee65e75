//! Error types surfaced by the emitter API.
//!
//! There is a single enum, [`EmitterError`], with two kinds:
//!
//! - [`EmitterError::InvalidArgument`] — the call could not be normalized into
//!   a valid bind/unbind/emit operation (empty key name, emitting a pattern
//!   or wildcard spec, ...). Raised before any state is touched.
//! - [`EmitterError::Killed`] — the instance was finalized by
//!   [`Emitter::kill`](crate::Emitter::kill) and rejects further mutation.
//!
//! Handler failures are deliberately **not** an engine error kind: a panicking
//! handler unwinds straight to the `emit` caller, and the engine performs no
//! catching or suppression.

use thiserror::Error;

/// # Errors produced by the dispatch engine.
///
/// Every fallible `Emitter`/`Binder` operation returns `Result<_, EmitterError>`.
/// Rejection is atomic: when an error is returned, no registry was mutated.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EmitterError {
    /// The arguments could not be resolved into a valid operation.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the call.
        reason: String,
    },

    /// The emitter was finalized by `kill()` and is terminal.
    #[error("emitter was killed; no further registration or emission is accepted")]
    Killed,
}

impl EmitterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use herald::EmitterError;
    ///
    /// let err = EmitterError::Killed;
    /// assert_eq!(err.as_label(), "emitter_killed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EmitterError::InvalidArgument { .. } => "invalid_argument",
            EmitterError::Killed => "emitter_killed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            EmitterError::InvalidArgument { reason } => format!("invalid argument: {reason}"),
            EmitterError::Killed => "emitter killed".to_string(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        EmitterError::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl From<regex::Error> for EmitterError {
    fn from(err: regex::Error) -> Self {
        EmitterError::invalid(format!("bad pattern: {err}"))
    }
}
