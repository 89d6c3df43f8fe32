//! Debugger session errors.

use crate::core::{HistoryError, StepIndex};
use thiserror::Error;

/// Errors that can occur while navigating a session.
///
/// `E` is the rewrite engine's own error type. Engine failures are passed
/// through untouched in [`DebugError::Engine`].
#[derive(Debug, Error)]
pub enum DebugError<E: std::error::Error + 'static> {
    /// The request cannot be expressed as a step index
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Recomputing a step produced a term that contradicts recorded history
    #[error("determinism violation at step {index}: {source}")]
    DeterminismViolation {
        index: StepIndex,
        #[source]
        source: HistoryError,
    },

    /// A determinism violation already made this session unusable
    #[error("session is unusable after a determinism violation at step {index}")]
    Poisoned { index: StepIndex },

    /// The rewrite engine itself failed
    #[error("rewrite engine failed: {0}")]
    Engine(#[source] E),
}

impl<E: std::error::Error + 'static> DebugError<E> {
    /// Check if this error leaves the session unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DeterminismViolation { .. } | Self::Poisoned { .. })
    }

    /// The engine's error, if the engine is what failed.
    pub fn into_engine_error(self) -> Option<E> {
        match self {
            Self::Engine(err) => Some(err),
            _ => None,
        }
    }
}

impl<E: std::error::Error + 'static> From<HistoryError> for DebugError<E> {
    fn from(source: HistoryError) -> Self {
        Self::DeterminismViolation {
            index: source.index(),
            source,
        }
    }
}
