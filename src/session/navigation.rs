//! Result of a navigation command.

use crate::core::{StepIndex, Term};
use std::sync::Arc;

/// Where a navigation command left the session.
///
/// The resulting index may be smaller than the requested one when the
/// engine halted first.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationResult<S: Term> {
    state: Arc<S>,
    index: StepIndex,
    requested: StepIndex,
    terminated: bool,
}

impl<S: Term> NavigationResult<S> {
    pub(crate) fn new(
        state: Arc<S>,
        index: StepIndex,
        requested: StepIndex,
        terminated: bool,
    ) -> Self {
        Self {
            state,
            index,
            requested,
            terminated,
        }
    }

    /// Term at the resulting index.
    pub fn current_state(&self) -> &S {
        &self.state
    }

    /// Shared handle to the term at the resulting index.
    pub fn shared_state(&self) -> Arc<S> {
        Arc::clone(&self.state)
    }

    /// Absolute step index actually reached.
    pub fn current_index(&self) -> StepIndex {
        self.index
    }

    /// Absolute step index the command asked for.
    pub fn requested_index(&self) -> StepIndex {
        self.requested
    }

    /// Whether the resulting index is where the engine halts.
    ///
    /// Only a halt the engine has already reported counts. Landing exactly
    /// on the final term reports `false` until a later command asks the
    /// engine for the step after it; from then on the same index reports
    /// `true`.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Whether execution halted before the requested index.
    pub fn stopped_early(&self) -> bool {
        self.index < self.requested
    }
}
