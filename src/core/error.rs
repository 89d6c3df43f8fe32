//! History store error types.

use super::term::StepIndex;
use thiserror::Error;

/// Contradictions detected while recording history.
///
/// Both variants mean the engine is not deterministic for this program.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HistoryError {
    /// A different term is already recorded at this index
    #[error("conflicting term recorded at step {index}")]
    Conflict { index: StepIndex },

    /// Where execution ends disagrees with what is recorded
    #[error("end of execution at step {observed} contradicts recorded step {recorded}")]
    TerminalConflict {
        recorded: StepIndex,
        observed: StepIndex,
    },
}

impl HistoryError {
    /// The earliest step index involved in the contradiction.
    pub fn index(&self) -> StepIndex {
        match self {
            Self::Conflict { index } => *index,
            Self::TerminalConflict { recorded, observed } => (*recorded).min(*observed),
        }
    }
}
