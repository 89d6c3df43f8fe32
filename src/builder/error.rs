//! Errors for the session builder.

use crate::config::ConfigViolation;
use thiserror::Error;

/// Errors that can occur when building a debugger session.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial term not specified. Call .initial(term) before .build()")]
    MissingInitialState,

    #[error("Rewrite engine not specified. Call .engine(engine) before .build()")]
    MissingEngine,

    #[error("Session config is invalid: {0:?}")]
    InvalidConfig(Vec<ConfigViolation>),
}
