//! Builder for constructing debugger sessions.

use crate::builder::error::BuildError;
use crate::config::SessionConfig;
use crate::core::{Retention, RewriteEngine, Term};
use crate::session::DebuggerSession;
use stillwater::validation::Validation;

/// Builder for constructing debugger sessions with a fluent API.
///
/// # Example
///
/// ```rust
/// use stepwise::builder::SessionBuilder;
/// use stepwise::core::{FnEngine, StepOutcome};
///
/// let mut session = SessionBuilder::new()
///     .initial(3_u8)
///     .engine(FnEngine::infallible(|n: &u8| match n {
///         0 => StepOutcome::Terminated,
///         n => StepOutcome::Rewrote(n - 1),
///     }))
///     .checkpoint_every(2)
///     .build()
///     .unwrap();
///
/// assert!(session.resume().unwrap().is_terminated());
/// ```
pub struct SessionBuilder<S: Term, G: RewriteEngine<S>> {
    initial: Option<S>,
    engine: Option<G>,
    config: SessionConfig,
}

impl<S: Term, G: RewriteEngine<S>> SessionBuilder<S, G> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            engine: None,
            config: SessionConfig::default(),
        }
    }

    /// Set the initial term (required).
    pub fn initial(mut self, term: S) -> Self {
        self.initial = Some(term);
        self
    }

    /// Set the rewrite engine (required).
    pub fn engine(mut self, engine: G) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Replace the whole config.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn retention(mut self, retention: Retention) -> Self {
        self.config.retention = retention;
        self
    }

    /// Keep only every `interval`-th step in history.
    pub fn checkpoint_every(self, interval: u64) -> Self {
        self.retention(Retention::Checkpoints { interval })
    }

    /// Cap the number of steps a single `resume` may replay.
    pub fn resume_limit(mut self, limit: u64) -> Self {
        self.config.resume_limit = Some(limit);
        self
    }

    /// Build the session.
    /// Returns an error if required fields are missing or the config is invalid.
    pub fn build(self) -> Result<DebuggerSession<S, G>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let engine = self.engine.ok_or(BuildError::MissingEngine)?;

        if let Validation::Failure(violations) = self.config.validate() {
            return Err(BuildError::InvalidConfig(
                violations.iter().cloned().collect(),
            ));
        }

        Ok(DebuggerSession::from_parts(initial, engine, self.config))
    }
}

impl<S: Term, G: RewriteEngine<S>> Default for SessionBuilder<S, G> {
    fn default() -> Self {
        Self::new()
    }
}
