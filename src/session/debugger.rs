//! Debugger session: forward, backward and absolute navigation.

use crate::config::{ConfigError, SessionConfig};
use crate::core::{
    Ancestor, HistoryError, HistoryStore, RewriteEngine, StepIndex, StepOutcome, Term,
};
use crate::session::error::DebugError;
use crate::session::navigation::NavigationResult;
use crate::session::stats::SessionStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Identifier attached to every log line a session emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outcome of [`DebuggerSession::verify`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    /// Recorded entries that were compared against direct execution
    pub checked: u64,
    /// Last index direct execution reached
    pub reached: StepIndex,
    /// Whether direct execution halted at `reached`
    pub terminated: bool,
}

/// Terms reached by one replay.
struct Replay<S: Term> {
    index: StepIndex,
    state: Arc<S>,
    steps: u64,
}

type Navigation<S, G> =
    Result<NavigationResult<S>, DebugError<<G as RewriteEngine<S>>::Error>>;

/// Stepping session over a deterministic rewrite engine.
///
/// Every navigation command resolves the same way: clamp the target to the
/// known terminal index, take the nearest recorded ancestor, replay the
/// remaining gap through the engine and record what comes out. Moving
/// backwards is a replay from an earlier entry, never an inverted rule.
///
/// # Example
///
/// ```rust
/// use stepwise::core::{FnEngine, RewriteEngine, StepOutcome};
/// use stepwise::session::DebuggerSession;
///
/// let engine = FnEngine::infallible(|n: &u32| {
///     if *n == 0 {
///         StepOutcome::Terminated
///     } else {
///         StepOutcome::Rewrote(n - 1)
///     }
/// });
///
/// let mut session = DebuggerSession::new(20_u32, engine);
/// assert_eq!(*session.step(10).unwrap().current_state(), 10);
/// assert_eq!(*session.back_step(4).unwrap().current_state(), 14);
///
/// let end = session.jump_to(100).unwrap();
/// assert_eq!(end.current_index(), 20);
/// assert!(end.is_terminated());
/// ```
pub struct DebuggerSession<S: Term, G: RewriteEngine<S>> {
    id: SessionId,
    engine: G,
    store: HistoryStore<S>,
    config: SessionConfig,
    current: StepIndex,
    cursor: Arc<S>,
    poisoned: Option<StepIndex>,
    stats: SessionStats,
    created_at: DateTime<Utc>,
}

impl<S: Term, G: RewriteEngine<S>> DebuggerSession<S, G> {
    /// Create a session positioned at the initial term, with default config.
    pub fn new(initial: S, engine: G) -> Self {
        Self::from_parts(initial, engine, SessionConfig::default())
    }

    /// Create a session with an explicit config, rejecting invalid configs.
    pub fn with_config(initial: S, engine: G, config: SessionConfig) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        Ok(Self::from_parts(initial, engine, config))
    }

    /// Assemble a session from an already validated config.
    pub(crate) fn from_parts(initial: S, engine: G, config: SessionConfig) -> Self {
        let store = HistoryStore::new(initial, config.retention);
        let cursor = store.origin().shared_state();
        let id = SessionId::new();
        tracing::debug!(session = %id, retention = ?config.retention, "created debugger session");

        Self {
            id,
            engine,
            store,
            config,
            current: 0,
            cursor,
            poisoned: None,
            stats: SessionStats::default(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn engine(&self) -> &G {
        &self.engine
    }

    /// Recorded history.
    pub fn history(&self) -> &HistoryStore<S> {
        &self.store
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn current_index(&self) -> StepIndex {
        self.current
    }

    pub fn current_state(&self) -> &S {
        &self.cursor
    }

    /// Index where execution halts, once the engine has reported it.
    pub fn terminal_index(&self) -> Option<StepIndex> {
        self.store.terminal_index()
    }

    /// Index of the determinism violation that made this session unusable.
    pub fn poisoned_at(&self) -> Option<StepIndex> {
        self.poisoned
    }

    /// The current position, as a navigation result.
    pub fn position(&self) -> NavigationResult<S> {
        NavigationResult::new(
            Arc::clone(&self.cursor),
            self.current,
            self.current,
            self.store.terminal_index() == Some(self.current),
        )
    }

    /// Move forward by `n` steps, stopping early if execution halts.
    pub fn step(&mut self, n: u64) -> Navigation<S, G> {
        let _span = tracing::debug_span!("step", session = %self.id, n).entered();
        let target = match self.current.checked_add(n) {
            Some(target) => target,
            // Clamped to the terminal index anyway.
            None if self.store.terminal_index().is_some() => StepIndex::MAX,
            None => {
                return Err(DebugError::InvalidArgument(format!(
                    "stepping {n} from step {} overflows the step index",
                    self.current
                )))
            }
        };
        self.navigate(target)
    }

    /// Move backward by `n` steps. Going back past the initial term stops
    /// at index 0.
    pub fn back_step(&mut self, n: u64) -> Navigation<S, G> {
        let _span = tracing::debug_span!("back_step", session = %self.id, n).entered();
        let target = self.current.saturating_sub(n);
        self.navigate(target)
    }

    /// Move to an absolute step index. Past the terminal index this lands on
    /// the terminal index.
    pub fn jump_to(&mut self, index: StepIndex) -> Navigation<S, G> {
        let _span = tracing::debug_span!("jump_to", session = %self.id, index).entered();
        self.navigate(index)
    }

    /// Run forward until the engine halts, or until the configured
    /// `resume_limit` is used up.
    pub fn resume(&mut self) -> Navigation<S, G> {
        let _span = tracing::debug_span!("resume", session = %self.id).entered();
        let budget = self.config.resume_limit.unwrap_or(u64::MAX);
        let target = self.current.saturating_add(budget);
        self.navigate(target)
    }

    /// Re-execute directly from the initial term up to `up_to` and compare
    /// every recorded entry along the way. The cursor does not move.
    ///
    /// A mismatch means the engine is not deterministic for this program: it
    /// is reported as a determinism violation and poisons the session.
    pub fn verify(
        &mut self,
        up_to: StepIndex,
    ) -> Result<Verification, DebugError<G::Error>> {
        let _span = tracing::debug_span!("verify", session = %self.id, up_to).entered();
        self.ensure_usable()?;

        let target = self.store.clamp(up_to);
        let mut state = self.store.origin().shared_state();
        let mut index = 0;
        let mut checked = 0;
        let mut terminated = false;

        while index < target {
            let outcome = self.advance(&state, index)?;
            self.stats.verified_steps += 1;
            match outcome {
                StepOutcome::Rewrote(next) => {
                    index += 1;
                    if self.store.get(index).is_some() {
                        checked += 1;
                    }
                    self.guard(|store| store.check(index, &next))?;
                    state = Arc::new(next);
                }
                StepOutcome::Terminated => {
                    terminated = true;
                    break;
                }
            }
        }

        // A known halt inside the verified range must be reported again.
        if !terminated && self.store.terminal_index() == Some(index) {
            let outcome = self.advance(&state, index)?;
            self.stats.verified_steps += 1;
            if let StepOutcome::Rewrote(_) = outcome {
                return Err(self.poison(HistoryError::TerminalConflict {
                    recorded: index,
                    observed: index.saturating_add(1),
                }));
            }
            terminated = true;
        }

        if terminated {
            let recorded_past = self.store.indices().find(|recorded| *recorded > index);
            if let Some(recorded) = recorded_past {
                return Err(self.poison(HistoryError::Conflict { index: recorded }));
            }
            if let Some(recorded) = self.store.terminal_index() {
                if recorded != index {
                    return Err(self.poison(HistoryError::TerminalConflict {
                        recorded,
                        observed: index,
                    }));
                }
            }
        }

        tracing::debug!(checked, reached = index, terminated, "history verified");
        Ok(Verification {
            checked,
            reached: index,
            terminated,
        })
    }

    fn navigate(&mut self, requested: StepIndex) -> Navigation<S, G> {
        self.ensure_usable()?;

        let target = self.store.clamp(requested);
        let ancestor = self.store.nearest_at_or_before(target);
        tracing::debug!(
            requested,
            target,
            ancestor = ancestor.index,
            gap = ancestor.gap,
            "resolving navigation"
        );

        let replay = self.replay(ancestor, target)?;
        let Replay {
            index,
            state,
            steps,
        } = replay;

        self.guard(|store| store.pin(index, Arc::clone(&state)))?;
        let previous = std::mem::replace(&mut self.current, index);
        self.cursor = Arc::clone(&state);
        self.stats.record_navigation(steps);

        let terminated = self.store.terminal_index() == Some(index);
        tracing::debug!(
            from = previous,
            to = index,
            replayed = steps,
            terminated,
            "navigation complete"
        );
        Ok(NavigationResult::new(state, index, requested, terminated))
    }

    fn replay(
        &mut self,
        ancestor: Ancestor<S>,
        target: StepIndex,
    ) -> Result<Replay<S>, DebugError<G::Error>> {
        let Ancestor {
            mut index,
            mut state,
            ..
        } = ancestor;
        let mut steps = 0;

        while index < target {
            match self.advance(&state, index)? {
                StepOutcome::Rewrote(next) => {
                    index += 1;
                    steps += 1;
                    state = Arc::new(next);
                    tracing::trace!(index, "rewrote");
                    self.guard(|store| store.put(index, Arc::clone(&state)))?;
                }
                StepOutcome::Terminated => {
                    tracing::debug!(index, "engine halted");
                    self.guard(|store| store.mark_terminal(index, Arc::clone(&state)))?;
                    break;
                }
            }
        }

        Ok(Replay {
            index,
            state,
            steps,
        })
    }

    fn advance(
        &self,
        state: &S,
        index: StepIndex,
    ) -> Result<StepOutcome<S>, DebugError<G::Error>> {
        self.engine.advance_one_step(state).map_err(|err| {
            tracing::warn!(error = %err, index, "rewrite engine failed");
            DebugError::Engine(err)
        })
    }

    /// Run a store operation, poisoning the session on a contradiction.
    fn guard<T>(
        &mut self,
        op: impl FnOnce(&mut HistoryStore<S>) -> Result<T, HistoryError>,
    ) -> Result<T, DebugError<G::Error>> {
        op(&mut self.store).map_err(|err| self.poison(err))
    }

    fn poison(&mut self, err: HistoryError) -> DebugError<G::Error> {
        let index = err.index();
        self.poisoned = Some(index);
        tracing::error!(session = %self.id, index, error = %err, "determinism violation");
        err.into()
    }

    fn ensure_usable(&self) -> Result<(), DebugError<G::Error>> {
        match self.poisoned {
            Some(index) => Err(DebugError::Poisoned { index }),
            None => Ok(()),
        }
    }
}

impl<S: Term, G: RewriteEngine<S>> fmt::Debug for DebuggerSession<S, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebuggerSession")
            .field("id", &self.id)
            .field("current", &self.current)
            .field("terminal", &self.store.terminal_index())
            .field("recorded", &self.store.len())
            .field("poisoned", &self.poisoned)
            .finish()
    }
}
