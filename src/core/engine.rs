//! The rewriter engine seam.
//!
//! Rule matching and substitution live outside this crate. The debugger only
//! consumes a single-step transition function through [`RewriteEngine`].

use super::term::{StepIndex, Term};
use std::convert::Infallible;
use std::marker::PhantomData;
use std::sync::Arc;

/// Outcome of asking the engine for one rewrite step.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome<S: Term> {
    /// A rule applied and produced the next term
    Rewrote(S),

    /// No rule applies; the term is final and unchanged
    Terminated,
}

impl<S: Term> StepOutcome<S> {
    /// Check if the engine reported termination.
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

/// Result of running the engine directly, without a debugger session.
#[derive(Clone, Debug, PartialEq)]
pub struct Execution<S: Term> {
    /// Term after the last successful step
    pub state: S,
    /// Number of rewrite steps actually applied
    pub steps: StepIndex,
    /// Whether the engine reported termination before the budget ran out
    pub terminated: bool,
}

/// Deterministic single-step rewriter.
///
/// Implementations must be deterministic: the same input term always yields
/// the same outcome. The debugger relies on this to replay history instead
/// of inverting rules.
///
/// # Example
///
/// ```rust
/// use stepwise::core::{RewriteEngine, StepOutcome};
/// use std::convert::Infallible;
///
/// struct Countdown;
///
/// impl RewriteEngine<u32> for Countdown {
///     type Error = Infallible;
///
///     fn advance_one_step(&self, state: &u32) -> Result<StepOutcome<u32>, Infallible> {
///         Ok(match state {
///             0 => StepOutcome::Terminated,
///             n => StepOutcome::Rewrote(n - 1),
///         })
///     }
/// }
///
/// let run = Countdown.run(&5, 100).unwrap();
/// assert_eq!(run.state, 0);
/// assert_eq!(run.steps, 5);
/// assert!(run.terminated);
/// ```
pub trait RewriteEngine<S: Term> {
    /// Failure raised by the engine itself, e.g. a malformed term.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Apply exactly one rewrite step to `state`.
    fn advance_one_step(&self, state: &S) -> Result<StepOutcome<S>, Self::Error>;

    /// Run up to `max_steps` rewrite steps straight from `initial`.
    ///
    /// This is uninterrupted direct execution, the reference behaviour every
    /// debugger navigation must reproduce.
    fn run(&self, initial: &S, max_steps: StepIndex) -> Result<Execution<S>, Self::Error> {
        let mut state = initial.clone();
        let mut steps = 0;
        while steps < max_steps {
            match self.advance_one_step(&state)? {
                StepOutcome::Rewrote(next) => {
                    state = next;
                    steps += 1;
                }
                StepOutcome::Terminated => {
                    return Ok(Execution {
                        state,
                        steps,
                        terminated: true,
                    })
                }
            }
        }
        Ok(Execution {
            state,
            steps,
            terminated: false,
        })
    }
}

impl<S: Term, G: RewriteEngine<S> + ?Sized> RewriteEngine<S> for &G {
    type Error = G::Error;

    fn advance_one_step(&self, state: &S) -> Result<StepOutcome<S>, Self::Error> {
        (**self).advance_one_step(state)
    }
}

impl<S: Term, G: RewriteEngine<S> + ?Sized> RewriteEngine<S> for Arc<G> {
    type Error = G::Error;

    fn advance_one_step(&self, state: &S) -> Result<StepOutcome<S>, Self::Error> {
        (**self).advance_one_step(state)
    }
}

/// Engine backed by a plain step function.
///
/// The function must be pure: deterministic and free of side effects that
/// influence later steps.
///
/// # Example
///
/// ```rust
/// use stepwise::core::{FnEngine, RewriteEngine, StepOutcome};
///
/// let halve = FnEngine::infallible(|n: &u64| {
///     if *n <= 1 {
///         StepOutcome::Terminated
///     } else {
///         StepOutcome::Rewrote(n / 2)
///     }
/// });
///
/// assert_eq!(halve.advance_one_step(&8).unwrap(), StepOutcome::Rewrote(4));
/// assert!(halve.advance_one_step(&1).unwrap().is_terminated());
/// ```
pub struct FnEngine<S, E, F> {
    step: F,
    _phantom: PhantomData<fn(&S) -> E>,
}

impl<S, E, F> FnEngine<S, E, F>
where
    S: Term,
    E: std::error::Error + Send + Sync + 'static,
    F: Fn(&S) -> Result<StepOutcome<S>, E>,
{
    /// Create an engine from a fallible step function.
    pub fn new(step: F) -> Self {
        Self {
            step,
            _phantom: PhantomData,
        }
    }
}

impl<S: Term, G> FnEngine<S, Infallible, InfallibleStep<G>>
where
    G: Fn(&S) -> StepOutcome<S>,
{
    /// Create an engine from a step function that cannot fail.
    pub fn infallible(step: G) -> Self {
        Self {
            step: InfallibleStep(step),
            _phantom: PhantomData,
        }
    }
}

impl<S, E, F> RewriteEngine<S> for FnEngine<S, E, F>
where
    S: Term,
    E: std::error::Error + Send + Sync + 'static,
    F: StepFn<S, E>,
{
    type Error = E;

    fn advance_one_step(&self, state: &S) -> Result<StepOutcome<S>, E> {
        self.step.call(state)
    }
}

/// Step functions accepted by [`FnEngine`].
pub trait StepFn<S: Term, E> {
    fn call(&self, state: &S) -> Result<StepOutcome<S>, E>;
}

impl<S: Term, E, F> StepFn<S, E> for F
where
    F: Fn(&S) -> Result<StepOutcome<S>, E>,
{
    fn call(&self, state: &S) -> Result<StepOutcome<S>, E> {
        self(state)
    }
}

/// Wrapper lifting an infallible step function into a [`StepFn`].
pub struct InfallibleStep<G>(G);

impl<S: Term, G> StepFn<S, Infallible> for InfallibleStep<G>
where
    G: Fn(&S) -> StepOutcome<S>,
{
    fn call(&self, state: &S) -> Result<StepOutcome<S>, Infallible> {
        Ok((self.0)(state))
    }
}
