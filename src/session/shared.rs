//! A debugger session that can be shared across threads.

use crate::core::{RewriteEngine, StepIndex, Term};
use crate::session::debugger::{DebuggerSession, Verification};
use crate::session::error::DebugError;
use crate::session::navigation::NavigationResult;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Session handle that serializes navigation behind one session-wide lock.
///
/// Commands from different threads run one at a time, in whatever order
/// they acquire the lock. Nothing is queued or reordered beyond that.
pub struct SharedSession<S: Term, G: RewriteEngine<S>> {
    inner: Arc<Mutex<DebuggerSession<S, G>>>,
}

impl<S: Term, G: RewriteEngine<S>> Clone for SharedSession<S, G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Term, G: RewriteEngine<S>> SharedSession<S, G> {
    pub fn new(session: DebuggerSession<S, G>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn step(&self, n: u64) -> Result<NavigationResult<S>, DebugError<G::Error>> {
        self.inner.lock().step(n)
    }

    pub fn back_step(&self, n: u64) -> Result<NavigationResult<S>, DebugError<G::Error>> {
        self.inner.lock().back_step(n)
    }

    pub fn jump_to(&self, index: StepIndex) -> Result<NavigationResult<S>, DebugError<G::Error>> {
        self.inner.lock().jump_to(index)
    }

    pub fn resume(&self) -> Result<NavigationResult<S>, DebugError<G::Error>> {
        self.inner.lock().resume()
    }

    pub fn verify(&self, up_to: StepIndex) -> Result<Verification, DebugError<G::Error>> {
        self.inner.lock().verify(up_to)
    }

    /// The current position.
    pub fn position(&self) -> NavigationResult<S> {
        self.inner.lock().position()
    }

    /// Run `f` with exclusive access to the session.
    pub fn with<R>(&self, f: impl FnOnce(&mut DebuggerSession<S, G>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Take the session back out, if this is the last handle.
    pub fn try_into_inner(self) -> Result<DebuggerSession<S, G>, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl<S: Term, G: RewriteEngine<S>> fmt::Debug for SharedSession<S, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_lock() {
            Some(session) => f.debug_tuple("SharedSession").field(&*session).finish(),
            None => f.write_str("SharedSession(<locked>)"),
        }
    }
}

impl<S: Term, G: RewriteEngine<S>> From<DebuggerSession<S, G>> for SharedSession<S, G> {
    fn from(session: DebuggerSession<S, G>) -> Self {
        Self::new(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FnEngine, StepOutcome};
    use std::thread;

    fn countdown(n: &u64) -> StepOutcome<u64> {
        match n {
            0 => StepOutcome::Terminated,
            n => StepOutcome::Rewrote(n - 1),
        }
    }

    #[test]
    fn concurrent_steps_are_serialized() {
        let session = SharedSession::new(DebuggerSession::new(
            1_000_u64,
            FnEngine::infallible(countdown),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = session.clone();
                thread::spawn(move || {
                    for _ in 0..10 {
                        session.step(1).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let position = session.position();
        assert_eq!(position.current_index(), 80);
        assert_eq!(*position.current_state(), 920);
    }

    #[test]
    fn with_gives_exclusive_access() {
        let session: SharedSession<u64, _> =
            DebuggerSession::new(5_u64, FnEngine::infallible(countdown)).into();
        session.jump_to(3).unwrap();

        let recorded = session.with(|inner| inner.history().len());
        assert_eq!(recorded, 4);
    }

    #[test]
    fn last_handle_releases_session() {
        let session =
            SharedSession::new(DebuggerSession::new(5_u64, FnEngine::infallible(countdown)));
        let other = session.clone();

        let session = session.try_into_inner().unwrap_err();
        drop(other);

        let inner = session.try_into_inner().unwrap();
        assert_eq!(inner.current_index(), 0);
    }
}
