//! Stepwise: time-travel stepping for deterministic rewrite engines
//!
//! A rewrite engine advances a program term one rule application at a
//! time. Stepwise wraps such an engine in a debugger session that can move
//! forward, move backward and jump to any absolute step, while always
//! showing exactly the term uninterrupted execution would reach at that
//! step.
//!
//! Backward moves never invert rules. The session records the terms it has
//! seen and replays forward from the nearest recorded ancestor instead.
//!
//! # Core Concepts
//!
//! - **Term**: Immutable program state produced by the engine
//! - **RewriteEngine**: The external single-step transition function
//! - **HistoryStore**: Indexed record of reached terms with a retention policy
//! - **DebuggerSession**: Navigation over the engine, backed by the store
//!
//! # Example
//!
//! ```rust
//! use stepwise::core::{FnEngine, StepOutcome};
//! use stepwise::DebuggerSession;
//!
//! // Collatz sequence, halting at 1.
//! let engine = FnEngine::infallible(|n: &u64| match n {
//!     1 => StepOutcome::Terminated,
//!     n if n % 2 == 0 => StepOutcome::Rewrote(n / 2),
//!     n => StepOutcome::Rewrote(3 * n + 1),
//! });
//!
//! let mut session = DebuggerSession::new(6, engine);
//!
//! let forward = session.step(3).unwrap();
//! assert_eq!(*forward.current_state(), 5);
//!
//! let back = session.back_step(2).unwrap();
//! assert_eq!(back.current_index(), 1);
//! assert_eq!(*back.current_state(), 3);
//!
//! let end = session.jump_to(1_000).unwrap();
//! assert_eq!(end.current_index(), 8);
//! assert!(end.is_terminated());
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod session;

// Re-export commonly used types
pub use builder::{BuildError, SessionBuilder};
pub use config::SessionConfig;
pub use self::core::{Retention, RewriteEngine, StepIndex, StepOutcome, Term};
pub use session::{DebugError, DebuggerSession, NavigationResult, SharedSession};
