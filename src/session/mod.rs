//! Debugger sessions over a rewrite engine.
//!
//! This module is the only surface callers navigate through:
//! - [`DebuggerSession`] owns the history and the cursor
//! - [`NavigationResult`] describes where a command left the session
//! - [`SharedSession`] puts a session behind a lock for multi-threaded callers
//!
//! # Guarantee
//!
//! After any sequence of `step`, `back_step`, `jump_to` and `resume`
//! commands, the term at the cursor is exactly the term direct execution
//! reaches after the same number of steps.

mod debugger;
mod error;
mod navigation;
mod shared;
mod stats;

pub use debugger::{DebuggerSession, SessionId, Verification};
pub use error::DebugError;
pub use navigation::NavigationResult;
pub use shared::SharedSession;
pub use stats::SessionStats;
