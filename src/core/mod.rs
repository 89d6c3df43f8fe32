//! Core types for stepping through a rewrite execution.
//!
//! This module contains the pieces the debugger session is built from:
//! - Terms and step indices
//! - The single-step rewrite engine seam
//! - The indexed history store and its retention policy
//!
//! Nothing in this module decides where to navigate. That is the job of
//! [`crate::session`].

mod engine;
mod error;
mod history;
mod term;

pub use engine::{Execution, FnEngine, InfallibleStep, RewriteEngine, StepFn, StepOutcome};
pub use error::HistoryError;
pub use history::{Ancestor, HistoryEntry, HistoryStore, Retention};
pub use term::{StepIndex, Term};
