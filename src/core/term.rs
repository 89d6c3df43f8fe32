//! Program terms as seen by the debugger.
//!
//! The debugger never looks inside a term. It only needs to clone it,
//! compare it with a previously computed term and print it for diagnostics.

use std::fmt::Debug;

/// Absolute number of rewrite steps since the initial term.
///
/// Index `0` is always the untouched initial term.
pub type StepIndex = u64;

/// Trait for program terms handled by a debugger session.
///
/// Terms are immutable snapshots. Equality must be structural: two terms
/// are the same state iff they compare equal.
///
/// Every type with the required bounds is a term, so engine authors do not
/// implement this trait by hand.
///
/// # Example
///
/// ```rust
/// use stepwise::core::Term;
///
/// #[derive(Clone, PartialEq, Debug)]
/// enum Expr {
///     Num(i64),
///     Add(Box<Expr>, Box<Expr>),
/// }
///
/// fn assert_term<T: Term>() {}
/// assert_term::<Expr>();
/// ```
pub trait Term: Clone + PartialEq + Debug + Send + Sync {}

impl<T> Term for T where T: Clone + PartialEq + Debug + Send + Sync {}
