//! Indexed history of terms reached during a session.
//!
//! The store maps absolute step indices to immutable terms. It never holds
//! two different terms for one index, and the initial term at index 0 can
//! never be replaced or evicted.

use super::error::HistoryError;
use super::term::{StepIndex, Term};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

/// Which intermediate terms the store keeps.
///
/// # Example
///
/// ```rust
/// use stepwise::core::Retention;
///
/// assert!(Retention::Unbounded.retains(7));
///
/// let strided = Retention::Checkpoints { interval: 5 };
/// assert!(strided.retains(0));
/// assert!(strided.retains(10));
/// assert!(!strided.retains(7));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Retention {
    /// Keep every index ever reached
    #[default]
    Unbounded,

    /// Keep only every `interval`-th index and replay the rest on demand
    Checkpoints { interval: u64 },
}

impl Retention {
    /// Check if the policy keeps the term at `index` on its own account.
    ///
    /// The cursor and the terminal index are kept regardless of this.
    pub fn retains(&self, index: StepIndex) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Checkpoints { interval } => {
                index == 0 || (*interval > 0 && index % interval == 0)
            }
        }
    }
}

/// A recorded term and the step index it was reached at.
#[derive(Clone, Debug)]
pub struct HistoryEntry<S: Term> {
    index: StepIndex,
    state: Arc<S>,
    recorded_at: DateTime<Utc>,
}

impl<S: Term> HistoryEntry<S> {
    fn new(index: StepIndex, state: Arc<S>) -> Self {
        Self {
            index,
            state,
            recorded_at: Utc::now(),
        }
    }

    pub fn index(&self) -> StepIndex {
        self.index
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Shared handle to the recorded term.
    pub fn shared_state(&self) -> Arc<S> {
        Arc::clone(&self.state)
    }

    /// When the term was first recorded.
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

/// Closest recorded term at or before a requested index.
#[derive(Clone, Debug)]
pub struct Ancestor<S: Term> {
    /// Index of the recorded term
    pub index: StepIndex,
    /// The recorded term
    pub state: Arc<S>,
    /// Steps that still have to be replayed to reach the requested index
    pub gap: u64,
}

/// Append-only store of terms keyed by step index.
///
/// # Example
///
/// ```rust
/// use stepwise::core::{HistoryStore, Retention};
/// use std::sync::Arc;
///
/// let mut store = HistoryStore::new(10_i64, Retention::Unbounded);
/// store.put(3, Arc::new(7)).unwrap();
///
/// let ancestor = store.nearest_at_or_before(5);
/// assert_eq!(ancestor.index, 3);
/// assert_eq!(ancestor.gap, 2);
///
/// // A different term at a recorded index is a contradiction.
/// assert!(store.put(3, Arc::new(8)).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct HistoryStore<S: Term> {
    origin: HistoryEntry<S>,
    entries: BTreeMap<StepIndex, HistoryEntry<S>>,
    retention: Retention,
    terminal: Option<StepIndex>,
    pinned: StepIndex,
}

impl<S: Term> HistoryStore<S> {
    /// Create a store holding only the initial term at index 0.
    pub fn new(initial: S, retention: Retention) -> Self {
        Self {
            origin: HistoryEntry::new(0, Arc::new(initial)),
            entries: BTreeMap::new(),
            retention,
            terminal: None,
            pinned: 0,
        }
    }

    pub fn retention(&self) -> Retention {
        self.retention
    }

    /// Index at which execution was observed to halt, if known.
    pub fn terminal_index(&self) -> Option<StepIndex> {
        self.terminal
    }

    /// Index currently pinned as the session cursor.
    pub fn pinned_index(&self) -> StepIndex {
        self.pinned
    }

    /// The initial term.
    pub fn origin(&self) -> &HistoryEntry<S> {
        &self.origin
    }

    /// Number of recorded entries, including the initial term.
    pub fn len(&self) -> usize {
        self.entries.len() + 1
    }

    /// Always `false`: the initial term is always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Recorded indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = StepIndex> + '_ {
        self.entries().map(HistoryEntry::index)
    }

    /// Recorded entries in ascending index order.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry<S>> + '_ {
        std::iter::once(&self.origin).chain(self.entries.values())
    }

    /// Limit `index` to the known terminal index.
    pub fn clamp(&self, index: StepIndex) -> StepIndex {
        match self.terminal {
            Some(terminal) => index.min(terminal),
            None => index,
        }
    }

    /// Exact lookup. Indices past a known terminal resolve to the terminal
    /// entry. A miss is `None`, not an error.
    pub fn get(&self, index: StepIndex) -> Option<&HistoryEntry<S>> {
        match self.clamp(index) {
            0 => Some(&self.origin),
            index => self.entries.get(&index),
        }
    }

    /// Find the recorded entry with the largest index `<= index`.
    ///
    /// Always succeeds since index 0 is always recorded.
    pub fn nearest_at_or_before(&self, index: StepIndex) -> Ancestor<S> {
        let found = match index {
            0 => &self.origin,
            index => self
                .entries
                .range(1..=index)
                .next_back()
                .map(|(_, entry)| entry)
                .unwrap_or(&self.origin),
        };

        Ancestor {
            index: found.index,
            state: Arc::clone(&found.state),
            gap: index - found.index,
        }
    }

    /// Check `state` against whatever is recorded at `index`, without
    /// recording anything.
    pub fn check(&self, index: StepIndex, state: &S) -> Result<(), HistoryError> {
        if let Some(terminal) = self.terminal {
            if index > terminal {
                return Err(HistoryError::TerminalConflict {
                    recorded: terminal,
                    observed: index,
                });
            }
        }

        let recorded = match index {
            0 => Some(&self.origin),
            index => self.entries.get(&index),
        };
        match recorded {
            Some(entry) if entry.state.as_ref() != state => {
                Err(HistoryError::Conflict { index })
            }
            _ => Ok(()),
        }
    }

    /// Record `state` at `index` if the retention policy keeps it.
    ///
    /// Recording the same term twice is a no-op. Returns whether a new entry
    /// was stored.
    pub fn put(&mut self, index: StepIndex, state: Arc<S>) -> Result<bool, HistoryError> {
        if !self.retention.retains(index) {
            self.check(index, &state)?;
            return Ok(false);
        }
        self.insert(index, state)
    }

    /// Record `state` at `index` and make it the session cursor.
    ///
    /// The previously pinned entry is evicted unless something else keeps it.
    pub fn pin(&mut self, index: StepIndex, state: Arc<S>) -> Result<(), HistoryError> {
        self.insert(index, state)?;

        let previous = std::mem::replace(&mut self.pinned, index);
        if previous != index && !self.keeps(previous) && self.entries.remove(&previous).is_some() {
            tracing::trace!(index = previous, "evicted previous cursor entry");
        }
        Ok(())
    }

    /// Record `state` at `index` as the point where execution halts.
    ///
    /// Fails if a different halt was already observed, or if anything is
    /// recorded past `index`.
    pub fn mark_terminal(&mut self, index: StepIndex, state: Arc<S>) -> Result<(), HistoryError> {
        if let Some(recorded) = self.terminal {
            if recorded != index {
                return Err(HistoryError::TerminalConflict {
                    recorded,
                    observed: index,
                });
            }
        }
        let past = self
            .entries
            .range((Bound::Excluded(index), Bound::Unbounded))
            .next();
        if let Some((&recorded, _)) = past {
            return Err(HistoryError::TerminalConflict {
                recorded,
                observed: index,
            });
        }
        self.insert(index, state)?;
        self.terminal = Some(index);
        Ok(())
    }

    fn keeps(&self, index: StepIndex) -> bool {
        self.retention.retains(index) || self.terminal == Some(index) || self.pinned == index
    }

    fn insert(&mut self, index: StepIndex, state: Arc<S>) -> Result<bool, HistoryError> {
        self.check(index, &state)?;
        if index == 0 || self.entries.contains_key(&index) {
            return Ok(false);
        }
        self.entries.insert(index, HistoryEntry::new(index, state));
        tracing::trace!(index, "recorded history entry");
        Ok(true)
    }
}
