//! Counters describing the work a session has done.

use serde::{Deserialize, Serialize};

/// Work counters tracked by a debugger session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Navigation commands that completed
    pub navigations: u64,

    /// Navigations answered straight from history, with no replay
    pub cache_hits: u64,

    /// Rewrite steps requested from the engine while navigating
    pub replayed_steps: u64,

    /// Rewrite steps requested from the engine by `verify`
    pub verified_steps: u64,

    /// Rewrite steps replayed by the most recent navigation
    pub last_replay: u64,
}

impl SessionStats {
    pub(crate) fn record_navigation(&mut self, replayed: u64) {
        self.navigations += 1;
        self.replayed_steps += replayed;
        self.last_replay = replayed;
        if replayed == 0 {
            self.cache_hits += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_counters_accumulate() {
        let mut stats = SessionStats::default();
        stats.record_navigation(5);
        stats.record_navigation(0);

        assert_eq!(stats.navigations, 2);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.replayed_steps, 5);
        assert_eq!(stats.last_replay, 0);
    }
}
