//! Alerted Pair Registry: at-most-once notification per strike pair
//!
//! Purpose:
//!     Remembers every (lower strike, higher strike) box that has already
//!     been alerted so repeated scans in the same process never notify the
//!     same pair twice, even when its profit changes.
//!
//! Design:
//!     - Key: (strike_a, strike_b) with strike_a < strike_b
//!     - Insert happens before dispatch; a failed notification is not retried
//!     - In-memory only, lives as long as the owner keeps it
//!     - No eviction: the set grows for the life of the process (one entry
//!       per distinct alerted pair, bounded by strikes² in the window)

use std::collections::HashSet;
use tracing::debug;

use crate::types::StrikePair;

/// Strike pairs already notified during this process run
#[derive(Debug, Default, Clone)]
pub struct AlertedSet {
    pairs: HashSet<StrikePair>,
}

impl AlertedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if this pair has been alerted before.
    pub fn contains(&self, strike_a: i64, strike_b: i64) -> bool {
        self.pairs.contains(&(strike_a, strike_b))
    }

    /// Record a pair as alerted.
    /// Returns true if the pair was new (caller should notify), false if it was already known.
    pub fn mark(&mut self, strike_a: i64, strike_b: i64) -> bool {
        let inserted = self.pairs.insert((strike_a, strike_b));
        if inserted {
            debug!("Alerted pair recorded: {}/{} ({} total)", strike_a, strike_b, self.pairs.len());
        }
        inserted
    }

    /// Number of pairs alerted so far.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
