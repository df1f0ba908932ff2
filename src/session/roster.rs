use crate::api::RosterEntry;
use std::collections::HashMap;

/// Read-only cache of the server's attendance roster for the live session.
///
/// Snapshots fully replace the cache, never merge into it: the server is
/// the single source of truth and a merge could keep stale rows alive.
/// Each refresh is issued with a monotonically increasing sequence number
/// and a snapshot only lands if it is newer than the last applied one, so
/// requests completing out of order cannot overwrite fresher data.
#[derive(Debug, Default)]
pub struct RosterCache {
    entries: HashMap<i64, RosterEntry>,
    last_applied_seq: u64,
}

impl RosterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache with `snapshot` if `seq` is newer than anything
    /// applied so far. Returns whether the snapshot was applied.
    pub fn replace(&mut self, seq: u64, snapshot: Vec<RosterEntry>) -> bool {
        if seq <= self.last_applied_seq {
            return false;
        }
        self.last_applied_seq = seq;
        self.entries = snapshot
            .into_iter()
            .map(|entry| (entry.student.id, entry))
            .collect();
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.last_applied_seq = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in stable (student id) order.
    pub fn to_vec(&self) -> Vec<RosterEntry> {
        let mut entries: Vec<RosterEntry> = self.entries.values().cloned().collect();
        entries.sort_by_key(|entry| entry.student.id);
        entries
    }
}
