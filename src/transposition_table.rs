use std::collections::HashMap;

use crate::outcome::Outcome;

/// A stored evaluation, tagged with the deepening pass that wrote it
///
/// The budget tag is what lets the evaluator tell a current-pass
/// undetermined entry (a cycle sentinel or horizon cutoff, returned
/// as-is) from a stale one left by a shallower pass (re-expanded).
#[derive(Copy, Clone, Debug)]
pub struct Entry {
    pub outcome: Outcome,
    pub budget: u32,
}

/// Exact memo from structural state key to evaluation
///
/// Single writer at a time. Decided entries are never downgraded:
/// a write attempting to replace a decided outcome with an undetermined
/// one is dropped.
#[derive(Clone, Default)]
pub struct TranspositionTable {
    entries: HashMap<u128, Entry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: u128) -> Option<Entry> {
        self.entries.get(&key).copied()
    }

    pub fn set(&mut self, key: u128, outcome: Outcome, budget: u32) {
        match self.entries.get(&key) {
            Some(existing) if existing.outcome.is_decided() && !outcome.is_decided() => {}
            _ => {
                self.entries.insert(key, Entry { outcome, budget });
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
