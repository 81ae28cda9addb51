use std::collections::HashMap;

use crate::host::ActorId;

/// Per-actor countdown map. An actor has at most one entry; scheduling again
/// before expiry overwrites the remaining delay (last write wins). Entries
/// whose remaining time is covered by an advance are removed in that same
/// pass and reported exactly once.
#[derive(Debug, Default)]
pub struct TimerTable {
    remaining_by_actor: HashMap<ActorId, u32>,
}

impl TimerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, actor: ActorId, delay_ms: u32) {
        self.remaining_by_actor.insert(actor, delay_ms);
    }

    /// Advance every entry by `diff_ms`. Returns the actors whose delay
    /// expired; those entries are already removed. Remaining times never go
    /// negative: an entry at or below the delta fires instead of wrapping.
    pub fn advance(&mut self, diff_ms: u32) -> Vec<ActorId> {
        let mut due = Vec::new();
        self.remaining_by_actor.retain(|actor, remaining| {
            if *remaining > diff_ms {
                *remaining -= diff_ms;
                true
            } else {
                due.push(*actor);
                false
            }
        });
        due
    }

    pub fn remaining_ms(&self, actor: ActorId) -> Option<u32> {
        self.remaining_by_actor.get(&actor).copied()
    }

    pub fn len(&self) -> usize {
        self.remaining_by_actor.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_by_actor.is_empty()
    }

    pub fn clear(&mut self) {
        self.remaining_by_actor.clear();
    }
}
