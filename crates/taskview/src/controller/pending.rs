/*
[INPUT]:  Dispatched and completed store operations
[OUTPUT]: Per-key pending ledger with the reject-on-conflict rule
[POS]:    Controller layer - in-flight operation bookkeeping
[UPDATE]: When the per-id ordering policy changes
*/

use std::collections::HashMap;

use taskview_adapter::TaskId;
use uuid::Uuid;

/// Slot an in-flight operation occupies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PendingKey {
    Task(TaskId),
    /// Creates have no id until the store assigns one.
    Create(Uuid),
}

impl PendingKey {
    pub fn fresh_create() -> Self {
        PendingKey::Create(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingOp {
    Create,
    /// `previous` is the confirmed status to restore if the change fails.
    SetStatus { previous: String },
    Delete,
}

#[derive(Debug, Default)]
pub struct PendingLedger {
    entries: HashMap<PendingKey, PendingOp>,
}

impl PendingLedger {
    /// Claim a slot. Returns `false` if the key is already in flight.
    pub fn try_claim(&mut self, key: PendingKey, op: PendingOp) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, op);
        true
    }

    pub fn release(&mut self, key: &PendingKey) -> Option<PendingOp> {
        self.entries.remove(key)
    }

    pub fn contains_task(&self, id: &TaskId) -> bool {
        self.entries.contains_key(&PendingKey::Task(id.clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
