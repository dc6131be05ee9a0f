use std::collections::VecDeque;

use crate::common::{ItemName, Timestamp, TransactionId};

/// A transaction's position in its own lifecycle. `Waiting` is the only
/// state in which `suspended_ops` is non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    Active,
    Waiting,
    Committed,
    Aborted,
}

/// An operation a transaction was in the middle of when it started
/// waiting, replayed verbatim once the transaction restarts. A tagged
/// enum rather than a `(char, String)` pair: `Commit` carries no item, and
/// matching on variants catches a missing case at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuspendedOp {
    Read(ItemName),
    Write(ItemName),
    Commit,
}

/// A single transaction's full state as tracked by the transaction table.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: TransactionId,
    pub timestamp: Timestamp,
    pub state: TransactionState,
    held_resources: Vec<ItemName>,
    pub suspended_ops: VecDeque<SuspendedOp>,
}

impl Transaction {
    pub fn new(id: TransactionId, timestamp: Timestamp) -> Self {
        Self {
            id,
            timestamp,
            state: TransactionState::Active,
            held_resources: Vec::new(),
            suspended_ops: VecDeque::new(),
        }
    }

    /// Records `item` as held, if it isn't already.
    pub fn add_held(&mut self, item: ItemName) {
        if !self.held_resources.contains(&item) {
            self.held_resources.push(item);
        }
    }

    /// Drains and returns every item currently held, in the (deterministic,
    /// but otherwise unspecified) order they were first acquired.
    pub fn take_held(&mut self) -> Vec<ItemName> {
        std::mem::take(&mut self.held_resources)
    }

    /// The items this transaction currently holds a lock on, in the
    /// (deterministic, but otherwise unspecified) order they were first
    /// acquired.
    pub fn held_resources(&self) -> &[ItemName] {
        &self.held_resources
    }
}
