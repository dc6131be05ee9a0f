use std::collections::{HashMap, VecDeque};

use crate::common::{ItemName, TransactionId};

use super::types::{LockDecision, LockMode, ReleaseOutcome, Requester};

/// Per-item lock state. Holders are stored as `Requester` (id + timestamp)
/// rather than bare ids so the lock table can compare ages without
/// consulting the transaction table.
struct Lock {
    mode: LockMode,
    read_holders: Vec<Requester>,
    write_holder: Option<Requester>,
    waiters: VecDeque<Requester>,
}

impl Lock {
    fn new() -> Self {
        Self {
            mode: LockMode::Unlocked,
            read_holders: Vec::new(),
            write_holder: None,
            waiters: VecDeque::new(),
        }
    }
}

/// The lock table: a pure data structure mapping item names to lock state.
///
/// It never inspects transaction state and never aborts anyone itself —
/// wound-wait's "wound" half is a decision ([`LockDecision::GrantedAfterWounding`])
/// handed back to the caller, who owns the transaction table and can act on it.
#[derive(Default)]
pub struct LockTable {
    table: HashMap<ItemName, Lock>,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire_read(&mut self, item: &str, requester: Requester) -> LockDecision {
        let lock = self
            .table
            .entry(item.to_string())
            .or_insert_with(Lock::new);

        match lock.mode {
            LockMode::Unlocked => {
                lock.mode = LockMode::Read;
                lock.read_holders.push(requester);
                LockDecision::Granted
            }
            LockMode::Read => {
                if !lock.read_holders.iter().any(|h| h.id == requester.id) {
                    lock.read_holders.push(requester);
                }
                LockDecision::Granted
            }
            LockMode::Write => {
                let holder = lock
                    .write_holder
                    .expect("write mode implies a write holder");
                if holder.id == requester.id {
                    // Already holds write; a read request is trivially granted.
                    LockDecision::Granted
                } else if holder.timestamp < requester.timestamp {
                    // Holder is older: requester waits.
                    lock.waiters.push_back(requester);
                    LockDecision::Wait
                } else {
                    // Holder is younger (or tied): wound it.
                    lock.write_holder = None;
                    lock.mode = LockMode::Read;
                    lock.read_holders.clear();
                    lock.read_holders.push(requester);
                    LockDecision::GrantedAfterWounding(vec![holder.id])
                }
            }
        }
    }

    pub fn acquire_write(&mut self, item: &str, requester: Requester) -> LockDecision {
        let lock = self
            .table
            .entry(item.to_string())
            .or_insert_with(Lock::new);

        match lock.mode {
            LockMode::Unlocked => {
                lock.mode = LockMode::Write;
                lock.write_holder = Some(requester);
                LockDecision::Granted
            }
            LockMode::Write => {
                let holder = lock
                    .write_holder
                    .expect("write mode implies a write holder");
                if holder.id == requester.id {
                    LockDecision::Granted
                } else if holder.timestamp < requester.timestamp {
                    lock.waiters.push_back(requester);
                    LockDecision::Wait
                } else {
                    lock.write_holder = Some(requester);
                    LockDecision::GrantedAfterWounding(vec![holder.id])
                }
            }
            LockMode::Read => {
                // Sole holder is the requester itself: trivial upgrade.
                if lock.read_holders.len() == 1 && lock.read_holders[0].id == requester.id {
                    lock.read_holders.clear();
                    lock.write_holder = Some(requester);
                    lock.mode = LockMode::Write;
                    return LockDecision::Granted;
                }

                // Scan the other holders in their current (insertion) order.
                // Each younger holder examined is wounded immediately, not
                // deferred: the scan only stops looking any further once it
                // hits a holder that is not younger, it does not undo the
                // wounds already decided on the way there.
                let mut wound_targets = Vec::new();
                let mut stopped_early = false;
                for holder in lock.read_holders.iter().filter(|h| h.id != requester.id) {
                    if holder.timestamp > requester.timestamp {
                        wound_targets.push(holder.id);
                    } else {
                        stopped_early = true;
                        break;
                    }
                }

                lock.read_holders
                    .retain(|h| h.id == requester.id || !wound_targets.contains(&h.id));

                if stopped_early {
                    lock.waiters.push_back(requester);
                    if wound_targets.is_empty() {
                        LockDecision::Wait
                    } else {
                        LockDecision::WaitAfterWounding(wound_targets)
                    }
                } else {
                    lock.read_holders.clear();
                    lock.write_holder = Some(requester);
                    lock.mode = LockMode::Write;
                    if wound_targets.is_empty() {
                        LockDecision::Granted
                    } else {
                        LockDecision::GrantedAfterWounding(wound_targets)
                    }
                }
            }
        }
    }

    pub fn release(&mut self, item: &str, txn_id: TransactionId) -> ReleaseOutcome {
        let Some(lock) = self.table.get_mut(item) else {
            return ReleaseOutcome::NotHeld;
        };

        match lock.mode {
            LockMode::Read => {
                let held = lock.read_holders.iter().any(|h| h.id == txn_id);
                if !held {
                    return ReleaseOutcome::NotHeld;
                }
                lock.read_holders.retain(|h| h.id != txn_id);
                if lock.read_holders.is_empty() {
                    lock.mode = LockMode::Unlocked;
                }
            }
            LockMode::Write => {
                if lock.write_holder.map(|h| h.id) != Some(txn_id) {
                    return ReleaseOutcome::NotHeld;
                }
                lock.write_holder = None;
                lock.mode = LockMode::Unlocked;
            }
            LockMode::Unlocked => return ReleaseOutcome::NotHeld,
        }

        if lock.mode == LockMode::Unlocked {
            ReleaseOutcome::BecameUnlocked
        } else {
            ReleaseOutcome::StillHeld
        }
    }

    /// Pops and returns the head of `item`'s waiter queue, if any.
    pub fn pop_waiter(&mut self, item: &str) -> Option<Requester> {
        self.table.get_mut(item).and_then(|lock| lock.waiters.pop_front())
    }

    /// Removes `txn_id` from whichever waiter queue it sits in, if any. A
    /// transaction waits on at most one item at a time, so this is used
    /// when aborting a waiting transaction.
    pub fn remove_waiter(&mut self, txn_id: TransactionId) {
        for lock in self.table.values_mut() {
            let before = lock.waiters.len();
            lock.waiters.retain(|w| w.id != txn_id);
            if lock.waiters.len() != before {
                return;
            }
        }
    }
}
