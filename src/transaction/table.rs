use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::common::{ItemName, TransactionId};
use crate::lock::{LockDecision, LockTable, ReleaseOutcome, Requester};

use super::clock;
use super::types::{SuspendedOp, Transaction, TransactionState};

/// Tracks every transaction in one schedule and drives its lifecycle.
///
/// `read`/`write`/`commit` are the only operations an external caller
/// (the arbiter) invokes directly. Wound-wait's abort cascade and the
/// resulting restarts are performed here, internally, so that the exact
/// same logic runs whether a wound was triggered by a live operation or
/// by the replay inside `restart`.
#[derive(Default)]
pub struct TransactionTable {
    transactions: HashMap<TransactionId, Transaction>,
}

impl TransactionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(&id)
    }

    /// Registers a new transaction, allocating it the next process-wide
    /// timestamp. A `b` on an id already in the table is a silent no-op —
    /// it does not reallocate a timestamp or touch existing state.
    pub fn begin(&mut self, id: TransactionId) {
        if self.transactions.contains_key(&id) {
            warn!(txn_id = id, "duplicate begin ignored");
            return;
        }
        let timestamp = clock::next_timestamp();
        info!(txn_id = id, timestamp, "transaction began");
        self.transactions.insert(id, Transaction::new(id, timestamp));
    }

    pub fn read(&mut self, id: TransactionId, item: &str, locks: &mut LockTable) {
        self.access(id, item, locks, true);
    }

    pub fn write(&mut self, id: TransactionId, item: &str, locks: &mut LockTable) {
        self.access(id, item, locks, false);
    }

    fn access(&mut self, id: TransactionId, item: &str, locks: &mut LockTable, is_read: bool) {
        let Some(txn) = self.transactions.get_mut(&id) else {
            warn!(txn_id = id, item, "operation referenced an unknown transaction");
            return;
        };
        if txn.state != TransactionState::Active {
            debug!(txn_id = id, item, state = ?txn.state, "ignored operation on inactive transaction");
            return;
        }

        let requester = Requester {
            id,
            timestamp: txn.timestamp,
        };
        let decision = if is_read {
            locks.acquire_read(item, requester)
        } else {
            locks.acquire_write(item, requester)
        };

        match decision {
            LockDecision::Granted => {
                let txn = self.transactions.get_mut(&id).expect("txn just looked up");
                txn.add_held(item.to_string());
                info!(txn_id = id, item, read = is_read, "lock granted");
            }
            LockDecision::GrantedAfterWounding(wounded) => {
                let txn = self.transactions.get_mut(&id).expect("txn just looked up");
                txn.add_held(item.to_string());
                info!(txn_id = id, item, read = is_read, ?wounded, "lock granted after wounding");
                for victim in wounded {
                    self.abort(victim, locks);
                }
            }
            LockDecision::Wait => {
                self.enqueue_wait(id, item, is_read);
            }
            LockDecision::WaitAfterWounding(wounded) => {
                info!(txn_id = id, item, ?wounded, "wounded blocking readers, still waiting on an older one");
                self.enqueue_wait(id, item, is_read);
                for victim in wounded {
                    self.abort(victim, locks);
                }
            }
        }
    }

    fn enqueue_wait(&mut self, id: TransactionId, item: &str, is_read: bool) {
        let txn = self.transactions.get_mut(&id).expect("txn just looked up");
        let op = if is_read {
            SuspendedOp::Read(item.to_string())
        } else {
            SuspendedOp::Write(item.to_string())
        };
        txn.suspended_ops.push_back(op);
        txn.state = TransactionState::Waiting;
        info!(txn_id = id, item, "transaction now waiting");
    }

    /// Commits an active transaction, releasing everything it holds and
    /// restarting any waiter a release fully unblocks. Commit on a
    /// non-active (i.e. waiting) transaction is deferred: a `Commit`
    /// marker is appended to its suspended-operation queue and fires once
    /// `restart` replays it back to this same function with the
    /// transaction active.
    pub fn commit(&mut self, id: TransactionId, locks: &mut LockTable) {
        let Some(txn) = self.transactions.get_mut(&id) else {
            warn!(txn_id = id, "commit referenced an unknown transaction");
            return;
        };
        if txn.state != TransactionState::Active {
            debug!(txn_id = id, state = ?txn.state, "commit deferred: transaction not active");
            txn.suspended_ops.push_back(SuspendedOp::Commit);
            return;
        }

        let held = txn.take_held();
        txn.state = TransactionState::Committed;
        info!(txn_id = id, "transaction committed");

        self.release_and_restart(id, &held, locks);
    }

    /// Aborts a transaction (active or waiting), releasing anything it
    /// holds and restarting any waiter that unblocks. Called internally
    /// whenever a lock decision names a wound target; never invoked by
    /// the schedule driver directly for any other reason.
    fn abort(&mut self, id: TransactionId, locks: &mut LockTable) {
        let Some(txn) = self.transactions.get_mut(&id) else {
            warn!(txn_id = id, "abort referenced an unknown transaction");
            return;
        };
        if !matches!(txn.state, TransactionState::Active | TransactionState::Waiting) {
            debug!(txn_id = id, state = ?txn.state, "abort ignored: transaction already terminal");
            return;
        }

        let held = txn.take_held();
        txn.suspended_ops.clear();
        txn.state = TransactionState::Aborted;
        warn!(txn_id = id, "transaction aborted (wounded)");

        locks.remove_waiter(id);
        self.release_and_restart(id, &held, locks);
    }

    /// Restarts a waiting transaction: flips it back to active and
    /// replays its suspended operations in order. A replayed operation
    /// that blocks again is pushed back to the front of the queue and
    /// replay stops there, leaving the transaction waiting once more.
    fn restart(&mut self, id: TransactionId, locks: &mut LockTable) {
        {
            let Some(txn) = self.transactions.get_mut(&id) else {
                return;
            };
            if txn.state != TransactionState::Waiting {
                return;
            }
            txn.state = TransactionState::Active;
        }
        info!(txn_id = id, "restarting transaction");

        loop {
            let is_active = matches!(
                self.transactions.get(&id).map(|t| t.state),
                Some(TransactionState::Active)
            );
            if !is_active {
                break;
            }

            let op = match self.transactions.get_mut(&id) {
                Some(txn) => txn.suspended_ops.pop_front(),
                None => break,
            };
            let Some(op) = op else { break };

            match &op {
                SuspendedOp::Read(item) => self.access(id, item, locks, true),
                SuspendedOp::Write(item) => self.access(id, item, locks, false),
                SuspendedOp::Commit => self.commit(id, locks),
            }

            let became_waiting = matches!(
                self.transactions.get(&id).map(|t| t.state),
                Some(TransactionState::Waiting)
            );
            if became_waiting {
                if let Some(txn) = self.transactions.get_mut(&id) {
                    txn.suspended_ops.push_front(op);
                }
                break;
            }
        }
    }

    fn release_and_restart(&mut self, id: TransactionId, held: &[ItemName], locks: &mut LockTable) {
        let mut to_restart = Vec::new();
        for item in held {
            if locks.release(item, id) == ReleaseOutcome::BecameUnlocked {
                if let Some(waiter) = locks.pop_waiter(item) {
                    to_restart.push(waiter.id);
                }
            }
        }
        for waiter_id in to_restart {
            self.restart(waiter_id, locks);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::clock::reset_for_test;
    use crate::transaction::types::{SuspendedOp, TransactionState};
    use serial_test::serial;

    fn fresh() -> (TransactionTable, LockTable) {
        reset_for_test();
        (TransactionTable::new(), LockTable::new())
    }

    #[test]
    #[serial]
    fn begin_assigns_increasing_timestamps() {
        let (mut txns, _locks) = fresh();
        txns.begin(1);
        txns.begin(2);
        let t1 = txns.get(1).unwrap().timestamp;
        let t2 = txns.get(2).unwrap().timestamp;
        assert!(t1 < t2);
    }

    #[test]
    #[serial]
    fn duplicate_begin_is_a_no_op() {
        let (mut txns, _locks) = fresh();
        txns.begin(1);
        let ts_before = txns.get(1).unwrap().timestamp;
        txns.begin(1);
        assert_eq!(txns.get(1).unwrap().timestamp, ts_before);
    }

    #[test]
    #[serial]
    fn unknown_transaction_operation_is_ignored() {
        let (mut txns, mut locks) = fresh();
        txns.read(42, "X", &mut locks);
        assert!(txns.get(42).is_none());
    }

    #[test]
    #[serial]
    fn younger_writer_wounds_older_reader_and_restarts_nobody() {
        let (mut txns, mut locks) = fresh();
        txns.begin(1);
        txns.begin(2);
        txns.read(1, "X", &mut locks);
        txns.write(2, "X", &mut locks);

        assert_eq!(txns.get(1).unwrap().state, TransactionState::Aborted);
        assert_eq!(txns.get(2).unwrap().state, TransactionState::Active);
    }

    #[test]
    #[serial]
    fn older_writer_waits_then_restarts_on_commit() {
        let (mut txns, mut locks) = fresh();
        txns.begin(1); // older
        txns.begin(2); // younger
        txns.read(2, "X", &mut locks);
        txns.write(1, "X", &mut locks);
        assert_eq!(txns.get(1).unwrap().state, TransactionState::Waiting);

        txns.commit(2, &mut locks);

        assert_eq!(txns.get(1).unwrap().state, TransactionState::Active);
        assert!(txns.get(1).unwrap().held_resources().contains(&"X".to_string()));
    }

    #[test]
    #[serial]
    fn commit_on_waiting_transaction_is_deferred_not_dropped() {
        let (mut txns, mut locks) = fresh();
        txns.begin(1);
        txns.begin(2);
        txns.read(2, "X", &mut locks);
        txns.write(1, "X", &mut locks);
        assert_eq!(txns.get(1).unwrap().state, TransactionState::Waiting);

        txns.commit(1, &mut locks);
        assert_eq!(txns.get(1).unwrap().state, TransactionState::Waiting);
        assert_eq!(
            txns.get(1).unwrap().suspended_ops.back(),
            Some(&SuspendedOp::Commit)
        );
    }

    #[test]
    #[serial]
    fn deferred_commit_fires_on_restart() {
        let (mut txns, mut locks) = fresh();
        txns.begin(1); // younger
        txns.begin(2); // older
        txns.write(2, "X", &mut locks);
        txns.write(1, "X", &mut locks);
        txns.commit(1, &mut locks);
        assert_eq!(txns.get(1).unwrap().state, TransactionState::Waiting);

        txns.commit(2, &mut locks);

        assert_eq!(txns.get(1).unwrap().state, TransactionState::Committed);
    }
}
