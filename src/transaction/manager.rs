use crate::grammar::Operation;
use crate::lock::LockTable;
use crate::common::TransactionId;

use super::table::TransactionTable;
use super::types::Transaction;

/// One schedule session: owns a lock table and a transaction table and
/// turns external operations into calls on them (spec section 4.3).
///
/// This is the only component allowed to exist per-schedule — a fresh
/// `Arbiter` is created for every schedule file the driver processes, so
/// that the lock and transaction tables reset while the process-wide
/// timestamp counter (`transaction::clock`) does not.
#[derive(Default)]
pub struct Arbiter {
    transactions: TransactionTable,
    locks: LockTable,
}

impl Arbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatches one operation. `begin`/`read`/`write`/`commit` each defer
    /// directly to the transaction table, which already knows how to turn
    /// a lock table's wound request into an abort and how to restart the
    /// waiters a release frees up — the arbiter itself makes no decisions,
    /// it only routes.
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::Begin(id) => self.transactions.begin(*id),
            Operation::Read(id, item) => self.transactions.read(*id, item, &mut self.locks),
            Operation::Write(id, item) => self.transactions.write(*id, item, &mut self.locks),
            Operation::Commit(id) => self.transactions.commit(*id, &mut self.locks),
        }
    }

    /// Looks up a transaction's current state, for observability and tests.
    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::clock::reset_for_test;
    use crate::transaction::types::TransactionState;
    use serial_test::serial;

    fn fresh() -> Arbiter {
        reset_for_test();
        Arbiter::new()
    }

    #[test]
    #[serial]
    fn simple_wound_on_write_write() {
        let mut a = fresh();
        a.apply(&Operation::Begin(1));
        a.apply(&Operation::Begin(2));
        a.apply(&Operation::Write(2, "X".into()));
        a.apply(&Operation::Write(1, "X".into()));

        assert_eq!(a.transaction(2).unwrap().state, TransactionState::Aborted);
        assert_eq!(a.transaction(1).unwrap().state, TransactionState::Active);
    }

    #[test]
    #[serial]
    fn younger_waits_then_restarts_on_commit() {
        let mut a = fresh();
        a.apply(&Operation::Begin(1));
        a.apply(&Operation::Begin(2));
        a.apply(&Operation::Write(1, "X".into()));
        a.apply(&Operation::Write(2, "X".into()));
        assert_eq!(a.transaction(2).unwrap().state, TransactionState::Waiting);

        a.apply(&Operation::Commit(1));

        assert_eq!(a.transaction(1).unwrap().state, TransactionState::Committed);
        assert_eq!(a.transaction(2).unwrap().state, TransactionState::Active);
        assert!(a.transaction(2).unwrap().held_resources().contains(&"X".to_string()));
    }

    #[test]
    #[serial]
    fn read_share_then_upgrade() {
        let mut a = fresh();
        a.apply(&Operation::Begin(1));
        a.apply(&Operation::Read(1, "X".into()));
        a.apply(&Operation::Write(1, "X".into()));
        assert_eq!(a.transaction(1).unwrap().state, TransactionState::Active);
    }

    #[test]
    #[serial]
    fn read_lock_wounding_on_write_request() {
        let mut a = fresh();
        a.apply(&Operation::Begin(1));
        a.apply(&Operation::Begin(2));
        a.apply(&Operation::Read(2, "Y".into()));
        a.apply(&Operation::Write(1, "Y".into()));

        assert_eq!(a.transaction(2).unwrap().state, TransactionState::Aborted);
        assert_eq!(a.transaction(1).unwrap().state, TransactionState::Active);
        assert!(a.transaction(1).unwrap().held_resources().contains(&"Y".to_string()));
    }

    #[test]
    #[serial]
    fn deferred_commit_during_wait() {
        let mut a = fresh();
        a.apply(&Operation::Begin(1));
        a.apply(&Operation::Begin(2));
        a.apply(&Operation::Write(1, "X".into()));
        a.apply(&Operation::Write(2, "X".into()));
        a.apply(&Operation::Commit(2));
        assert_eq!(a.transaction(2).unwrap().state, TransactionState::Waiting);

        a.apply(&Operation::Commit(1));

        assert_eq!(a.transaction(1).unwrap().state, TransactionState::Committed);
        assert_eq!(a.transaction(2).unwrap().state, TransactionState::Committed);
    }

    #[test]
    #[serial]
    fn cascade_of_restarts() {
        let mut a = fresh();
        a.apply(&Operation::Begin(1));
        a.apply(&Operation::Begin(2));
        a.apply(&Operation::Begin(3));
        a.apply(&Operation::Read(1, "X".into()));
        a.apply(&Operation::Read(2, "X".into()));
        a.apply(&Operation::Write(3, "X".into()));
        assert_eq!(a.transaction(3).unwrap().state, TransactionState::Waiting);

        a.apply(&Operation::Commit(1));
        assert_eq!(a.transaction(3).unwrap().state, TransactionState::Waiting);

        a.apply(&Operation::Commit(2));
        assert_eq!(a.transaction(3).unwrap().state, TransactionState::Active);
        assert!(a.transaction(3).unwrap().held_resources().contains(&"X".to_string()));
    }

    #[test]
    #[serial]
    fn unknown_transaction_is_ignored() {
        let mut a = fresh();
        a.apply(&Operation::Read(7, "X".into()));
        assert!(a.transaction(7).is_none());
    }

    #[test]
    #[serial]
    fn duplicate_begin_is_a_no_op() {
        let mut a = fresh();
        a.apply(&Operation::Begin(1));
        let ts_before = a.transaction(1).unwrap().timestamp;
        a.apply(&Operation::Begin(1));
        assert_eq!(a.transaction(1).unwrap().timestamp, ts_before);
    }
}
