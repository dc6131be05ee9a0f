use serde::{Deserialize, Serialize};

use crate::common::{Timestamp, TransactionId};

/// The three states a single item's lock can be in. `Unlocked` is the
/// implicit starting state for any item the lock table has never seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockMode {
    Unlocked,
    Read,
    Write,
}

/// A transaction as the lock table sees it: just enough to arbitrate.
/// Copied into the lock table at acquisition time rather than borrowed,
/// so `LockTable` never needs a reference back into the transaction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub id: TransactionId,
    pub timestamp: Timestamp,
}

/// The outcome of an `acquire_read` / `acquire_write` call.
///
/// `GrantedAfterWounding` and `WaitAfterWounding` are the lock table's half
/// of wound-wait: rather than reaching out and aborting transactions
/// itself, it hands back the ids that must be aborted and leaves the
/// aborting to its caller. `WaitAfterWounding` exists because the
/// ordered read-holder scan in `acquire_write` (spec section 4.1, step 1)
/// wounds every younger holder it examines *before* it reaches an older
/// holder it stops at — a requester can come out of that scan having
/// wounded someone and still ending up enqueued to wait on whoever is left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockDecision {
    Granted,
    GrantedAfterWounding(Vec<TransactionId>),
    Wait,
    WaitAfterWounding(Vec<TransactionId>),
}

/// The outcome of a `release` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// No lock entry for this item, or the transaction wasn't its holder.
    NotHeld,
    /// The lock transitioned to `Unlocked`; the caller should check for
    /// a waiter to restart.
    BecameUnlocked,
    /// Other holders remain (a shared read lock with other readers).
    StillHeld,
}
