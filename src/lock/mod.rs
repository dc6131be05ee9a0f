//! The lock table: grants, queues, and wound decisions for a single schedule.
//!
//! This module knows nothing about transaction lifecycle — it only ever
//! sees `Requester` values (an id plus a timestamp) and hands back typed
//! decisions. Wounding a transaction is requested, never performed, here.

mod table;
mod types;

pub use table::LockTable;
pub use types::{LockDecision, LockMode, ReleaseOutcome, Requester};
