//! Process-wide transaction timestamp counter.
//!
//! Deliberately never reset between schedules: relative transaction
//! priority is preserved across an entire batch run, not just within one
//! schedule file, matching the reference engine's behavior where this
//! counter lives on the transaction type itself rather than on any one
//! schedule's transaction table.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::common::Timestamp;

static NEXT_TIMESTAMP: AtomicU64 = AtomicU64::new(1);

/// Allocates the next globally unique, monotonically increasing timestamp.
pub fn next_timestamp() -> Timestamp {
    NEXT_TIMESTAMP.fetch_add(1, Ordering::SeqCst)
}

#[cfg(test)]
pub(crate) fn reset_for_test() {
    NEXT_TIMESTAMP.store(1, Ordering::SeqCst);
}
