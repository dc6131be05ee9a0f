pub mod error;
pub use error::EngineError;

pub mod result;
pub use result::EngineResult;

/// An item name identifying a lockable resource. A thin alias rather than a
/// newtype: the external grammar hands these straight off the wire as short
/// tokens and nothing in the core needs to validate their shape beyond
/// "non-empty", which the grammar already enforces at parse time.
pub type ItemName = String;

/// Identifies a transaction for its whole lifetime. Assigned by the
/// schedule driver from the operand of a `b` operation; never reused.
pub type TransactionId = u64;

/// A transaction's position in the wound-wait priority order. Lower is
/// older. Allocated from a counter that lives outside any one schedule —
/// see [`crate::transaction::clock`].
pub type Timestamp = u64;
