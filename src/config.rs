//! Configuration for the wound-wait engine and its schedule-driver binary.
//!
//! Caution: these are compile-time defaults for the batch driver, not a
//! runtime config format — the core (`arbiter`, `lock`, `transaction`)
//! takes no configuration at all, since its behavior is fixed by the spec.

pub const _NAME: &str = "woundwait";
pub const _VERSION: &str = "0.1.0";

/// Directory the driver binary scans for `*.txt` schedule files when no
/// path is given on the command line.
pub const DEFAULT_SCHEDULE_DIR: &str = "./input";

pub const LOG_LEVEL: &str = "info";
pub const LOG_PATH: &str = "./logs/woundwait.log";
