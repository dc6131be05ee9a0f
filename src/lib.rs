//! A transactional concurrency-control engine: two-phase locking with the
//! wound-wait deadlock-prevention policy, driven by batches of operation
//! schedules read from `*.txt` files.
//!
//! The core — [`lock`], [`transaction`], and the arbiter it exposes — knows
//! nothing about files or process output. [`driver`] and [`grammar`] are
//! the ambient layer that makes the crate runnable: they read schedules off
//! disk and turn their lines into the [`grammar::Operation`]s the arbiter
//! consumes.

mod common;
mod config;
pub mod driver;
pub mod grammar;
mod lock;
mod transaction;
mod utils;

use std::fs;
use std::path;

use tracing_subscriber::prelude::*;

pub use common::{EngineError, EngineResult};
pub use transaction::{Arbiter, SuspendedOp, Transaction, TransactionState};

/// Initializes structured logging to both stdout and a daily-rolling log
/// file, matching this codebase's existing logging setup elsewhere.
pub fn init_log() {
    let log_dir = path::Path::new(config::LOG_PATH).parent().unwrap();
    let log_filename = path::Path::new(config::LOG_PATH).file_name().unwrap().to_str().unwrap();
    fs::create_dir_all(log_dir).unwrap();

    let stdout_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_thread_names(true)
        .with_level(true);

    let file_appender = tracing_appender::rolling::daily(log_dir, log_filename);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // The guard must outlive the subscriber for buffered lines to flush;
    // this binary runs for its whole process lifetime, so leaking it is
    // simplest.
    Box::leak(Box::new(_guard));

    let file_log = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_thread_names(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config::LOG_LEVEL))
        .with(stdout_log)
        .with(file_log)
        .init();
}

/// The default directory the driver binary scans when no path is given on
/// the command line.
pub fn default_schedule_dir() -> &'static str {
    config::DEFAULT_SCHEDULE_DIR
}
