//! Batch driver: processes every `*.txt` schedule file in a directory
//! (default `./input`, or the first CLI argument) through a fresh
//! wound-wait arbiter per file.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::error;

fn main() -> ExitCode {
    woundwait::init_log();

    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(woundwait::default_schedule_dir()));

    match woundwait::driver::run_schedule_dir(&dir) {
        Ok(count) => {
            tracing::info!(schedules = count, "all schedules processed");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "could not process schedule directory");
            ExitCode::FAILURE
        }
    }
}
