//! The schedule driver (spec section 4.4): reads `*.txt` schedule files
//! from a directory in sorted order, tokenizes each line, and feeds the
//! resulting operations into a fresh [`Arbiter`] per file.
//!
//! This is ambient, not core — the spec (section 1) treats the file-reading
//! driver as an external collaborator specified only by the grammar it
//! produces. It lives here so the crate is runnable end to end.

use std::path::Path;

use tracing::{info, warn};

use crate::common::{EngineError, EngineResult};
use crate::grammar::{self, Operation};
use crate::transaction::Arbiter;
use crate::utils::sorted_files_with_extension;

/// Processes every `*.txt` file in `dir`, in sorted filename order, as an
/// independent schedule. Returns the number of schedules processed.
pub fn run_schedule_dir(dir: &Path) -> EngineResult<usize> {
    let files = sorted_files_with_extension(dir, "txt")?;
    for (index, path) in files.iter().enumerate() {
        info!(schedule = index, file = %path.display(), "starting schedule");
        run_schedule_file(path)?;
        info!(schedule = index, file = %path.display(), "schedule finished, state reset");
    }
    Ok(files.len())
}

/// Processes a single schedule file against a fresh [`Arbiter`].
fn run_schedule_file(path: &Path) -> EngineResult<()> {
    let contents = std::fs::read_to_string(path).map_err(|source| EngineError::ScheduleFileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut arbiter = Arbiter::new();
    for (line_no, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match grammar::parse_line(line, line_no + 1) {
            Ok(op) => apply_logged(&mut arbiter, &op),
            Err(err) => warn!(%err, "skipping malformed schedule line"),
        }
    }
    Ok(())
}

fn apply_logged(arbiter: &mut Arbiter, op: &Operation) {
    match op {
        Operation::Begin(id) => info!(txn_id = *id, "b"),
        Operation::Read(id, item) => info!(txn_id = *id, item = item.as_str(), "r"),
        Operation::Write(id, item) => info!(txn_id = *id, item = item.as_str(), "w"),
        Operation::Commit(id) => info!(txn_id = *id, "e"),
    }
    arbiter.apply(op);
}
