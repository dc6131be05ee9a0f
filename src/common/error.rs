use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the schedule driver and the operation grammar.
///
/// Arbitration decisions inside the core (grant / wait / wound) are never
/// represented as errors — they are typed values the arbiter branches on.
/// This type exists for the ambient, fallible edges of the crate: reading
/// schedule files from disk and parsing the lines found in them.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("schedule directory not found: {}", path.display())]
    ScheduleDirNotFound { path: PathBuf },

    #[error("could not list schedule directory {}: {source}", path.display())]
    ScheduleDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read schedule file {}: {source}", path.display())]
    ScheduleFileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed operation at line {line_no} ({reason}): {line:?}")]
    MalformedOperation {
        line_no: usize,
        line: String,
        reason: String,
    },
}
