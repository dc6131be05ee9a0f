//! The operation grammar the schedule driver feeds into the arbiter (spec
//! section 6): one of `b <id>`, `r <id> <item>`, `w <id> <item>`, `e <id>`
//! per line, whitespace-separated, blank lines ignored.

use crate::common::{EngineError, EngineResult, ItemName, TransactionId};

/// A single parsed line of a schedule file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Begin(TransactionId),
    Read(TransactionId, ItemName),
    Write(TransactionId, ItemName),
    Commit(TransactionId),
}

/// Parses one non-blank line into an [`Operation`].
///
/// `line_no` is only used to annotate the error it returns; callers that
/// don't track line numbers (e.g. parsing a single line outside a file) can
/// pass `0`.
pub fn parse_line(line: &str, line_no: usize) -> EngineResult<Operation> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let malformed = |reason: &str| EngineError::MalformedOperation {
        line_no,
        line: line.to_string(),
        reason: reason.to_string(),
    };

    let parse_id = |tok: &str| -> EngineResult<TransactionId> {
        tok.parse::<TransactionId>()
            .map_err(|_| malformed(&format!("expected a non-negative integer id, got {tok:?}")))
    };

    match tokens.as_slice() {
        ["b", id] => Ok(Operation::Begin(parse_id(id)?)),
        ["e", id] => Ok(Operation::Commit(parse_id(id)?)),
        ["r", id, item] => Ok(Operation::Read(parse_id(id)?, (*item).to_string())),
        ["w", id, item] => Ok(Operation::Write(parse_id(id)?, (*item).to_string())),
        [] => Err(malformed("blank line")),
        [opcode, ..] => Err(malformed(&format!(
            "unrecognized opcode {opcode:?} or wrong number of operands"
        ))),
    }
}
