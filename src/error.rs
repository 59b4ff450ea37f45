use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced to the caller.
///
/// Malformed individual records never raise: unparsable dates exclude a
/// record from date-dependent computation, an empty task list yields empty
/// aggregates, and a due date before the creation date clamps the interval
/// and flags the task. Only a structurally wrong request is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    #[error("invalid bucket range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}
