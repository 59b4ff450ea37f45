use crate::domain::interval::Interval;
use crate::domain::task::TaskRecord;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::warn;

/// A task record resolved to a calendar interval.
///
/// `flagged` is set when the due date preceded the creation date and the end
/// was clamped back to the start, so the rendering layer can highlight the
/// record instead of the engine silently corrupting lane packing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledTask {
    pub key: String,
    pub interval: Interval,
    pub flagged: bool,
}

/// Parses a date-like string and drops the time-of-day component.
///
/// Accepts RFC 3339 timestamps, bare ISO date-times, and plain ISO dates.
/// Returns `None` for anything unparsable; callers treat that as "absent"
/// rather than an error.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// ISO-8601 week number: Monday-based weeks, week 1 contains the year's
/// first Thursday. Used purely as a display label.
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// The most recent Sunday on or before `date`. This is the canonical week
/// key for bucketing, intentionally distinct from the ISO Monday-based
/// numbering above.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

/// The date a task is grouped under: the due date when present and
/// parsable, otherwise the creation date. A due date that precedes the
/// creation date is clamped during interval resolution, so the anchor
/// follows it to the creation date — keeping the record inside the range
/// the resolved intervals span.
pub fn anchor_date(record: &TaskRecord) -> Option<NaiveDate> {
    let created = normalize_date(&record.created);
    let due = record.due.as_deref().and_then(normalize_date);
    match (created, due) {
        (Some(created), Some(due)) if due < created => Some(created),
        (_, Some(due)) => Some(due),
        (Some(created), None) => Some(created),
        (None, None) => None,
    }
}

/// Derives the `{start, end}` interval for a record.
///
/// No due date means a single-day interval on the creation date; a record
/// with only a due date sits on that date. A due date earlier than the
/// creation date clamps to `end = start` and flags the task. Records with
/// no parsable date at all resolve to `None` and are excluded from
/// date-dependent computation.
pub fn resolve_interval(record: &TaskRecord) -> Option<ScheduledTask> {
    let created = normalize_date(&record.created);
    let due = record.due.as_deref().and_then(normalize_date);

    let (start, end, flagged) = match (created, due) {
        (Some(created), Some(due)) if due < created => {
            warn!(key = %record.key, %created, %due, "due date precedes creation date, clamping interval");
            (created, created, true)
        }
        (Some(created), Some(due)) => (created, due, false),
        (Some(created), None) => (created, created, false),
        (None, Some(due)) => (due, due, false),
        (None, None) => return None,
    };

    Some(ScheduledTask {
        key: record.key.clone(),
        interval: Interval::new(start, end),
        flagged,
    })
}
