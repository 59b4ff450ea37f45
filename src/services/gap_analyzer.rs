use crate::domain::interval::Interval;
use crate::services::calendar::ScheduledTask;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// A maximal idle interval strictly between two consecutive tasks of one
/// assignee. The boundary days on both sides are occupied by the bordering
/// tasks, so `days` excludes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GapRecord {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
}

/// Computes the idle intervals between consecutive tasks.
///
/// Precondition: the tasks belong to a single assignee. Sorted by start
/// date, each adjacent pair contributes `floor(next.start - prev.end) - 1`
/// idle days; a record is emitted only when that is positive. Fewer than
/// two tasks means no gaps.
pub fn compute_gaps(tasks: &[ScheduledTask]) -> Vec<GapRecord> {
    if tasks.len() < 2 {
        return Vec::new();
    }

    let mut ordered: Vec<&ScheduledTask> = tasks.iter().collect();
    ordered.sort_by_key(|task| task.interval.start);

    let mut gaps = Vec::new();
    for pair in ordered.windows(2) {
        let prev = pair[0].interval;
        let next = pair[1].interval;
        let days = (next.start - prev.end).num_days() - 1;
        if days > 0 {
            gaps.push(GapRecord {
                start: prev.end + Duration::days(1),
                end: next.start - Duration::days(1),
                days,
            });
        }
    }
    gaps
}

/// Total idle days: the sum of all gap lengths.
pub fn total_idle_days(gaps: &[GapRecord]) -> i64 {
    gaps.iter().map(|gap| gap.days).sum()
}

/// Idle time before the first task and after the last one, measured against
/// an enclosing range. Off by default in the engine; enabled via
/// `EngineOptions::include_boundary_idle`.
pub fn boundary_gaps(
    tasks: &[ScheduledTask],
    range: Interval,
) -> (Option<GapRecord>, Option<GapRecord>) {
    let Some(first_start) = tasks.iter().map(|task| task.interval.start).min() else {
        return (None, None);
    };
    // Max end, not the end of the last-by-start task: nested intervals may
    // finish earlier than an enclosing one.
    let last_end = tasks
        .iter()
        .map(|task| task.interval.end)
        .max()
        .unwrap_or(first_start);

    let leading = ((first_start - range.start).num_days() > 0).then(|| GapRecord {
        start: range.start,
        end: first_start - Duration::days(1),
        days: (first_start - range.start).num_days(),
    });
    let trailing = ((range.end - last_end).num_days() > 0).then(|| GapRecord {
        start: last_end + Duration::days(1),
        end: range.end,
        days: (range.end - last_end).num_days(),
    });
    (leading, trailing)
}
