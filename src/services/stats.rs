use crate::domain::task::TaskRecord;
use crate::services::calendar;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Per-assignee workload summary. Recomputed from scratch on every input
/// change; never mutated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssigneeStats {
    pub name: String,
    pub count: usize,
    /// Arithmetic mean of the records' duration fields (missing counts as
    /// zero), rounded to the nearest whole day.
    pub avg_duration: i64,
    /// Tasks whose due date is strictly before the reference "today".
    pub overdue: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub idle_days: i64,
}

/// Global rollup across all assignees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadSummary {
    /// Sorted descending by task count; ties keep alphabetical order.
    pub per_assignee: Vec<AssigneeStats>,
    pub total_assignees: usize,
    pub total_tasks: usize,
    pub avg_duration: i64,
    pub total_idle_days: i64,
    pub avg_idle_days_per_assignee: f64,
    pub max_idle_days: i64,
}

/// Tasks-per-week-per-assignee heatmap input: the sorted set of Sunday week
/// keys touched by any task, and per-assignee counts per week key.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct WeeklyLoad {
    pub weeks: Vec<NaiveDate>,
    pub counts: BTreeMap<String, BTreeMap<NaiveDate, usize>>,
}

/// Aggregates count/duration/overdue/idle summaries per assignee and
/// globally. Idle totals come from the gap analysis keyed by assignee name;
/// `today` is a caller-supplied reference instant, not the wall clock.
pub fn aggregate(
    tasks: &[TaskRecord],
    idle_by_assignee: &BTreeMap<String, i64>,
    today: NaiveDate,
) -> WorkloadSummary {
    let mut by_assignee: BTreeMap<&str, Vec<&TaskRecord>> = BTreeMap::new();
    for task in tasks {
        by_assignee.entry(&task.assignee).or_default().push(task);
    }

    // BTreeMap iteration gives the alphabetical base order; the stable sort
    // below preserves it between equal counts.
    let mut per_assignee: Vec<AssigneeStats> = by_assignee
        .iter()
        .map(|(name, items)| AssigneeStats {
            name: name.to_string(),
            count: items.len(),
            avg_duration: mean_duration(items.iter().copied()),
            overdue: items.iter().filter(|t| is_overdue(t, today)).count(),
            completed: items
                .iter()
                .filter(|t| t.status == "Done" || t.status == "Closed")
                .count(),
            in_progress: items.iter().filter(|t| t.status == "In Progress").count(),
            idle_days: idle_by_assignee.get(*name).copied().unwrap_or(0),
        })
        .collect();
    per_assignee.sort_by(|a, b| b.count.cmp(&a.count));

    let total_assignees = per_assignee.len();
    let total_idle_days: i64 = per_assignee.iter().map(|a| a.idle_days).sum();
    let max_idle_days = per_assignee.iter().map(|a| a.idle_days).max().unwrap_or(0);

    WorkloadSummary {
        total_assignees,
        total_tasks: tasks.len(),
        avg_duration: mean_duration(tasks.iter()),
        total_idle_days,
        avg_idle_days_per_assignee: total_idle_days as f64 / total_assignees.max(1) as f64,
        max_idle_days,
        per_assignee,
    }
}

/// Counts tasks per Sunday-based week key for each assignee.
pub fn weekly_task_counts(tasks: &[TaskRecord]) -> WeeklyLoad {
    let mut weeks = BTreeSet::new();
    let mut counts: BTreeMap<String, BTreeMap<NaiveDate, usize>> = BTreeMap::new();

    for task in tasks {
        let Some(anchor) = calendar::anchor_date(task) else {
            continue;
        };
        let week = calendar::week_start(anchor);
        weeks.insert(week);
        *counts
            .entry(task.assignee.clone())
            .or_default()
            .entry(week)
            .or_insert(0) += 1;
    }

    WeeklyLoad {
        weeks: weeks.into_iter().collect(),
        counts,
    }
}

fn mean_duration<'a>(tasks: impl Iterator<Item = &'a TaskRecord>) -> i64 {
    let mut count = 0usize;
    let mut total = 0i64;
    for task in tasks {
        count += 1;
        total += task.duration.unwrap_or(0);
    }
    (total as f64 / count.max(1) as f64).round() as i64
}

fn is_overdue(task: &TaskRecord, today: NaiveDate) -> bool {
    task.due
        .as_deref()
        .and_then(calendar::normalize_date)
        .is_some_and(|due| due < today)
}
