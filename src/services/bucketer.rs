use crate::domain::task::TaskRecord;
use crate::error::TimelineError;
use crate::services::calendar;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The bucketing unit selected for a given view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

/// One fixed-length calendar period on the timeline axis.
///
/// `key` is the canonical period start; keys are unique and ascending.
/// `week_number` carries the ISO display label for week buckets only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub key: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_number: Option<u32>,
    pub tasks: Vec<TaskRecord>,
}

/// Groups tasks into ordered buckets covering `[range_start, range_end]`.
///
/// Buckets are generated for the full range even when empty, so the
/// rendering layer always gets a gapless axis. A task lands in the bucket
/// containing its anchor date (due date preferred, creation date otherwise);
/// tasks with no parsable date, or an anchor outside the range, are skipped.
pub fn bucket_tasks(
    tasks: &[TaskRecord],
    granularity: Granularity,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Result<Vec<Bucket>, TimelineError> {
    if range_end < range_start {
        return Err(TimelineError::InvalidRange {
            start: range_start,
            end: range_end,
        });
    }

    let keys = bucket_keys(granularity, range_start, range_end);
    debug!(
        bucket_count = keys.len(),
        task_count = tasks.len(),
        ?granularity,
        "building bucket axis"
    );

    let mut buckets: Vec<Bucket> = keys
        .into_iter()
        .map(|key| Bucket {
            key,
            week_number: match granularity {
                Granularity::Week => Some(calendar::iso_week_number(key)),
                _ => None,
            },
            tasks: Vec::new(),
        })
        .collect();

    for task in tasks {
        let Some(anchor) = calendar::anchor_date(task) else {
            continue;
        };
        if anchor < range_start || anchor > range_end {
            continue;
        }
        let index = match granularity {
            Granularity::Day => (anchor - range_start).num_days(),
            Granularity::Week => (anchor - range_start).num_days() / 7,
            Granularity::Month => months_between(range_start, anchor),
        };
        if let Some(bucket) = buckets.get_mut(index as usize) {
            bucket.tasks.push(task.clone());
        }
    }

    Ok(buckets)
}

fn bucket_keys(granularity: Granularity, range_start: NaiveDate, range_end: NaiveDate) -> Vec<NaiveDate> {
    match granularity {
        Granularity::Day => {
            let total = (range_end - range_start).num_days() + 1;
            (0..total).map(|i| range_start + Duration::days(i)).collect()
        }
        Granularity::Week => {
            let total = (range_end - range_start).num_days() / 7 + 1;
            (0..total).map(|i| range_start + Duration::days(i * 7)).collect()
        }
        Granularity::Month => {
            let first = calendar::month_start(range_start);
            let total = months_between(range_start, range_end) + 1;
            (0..total).map(|i| add_months(first, i)).collect()
        }
    }
}

/// Whole-month difference via `(year * 12 + month)`, ignoring days.
fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 * 12 + to.month() as i64) - (from.year() as i64 * 12 + from.month() as i64)
}

fn add_months(month_first: NaiveDate, months: i64) -> NaiveDate {
    let total = month_first.year() as i64 * 12 + (month_first.month() as i64 - 1) + months;
    let year = total.div_euclid(12) as i32;
    let month = (total.rem_euclid(12) + 1) as u32;
    // The first of any month is always a valid date.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}
