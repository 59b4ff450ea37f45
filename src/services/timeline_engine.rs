use crate::domain::interval::Interval;
use crate::domain::task::TaskRecord;
use crate::error::TimelineError;
use crate::services::bucketer::{self, Bucket, Granularity};
use crate::services::calendar::{self, ScheduledTask};
use crate::services::gap_analyzer::{self, GapRecord};
use crate::services::lane_packer::{self, LaneLayout};
use crate::services::stats::{self, WeeklyLoad, WorkloadSummary};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Configuration for one timeline computation. `today` is explicit so the
/// engine stays pure and testable instead of reading the wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub granularity: Granularity,
    pub today: NaiveDate,
    /// When set, idle time before an assignee's first task and after their
    /// last one (relative to the overall timeline range) also counts.
    pub include_boundary_idle: bool,
}

impl EngineOptions {
    pub fn new(granularity: Granularity, today: NaiveDate) -> Self {
        Self {
            granularity,
            today,
            include_boundary_idle: false,
        }
    }
}

/// Lane packing and gap analysis for a single assignee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssigneeTimeline {
    pub name: String,
    pub lanes: LaneLayout,
    pub gaps: Vec<GapRecord>,
    pub idle_days: i64,
}

/// Everything the rendering layer needs for one view of the task list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineView {
    /// Overall range covered by the bucket axis. The start is aligned to
    /// the granularity (Sunday week start, first of month).
    pub range: Interval,
    pub granularity: Granularity,
    pub buckets: Vec<Bucket>,
    /// Alphabetical by assignee name.
    pub assignees: Vec<AssigneeTimeline>,
    pub weekly_load: WeeklyLoad,
    pub stats: WorkloadSummary,
}

/// Stateless facade wiring the components together: interval resolution,
/// bucketing for the chart axis, per-assignee lane packing and gap
/// analysis, then aggregation. Each call is independent and side-effect
/// free, so a newer computation can safely supersede an older one.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineEngine;

impl TimelineEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(
        &self,
        tasks: &[TaskRecord],
        options: &EngineOptions,
    ) -> Result<TimelineView, TimelineError> {
        debug!(task_count = tasks.len(), granularity = ?options.granularity, "computing timeline view");

        let mut by_assignee: BTreeMap<String, Vec<ScheduledTask>> = BTreeMap::new();
        let mut data_range: Option<Interval> = None;

        for record in tasks {
            let Some(scheduled) = calendar::resolve_interval(record) else {
                warn!(key = %record.key, "no parsable dates, excluded from layout");
                continue;
            };
            data_range = Some(match data_range {
                Some(range) => range.hull(&scheduled.interval),
                None => scheduled.interval,
            });
            by_assignee
                .entry(record.assignee.clone())
                .or_default()
                .push(scheduled);
        }

        let data_range =
            data_range.unwrap_or_else(|| Interval::new(options.today, options.today));
        let range_start = match options.granularity {
            Granularity::Day => data_range.start,
            Granularity::Week => calendar::week_start(data_range.start),
            Granularity::Month => calendar::month_start(data_range.start),
        };
        let range = Interval::new(range_start, data_range.end);

        let buckets = bucketer::bucket_tasks(tasks, options.granularity, range.start, range.end)?;

        let mut assignees = Vec::with_capacity(by_assignee.len());
        let mut idle_by_assignee = BTreeMap::new();
        for (name, scheduled) in &by_assignee {
            let lanes = lane_packer::pack_lanes(scheduled);
            let mut gaps = gap_analyzer::compute_gaps(scheduled);
            if options.include_boundary_idle {
                let (leading, trailing) = gap_analyzer::boundary_gaps(scheduled, range);
                if let Some(leading) = leading {
                    gaps.insert(0, leading);
                }
                if let Some(trailing) = trailing {
                    gaps.push(trailing);
                }
            }
            let idle_days = gap_analyzer::total_idle_days(&gaps);
            idle_by_assignee.insert(name.clone(), idle_days);
            assignees.push(AssigneeTimeline {
                name: name.clone(),
                lanes,
                gaps,
                idle_days,
            });
        }

        let weekly_load = stats::weekly_task_counts(tasks);
        let stats = stats::aggregate(tasks, &idle_by_assignee, options.today);

        Ok(TimelineView {
            range,
            granularity: options.granularity,
            buckets,
            assignees,
            weekly_load,
            stats,
        })
    }
}
