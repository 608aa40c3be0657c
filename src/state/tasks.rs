//! Dashboard task list state and summary metrics.
//!
//! SYSTEM CONTEXT
//! ==============
//! The dashboard loads the caller's recent tasks (or everyone's, when "show
//! all" is on) and derives the three headline metrics from that same list.
//! Dates are compared as UTC calendar days.

#[cfg(test)]
#[path = "tasks_test.rs"]
mod tasks_test;

use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::net::error::ApiError;
use crate::net::types::{GetTasksFilters, Task, TaskStatus};

/// Most tasks requested for one dashboard load.
pub const TASK_LIST_LIMIT: u32 = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DashboardMetrics {
    pub total_tasks: usize,
    pub completed_today: usize,
    /// Sum of actual hours from Monday through today, one decimal.
    pub hours_this_week: f64,
}

#[derive(Clone, Debug, Default)]
pub struct TasksState {
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub error: Option<String>,
    pub show_all: bool,
    pub metrics: DashboardMetrics,
    /// Stamp of the newest load; older results are discarded on arrival.
    load_seq: u64,
}

impl TasksState {
    /// Start a load and return its stamp for `finish_load`.
    pub fn begin_load(&mut self) -> u64 {
        self.load_seq += 1;
        self.loading = true;
        self.error = None;
        self.load_seq
    }

    /// Adopt the result of load `seq`. Failures empty the list and zero the
    /// metrics. Returns `false` and changes nothing when a newer load has
    /// started or the state was cleared since.
    pub fn finish_load(&mut self, seq: u64, result: Result<Vec<Task>, ApiError>, today: Date) -> bool {
        if seq != self.load_seq {
            log::debug!("dropping stale task load {seq} (current {})", self.load_seq);
            return false;
        }
        self.loading = false;
        match result {
            Ok(tasks) => {
                self.metrics = compute_metrics(&tasks, today);
                self.tasks = tasks;
                self.error = None;
            }
            Err(e) => {
                log::warn!("failed to load tasks: {e}");
                self.tasks.clear();
                self.metrics = DashboardMetrics::default();
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Forget everything loaded for the previous session. Loads still in
    /// flight are invalidated.
    pub fn clear(&mut self) {
        *self = Self { show_all: self.show_all, load_seq: self.load_seq + 1, ..Self::default() };
    }

    /// Card subtitle, e.g. "Showing 3 tasks for alice".
    pub fn summary(&self, username: Option<&str>) -> String {
        let n = self.tasks.len();
        let plural = if n == 1 { "" } else { "s" };
        match username {
            Some(name) if !self.show_all => format!("Showing {n} task{plural} for {name}"),
            _ => format!("Showing {n} task{plural}"),
        }
    }
}

/// Filters for a dashboard load.
pub fn build_filters(show_all: bool, username: Option<&str>) -> GetTasksFilters {
    GetTasksFilters {
        user_name: username.filter(|_| !show_all).map(str::to_owned),
        limit: Some(TASK_LIST_LIMIT),
        ..GetTasksFilters::default()
    }
}

/// Calendar day of a `YYYY-MM-DD` (or longer ISO) task date.
pub fn parse_task_date(raw: &str) -> Option<Date> {
    let day = raw.get(..10)?;
    Date::parse(day, format_description!("[year]-[month]-[day]")).ok()
}

/// Monday of the week containing `day`.
pub fn week_start(day: Date) -> Date {
    let offset = i64::from(day.weekday().number_days_from_monday());
    day.saturating_sub(time::Duration::days(offset))
}

pub fn compute_metrics(tasks: &[Task], today: Date) -> DashboardMetrics {
    let monday = week_start(today);
    let completed_today = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Completed && parse_task_date(&t.task_date) == Some(today))
        .count();
    let hours: f64 = tasks
        .iter()
        .filter(|t| parse_task_date(&t.task_date).is_some_and(|d| d >= monday && d <= today))
        .filter_map(|t| t.actual_hours)
        .sum();
    DashboardMetrics { total_tasks: tasks.len(), completed_today, hours_this_week: (hours * 10.0).round() / 10.0 }
}

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}
