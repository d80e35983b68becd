//! Cycle rollover business logic
//!
//! Advances a maintenance cycle to its next period, resets task completion,
//! and computes the date-driven status (overdue, days remaining, upcoming)
//! used by the cycle browser and the dashboard. Everything here is pure: the
//! caller supplies "now", and persistence is the store's concern.
//!
//! Completion history is not archived on rollover; the checklist template is
//! reused and every task starts the new period incomplete.

use crate::models::{Frequency, MaintenanceCycle};
use chrono::{DateTime, Duration, Months, Utc};

/// A cycle whose deadline is at most this many days away counts as upcoming.
pub const UPCOMING_WINDOW_DAYS: i64 = 14;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Advances `date` by one period of `frequency`.
///
/// Weekly cycles add exactly seven days. Every other frequency adds calendar
/// months and clamps to the last day of the target month when the day does not
/// exist there, so 2024-01-31 advanced monthly is 2024-02-29 and 2024-02-29
/// advanced annually is 2025-02-28. Dates past the representable range
/// saturate at the maximum timestamp.
#[must_use]
pub fn advance(date: DateTime<Utc>, frequency: Frequency) -> DateTime<Utc> {
    let next = match frequency.months() {
        None => date.checked_add_signed(Duration::days(7)),
        Some(months) => date.checked_add_months(Months::new(months)),
    };
    next.unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Summary of a single rollover, for logging and display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloverResult {
    /// Name of the cycle that was rolled over
    pub cycle_name: String,
    /// Period number that was closed
    pub previous_cycle_number: u32,
    /// Period number that was opened
    pub cycle_number: u32,
    /// Tasks that were complete when the period closed
    pub tasks_completed: usize,
    /// Total tasks in the checklist
    pub total_tasks: usize,
    /// New period end
    pub current_cycle_end: DateTime<Utc>,
}

/// Closes the cycle's current period and opens the next one starting at `now`.
///
/// Section and task identities and text are left untouched; only the period
/// bounds, the counter and every task's completion state change.
pub fn rollover(cycle: &mut MaintenanceCycle, now: DateTime<Utc>) -> RolloverResult {
    let previous_cycle_number = cycle.cycle_number;
    let tasks_completed = cycle.completed_tasks();

    cycle.cycle_number += 1;
    cycle.current_cycle_start = now;
    cycle.current_cycle_end = advance(now, cycle.frequency);
    cycle.last_rollover = Some(now);

    for task in cycle.sections.iter_mut().flat_map(|s| s.tasks.iter_mut()) {
        task.completed = false;
        task.completed_by = None;
        task.completed_at = None;
        task.notes = None;
    }

    RolloverResult {
        cycle_name: cycle.name.clone(),
        previous_cycle_number,
        cycle_number: cycle.cycle_number,
        tasks_completed,
        total_tasks: cycle.total_tasks(),
        current_cycle_end: cycle.current_cycle_end,
    }
}

/// Flips a task's completion. Completing stamps `completed_by`/`completed_at`,
/// un-completing clears both.
///
/// Returns the new completion state, or `None` when the section or task does
/// not exist (the cycle is left untouched).
pub fn toggle_task(
    cycle: &mut MaintenanceCycle,
    section_id: &str,
    task_id: &str,
    completed_by: &str,
    now: DateTime<Utc>,
) -> Option<bool> {
    let task = cycle.task_mut(section_id, task_id)?;

    task.completed = !task.completed;
    if task.completed {
        task.completed_by = Some(completed_by.to_string());
        task.completed_at = Some(now);
    } else {
        task.completed_by = None;
        task.completed_at = None;
    }

    Some(task.completed)
}

/// Percentage of `completed` over `total`, rounded to the nearest integer.
/// Zero tasks is 0%.
#[must_use]
pub fn progress_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total);
    // Round half up in integer arithmetic
    let percent = (completed * 200 + total) / (total * 2);
    u8::try_from(percent).unwrap_or(100)
}

/// Completion percentage across all sections of a cycle.
#[must_use]
pub fn progress(cycle: &MaintenanceCycle) -> u8 {
    progress_percent(cycle.completed_tasks(), cycle.total_tasks())
}

/// Whether the current period has already ended.
#[must_use]
pub fn is_overdue(cycle: &MaintenanceCycle, now: DateTime<Utc>) -> bool {
    cycle.current_cycle_end < now
}

/// Whole days until the period ends, rounded up. Negative when overdue.
#[must_use]
pub fn days_remaining(cycle: &MaintenanceCycle, now: DateTime<Utc>) -> i64 {
    let millis = (cycle.current_cycle_end - now).num_milliseconds();
    let days = millis / MILLIS_PER_DAY;
    // Integer division truncates toward zero, which is already the ceiling
    // for negative values
    if millis % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

/// Whether the deadline falls within the next `window_days` days.
#[must_use]
pub fn is_upcoming_within(cycle: &MaintenanceCycle, now: DateTime<Utc>, window_days: i64) -> bool {
    let days = days_remaining(cycle, now);
    days > 0 && days <= window_days
}

/// Whether the deadline falls within [`UPCOMING_WINDOW_DAYS`].
#[must_use]
pub fn is_upcoming(cycle: &MaintenanceCycle, now: DateTime<Utc>) -> bool {
    is_upcoming_within(cycle, now, UPCOMING_WINDOW_DAYS)
}
