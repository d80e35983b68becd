//! Dashboard statistics and text formatting.
//!
//! Everything here is computed from borrowed collections and a reference time,
//! so the same numbers come out whether the caller is the binary's startup log
//! or a test.

use crate::{
    config::PortalConfig,
    core::{
        query,
        rollover::{self, progress_percent},
    },
    models::{MaintenanceCycle, Priority, Ticket, TicketKind},
};
use chrono::{DateTime, Duration, Utc};
use std::fmt::Write as _;

/// Resolutions newer than this count as "recently resolved".
pub const RECENTLY_RESOLVED_DAYS: i64 = 7;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardStats<'a> {
    /// IT tickets that are open or in progress
    pub open_it_tickets: usize,
    /// Maintenance tickets that are open or in progress
    pub open_maintenance_tickets: usize,
    /// IT tickets that are resolved or closed
    pub resolved_it_tickets: usize,
    /// Maintenance tickets that are resolved or closed
    pub resolved_maintenance_tickets: usize,
    /// Tickets of each kind, for the resolved ratio
    pub total_it_tickets: usize,
    pub total_maintenance_tickets: usize,
    /// Critical tickets not yet resolved or closed
    pub critical_unresolved: usize,
    pub resolved_this_week: usize,
    /// Task completion across every cycle (0-100)
    pub cycle_progress: u8,
    pub recent_tickets: Vec<&'a Ticket>,
    pub upcoming_cycles: Vec<&'a MaintenanceCycle>,
    pub overdue_cycles: Vec<&'a MaintenanceCycle>,
}

/// Computes the dashboard as of `now`.
#[must_use]
pub fn dashboard_stats<'a>(
    tickets: &'a [Ticket],
    cycles: &'a [MaintenanceCycle],
    now: DateTime<Utc>,
    config: &PortalConfig,
) -> DashboardStats<'a> {
    let open_of = |kind: TicketKind| {
        tickets
            .iter()
            .filter(|t| t.kind == kind && t.status.is_active())
            .count()
    };
    let resolved_of = |kind: TicketKind| {
        tickets
            .iter()
            .filter(|t| t.kind == kind && !t.status.is_unresolved())
            .count()
    };
    let total_of = |kind: TicketKind| tickets.iter().filter(|t| t.kind == kind).count();
    let week_ago = now - Duration::days(RECENTLY_RESOLVED_DAYS);

    let completed: usize = cycles.iter().map(MaintenanceCycle::completed_tasks).sum();
    let total: usize = cycles.iter().map(MaintenanceCycle::total_tasks).sum();

    DashboardStats {
        open_it_tickets: open_of(TicketKind::It),
        open_maintenance_tickets: open_of(TicketKind::Maintenance),
        resolved_it_tickets: resolved_of(TicketKind::It),
        resolved_maintenance_tickets: resolved_of(TicketKind::Maintenance),
        total_it_tickets: total_of(TicketKind::It),
        total_maintenance_tickets: total_of(TicketKind::Maintenance),
        critical_unresolved: tickets
            .iter()
            .filter(|t| t.priority == Priority::Critical && t.status.is_unresolved())
            .count(),
        resolved_this_week: tickets
            .iter()
            .filter(|t| t.resolved_at.is_some_and(|at| at >= week_ago))
            .count(),
        cycle_progress: progress_percent(completed, total),
        recent_tickets: query::recent_tickets(tickets, config.recent_activity_limit),
        upcoming_cycles: cycles
            .iter()
            .filter(|c| rollover::is_upcoming_within(c, now, config.upcoming_window_days))
            .collect(),
        overdue_cycles: cycles
            .iter()
            .filter(|c| rollover::is_overdue(c, now))
            .collect(),
    }
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80%`
///
/// # Arguments
/// * `progress_percent` - Progress percentage (0-100)
/// * `bar_length` - Length of the progress bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(progress_percent: u8, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let percent = usize::from(progress_percent.min(100));

    // Round to the nearest cell
    let filled = (percent * length + 50) / 100;
    let empty = length.saturating_sub(filled);

    let filled_str = "█".repeat(filled);
    let empty_str = "░".repeat(empty);

    format!("[{filled_str}{empty_str}] {progress_percent}%")
}

/// One line per cycle: name, progress bar and deadline.
#[must_use]
pub fn format_cycle_line(cycle: &MaintenanceCycle, now: DateTime<Utc>) -> String {
    let bar = format_progress_bar(rollover::progress(cycle), None);
    let days = rollover::days_remaining(cycle, now);
    let deadline = if days < 0 {
        format!("overdue by {} days", -days)
    } else {
        format!("{days} days left")
    };
    format!(
        "{} ({}, period {}) {bar} {deadline}",
        cycle.name,
        cycle.frequency.label(),
        cycle.cycle_number
    )
}

/// Plain-text dashboard summary for logs.
#[must_use]
pub fn format_dashboard_summary(stats: &DashboardStats<'_>, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Open tickets: {} IT, {} maintenance ({} critical unresolved)",
        stats.open_it_tickets, stats.open_maintenance_tickets, stats.critical_unresolved
    );
    let _ = writeln!(
        out,
        "Resolved: {}/{} IT, {}/{} maintenance ({} this week)",
        stats.resolved_it_tickets,
        stats.total_it_tickets,
        stats.resolved_maintenance_tickets,
        stats.total_maintenance_tickets,
        stats.resolved_this_week
    );
    let _ = writeln!(
        out,
        "Compliance: {}",
        format_progress_bar(stats.cycle_progress, None)
    );

    if !stats.overdue_cycles.is_empty() {
        let _ = writeln!(out, "Overdue cycles:");
        for cycle in &stats.overdue_cycles {
            let _ = writeln!(out, "  {}", format_cycle_line(cycle, now));
        }
    }
    if !stats.upcoming_cycles.is_empty() {
        let _ = writeln!(out, "Upcoming deadlines:");
        for cycle in &stats.upcoming_cycles {
            let _ = writeln!(out, "  {}", format_cycle_line(cycle, now));
        }
    }
    if !stats.recent_tickets.is_empty() {
        let _ = writeln!(out, "Recent activity:");
        for ticket in &stats.recent_tickets {
            let _ = writeln!(
                out,
                "  [{}] {} ({}, {})",
                ticket.status.label(),
                ticket.title,
                ticket.priority.label(),
                ticket.location
            );
        }
    }
    out
}
