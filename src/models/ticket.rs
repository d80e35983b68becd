//! Support tickets - IT and maintenance issues tracked through a status lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Which team a ticket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketKind {
    It,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

/// Ticket status. Any transition is permitted; only the first entry into
/// `Resolved` is recorded on the ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    OnHold,
    Resolved,
    Closed,
}

impl TicketStatus {
    /// Human-readable label for the status.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::OnHold => "On Hold",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }

    /// Open or in progress; what the dashboard counts as active work.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }

    /// Neither resolved nor closed.
    #[must_use]
    pub const fn is_unresolved(self) -> bool {
        !matches!(self, Self::Resolved | Self::Closed)
    }
}

/// A comment on a ticket. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    /// Author's display name at the time of writing
    pub user_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A reported issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TicketKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub category: String,
    pub location: String,
    pub created_by: String,
    /// Creator's display name, cached when the ticket was raised
    pub created_by_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Assignee's display name, cached at assignment time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Set on the first transition into `Resolved`, never cleared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub attachment_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for raising a ticket. The creator comes from the session.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub kind: TicketKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
    pub location: String,
    pub assigned_to: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Partial update for a ticket.
///
/// `assigned_to` and `due_date` are doubly optional: `Some(None)` clears the
/// field, `None` leaves it alone.
#[derive(Debug, Clone, Default)]
pub struct TicketPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<TicketStatus>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub assigned_to: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub attachment_count: Option<u32>,
}

impl TicketPatch {
    /// Whether the patch touches workflow fields reserved to the managing team.
    #[must_use]
    pub const fn touches_workflow_fields(&self) -> bool {
        self.status.is_some()
            || self.priority.is_some()
            || self.assigned_to.is_some()
            || self.due_date.is_some()
    }
}
