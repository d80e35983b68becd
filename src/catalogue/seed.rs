//! First-run seed dataset: one user per role, a handful of sample tickets and
//! the compliance cycles. Used only for collections with nothing persisted.

use super::cycles::{CycleTemplate, default_cycle_templates};
use crate::{
    core::auth::hash_password,
    errors::Result,
    models::{
        Comment, MaintenanceCycle, Notification, Priority, Role, Ticket, TicketKind, TicketStatus,
        User, new_id,
    },
};
use chrono::{DateTime, Duration, Utc};

/// Demo accounts as `(id, name, email, password, role)`.
pub const DEFAULT_ACCOUNTS: [(&str, &str, &str, &str, Role); 4] = [
    ("u1", "Admin User", "admin@school.nz", "admin123", Role::Admin),
    ("u2", "Sarah Tech", "sarah@school.nz", "tech123", Role::ItTech),
    (
        "u3",
        "Mike Property",
        "mike@school.nz",
        "prop123",
        Role::PropertyManager,
    ),
    ("u4", "Jane Staff", "jane@school.nz", "staff123", Role::Staff),
];

/// Everything a fresh portal starts with.
#[derive(Debug, Clone)]
pub struct SeedData {
    pub users: Vec<User>,
    pub tickets: Vec<Ticket>,
    pub cycles: Vec<MaintenanceCycle>,
    pub notifications: Vec<Notification>,
}

impl SeedData {
    /// The built-in seed with timestamps relative to `now`.
    pub fn default_at(now: DateTime<Utc>) -> Result<Self> {
        Self::with_cycle_templates(&default_cycle_templates(), now)
    }

    /// The built-in users and tickets with a custom cycle catalogue.
    pub fn with_cycle_templates(templates: &[CycleTemplate], now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            users: default_users(now)?,
            tickets: sample_tickets(now),
            cycles: templates.iter().map(|t| t.instantiate(now)).collect(),
            notifications: Vec::new(),
        })
    }
}

/// Builds the demo accounts, hashing each password.
pub fn default_users(now: DateTime<Utc>) -> Result<Vec<User>> {
    DEFAULT_ACCOUNTS
        .iter()
        .map(|&(id, name, email, password, role)| {
            Ok(User {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                password_hash: hash_password(password)?,
                role,
                active: true,
                created_at: now,
            })
        })
        .collect()
}

struct SampleTicket {
    kind: TicketKind,
    title: &'static str,
    description: &'static str,
    priority: Priority,
    status: TicketStatus,
    category: &'static str,
    location: &'static str,
    created_by: (&'static str, &'static str),
    assigned_to: Option<(&'static str, &'static str)>,
    comment: Option<((&'static str, &'static str), &'static str, i64)>,
    created_hours_ago: i64,
    updated_hours_ago: i64,
    resolved: bool,
    attachment_count: u32,
}

const JANE: (&str, &str) = ("u4", "Jane Staff");
const SARAH: (&str, &str) = ("u2", "Sarah Tech");
const MIKE: (&str, &str) = ("u3", "Mike Property");
const ADMIN: (&str, &str) = ("u1", "Admin User");

const SAMPLE_TICKETS: [SampleTicket; 6] = [
    SampleTicket {
        kind: TicketKind::It,
        title: "Laptop not connecting to WiFi",
        description: "Teacher laptop in Room B3 cannot connect to the school WiFi network. Shows \"No networks available\".",
        priority: Priority::High,
        status: TicketStatus::Open,
        category: "Network - WiFi",
        location: "Block B - Junior School",
        created_by: JANE,
        assigned_to: Some(SARAH),
        comment: Some((SARAH, "Will check the access point in Block B.", 1)),
        created_hours_ago: 24,
        updated_hours_ago: 1,
        resolved: false,
        attachment_count: 0,
    },
    SampleTicket {
        kind: TicketKind::It,
        title: "Interactive display flickering",
        description: "The interactive display in the Science Lab flickers intermittently during use.",
        priority: Priority::Medium,
        status: TicketStatus::InProgress,
        category: "Hardware - Interactive Display",
        location: "Block D - Science Labs",
        created_by: JANE,
        assigned_to: Some(SARAH),
        comment: None,
        created_hours_ago: 48,
        updated_hours_ago: 24,
        resolved: false,
        attachment_count: 1,
    },
    SampleTicket {
        kind: TicketKind::Maintenance,
        title: "Leaking tap in staffroom",
        description: "The kitchen tap in the staffroom is dripping constantly. Water pooling on the bench.",
        priority: Priority::Medium,
        status: TicketStatus::Open,
        category: "Plumbing",
        location: "Staffroom",
        created_by: JANE,
        assigned_to: Some(MIKE),
        comment: None,
        created_hours_ago: 72,
        updated_hours_ago: 72,
        resolved: false,
        attachment_count: 0,
    },
    SampleTicket {
        kind: TicketKind::Maintenance,
        title: "Broken window latch Block C Room 5",
        description: "Window latch is broken and window cannot be secured. Security concern.",
        priority: Priority::High,
        status: TicketStatus::InProgress,
        category: "Windows & Doors",
        location: "Block C - Senior School",
        created_by: JANE,
        assigned_to: Some(MIKE),
        comment: Some((MIKE, "Ordered replacement latch. ETA 2 days.", 12)),
        created_hours_ago: 96,
        updated_hours_ago: 12,
        resolved: false,
        attachment_count: 0,
    },
    SampleTicket {
        kind: TicketKind::It,
        title: "Printer jam in Admin office",
        description: "Main office printer keeps jamming on every print job.",
        priority: Priority::Low,
        status: TicketStatus::Resolved,
        category: "Hardware - Printer/Scanner",
        location: "Block A - Administration",
        created_by: ADMIN,
        assigned_to: Some(SARAH),
        comment: None,
        created_hours_ago: 168,
        updated_hours_ago: 120,
        resolved: true,
        attachment_count: 0,
    },
    SampleTicket {
        kind: TicketKind::Maintenance,
        title: "Playground swing chain worn",
        description: "Junior playground swing has a visibly worn chain link that needs replacing before it breaks. Safety hazard.",
        priority: Priority::Critical,
        status: TicketStatus::Open,
        category: "Playground Equipment",
        location: "Playground - Junior",
        created_by: MIKE,
        assigned_to: None,
        comment: None,
        created_hours_ago: 2,
        updated_hours_ago: 2,
        resolved: false,
        attachment_count: 2,
    },
];

/// The sample tickets, timestamped relative to `now`.
#[must_use]
pub fn sample_tickets(now: DateTime<Utc>) -> Vec<Ticket> {
    let ago = |hours: i64| now - Duration::hours(hours);

    SAMPLE_TICKETS
        .iter()
        .map(|sample| {
            let updated_at = ago(sample.updated_hours_ago);
            Ticket {
                id: new_id(),
                kind: sample.kind,
                title: sample.title.to_string(),
                description: sample.description.to_string(),
                priority: sample.priority,
                status: sample.status,
                category: sample.category.to_string(),
                location: sample.location.to_string(),
                created_by: sample.created_by.0.to_string(),
                created_by_name: sample.created_by.1.to_string(),
                assigned_to: sample.assigned_to.map(|(id, _)| id.to_string()),
                assigned_to_name: sample.assigned_to.map(|(_, name)| name.to_string()),
                due_date: None,
                resolved_at: sample.resolved.then_some(updated_at),
                comments: sample
                    .comment
                    .iter()
                    .map(|((user_id, user_name), text, hours)| Comment {
                        id: new_id(),
                        user_id: (*user_id).to_string(),
                        user_name: (*user_name).to_string(),
                        text: (*text).to_string(),
                        created_at: ago(*hours),
                    })
                    .collect(),
                attachment_count: sample.attachment_count,
                created_at: ago(sample.created_hours_ago),
                updated_at,
            }
        })
        .collect()
}
