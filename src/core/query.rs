//! List filtering for tickets, users and cycles.
//!
//! These are the read-side rules the list screens apply: which tickets match a
//! search, who can be assigned a ticket, which users match an admin search.

use crate::models::{
    Frequency, MaintenanceCycle, Priority, Role, Ticket, TicketKind, TicketStatus, User,
};

/// Criteria for a ticket list. `None` means "any".
#[derive(Debug, Clone, Default)]
pub struct TicketQuery {
    pub kind: Option<TicketKind>,
    /// Case-insensitive substring of title, description or location
    pub search: Option<String>,
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
}

impl TicketQuery {
    /// All tickets of one kind.
    #[must_use]
    pub const fn of_kind(kind: TicketKind) -> Self {
        Self {
            kind: Some(kind),
            search: None,
            status: None,
            priority: None,
        }
    }

    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if self.kind.is_some_and(|k| k != ticket.kind)
            || self.status.is_some_and(|s| s != ticket.status)
            || self.priority.is_some_and(|p| p != ticket.priority)
        {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                [&ticket.title, &ticket.description, &ticket.location]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Tickets matching `query`, most recently updated first.
#[must_use]
pub fn filter_tickets<'a>(tickets: &'a [Ticket], query: &TicketQuery) -> Vec<&'a Ticket> {
    let mut matched: Vec<&Ticket> = tickets.iter().filter(|t| query.matches(t)).collect();
    matched.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    matched
}

/// The `limit` most recently updated tickets of any kind.
#[must_use]
pub fn recent_tickets(tickets: &[Ticket], limit: usize) -> Vec<&Ticket> {
    let mut recent = filter_tickets(tickets, &TicketQuery::default());
    recent.truncate(limit);
    recent
}

/// Active users who can be assigned tickets of `kind`.
#[must_use]
pub fn assignable_users(users: &[User], kind: TicketKind) -> Vec<&User> {
    users
        .iter()
        .filter(|u| u.active && u.role.can_manage(kind))
        .collect()
}

/// Users whose name, email or role label contains `search` (case-insensitive).
#[must_use]
pub fn search_users<'a>(users: &'a [User], search: &str) -> Vec<&'a User> {
    let needle = search.trim().to_lowercase();
    users
        .iter()
        .filter(|u| {
            needle.is_empty()
                || u.name.to_lowercase().contains(&needle)
                || u.email.to_lowercase().contains(&needle)
                || u.role.label().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Number of users holding each role, in [`Role::ALL`] order.
#[must_use]
pub fn count_by_role(users: &[User]) -> Vec<(Role, usize)> {
    Role::ALL
        .iter()
        .map(|&role| (role, users.iter().filter(|u| u.role == role).count()))
        .collect()
}

/// Cycles of one frequency, or all when `frequency` is `None`.
#[must_use]
pub fn cycles_by_frequency(
    cycles: &[MaintenanceCycle],
    frequency: Option<Frequency>,
) -> Vec<&MaintenanceCycle> {
    cycles
        .iter()
        .filter(|c| frequency.is_none_or(|f| f == c.frequency))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::catalogue::seed::{default_users, sample_tickets};
    use crate::catalogue::SeedData;
    use chrono::Utc;

    #[test]
    fn test_filter_by_kind_orders_by_updated() {
        let tickets = sample_tickets(Utc::now());
        let it = filter_tickets(&tickets, &TicketQuery::of_kind(TicketKind::It));

        assert_eq!(it.len(), 3);
        assert!(it.iter().all(|t| t.kind == TicketKind::It));
        assert!(it.windows(2).all(|w| w[0].updated_at >= w[1].updated_at));
        assert_eq!(it[0].title, "Laptop not connecting to WiFi");
    }

    #[test]
    fn test_search_is_case_insensitive_over_fields() {
        let tickets = sample_tickets(Utc::now());

        let by_location = TicketQuery {
            search: Some("STAFFROOM".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_tickets(&tickets, &by_location).len(), 1);

        let by_description = TicketQuery {
            search: Some("safety hazard".to_string()),
            ..Default::default()
        };
        let found = filter_tickets(&tickets, &by_description);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].priority, Priority::Critical);

        let blank = TicketQuery {
            search: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_tickets(&tickets, &blank).len(), tickets.len());
    }

    #[test]
    fn test_status_and_priority_filters() {
        let tickets = sample_tickets(Utc::now());
        let query = TicketQuery {
            kind: Some(TicketKind::Maintenance),
            status: Some(TicketStatus::Open),
            priority: Some(Priority::Medium),
            search: None,
        };
        let found = filter_tickets(&tickets, &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Leaking tap in staffroom");
    }

    #[test]
    fn test_recent_tickets_limit() {
        let tickets = sample_tickets(Utc::now());
        let recent = recent_tickets(&tickets, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].title, "Laptop not connecting to WiFi");
        assert_eq!(recent[1].title, "Playground swing chain worn");
    }

    #[test]
    fn test_assignable_users() {
        let mut users = default_users(Utc::now()).unwrap();
        let it: Vec<&str> = assignable_users(&users, TicketKind::It)
            .iter()
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(it, vec!["u1", "u2"]);

        users[2].active = false;
        assert_eq!(assignable_users(&users, TicketKind::Maintenance).len(), 1);
    }

    #[test]
    fn test_search_users_by_role_label() {
        let users = default_users(Utc::now()).unwrap();
        let found = search_users(&users, "technician");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email, "sarah@school.nz");
        assert_eq!(search_users(&users, "").len(), 4);
        assert!(count_by_role(&users).iter().all(|(_, n)| *n == 1));
    }

    #[test]
    fn test_cycles_by_frequency() {
        let seed = SeedData::default_at(Utc::now()).unwrap();
        assert_eq!(cycles_by_frequency(&seed.cycles, None).len(), 5);
        let annual = cycles_by_frequency(&seed.cycles, Some(Frequency::Annual));
        assert_eq!(annual.len(), 1);
        assert!(cycles_by_frequency(&seed.cycles, Some(Frequency::TenYearly)).is_empty());
    }
}
