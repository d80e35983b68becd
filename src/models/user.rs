//! User accounts and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ticket::TicketKind;

/// Role held by a portal user. Every permission in the portal derives from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access including user management
    Admin,
    /// Manages IT support tickets
    ItTech,
    /// Manages maintenance tickets and compliance cycles
    PropertyManager,
    /// Raises tickets and comments
    Staff,
}

impl Role {
    /// All roles, in the order they are listed to administrators.
    pub const ALL: [Self; 4] = [
        Self::Admin,
        Self::ItTech,
        Self::PropertyManager,
        Self::Staff,
    ];

    /// Human-readable label for the role.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Administrator",
            Self::ItTech => "IT Technician",
            Self::PropertyManager => "Property Manager",
            Self::Staff => "Staff Member",
        }
    }

    /// Whether the role may change status, priority or assignment of IT tickets.
    #[must_use]
    pub const fn can_manage_it(self) -> bool {
        matches!(self, Self::Admin | Self::ItTech)
    }

    /// Whether the role may manage maintenance tickets.
    #[must_use]
    pub const fn can_manage_maintenance(self) -> bool {
        matches!(self, Self::Admin | Self::PropertyManager)
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Whether the role may manage tickets of the given kind.
    #[must_use]
    pub const fn can_manage(self, kind: TicketKind) -> bool {
        match kind {
            TicketKind::It => self.can_manage_it(),
            TicketKind::Maintenance => self.can_manage_maintenance(),
        }
    }

    /// Whether the role may tick off cycle tasks and roll cycles over.
    #[must_use]
    pub const fn can_manage_cycles(self) -> bool {
        self.can_manage_maintenance() || self.is_admin()
    }
}

/// A portal account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2id PHC string, never the plaintext secret
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Case-insensitive email comparison used for login and uniqueness.
    #[must_use]
    pub fn email_matches(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub active: bool,
}

/// Partial update for a user. `None` leaves a field unchanged; an empty
/// password is treated the same as `None` and keeps the existing secret.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

impl UserPatch {
    /// Whether the patch touches fields only an administrator may change.
    #[must_use]
    pub const fn touches_privileged_fields(&self) -> bool {
        self.role.is_some() || self.active.is_some()
    }

    /// The replacement password, if one was actually supplied.
    #[must_use]
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(Role::Admin.can_manage_it());
        assert!(Role::Admin.can_manage_maintenance());
        assert!(Role::ItTech.can_manage_it());
        assert!(!Role::ItTech.can_manage_maintenance());
        assert!(Role::PropertyManager.can_manage_maintenance());
        assert!(!Role::PropertyManager.can_manage_it());
        assert!(!Role::Staff.can_manage_it());
        assert!(!Role::Staff.can_manage_maintenance());
        assert!(!Role::Staff.is_admin());
    }

    #[test]
    fn test_can_manage_cycles() {
        assert!(Role::Admin.can_manage_cycles());
        assert!(Role::PropertyManager.can_manage_cycles());
        assert!(!Role::ItTech.can_manage_cycles());
        assert!(!Role::Staff.can_manage_cycles());
    }

    #[test]
    fn test_role_serializes_as_snake_case() {
        let json = serde_json::to_string(&Role::PropertyManager).unwrap_or_default();
        assert_eq!(json, "\"property_manager\"");
    }

    #[test]
    fn test_empty_password_is_not_a_replacement() {
        let patch = UserPatch {
            password: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.new_password().is_none());
        assert!(!patch.touches_privileged_fields());
    }
}
