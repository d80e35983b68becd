//! Domain model - plain data records shared by every layer.
//!
//! Serialized field names match the stored JSON blobs (camelCase, with enum
//! values such as `it_tech`, `in_progress` and `5yearly`).

pub mod cycle;
pub mod notification;
pub mod ticket;
pub mod user;

pub use cycle::{Frequency, MaintenanceCycle, Section, Task};
pub use notification::{NewNotification, Notification, NotificationKind};
pub use ticket::{Comment, NewTicket, Priority, Ticket, TicketKind, TicketPatch, TicketStatus};
pub use user::{NewUser, Role, User, UserPatch};

/// Generates a fresh opaque identifier for a new record.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
