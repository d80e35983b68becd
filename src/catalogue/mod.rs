//! Static catalogues and the first-run seed dataset.
//!
//! Ticket categories and site locations are fixed lists offered by the ticket
//! forms; the seed (users, sample tickets, compliance cycles) is only used when
//! nothing has been persisted yet.

pub mod cycles;
pub mod seed;

pub use cycles::{CycleTemplate, SectionTemplate, TaskTemplate, default_cycle_templates};
pub use seed::SeedData;

use crate::models::TicketKind;

/// Categories offered for IT tickets.
pub const IT_CATEGORIES: &[&str] = &[
    "Hardware - Desktop/Laptop",
    "Hardware - Printer/Scanner",
    "Hardware - Interactive Display",
    "Hardware - Network Equipment",
    "Software - Installation",
    "Software - Update/Patch",
    "Software - License",
    "Network - Connectivity",
    "Network - WiFi",
    "Network - VPN",
    "Email & Communication",
    "Student Management System",
    "Learning Management System",
    "Security - Account Access",
    "Security - Threat/Virus",
    "Audio/Visual Equipment",
    "Phone System",
    "Other",
];

/// Categories offered for maintenance tickets.
pub const MAINTENANCE_CATEGORIES: &[&str] = &[
    "Plumbing",
    "Electrical",
    "HVAC / Heating",
    "Roofing & Gutters",
    "Windows & Doors",
    "Flooring",
    "Painting & Decoration",
    "Grounds & Landscaping",
    "Playground Equipment",
    "Fencing & Gates",
    "Fire Safety Systems",
    "Security Systems",
    "Structural",
    "Accessibility",
    "Cleaning",
    "Pest Control",
    "Waste Management",
    "Other",
];

/// Site locations a ticket can be raised against.
pub const LOCATIONS: &[&str] = &[
    "Block A - Administration",
    "Block B - Junior School",
    "Block C - Senior School",
    "Block D - Science Labs",
    "Block E - Technology",
    "Block F - Arts & Music",
    "Library",
    "School Hall",
    "Gymnasium",
    "Swimming Pool",
    "Staffroom",
    "Playground - Junior",
    "Playground - Senior",
    "Sports Fields",
    "Car Park",
    "Kitchen/Canteen",
    "Server Room",
    "Maintenance Shed",
    "Other",
];

/// The category list offered for a ticket kind.
#[must_use]
pub const fn categories_for(kind: TicketKind) -> &'static [&'static str] {
    match kind {
        TicketKind::It => IT_CATEGORIES,
        TicketKind::Maintenance => MAINTENANCE_CATEGORIES,
    }
}

#[must_use]
pub fn is_known_location(location: &str) -> bool {
    LOCATIONS.contains(&location)
}
