//! Shared test utilities for the facility portal.
//!
//! This module provides helpers for setting up test databases and portals,
//! logging in as a seeded account and building tickets with sensible defaults.

use crate::{
    catalogue::{categories_for, seed::DEFAULT_ACCOUNTS},
    errors::Result,
    models::{NewTicket, Priority, Role, TicketKind},
    portal::Portal,
    storage::{BlobStore, MemoryStorage},
};
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A portal over empty in-memory storage, holding the default seed data.
pub async fn setup_test_portal() -> Result<Portal<MemoryStorage>> {
    Portal::load(MemoryStorage::new()).await
}

/// Logs in as the seeded account holding `role`.
///
/// # Panics
/// If the seeded credentials are rejected.
pub async fn login_as<S: BlobStore>(portal: &mut Portal<S>, role: Role) {
    let (_, _, email, password, _) = DEFAULT_ACCOUNTS
        .iter()
        .find(|account| account.4 == role)
        .copied()
        .unwrap_or(DEFAULT_ACCOUNTS[0]);
    assert!(
        portal.login(email, password).await,
        "seeded {role:?} account should log in"
    );
}

/// Builds a ticket draft with sensible defaults.
///
/// # Defaults
/// * `priority`: Medium
/// * `category`: first category for the kind
/// * `location`: "Library"
/// * unassigned, no due date
#[must_use]
pub fn new_test_ticket(kind: TicketKind, title: &str) -> NewTicket {
    NewTicket {
        kind,
        title: title.to_string(),
        description: "Raised from a test".to_string(),
        priority: Priority::Medium,
        category: categories_for(kind)[0].to_string(),
        location: "Library".to_string(),
        assigned_to: None,
        due_date: None,
    }
}

/// Routes tracing output through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")))
        .with_test_writer()
        .try_init();
}
