//! Application state store.
//!
//! [`Portal`] is the single authoritative holder of users, tickets, cycles,
//! notifications and the login session. Every mutation goes through one of its
//! methods, which check the session's role, apply the change in memory and
//! then write the affected collection back to the [`BlobStore`].
//!
//! Persistence is best-effort: a failed write is logged and the in-memory
//! change stands. Operations on ids that do not exist return `Ok(None)` and
//! change nothing.

mod cycles;
mod notifications;
mod tickets;
mod users;

use crate::{
    catalogue::{
        CycleTemplate, SeedData, default_cycle_templates,
        seed::{default_users, sample_tickets},
    },
    core::auth,
    errors::{Error, Result},
    models::{MaintenanceCycle, Notification, Role, Ticket, User},
    storage::{
        BlobStore, CYCLES_KEY, NOTIFICATIONS_KEY, SESSION_KEY, TICKETS_KEY, USERS_KEY,
    },
};
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, instrument, warn};

/// Screen selector held alongside the session. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Dashboard,
    ItTickets,
    MaintenanceTickets,
    Cycles,
    Users,
    Notifications,
}

/// The authenticated session. Only the user id is kept; the user record is
/// resolved from the users collection on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub started_at: DateTime<Utc>,
}

/// The portal state container.
#[derive(Debug)]
pub struct Portal<S> {
    storage: S,
    users: Vec<User>,
    tickets: Vec<Ticket>,
    cycles: Vec<MaintenanceCycle>,
    notifications: Vec<Notification>,
    session: Option<Session>,
    current_page: Page,
}

impl<S: BlobStore> Portal<S> {
    /// Rehydrates the portal from storage, seeding with the built-in dataset
    /// for every collection that has nothing stored.
    pub async fn load(storage: S) -> Result<Self> {
        Self::load_from_templates(storage, &default_cycle_templates()).await
    }

    /// Rehydrates the portal, seeding cycles from `templates` on first run.
    ///
    /// The seed accounts are only built (and their passwords hashed) when no
    /// usable users collection is stored.
    pub async fn load_from_templates(storage: S, templates: &[CycleTemplate]) -> Result<Self> {
        Self::load_seeded(storage, templates, default_users).await
    }

    async fn load_seeded(
        storage: S,
        templates: &[CycleTemplate],
        seed_users: impl FnOnce(DateTime<Utc>) -> Result<Vec<User>>,
    ) -> Result<Self> {
        let now = Utc::now();
        let users = match load_stored(&storage, USERS_KEY).await {
            Some(users) => users,
            None => seed_users(now)?,
        };
        let seed = SeedData {
            users,
            tickets: sample_tickets(now),
            cycles: templates.iter().map(|t| t.instantiate(now)).collect(),
            notifications: Vec::new(),
        };
        Ok(Self::hydrate(storage, seed).await)
    }

    /// Rehydrates the portal from storage, using `seed` for every collection
    /// that has nothing stored or whose blob cannot be decoded.
    #[instrument(skip_all)]
    pub async fn load_with_seed(storage: S, seed: SeedData) -> Self {
        let users = load_or(&storage, USERS_KEY, seed.users).await;
        Self::hydrate(storage, SeedData { users, ..seed }).await
    }

    /// Loads everything but the users, which `seed` already holds.
    async fn hydrate(storage: S, seed: SeedData) -> Self {
        let users = seed.users;
        let tickets = load_or(&storage, TICKETS_KEY, seed.tickets).await;
        let cycles = load_or(&storage, CYCLES_KEY, seed.cycles).await;
        let notifications = load_or(&storage, NOTIFICATIONS_KEY, seed.notifications).await;
        let stored_session: Option<Session> = load_or(&storage, SESSION_KEY, None).await;

        // A session for a removed or deactivated account does not survive a restart
        let session = stored_session.filter(|s| {
            users
                .iter()
                .any(|u| u.id == s.user_id && u.active)
        });

        info!(
            "Portal loaded: {} users, {} tickets, {} cycles, {} notifications",
            users.len(),
            tickets.len(),
            cycles.len(),
            notifications.len()
        );

        Self {
            storage,
            users,
            tickets,
            cycles,
            notifications,
            session,
            current_page: Page::Dashboard,
        }
    }

    /// Starts a session for the active user with this email and password.
    ///
    /// Returns `false` without saying which of the three checks failed.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        let Some(user) = auth::authenticate(&self.users, email, password) else {
            info!("Login rejected");
            return false;
        };

        info!("User '{}' logged in", user.id);
        self.session = Some(Session {
            user_id: user.id.clone(),
            started_at: Utc::now(),
        });
        self.current_page = Page::Dashboard;
        self.persist_session().await;
        true
    }

    /// Ends the session, whether or not one exists.
    pub async fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!("User '{}' logged out", session.user_id);
        }
        self.current_page = Page::Dashboard;
        self.persist_session().await;
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        let session = self.session.as_ref()?;
        self.users.iter().find(|u| u.id == session.user_id)
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn current_role(&self) -> Option<Role> {
        self.current_user().map(|u| u.role)
    }

    /// Admin or IT technician.
    #[must_use]
    pub fn can_manage_it(&self) -> bool {
        self.current_role().is_some_and(Role::can_manage_it)
    }

    /// Admin or property manager.
    #[must_use]
    pub fn can_manage_maintenance(&self) -> bool {
        self.current_role().is_some_and(Role::can_manage_maintenance)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_role().is_some_and(Role::is_admin)
    }

    #[must_use]
    pub const fn current_page(&self) -> Page {
        self.current_page
    }

    pub fn set_current_page(&mut self, page: Page) {
        self.current_page = page;
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    #[must_use]
    pub fn cycles(&self) -> &[MaintenanceCycle] {
        &self.cycles
    }

    /// All notifications, across every user. Filter by owner before display.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// The logged-in user, or `NotAuthenticated`.
    fn require_user(&self) -> Result<&User> {
        self.current_user().ok_or(Error::NotAuthenticated)
    }

    /// The logged-in user if their role passes `allowed`, else `Forbidden`.
    fn require_role(&self, allowed: fn(Role) -> bool, action: &str) -> Result<&User> {
        let user = self.require_user()?;
        if allowed(user.role) {
            Ok(user)
        } else {
            warn!("User '{}' may not {}", user.id, action);
            Err(Error::forbidden(action))
        }
    }

    async fn persist_users(&self) {
        save(&self.storage, USERS_KEY, &self.users).await;
    }

    async fn persist_tickets(&self) {
        save(&self.storage, TICKETS_KEY, &self.tickets).await;
    }

    async fn persist_cycles(&self) {
        save(&self.storage, CYCLES_KEY, &self.cycles).await;
    }

    async fn persist_notifications(&self) {
        save(&self.storage, NOTIFICATIONS_KEY, &self.notifications).await;
    }

    async fn persist_session(&self) {
        save(&self.storage, SESSION_KEY, &self.session).await;
    }
}

/// Reads and decodes one collection, falling back to `fallback` when nothing
/// is stored or the stored blob is unusable.
async fn load_or<S, T>(storage: &S, key: &str, fallback: T) -> T
where
    S: BlobStore,
    T: DeserializeOwned,
{
    load_stored(storage, key).await.unwrap_or(fallback)
}

/// Reads and decodes one collection. `None` when nothing usable is stored.
async fn load_stored<S, T>(storage: &S, key: &str) -> Option<T>
where
    S: BlobStore,
    T: DeserializeOwned,
{
    match storage.get(key).await {
        Ok(Some(blob)) => match serde_json::from_str(&blob) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Stored '{}' could not be decoded, using seed data: {}", key, e);
                None
            }
        },
        Ok(None) => {
            debug!("Nothing stored under '{}', using seed data", key);
            None
        }
        Err(e) => {
            warn!("Failed to read '{}' from storage, using seed data: {}", key, e);
            None
        }
    }
}

/// Encodes and writes one collection. Failures are logged, never returned.
async fn save<S, T>(storage: &S, key: &str, value: &T)
where
    S: BlobStore,
    T: Serialize + ?Sized,
{
    let blob = match serde_json::to_string(value) {
        Ok(blob) => blob,
        Err(e) => {
            warn!("Failed to encode '{}': {}", key, e);
            return;
        }
    };

    if let Err(e) = storage.set(key, &blob).await {
        warn!("Failed to persist '{}', change will not survive a restart: {}", key, e);
    }
}
