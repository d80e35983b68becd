//! Notification operations.
//!
//! The store holds every user's notifications in one collection. Reads are
//! offered scoped to an owner; [`Portal::mark_all_notifications_read`] is
//! global; callers must scope display themselves.

use super::Portal;
use crate::{
    models::{NewNotification, Notification, new_id},
    storage::BlobStore,
};
use chrono::Utc;
use tracing::{debug, instrument};

impl<S: BlobStore> Portal<S> {
    /// Appends an unread notification (newest first) and persists.
    #[instrument(skip(self, notification), fields(user_id = %notification.user_id))]
    pub async fn add_notification(&mut self, notification: NewNotification) -> Notification {
        let created = self.push_notification(notification);
        self.persist_notifications().await;
        created
    }

    /// Marks one notification read. `None` when the id is unknown.
    pub async fn mark_notification_read(&mut self, notification_id: &str) -> Option<()> {
        let notification = self
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)?;
        notification.read = true;
        self.persist_notifications().await;
        Some(())
    }

    /// Marks every notification read, for every user.
    pub async fn mark_all_notifications_read(&mut self) {
        for notification in &mut self.notifications {
            notification.read = true;
        }
        self.persist_notifications().await;
    }

    /// Marks all of one user's notifications read, leaving other users' alone.
    /// Returns how many changed.
    pub async fn mark_all_read_for(&mut self, user_id: &str) -> usize {
        let mut changed = 0;
        for notification in self
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.read)
        {
            notification.read = true;
            changed += 1;
        }
        if changed > 0 {
            self.persist_notifications().await;
        }
        changed
    }

    /// One user's notifications, newest first.
    #[must_use]
    pub fn notifications_for(&self, user_id: &str) -> Vec<&Notification> {
        self.notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .collect()
    }

    #[must_use]
    pub fn unread_count(&self, user_id: &str) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.read)
            .count()
    }

    /// Adds a notification in memory only; callers persist.
    pub(super) fn push_notification(&mut self, notification: NewNotification) -> Notification {
        let created = Notification {
            id: new_id(),
            user_id: notification.user_id,
            kind: notification.kind,
            title: notification.title,
            message: notification.message,
            read: false,
            created_at: Utc::now(),
        };
        debug!("Notification '{}' for user '{}'", created.id, created.user_id);
        self.notifications.insert(0, created.clone());
        created
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        errors::Result,
        models::NotificationKind,
        storage::NOTIFICATIONS_KEY,
        test_utils::setup_test_portal,
    };

    fn note(user_id: &str, title: &str) -> NewNotification {
        NewNotification {
            user_id: user_id.to_string(),
            kind: NotificationKind::Warning,
            title: title.to_string(),
            message: "Check the cycle".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_notification_is_unread_and_newest_first() -> Result<()> {
        let mut portal = setup_test_portal().await?;

        portal.add_notification(note("u3", "First")).await;
        let second = portal.add_notification(note("u3", "Second")).await;

        assert!(!second.read);
        let mine = portal.notifications_for("u3");
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].title, "Second");
        assert_eq!(portal.unread_count("u3"), 2);
        assert!(portal.notifications_for("u4").is_empty());

        let stored = portal.storage().get(NOTIFICATIONS_KEY).await?.unwrap();
        assert!(stored.contains("Second"));
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_one_read() -> Result<()> {
        let mut portal = setup_test_portal().await?;
        let created = portal.add_notification(note("u3", "First")).await;

        assert!(portal.mark_notification_read(&created.id).await.is_some());
        assert_eq!(portal.unread_count("u3"), 0);
        assert!(portal.mark_notification_read("missing").await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_all_read_for_user_leaves_others() -> Result<()> {
        let mut portal = setup_test_portal().await?;
        portal.add_notification(note("u3", "Mine")).await;
        portal.add_notification(note("u3", "Also mine")).await;
        portal.add_notification(note("u4", "Not mine")).await;

        assert_eq!(portal.mark_all_read_for("u3").await, 2);
        assert!(portal.notifications_for("u3").iter().all(|n| n.read));
        assert_eq!(portal.unread_count("u4"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_mark_all_read_is_global() -> Result<()> {
        // Known scope gap: the store-level operation is not scoped to a viewer
        let mut portal = setup_test_portal().await?;
        portal.add_notification(note("u3", "Mine")).await;
        portal.add_notification(note("u4", "Not mine")).await;

        portal.mark_all_notifications_read().await;
        assert!(portal.notifications().iter().all(|n| n.read));
        assert_eq!(portal.unread_count("u4"), 0);
        Ok(())
    }
}
