//! Ticket operations: raise, patch, comment.

use super::Portal;
use crate::{
    catalogue,
    errors::{Error, Result},
    models::{
        Comment, NewNotification, NewTicket, NotificationKind, Ticket, TicketKind, TicketPatch,
        TicketStatus, new_id,
    },
    storage::BlobStore,
};
use chrono::Utc;
use tracing::{info, instrument};

impl<S: BlobStore> Portal<S> {
    #[must_use]
    pub fn ticket(&self, ticket_id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == ticket_id)
    }

    /// Raises a ticket on behalf of the logged-in user. New tickets go first.
    #[instrument(skip(self, new_ticket), fields(kind = ?new_ticket.kind))]
    pub async fn create_ticket(&mut self, new_ticket: NewTicket) -> Result<Ticket> {
        let creator = self.require_user()?;
        let (created_by, created_by_name) = (creator.id.clone(), creator.name.clone());

        validate_text("Title", &new_ticket.title)?;
        validate_text("Category", &new_ticket.category)?;
        validate_location(&new_ticket.location)?;
        let assignee = new_ticket
            .assigned_to
            .as_deref()
            .map(|id| self.assignee(id, new_ticket.kind))
            .transpose()?;

        let now = Utc::now();
        let ticket = Ticket {
            id: new_id(),
            kind: new_ticket.kind,
            title: new_ticket.title.trim().to_string(),
            description: new_ticket.description,
            priority: new_ticket.priority,
            status: TicketStatus::Open,
            category: new_ticket.category,
            location: new_ticket.location,
            created_by,
            created_by_name,
            assigned_to: assignee.as_ref().map(|(id, _)| id.clone()),
            assigned_to_name: assignee.map(|(_, name)| name),
            due_date: new_ticket.due_date,
            resolved_at: None,
            comments: Vec::new(),
            attachment_count: 0,
            created_at: now,
            updated_at: now,
        };

        info!("Ticket '{}' created", ticket.id);
        self.tickets.insert(0, ticket.clone());
        self.persist_tickets().await;

        if let Some(assignee_id) = ticket.assigned_to.clone() {
            self.notify_assignment(&ticket, &assignee_id).await;
        }
        Ok(ticket)
    }

    /// Applies a partial update to a ticket and refreshes `updated_at`.
    ///
    /// Status, priority, assignment and due date need the management right for
    /// the ticket's kind. The first move into `Resolved` stamps `resolved_at`;
    /// later transitions never clear it.
    #[instrument(skip(self, patch))]
    pub async fn update_ticket(
        &mut self,
        ticket_id: &str,
        patch: TicketPatch,
    ) -> Result<Option<Ticket>> {
        let actor = self.require_user()?;
        let (actor_id, actor_role) = (actor.id.clone(), actor.role);

        let Some(kind) = self.ticket(ticket_id).map(|t| t.kind) else {
            return Ok(None);
        };
        if patch.touches_workflow_fields() && !actor_role.can_manage(kind) {
            tracing::warn!("User '{}' may not manage {:?} tickets", actor_id, kind);
            return Err(Error::forbidden("change ticket workflow fields"));
        }

        if let Some(title) = &patch.title {
            validate_text("Title", title)?;
        }
        if let Some(category) = &patch.category {
            validate_text("Category", category)?;
        }
        if let Some(location) = &patch.location {
            validate_location(location)?;
        }
        let assignee = match &patch.assigned_to {
            Some(Some(id)) => Some(Some(self.assignee(id, kind)?)),
            Some(None) => Some(None),
            None => None,
        };

        let now = Utc::now();
        let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == ticket_id) else {
            return Ok(None);
        };
        let previous_status = ticket.status;
        let previous_assignee = ticket.assigned_to.clone();

        if let Some(title) = patch.title {
            ticket.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            ticket.description = description;
        }
        if let Some(priority) = patch.priority {
            ticket.priority = priority;
        }
        if let Some(category) = patch.category {
            ticket.category = category;
        }
        if let Some(location) = patch.location {
            ticket.location = location;
        }
        if let Some(due_date) = patch.due_date {
            ticket.due_date = due_date;
        }
        if let Some(count) = patch.attachment_count {
            ticket.attachment_count = count;
        }
        if let Some(assignee) = assignee {
            ticket.assigned_to_name = assignee.as_ref().map(|(_, name)| name.clone());
            ticket.assigned_to = assignee.map(|(id, _)| id);
        }
        if let Some(status) = patch.status {
            ticket.status = status;
            if status == TicketStatus::Resolved && ticket.resolved_at.is_none() {
                ticket.resolved_at = Some(now);
            }
        }
        ticket.updated_at = now;

        let updated = ticket.clone();
        info!("Ticket '{}' updated", updated.id);
        self.persist_tickets().await;

        if updated.status != previous_status {
            self.notify_status_change(&updated, &actor_id).await;
        }
        let newly_assigned = updated
            .assigned_to
            .as_ref()
            .filter(|id| previous_assignee.as_ref() != Some(*id) && **id != actor_id);
        if let Some(assignee_id) = newly_assigned {
            self.notify_assignment(&updated, assignee_id).await;
        }

        Ok(Some(updated))
    }

    /// Appends a comment by the logged-in user and refreshes `updated_at`.
    #[instrument(skip(self, text))]
    pub async fn add_comment(&mut self, ticket_id: &str, text: &str) -> Result<Option<Comment>> {
        let author = self.require_user()?;
        let (author_id, author_name) = (author.id.clone(), author.name.clone());
        validate_text("Comment", text)?;

        let now = Utc::now();
        let Some(ticket) = self.tickets.iter_mut().find(|t| t.id == ticket_id) else {
            return Ok(None);
        };

        let comment = Comment {
            id: new_id(),
            user_id: author_id.clone(),
            user_name: author_name.clone(),
            text: text.trim().to_string(),
            created_at: now,
        };
        ticket.comments.push(comment.clone());
        ticket.updated_at = now;

        let title = ticket.title.clone();
        let watchers: Vec<String> = std::iter::once(ticket.created_by.clone())
            .chain(ticket.assigned_to.clone())
            .filter(|id| *id != author_id)
            .collect();

        info!("Comment added to ticket '{}'", ticket_id);
        self.persist_tickets().await;

        let mut notified = Vec::new();
        for user_id in watchers {
            if notified.contains(&user_id) {
                continue;
            }
            self.push_notification(NewNotification {
                user_id: user_id.clone(),
                kind: NotificationKind::Info,
                title: "New comment".to_string(),
                message: format!("{author_name} commented on \"{title}\""),
            });
            notified.push(user_id);
        }
        if !notified.is_empty() {
            self.persist_notifications().await;
        }

        Ok(Some(comment))
    }

    /// Resolves an assignee id to `(id, display name)`. The user must be
    /// active and on a team that manages tickets of `kind`.
    fn assignee(&self, user_id: &str, kind: TicketKind) -> Result<(String, String)> {
        let user = self
            .users
            .iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| Error::validation(format!("Unknown assignee '{user_id}'")))?;
        if !user.active {
            return Err(Error::validation(format!(
                "Assignee '{user_id}' is deactivated"
            )));
        }
        if !user.role.can_manage(kind) {
            return Err(Error::validation(format!(
                "{} cannot be assigned {kind:?} tickets",
                user.role.label()
            )));
        }
        Ok((user.id.clone(), user.name.clone()))
    }

    async fn notify_assignment(&mut self, ticket: &Ticket, assignee_id: &str) {
        if ticket.created_by == assignee_id
            && self.current_user().is_some_and(|u| u.id == assignee_id)
        {
            return;
        }
        self.push_notification(NewNotification {
            user_id: assignee_id.to_string(),
            kind: NotificationKind::Info,
            title: "Ticket assigned".to_string(),
            message: format!("You have been assigned \"{}\"", ticket.title),
        });
        self.persist_notifications().await;
    }

    async fn notify_status_change(&mut self, ticket: &Ticket, actor_id: &str) {
        if ticket.created_by == actor_id {
            return;
        }
        let kind = match ticket.status {
            TicketStatus::Resolved | TicketStatus::Closed => NotificationKind::Success,
            TicketStatus::OnHold => NotificationKind::Warning,
            TicketStatus::Open | TicketStatus::InProgress => NotificationKind::Info,
        };
        self.push_notification(NewNotification {
            user_id: ticket.created_by.clone(),
            kind,
            title: "Ticket status changed".to_string(),
            message: format!("\"{}\" is now {}", ticket.title, ticket.status.label()),
        });
        self.persist_notifications().await;
    }
}

fn validate_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn validate_location(location: &str) -> Result<()> {
    if catalogue::is_known_location(location) {
        Ok(())
    } else {
        Err(Error::validation(format!("Unknown location '{location}'")))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::models::{Priority, Role, TicketKind, UserPatch};
    use crate::test_utils::{login_as, new_test_ticket, setup_test_portal};

    #[tokio::test]
    async fn test_create_ticket_defaults() -> Result<()> {
        let mut portal = setup_test_portal().await?;
        login_as(&mut portal, Role::Staff).await;

        let ticket = portal
            .create_ticket(new_test_ticket(TicketKind::It, "Projector dead"))
            .await?;

        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.created_by, "u4");
        assert_eq!(ticket.created_by_name, "Jane Staff");
        assert!(ticket.comments.is_empty());
        assert_eq!(ticket.attachment_count, 0);
        assert_eq!(ticket.created_at, ticket.updated_at);
        assert_eq!(portal.tickets()[0].id, ticket.id);
        assert_eq!(portal.tickets().len(), 7);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_ticket_requires_session() -> Result<()> {
        let mut portal = setup_test_portal().await?;

        let result = portal
            .create_ticket(new_test_ticket(TicketKind::It, "Projector dead"))
            .await;
        assert!(matches!(result, Err(Error::NotAuthenticated)));
        assert_eq!(portal.tickets().len(), 6);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_ticket_validation() -> Result<()> {
        let mut portal = setup_test_portal().await?;
        login_as(&mut portal, Role::Staff).await;

        let blank = new_test_ticket(TicketKind::It, "   ");
        assert!(matches!(
            portal.create_ticket(blank).await,
            Err(Error::Validation { .. })
        ));

        let mut nowhere = new_test_ticket(TicketKind::It, "Projector dead");
        nowhere.location = "Moon Base".to_string();
        assert!(matches!(
            portal.create_ticket(nowhere).await,
            Err(Error::Validation { .. })
        ));

        let mut ghost = new_test_ticket(TicketKind::It, "Projector dead");
        ghost.assigned_to = Some("nobody".to_string());
        assert!(matches!(
            portal.create_ticket(ghost).await,
            Err(Error::Validation { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_ticket_notifies_assignee() -> Result<()> {
        let mut portal = setup_test_portal().await?;
        login_as(&mut portal, Role::Staff).await;

        let mut new_ticket = new_test_ticket(TicketKind::It, "Projector dead");
        new_ticket.assigned_to = Some("u2".to_string());
        let ticket = portal.create_ticket(new_ticket).await?;

        assert_eq!(ticket.assigned_to_name.as_deref(), Some("Sarah Tech"));
        assert_eq!(portal.unread_count("u2"), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_resolved_at_set_once() -> Result<()> {
        let mut portal = setup_test_portal().await?;
        login_as(&mut portal, Role::ItTech).await;
        let id = portal.tickets()[0].id.clone();

        let resolve = || TicketPatch {
            status: Some(TicketStatus::Resolved),
            ..Default::default()
        };

        let first = portal.update_ticket(&id, resolve()).await?.unwrap();
        let resolved_at = first.resolved_at.unwrap();

        let reopened = portal
            .update_ticket(
                &id,
                TicketPatch {
                    status: Some(TicketStatus::InProgress),
                    ..Default::default()
                },
            )
            .await?
            .unwrap();
        assert_eq!(reopened.resolved_at, Some(resolved_at));

        let again = portal.update_ticket(&id, resolve()).await?.unwrap();
        assert_eq!(again.resolved_at, Some(resolved_at));
        assert!(again.updated_at >= resolved_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at_and_keeps_created_at() -> Result<()> {
        let mut portal = setup_test_portal().await?;
        login_as(&mut portal, Role::Staff).await;
        let before = portal.tickets()[2].clone();

        let after = portal
            .update_ticket(
                &before.id,
                TicketPatch {
                    description: Some("Now flooding the bench".to_string()),
                    ..Default::default()
                },
            )
            .await?
            .unwrap();

        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
        assert_eq!(after.description, "Now flooding the bench");
        assert_eq!(after.status, before.status);
        Ok(())
    }

    #[tokio::test]
    async fn test_workflow_fields_need_matching_team() -> Result<()> {
        let mut portal = setup_test_portal().await?;
        let it_ticket = portal.tickets()[0].id.clone();
        let maintenance_ticket = portal.tickets()[2].id.clone();
        let bump = || TicketPatch {
            priority: Some(Priority::Critical),
            ..Default::default()
        };

        login_as(&mut portal, Role::ItTech).await;
        assert!(portal.update_ticket(&it_ticket, bump()).await?.is_some());
        assert!(matches!(
            portal.update_ticket(&maintenance_ticket, bump()).await,
            Err(Error::Forbidden { .. })
        ));

        login_as(&mut portal, Role::PropertyManager).await;
        assert!(portal.update_ticket(&maintenance_ticket, bump()).await?.is_some());
        assert!(matches!(
            portal.update_ticket(&it_ticket, bump()).await,
            Err(Error::Forbidden { .. })
        ));

        login_as(&mut portal, Role::Staff).await;
        assert!(matches!(
            portal.update_ticket(&it_ticket, bump()).await,
            Err(Error::Forbidden { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_ticket_is_noop() -> Result<()> {
        let mut portal = setup_test_portal().await?;
        login_as(&mut portal, Role::Admin).await;
        let before = portal.tickets().to_vec();

        let result = portal
            .update_ticket(
                "missing",
                TicketPatch {
                    status: Some(TicketStatus::Closed),
                    ..Default::default()
                },
            )
            .await?;
        assert!(result.is_none());
        assert_eq!(portal.tickets(), before.as_slice());
        Ok(())
    }

    #[tokio::test]
    async fn test_reassignment_updates_cached_name_and_unassign_clears_it() -> Result<()> {
        let mut portal = setup_test_portal().await?;
        login_as(&mut portal, Role::Admin).await;
        let id = portal.tickets()[0].id.clone();

        let reassigned = portal
            .update_ticket(
                &id,
                TicketPatch {
                    assigned_to: Some(Some("u1".to_string())),
                    ..Default::default()
                },
            )
            .await?
            .unwrap();
        assert_eq!(reassigned.assigned_to_name.as_deref(), Some("Admin User"));

        let unassigned = portal
            .update_ticket(
                &id,
                TicketPatch {
                    assigned_to: Some(None),
                    ..Default::default()
                },
            )
            .await?
            .unwrap();
        assert!(unassigned.assigned_to.is_none());
        assert!(unassigned.assigned_to_name.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_status_change_notifies_creator() -> Result<()> {
        let mut portal = setup_test_portal().await?;
        login_as(&mut portal, Role::ItTech).await;
        let id = portal.tickets()[0].id.clone();

        portal
            .update_ticket(
                &id,
                TicketPatch {
                    status: Some(TicketStatus::InProgress),
                    ..Default::default()
                },
            )
            .await?;

        let jane = portal.notifications_for("u4");
        assert_eq!(jane.len(), 1);
        assert!(jane[0].message.contains("In Progress"));
        assert!(portal.notifications_for("u2").is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_comment_appends_and_refreshes() -> Result<()> {
        let mut portal = setup_test_portal().await?;
        login_as(&mut portal, Role::ItTech).await;
        let before = portal.tickets()[0].clone();

        let comment = portal
            .add_comment(&before.id, "Access point rebooted")
            .await?
            .unwrap();

        let after = portal.ticket(&before.id).unwrap();
        assert_eq!(after.comments.len(), before.comments.len() + 1);
        assert_eq!(after.comments[..before.comments.len()], before.comments[..]);
        assert_eq!(after.comments.last(), Some(&comment));
        assert_eq!(comment.user_name, "Sarah Tech");
        assert!(after.updated_at > before.updated_at);

        // Creator is told, the author is not
        assert_eq!(portal.unread_count("u4"), 1);
        assert_eq!(portal.unread_count("u2"), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_comment_edge_cases() -> Result<()> {
        let mut portal = setup_test_portal().await?;
        let id = portal.tickets()[0].id.clone();

        assert!(matches!(
            portal.add_comment(&id, "hello").await,
            Err(Error::NotAuthenticated)
        ));

        login_as(&mut portal, Role::Staff).await;
        assert!(matches!(
            portal.add_comment(&id, "  ").await,
            Err(Error::Validation { .. })
        ));
        assert!(portal.add_comment("missing", "hello").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_assignee_must_be_on_the_ticket_team() -> Result<()> {
        let mut portal = setup_test_portal().await?;
        login_as(&mut portal, Role::Admin).await;

        // Staff cannot take IT tickets
        let mut to_staff = new_test_ticket(TicketKind::It, "Projector dead");
        to_staff.assigned_to = Some("u4".to_string());
        assert!(matches!(
            portal.create_ticket(to_staff).await,
            Err(Error::Validation { .. })
        ));

        // IT technicians cannot take maintenance tickets
        let mut cross_team = new_test_ticket(TicketKind::Maintenance, "Door sticks");
        cross_team.assigned_to = Some("u2".to_string());
        assert!(matches!(
            portal.create_ticket(cross_team).await,
            Err(Error::Validation { .. })
        ));
        assert_eq!(portal.tickets().len(), 6);

        let maintenance_id = portal
            .tickets()
            .iter()
            .find(|t| t.kind == TicketKind::Maintenance)
            .unwrap()
            .id
            .clone();
        let to_it_tech = TicketPatch {
            assigned_to: Some(Some("u2".to_string())),
            ..Default::default()
        };
        assert!(matches!(
            portal.update_ticket(&maintenance_id, to_it_tech).await,
            Err(Error::Validation { .. })
        ));

        // Admins may take either kind
        let mut to_admin = new_test_ticket(TicketKind::Maintenance, "Door sticks");
        to_admin.assigned_to = Some("u1".to_string());
        let ticket = portal.create_ticket(to_admin).await?;
        assert_eq!(ticket.assigned_to_name.as_deref(), Some("Admin User"));
        Ok(())
    }

    #[tokio::test]
    async fn test_deactivated_user_cannot_be_assigned() -> Result<()> {
        let mut portal = setup_test_portal().await?;
        login_as(&mut portal, Role::Admin).await;
        portal
            .update_user(
                "u2",
                UserPatch {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await?;

        let id = portal.tickets()[0].id.clone();
        let before = portal.ticket(&id).unwrap().clone();
        let to_inactive = TicketPatch {
            assigned_to: Some(Some("u2".to_string())),
            ..Default::default()
        };
        assert!(matches!(
            portal.update_ticket(&id, to_inactive).await,
            Err(Error::Validation { .. })
        ));
        assert_eq!(portal.ticket(&id), Some(&before));
        Ok(())
    }
}
