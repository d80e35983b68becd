//! User administration and self-service profile edits.

use super::Portal;
use crate::{
    core::auth::hash_password,
    errors::{Error, Result},
    models::{NewUser, Role, User, UserPatch, new_id},
    storage::BlobStore,
};
use chrono::Utc;
use tracing::{info, instrument};

impl<S: BlobStore> Portal<S> {
    #[must_use]
    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// Creates an account. Administrators only.
    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    pub async fn create_user(&mut self, new_user: NewUser) -> Result<User> {
        self.require_role(Role::is_admin, "create users")?;

        validate_name(&new_user.name)?;
        self.validate_email(&new_user.email, None)?;
        if new_user.password.is_empty() {
            return Err(Error::validation("Password cannot be empty"));
        }

        let user = User {
            id: new_id(),
            name: new_user.name.trim().to_string(),
            email: new_user.email.trim().to_string(),
            password_hash: hash_password(&new_user.password)?,
            role: new_user.role,
            active: new_user.active,
            created_at: Utc::now(),
        };

        info!("User '{}' created with role {:?}", user.id, user.role);
        self.users.push(user.clone());
        self.persist_users().await;
        Ok(user)
    }

    /// Applies a partial update to an account.
    ///
    /// Administrators may edit anyone; other users may edit their own name,
    /// email and password. Omitting the password (or passing an empty one)
    /// keeps the existing secret. Nobody may deactivate their own account.
    #[instrument(skip(self, patch))]
    pub async fn update_user(&mut self, user_id: &str, patch: UserPatch) -> Result<Option<User>> {
        let actor = self.require_user()?;
        let is_self = actor.id == user_id;
        let is_admin = actor.role.is_admin();

        if !is_admin && (!is_self || patch.touches_privileged_fields()) {
            return Err(Error::forbidden("edit this account"));
        }
        if is_self && patch.active == Some(false) {
            return Err(Error::forbidden("deactivate your own account"));
        }
        if is_self && patch.role.is_some_and(|role| !role.is_admin()) {
            return Err(Error::forbidden("remove your own administrator role"));
        }
        if self.user(user_id).is_none() {
            return Ok(None);
        }

        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(email) = &patch.email {
            self.validate_email(email, Some(user_id))?;
        }
        let password_hash = patch.new_password().map(hash_password).transpose()?;

        let Some(user) = self.users.iter_mut().find(|u| u.id == user_id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            user.name = name.trim().to_string();
        }
        if let Some(email) = patch.email {
            user.email = email.trim().to_string();
        }
        if let Some(hash) = password_hash {
            user.password_hash = hash;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(active) = patch.active {
            user.active = active;
        }

        let updated = user.clone();
        info!("User '{}' updated", updated.id);
        self.persist_users().await;
        Ok(Some(updated))
    }

    /// Removes an account. Administrators only, and never the caller's own
    /// account. Tickets keep their cached names for the removed user.
    #[instrument(skip(self))]
    pub async fn delete_user(&mut self, user_id: &str) -> Result<Option<User>> {
        let actor = self.require_role(Role::is_admin, "delete users")?;
        if actor.id == user_id {
            tracing::warn!("Refusing to delete the logged-in account '{}'", user_id);
            return Err(Error::forbidden("delete your own account"));
        }

        let Some(index) = self.users.iter().position(|u| u.id == user_id) else {
            return Ok(None);
        };
        let removed = self.users.remove(index);

        info!("User '{}' deleted", removed.id);
        self.persist_users().await;
        Ok(Some(removed))
    }

    /// Email must be present and not used by any other account.
    fn validate_email(&self, email: &str, except_user_id: Option<&str>) -> Result<()> {
        if email.trim().is_empty() {
            return Err(Error::validation("Email cannot be empty"));
        }
        let taken = self
            .users
            .iter()
            .any(|u| Some(u.id.as_str()) != except_user_id && u.email_matches(email));
        if taken {
            return Err(Error::validation(format!(
                "Email '{}' is already in use",
                email.trim()
            )));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("Name cannot be empty"));
    }
    Ok(())
}
