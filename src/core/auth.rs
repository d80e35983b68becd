//! Credential handling - salted password hashing and login matching.
//!
//! Secrets are stored as Argon2id PHC strings with a random per-user salt.
//! Verification never reveals whether the email, the password or the
//! account's active flag caused a rejection.

use crate::{
    errors::{Error, Result},
    models::User,
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::LazyLock;

/// Hashes a plaintext password into a PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash {
            message: e.to_string(),
        })
}

/// Checks a plaintext password against a stored PHC string.
///
/// A malformed stored hash is treated as a mismatch.
#[must_use]
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        tracing::warn!("Stored password hash could not be parsed");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Stand-in hash verified when no account matches, so every login attempt
/// costs one Argon2 verification.
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| {
    hash_password("not-a-real-account").unwrap_or_else(|e| {
        tracing::error!("Failed to build dummy password hash: {}", e);
        String::new()
    })
});

/// Finds the active user whose email and password both match.
///
/// Runs exactly one password verification whether or not the email is known,
/// and checks the active flag only afterwards.
#[must_use]
pub fn authenticate<'a>(users: &'a [User], email: &str, password: &str) -> Option<&'a User> {
    authenticate_with(users, email, password, verify_password)
}

fn authenticate_with<'a>(
    users: &'a [User],
    email: &str,
    password: &str,
    mut verify: impl FnMut(&str, &str) -> bool,
) -> Option<&'a User> {
    let candidate = users.iter().find(|u| u.email_matches(email));
    let password_hash = candidate.map_or(DUMMY_HASH.as_str(), |u| u.password_hash.as_str());
    let password_ok = verify(password, password_hash);
    candidate.filter(|u| password_ok && u.active)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::models::Role;
    use chrono::Utc;

    fn user(email: &str, password: &str, active: bool) -> User {
        User {
            id: "u1".to_string(),
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            role: Role::Staff,
            active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_hash_is_salted() -> Result<()> {
        let first = hash_password("staff123")?;
        let second = hash_password("staff123")?;

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(verify_password("staff123", &first));
        assert!(verify_password("staff123", &second));
        assert!(!verify_password("staff124", &first));
        Ok(())
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("staff123", "staff123"));
    }

    #[test]
    fn test_authenticate() {
        let users = vec![user("jane@school.nz", "staff123", true)];

        assert!(authenticate(&users, "jane@school.nz", "staff123").is_some());
        assert!(authenticate(&users, "JANE@School.nz ", "staff123").is_some());
        assert!(authenticate(&users, "jane@school.nz", "wrong").is_none());
        assert!(authenticate(&users, "john@school.nz", "staff123").is_none());
    }

    #[test]
    fn test_authenticate_skips_inactive() {
        let users = vec![user("jane@school.nz", "staff123", false)];
        assert!(authenticate(&users, "jane@school.nz", "staff123").is_none());
    }

    #[test]
    fn test_every_attempt_verifies_once() {
        let users = vec![
            user("jane@school.nz", "staff123", true),
            user("old@school.nz", "staff123", false),
        ];

        for email in ["nobody@school.nz", "old@school.nz", "jane@school.nz"] {
            let mut hashes = Vec::new();
            let found = authenticate_with(&users, email, "wrong", |_, hash| {
                hashes.push(hash.to_string());
                false
            });
            assert!(found.is_none());
            assert_eq!(hashes.len(), 1, "one verification for {email}");
        }
    }

    #[test]
    fn test_unknown_email_checks_the_dummy_hash() {
        let users = vec![user("jane@school.nz", "staff123", true)];
        let mut checked = None;

        authenticate_with(&users, "nobody@school.nz", "staff123", |_, hash| {
            checked = Some(hash.to_string());
            true
        });

        let checked = checked.unwrap();
        assert!(checked.starts_with("$argon2id$"));
        assert_ne!(checked, users[0].password_hash);
    }

    #[test]
    fn test_inactive_rejected_even_with_right_password() {
        let users = vec![user("jane@school.nz", "staff123", false)];
        let mut calls = 0;
        let found = authenticate_with(&users, "jane@school.nz", "staff123", |password, hash| {
            calls += 1;
            verify_password(password, hash)
        });
        assert!(found.is_none());
        assert_eq!(calls, 1);
    }
}
