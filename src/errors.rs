//! Unified error type for the portal.
//!
//! Storage, serialization and configuration failures are wrapped here together
//! with the domain outcomes the store reports to its callers (missing session,
//! forbidden action, invalid input).

use thiserror::Error;

/// All errors surfaced by the portal library.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong
        message: String,
    },

    /// The storage backend failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A stored blob could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation requires a logged-in user
    #[error("No user is logged in")]
    NotAuthenticated,

    /// The logged-in user may not perform this action
    #[error("Forbidden: {action}")]
    Forbidden {
        /// The refused action
        action: String,
    },

    /// Input failed validation
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the invalid input
        message: String,
    },

    /// The password hashing library rejected an input or stored hash
    #[error("Password hash error: {message}")]
    PasswordHash {
        /// Message from the hashing library
        message: String,
    },
}

impl Error {
    pub(crate) fn forbidden(action: impl Into<String>) -> Self {
        Self::Forbidden {
            action: action.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
