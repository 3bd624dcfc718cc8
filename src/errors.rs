//! Unified error types and result handling.
//!
//! Every fallible operation in the crate returns [`Result`]. No error here is
//! fatal once the system is running: operations either mutate consistently or
//! leave prior state intact and report through the notification channel.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Startup configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong.
        message: String,
    },

    /// Input rejected before any mutation took place.
    #[error("Validation error: {message}")]
    Validation {
        /// What was rejected.
        message: String,
    },

    /// A price that is negative, NaN, or infinite.
    #[error("Invalid price: {price}")]
    InvalidPrice {
        /// The rejected value.
        price: f64,
    },

    /// A bulk-reprice percentage that is NaN, infinite, or at or below -100.
    #[error("Invalid percentage: {percentage}")]
    InvalidPercentage {
        /// The rejected value.
        percentage: f64,
    },

    /// No service with the given id exists in the catalog.
    #[error("Service not found: {id}")]
    ServiceNotFound {
        /// The id that was looked up.
        id: i64,
    },

    /// No user account with the given id exists.
    #[error("User not found: {id}")]
    UserNotFound {
        /// The id that was looked up.
        id: i64,
    },

    /// The username is already taken by another account.
    #[error("Username already exists: {username}")]
    DuplicateUsername {
        /// The conflicting name.
        username: String,
    },

    /// Login attempt that matches no account.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Storage backend failure that is not plain I/O (quota, lost directory).
    #[error("Storage error: {message}")]
    Storage {
        /// Backend-reported reason.
        message: String,
    },

    /// The document could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the file backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
