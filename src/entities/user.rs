//! User account entity.
//!
//! Accounts are stored inside the clinic document, not in a separate table.
//! Passwords are held in plain text: the tool is single-tenant and offline,
//! and access control only gates which screens the view offers.

use serde::{Deserialize, Serialize};

/// Access role attached to a user account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular staff account; sees only the invoices it created.
    User,
    /// Administrative account; manages users, prices, and data tools.
    Admin,
}

impl Role {
    /// Lowercase name as stored in the document.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// User account record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: i64,
    /// Login name, unique across all users.
    pub username: String,
    /// Plain-text password.
    pub password: String,
    /// Access role.
    pub role: Role,
}
