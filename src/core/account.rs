//! Account business logic - login, password changes, and user administration.
//!
//! This module authenticates against the stored user list and covers the
//! admin-side user management: add, edit, delete. Passwords are stored and
//! compared in plaintext, matching the single-workstation deployment this
//! system is built for. Access control (which of these operations a given
//! role may reach) is enforced by the view layer, not here; the one
//! deliberate consequence is that [`delete_user`] will remove any account,
//! including the caller's own, and the caller is expected to guard that.

use crate::context::ClinicContext;
use crate::entities::{Role, User};
use crate::errors::{Error, Result};

/// Minimum password length accepted by [`change_password`].
const MIN_PASSWORD_CHARS: usize = 4;

/// Checks a username/password pair against the stored accounts.
///
/// Both fields compare exactly as entered. A failed login emits no
/// notification; the caller renders the error on the login screen instead.
///
/// # Errors
/// Returns [`Error::InvalidCredentials`] when no account matches.
pub async fn authenticate(ctx: &ClinicContext, username: &str, password: &str) -> Result<User> {
    let users = ctx.store.users().await;
    let user = users
        .iter()
        .find(|u| u.username == username && u.password == password)
        .cloned()
        .ok_or(Error::InvalidCredentials)?;

    ctx.notify.success("Login successful! Welcome back.");
    Ok(user)
}

/// Changes a user's password after re-checking the current one.
///
/// The new password must be at least four characters. Confirming the new
/// password twice is a form concern and stays in the view layer.
///
/// # Errors
/// Returns [`Error::UserNotFound`] for an unknown id and
/// [`Error::Validation`] when the current password is wrong or the new one
/// is too short.
pub async fn change_password(
    ctx: &ClinicContext,
    user_id: i64,
    current_password: &str,
    new_password: &str,
) -> Result<()> {
    let mut users = ctx.store.users().await;
    let Some(user) = users.iter_mut().find(|u| u.id == user_id) else {
        ctx.notify.error("User not found");
        return Err(Error::UserNotFound { id: user_id });
    };

    if user.password != current_password {
        ctx.notify.error("Current password is incorrect");
        return Err(Error::Validation {
            message: "current password is incorrect".to_string(),
        });
    }
    if new_password.chars().count() < MIN_PASSWORD_CHARS {
        ctx.notify
            .error("Password must be at least 4 characters long");
        return Err(Error::Validation {
            message: "new password too short".to_string(),
        });
    }

    user.password = new_password.to_string();
    ctx.store.set_users(users).await;
    ctx.notify.success("Password changed successfully!");
    Ok(())
}

/// Creates a new account with the next free id.
///
/// The username is trimmed and must be unique across all accounts. Ids are
/// one past the current maximum, so deletions never cause reuse of a live
/// id within the same document.
///
/// # Errors
/// Returns [`Error::Validation`] for blank fields and
/// [`Error::DuplicateUsername`] for a taken name.
pub async fn add_user(
    ctx: &ClinicContext,
    username: &str,
    password: &str,
    role: Role,
) -> Result<User> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        ctx.notify.error("All fields are required");
        return Err(Error::Validation {
            message: "username and password are required".to_string(),
        });
    }

    let mut users = ctx.store.users().await;
    if users.iter().any(|u| u.username == username) {
        ctx.notify.error("Username already exists");
        return Err(Error::DuplicateUsername {
            username: username.to_string(),
        });
    }

    let user = User {
        id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
        username: username.to_string(),
        password: password.to_string(),
        role,
    };
    users.push(user.clone());
    ctx.store.set_users(users).await;

    ctx.notify.success("User added successfully!");
    Ok(user)
}

/// Requested changes to an existing account.
#[derive(Clone, Debug)]
pub struct UserUpdate {
    /// New username, trimmed before applying.
    pub username: String,
    /// New role.
    pub role: Role,
    /// New password; `None` or empty keeps the current one.
    pub password: Option<String>,
}

/// Applies an edit to an existing account.
///
/// The username must stay unique among the other accounts. An empty
/// password field means "leave the password alone".
///
/// # Errors
/// Returns [`Error::Validation`] for a blank username,
/// [`Error::UserNotFound`] for an unknown id, and
/// [`Error::DuplicateUsername`] when the name belongs to someone else.
pub async fn update_user(ctx: &ClinicContext, user_id: i64, update: UserUpdate) -> Result<User> {
    let username = update.username.trim();
    if username.is_empty() {
        ctx.notify.error("All fields are required");
        return Err(Error::Validation {
            message: "username is required".to_string(),
        });
    }

    let mut users = ctx.store.users().await;
    let Some(index) = users.iter().position(|u| u.id == user_id) else {
        ctx.notify.error("User not found");
        return Err(Error::UserNotFound { id: user_id });
    };
    if users.iter().any(|u| u.username == username && u.id != user_id) {
        ctx.notify.error("Username already exists");
        return Err(Error::DuplicateUsername {
            username: username.to_string(),
        });
    }

    let user = &mut users[index];
    user.username = username.to_string();
    user.role = update.role;
    if let Some(password) = update.password.as_deref() {
        if !password.is_empty() {
            user.password = password.to_string();
        }
    }
    let updated = user.clone();
    ctx.store.set_users(users).await;

    ctx.notify.success("User updated successfully!");
    Ok(updated)
}

/// Removes an account and returns it.
///
/// No self-delete guard lives here; the view layer keeps a signed-in admin
/// from removing their own account.
///
/// # Errors
/// Returns [`Error::UserNotFound`] for an unknown id.
pub async fn delete_user(ctx: &ClinicContext, user_id: i64) -> Result<User> {
    let mut users = ctx.store.users().await;
    let Some(index) = users.iter().position(|u| u.id == user_id) else {
        ctx.notify.error("User not found");
        return Err(Error::UserNotFound { id: user_id });
    };

    let removed = users.remove(index);
    ctx.store.set_users(users).await;

    ctx.notify.success("User deleted successfully!");
    Ok(removed)
}
