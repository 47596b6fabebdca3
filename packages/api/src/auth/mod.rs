//! # Identity store — email + password authentication
//!
//! [`AuthService`] resolves the current user, performs credential checks,
//! and owns the persisted session pointer on the injected store. Rules the
//! rest of the crate relies on:
//!
//! - `current_user` is a read-only probe: store failures and undecodable
//!   session blobs degrade to `None`.
//! - `login`/`signup` persist the session on success. The session value is
//!   the client-safe [`User`], never the stored row with its password hash.
//! - `logout` always succeeds from the caller's perspective; a store
//!   failure is logged and swallowed.
//! - `update_profile` is a write path: it merges into both the users-table
//!   row and the session pointer, and surfaces store failures.

mod password;

use serde_json::Value;
use store::{Filter, RecordStore};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::{ProfileUpdate, User};
use crate::session::SessionContext;

const USERS: &str = "users";

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

pub struct AuthService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> AuthService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The user of the active session, or `None`.
    pub async fn current_user(&self) -> Option<User> {
        let value = match self.store.session().await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("session probe failed: {err}");
                return None;
            }
        };
        value.and_then(|v| serde_json::from_value(v).ok())
    }

    /// Resolve the context to pass into note and quiz calls.
    pub async fn session(&self) -> SessionContext {
        match self.current_user().await {
            Some(user) => SessionContext::authenticated(user),
            None => SessionContext::anonymous(),
        }
    }

    /// Validate credentials and persist the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ServiceError> {
        let email = email.trim().to_lowercase();
        let row = self
            .store
            .select_one(USERS, &[Filter::eq("email", email)])
            .await?;
        let Some(row) = row else {
            return Err(ServiceError::Auth("User not found".into()));
        };

        let hash = row
            .get("passwordHash")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if !password::verify(password, hash).unwrap_or(false) {
            return Err(ServiceError::Auth("Invalid email or password".into()));
        }

        let user: User = decode_user(row)?;
        self.store.set_session(session_value(&user)?).await?;
        Ok(user)
    }

    /// Register a new user and persist the session.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User, ServiceError> {
        if password != confirm_password {
            return Err(ServiceError::Validation("Passwords do not match".into()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ServiceError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Validation("Name is required".into()));
        }
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(ServiceError::Validation("Invalid email address".into()));
        }

        let existing = self
            .store
            .select_one(USERS, &[Filter::eq("email", email.clone())])
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "An account with this email already exists".into(),
            ));
        }

        let hash = password::hash(password).map_err(ServiceError::Remote)?;
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email,
            created_at: chrono::Utc::now(),
        };
        let mut row = session_value(&user)?;
        row["passwordHash"] = Value::String(hash);

        let stored = self.store.insert(USERS, row).await?;
        let user = decode_user(stored)?;
        self.store.set_session(session_value(&user)?).await?;
        Ok(user)
    }

    /// Clear the session. The caller always observes a logged-out state,
    /// even when the store fails to persist the clear.
    pub async fn logout(&self) {
        if let Err(err) = self.store.clear_session().await {
            tracing::warn!("logout could not clear the stored session: {err}");
        }
    }

    /// Merge profile fields into the current user, persisting both the
    /// users-table row and the session pointer.
    pub async fn update_profile(&self, changes: ProfileUpdate) -> Result<User, ServiceError> {
        let user = self
            .current_user()
            .await
            .ok_or_else(|| ServiceError::Auth("Not authenticated".into()))?;

        let mut merged = user.clone();
        if let Some(name) = changes.name {
            merged.name = name;
        }
        if let Some(email) = changes.email {
            merged.email = email.trim().to_lowercase();
        }
        if merged == user {
            return Ok(user);
        }

        let patch = serde_json::json!({"name": merged.name, "email": merged.email});
        self.store
            .update(USERS, &[Filter::eq("id", merged.id.clone())], patch)
            .await?;
        self.store.set_session(session_value(&merged)?).await?;
        Ok(merged)
    }
}

fn session_value(user: &User) -> Result<Value, ServiceError> {
    serde_json::to_value(user).map_err(|e| ServiceError::Remote(e.to_string()))
}

fn decode_user(row: Value) -> Result<User, ServiceError> {
    serde_json::from_value(row).map_err(|e| ServiceError::Remote(format!("corrupt user record: {e}")))
}
