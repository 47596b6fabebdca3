//! Explicit session context.
//!
//! The identity a service call runs under is resolved once (usually via
//! [`AuthService::session`](crate::AuthService::session)) and passed into
//! every note and quiz operation. There is no process-wide "current user":
//! the persisted pointer lives on the injected store, and the resolved
//! identity travels as a plain value.

use crate::error::ServiceError;
use crate::models::User;

/// The caller's identity for the duration of one service call.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionContext {
    user: Option<User>,
}

impl SessionContext {
    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The user, or the `Auth` failure every mutating operation reports
    /// when called without a session.
    pub(crate) fn require_user(&self) -> Result<&User, ServiceError> {
        self.user
            .as_ref()
            .ok_or_else(|| ServiceError::Auth("Not authenticated".into()))
    }
}
