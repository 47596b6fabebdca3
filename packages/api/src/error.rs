//! Service-level error taxonomy.
//!
//! Every variant carries a human-readable message suitable for direct
//! display; no error codes cross the service boundary.

use store::StoreError;
use thiserror::Error;

/// Errors surfaced by the services and lookup clients.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ServiceError {
    /// Bad input shape or length (password too short, mismatched
    /// confirmation, blank lookup term, ...).
    #[error("{0}")]
    Validation(String),
    /// No active session, or bad credentials.
    #[error("{0}")]
    Auth(String),
    /// Duplicate signup email.
    #[error("{0}")]
    Conflict(String),
    /// Record absent, or not visible to the current user.
    #[error("{0}")]
    NotFound(String),
    /// Backing-store or HTTP-layer failure.
    #[error("{0}")]
    Remote(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        Self::Remote(err.to_string())
    }
}
