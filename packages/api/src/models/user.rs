//! # User model
//!
//! [`User`] is the client-safe record: it is what services return, what the
//! session pointer holds, and what crosses into the UI. The stored users-table
//! row carries one extra column, `passwordHash` (an Argon2 PHC string written
//! at signup); deserializing a row into `User` drops it, so the hash never
//! leaves the store layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Partial profile change set; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}
