use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A text note owned by exactly one user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Owner lookup key; every read and write is filtered by it.
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a note.
#[derive(Clone, Debug, PartialEq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
}

/// Partial note change set; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}
