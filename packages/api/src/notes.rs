//! User-scoped note CRUD over a [`RecordStore`].
//!
//! Reads degrade (anonymous callers and store failures yield empty/absent
//! results); writes surface every failure. Both `update` and `delete` of an
//! id that is absent or owned by someone else fail with `NotFound`.

use chrono::Utc;
use serde_json::{json, Value};
use store::{Filter, Order, RecordStore};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::{NewNote, Note, NoteUpdate};
use crate::session::SessionContext;

const NOTES: &str = "notes";

pub struct NotesService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> NotesService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All notes owned by the context's user, most recently updated first.
    pub async fn list(&self, ctx: &SessionContext) -> Vec<Note> {
        let Some(user) = ctx.user() else {
            return Vec::new();
        };
        let rows = match self
            .store
            .select(
                NOTES,
                &[Filter::eq("userId", user.id.clone())],
                Some(&Order::desc("updatedAt")),
            )
            .await
        {
            Ok(rows) => rows,
            Err(err) => {
                tracing::warn!("listing notes failed: {err}");
                return Vec::new();
            }
        };
        rows.into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect()
    }

    /// A single note, or `None` when the id does not exist for this user.
    pub async fn get(&self, ctx: &SessionContext, id: &str) -> Option<Note> {
        let user = ctx.user()?;
        let row = self
            .store
            .select_one(NOTES, &scope(id, &user.id))
            .await
            .ok()??;
        serde_json::from_value(row).ok()
    }

    pub async fn create(&self, ctx: &SessionContext, data: NewNote) -> Result<Note, ServiceError> {
        let user = ctx.require_user()?;
        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: data.title,
            content: data.content,
            user_id: user.id.clone(),
            created_at: now,
            updated_at: now,
        };
        let row = serde_json::to_value(&note).map_err(|e| ServiceError::Remote(e.to_string()))?;
        let stored = self.store.insert(NOTES, row).await?;
        decode_note(stored)
    }

    pub async fn update(
        &self,
        ctx: &SessionContext,
        id: &str,
        data: NoteUpdate,
    ) -> Result<Note, ServiceError> {
        let user = ctx.require_user()?;
        let mut patch = serde_json::Map::new();
        if let Some(title) = data.title {
            patch.insert("title".into(), json!(title));
        }
        if let Some(content) = data.content {
            patch.insert("content".into(), json!(content));
        }
        patch.insert("updatedAt".into(), json!(Utc::now()));

        let updated = self
            .store
            .update(NOTES, &scope(id, &user.id), Value::Object(patch))
            .await?;
        match updated.into_iter().next() {
            Some(row) => decode_note(row),
            None => Err(ServiceError::NotFound("Note not found".into())),
        }
    }

    /// Delete a note owned by this user. Ids that are absent or owned by
    /// someone else fail with `NotFound`, matching `update`.
    pub async fn delete(&self, ctx: &SessionContext, id: &str) -> Result<(), ServiceError> {
        let user = ctx.require_user()?;
        let removed = self.store.delete(NOTES, &scope(id, &user.id)).await?;
        if removed == 0 {
            return Err(ServiceError::NotFound("Note not found".into()));
        }
        Ok(())
    }
}

fn scope(id: &str, user_id: &str) -> [Filter; 2] {
    [Filter::eq("id", id), Filter::eq("userId", user_id)]
}

fn decode_note(row: Value) -> Result<Note, ServiceError> {
    serde_json::from_value(row).map_err(|e| ServiceError::Remote(format!("corrupt note record: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use store::{LocalStore, MemoryStore};

    fn ctx(user_id: &str) -> SessionContext {
        SessionContext::authenticated(User {
            id: user_id.to_string(),
            name: user_id.to_string(),
            email: format!("{user_id}@example.com"),
            created_at: Utc::now(),
        })
    }

    fn new_note(title: &str) -> NewNote {
        NewNote {
            title: title.to_string(),
            content: format!("{title} body"),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_roundtrip() {
        let notes = NotesService::new(MemoryStore::new());
        let ctx = ctx("u1");

        let created = notes.create(&ctx, new_note("plans")).await.unwrap();
        let fetched = notes.get(&ctx, &created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_create_requires_a_session() {
        let notes = NotesService::new(MemoryStore::new());
        let err = notes
            .create(&SessionContext::anonymous(), new_note("x"))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::Auth("Not authenticated".into()));
    }

    #[tokio::test]
    async fn test_notes_are_invisible_across_users() {
        let store = MemoryStore::new();
        let notes = NotesService::new(store);
        let (u1, u2) = (ctx("u1"), ctx("u2"));

        let mine = notes.create(&u1, new_note("mine")).await.unwrap();
        notes.create(&u2, new_note("theirs")).await.unwrap();

        let listed: Vec<_> = notes.list(&u1).await.iter().map(|n| n.id.clone()).collect();
        assert_eq!(listed, [mine.id.clone()]);
        assert!(notes.get(&u2, &mine.id).await.is_none());
        assert!(notes.list(&SessionContext::anonymous()).await.is_empty());
    }

    #[tokio::test]
    async fn test_list_orders_by_most_recently_updated() {
        let notes = NotesService::new(MemoryStore::new());
        let ctx = ctx("u1");

        let first = notes.create(&ctx, new_note("first")).await.unwrap();
        let second = notes.create(&ctx, new_note("second")).await.unwrap();

        // Touch the older note; it should move to the front.
        notes
            .update(
                &ctx,
                &first.id,
                NoteUpdate {
                    content: Some("edited".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let ids: Vec<_> = notes.list(&ctx).await.iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, [first.id, second.id]);
    }

    #[tokio::test]
    async fn test_update_merges_fields_and_refreshes_updated_at() {
        let notes = NotesService::new(MemoryStore::new());
        let ctx = ctx("u1");
        let note = notes.create(&ctx, new_note("draft")).await.unwrap();

        let updated = notes
            .update(
                &ctx,
                &note.id,
                NoteUpdate {
                    title: Some("final".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "final");
        assert_eq!(updated.content, note.content);
        assert!(updated.updated_at >= note.updated_at);
        assert_eq!(updated.created_at, note.created_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_of_foreign_note_fail_and_change_nothing() {
        let notes = NotesService::new(MemoryStore::new());
        let (owner, other) = (ctx("u1"), ctx("u2"));
        let note = notes.create(&owner, new_note("mine")).await.unwrap();

        let err = notes
            .update(
                &other,
                &note.id,
                NoteUpdate {
                    title: Some("stolen".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::NotFound("Note not found".into()));

        let err = notes.delete(&other, &note.id).await.unwrap_err();
        assert_eq!(err, ServiceError::NotFound("Note not found".into()));

        // The record is untouched for its owner.
        assert_eq!(notes.get(&owner, &note.id).await.unwrap(), note);
    }

    #[tokio::test]
    async fn test_delete_removes_the_note() {
        let notes = NotesService::new(MemoryStore::new());
        let ctx = ctx("u1");
        let note = notes.create(&ctx, new_note("gone")).await.unwrap();

        notes.delete(&ctx, &note.id).await.unwrap();
        assert!(notes.get(&ctx, &note.id).await.is_none());

        let err = notes.delete(&ctx, &note.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_degrades_to_empty_on_store_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("smartstudy_notes.json"), "{corrupt").unwrap();

        let notes = NotesService::new(LocalStore::new(dir.path().to_path_buf()));
        assert!(notes.list(&ctx("u1")).await.is_empty());
        assert!(notes.get(&ctx("u1"), "any").await.is_none());

        // Writes on the same broken blob surface the failure.
        let err = notes.create(&ctx("u1"), new_note("x")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Remote(_)));
    }
}
