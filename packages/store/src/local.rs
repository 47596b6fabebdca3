//! # File-backed record store
//!
//! [`LocalStore`] persists each table as one JSON blob under a fixed key in
//! a base directory, the way a browser profile keeps the same data in
//! localStorage:
//!
//! ```text
//! <base_dir>/
//! ├── smartstudy_auth.json          # current-session record
//! ├── smartstudy_users.json         # all users
//! ├── smartstudy_notes.json         # all notes
//! ├── smartstudy_quizzes.json       # all quizzes
//! └── smartstudy_quiz_results.json  # all quiz results
//! ```
//!
//! Every call is a full read-modify-write of the table's blob with no
//! locking, so a concurrent writer from another process can lose updates.
//! That is a known limitation of this variant, not a guarantee callers may
//! rely on.

use std::path::PathBuf;

use serde_json::Value;

use crate::error::StoreError;
use crate::query;
use crate::record::{Filter, Order, RecordStore};

const KEY_PREFIX: &str = "smartstudy_";
const SESSION_KEY: &str = "smartstudy_auth";

/// Filesystem-backed RecordStore for single-machine persistence.
#[derive(Clone, Debug)]
pub struct LocalStore {
    base: PathBuf,
}

impl LocalStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.base.join(format!("{KEY_PREFIX}{table}.json"))
    }

    fn session_path(&self) -> PathBuf {
        self.base.join(format!("{SESSION_KEY}.json"))
    }

    fn read_rows(&self, table: &str) -> Result<Vec<Value>, StoreError> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| StoreError::new(format!("failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| StoreError::new(format!("corrupt blob {}: {e}", path.display())))
    }

    fn write_rows(&self, table: &str, rows: &[Value]) -> Result<(), StoreError> {
        let path = self.table_path(table);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::new(format!("failed to create {}: {e}", parent.display())))?;
        }
        let raw = serde_json::to_string(rows)
            .map_err(|e| StoreError::new(format!("failed to encode {table}: {e}")))?;
        std::fs::write(&path, raw)
            .map_err(|e| StoreError::new(format!("failed to write {}: {e}", path.display())))
    }
}

impl RecordStore for LocalStore {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&Order>,
    ) -> Result<Vec<Value>, StoreError> {
        let mut rows: Vec<Value> = self
            .read_rows(table)?
            .into_iter()
            .filter(|row| query::matches(row, filters))
            .collect();
        if let Some(order) = order {
            query::sort_rows(&mut rows, order);
        }
        Ok(rows)
    }

    async fn select_one(
        &self,
        table: &str,
        filters: &[Filter],
    ) -> Result<Option<Value>, StoreError> {
        Ok(self
            .read_rows(table)?
            .into_iter()
            .find(|row| query::matches(row, filters)))
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        let mut rows = self.read_rows(table)?;
        rows.push(row.clone());
        self.write_rows(table, &rows)?;
        Ok(row)
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        let mut rows = self.read_rows(table)?;
        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|row| query::matches(row, filters)) {
            query::merge(row, &patch);
            updated.push(row.clone());
        }
        if !updated.is_empty() {
            self.write_rows(table, &rows)?;
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
        let mut rows = self.read_rows(table)?;
        let before = rows.len();
        rows.retain(|row| !query::matches(row, filters));
        let removed = before - rows.len();
        if removed > 0 {
            self.write_rows(table, &rows)?;
        }
        Ok(removed as u64)
    }

    async fn session(&self) -> Result<Option<Value>, StoreError> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| StoreError::new(format!("failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::new(format!("corrupt blob {}: {e}", path.display())))
    }

    async fn set_session(&self, user: Value) -> Result<(), StoreError> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::new(format!("failed to create {}: {e}", parent.display())))?;
        }
        let raw = serde_json::to_string(&user)
            .map_err(|e| StoreError::new(format!("failed to encode session: {e}")))?;
        std::fs::write(&path, raw)
            .map_err(|e| StoreError::new(format!("failed to write {}: {e}", path.display())))
    }

    async fn clear_session(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(self.session_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::new(format!("failed to clear session: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_rows_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let store = LocalStore::new(dir.path().to_path_buf());
        store
            .insert("notes", json!({"id": "1", "title": "kept"}))
            .await
            .unwrap();

        // Re-open from the same directory.
        let store2 = LocalStore::new(dir.path().to_path_buf());
        let rows = store2.select("notes", &[], None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["title"], "kept");

        assert!(dir.path().join("smartstudy_notes.json").exists());
    }

    #[tokio::test]
    async fn test_update_and_delete_rewrite_the_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().to_path_buf());

        store.insert("notes", json!({"id": "1", "title": "a"})).await.unwrap();
        store.insert("notes", json!({"id": "2", "title": "b"})).await.unwrap();

        store
            .update("notes", &[Filter::eq("id", "1")], json!({"title": "a2"}))
            .await
            .unwrap();
        assert_eq!(
            store.delete("notes", &[Filter::eq("id", "2")]).await.unwrap(),
            1
        );

        let store2 = LocalStore::new(dir.path().to_path_buf());
        let rows = store2.select("notes", &[], None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["title"], "a2");
    }

    #[tokio::test]
    async fn test_corrupt_blob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("smartstudy_notes.json"), "{not json").unwrap();

        let store = LocalStore::new(dir.path().to_path_buf());
        let err = store.select("notes", &[], None).await.unwrap_err();
        assert!(err.message().contains("corrupt blob"));
    }

    #[tokio::test]
    async fn test_session_persists_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().to_path_buf());

        assert!(store.session().await.unwrap().is_none());
        store.set_session(json!({"id": "u1"})).await.unwrap();

        let store2 = LocalStore::new(dir.path().to_path_buf());
        assert_eq!(store2.session().await.unwrap().unwrap()["id"], "u1");

        store2.clear_session().await.unwrap();
        assert!(store.session().await.unwrap().is_none());
        // Clearing twice is fine.
        store.clear_session().await.unwrap();
    }
}
