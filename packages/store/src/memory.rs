use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::StoreError;
use crate::query;
use crate::record::{Filter, Order, RecordStore};

/// In-memory RecordStore for testing and ephemeral sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    session: Arc<Mutex<Option<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&Order>,
    ) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Value> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query::matches(row, filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
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
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .get(table)
            .and_then(|rows| rows.iter().find(|row| query::matches(row, filters)).cloned()))
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        tables.entry(table.to_string()).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let mut updated = Vec::new();
        if let Some(rows) = tables.get_mut(table) {
            for row in rows.iter_mut().filter(|row| query::matches(row, filters)) {
                query::merge(row, &patch);
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(rows) = tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|row| !query::matches(row, filters));
        Ok((before - rows.len()) as u64)
    }

    async fn session(&self) -> Result<Option<Value>, StoreError> {
        Ok(self.session.lock().unwrap().clone())
    }

    async fn set_session(&self, user: Value) -> Result<(), StoreError> {
        *self.session.lock().unwrap() = Some(user);
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StoreError> {
        *self.session.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_and_select_with_filters() {
        let store = MemoryStore::new();

        store
            .insert("notes", json!({"id": "1", "userId": "u1"}))
            .await
            .unwrap();
        store
            .insert("notes", json!({"id": "2", "userId": "u2"}))
            .await
            .unwrap();

        let all = store.select("notes", &[], None).await.unwrap();
        assert_eq!(all.len(), 2);

        let scoped = store
            .select("notes", &[Filter::eq("userId", "u1")], None)
            .await
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0]["id"], "1");

        let one = store
            .select_one("notes", &[Filter::eq("id", "2")])
            .await
            .unwrap();
        assert_eq!(one.unwrap()["userId"], "u2");

        let none = store
            .select_one("notes", &[Filter::eq("id", "missing")])
            .await
            .unwrap();
        assert!(none.is_none());
    }

    #[tokio::test]
    async fn test_select_orders_rows() {
        let store = MemoryStore::new();
        store
            .insert("notes", json!({"id": "a", "updatedAt": "2024-01-01"}))
            .await
            .unwrap();
        store
            .insert("notes", json!({"id": "b", "updatedAt": "2024-02-01"}))
            .await
            .unwrap();

        let rows = store
            .select("notes", &[], Some(&Order::desc("updatedAt")))
            .await
            .unwrap();
        assert_eq!(rows[0]["id"], "b");
        assert_eq!(rows[1]["id"], "a");
    }

    #[tokio::test]
    async fn test_update_merges_patch_into_matching_rows() {
        let store = MemoryStore::new();
        store
            .insert("notes", json!({"id": "1", "title": "old", "content": "x"}))
            .await
            .unwrap();

        let updated = store
            .update("notes", &[Filter::eq("id", "1")], json!({"title": "new"}))
            .await
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["title"], "new");
        assert_eq!(updated[0]["content"], "x");

        let missed = store
            .update("notes", &[Filter::eq("id", "2")], json!({"title": "n"}))
            .await
            .unwrap();
        assert!(missed.is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_removed_count() {
        let store = MemoryStore::new();
        store.insert("notes", json!({"id": "1"})).await.unwrap();
        store.insert("notes", json!({"id": "2"})).await.unwrap();

        assert_eq!(
            store.delete("notes", &[Filter::eq("id", "1")]).await.unwrap(),
            1
        );
        assert_eq!(
            store.delete("notes", &[Filter::eq("id", "1")]).await.unwrap(),
            0
        );
        assert_eq!(store.select("notes", &[], None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_session_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.session().await.unwrap().is_none());

        store.set_session(json!({"id": "u1"})).await.unwrap();
        assert_eq!(store.session().await.unwrap().unwrap()["id"], "u1");

        store.clear_session().await.unwrap();
        assert!(store.session().await.unwrap().is_none());
    }
}
