//! # Hosted row-store client
//!
//! [`RemoteStore`] implements the [`RecordStore`] contract against a hosted
//! PostgREST-style endpoint: `{base}/rest/v1/{table}` with `apikey` and
//! bearer headers, equality filters as `?column=eq.value` query parameters,
//! ordering as `?order=column.asc|desc`, and `Prefer: return=representation`
//! so writes echo the affected rows back. Row shapes are translated between
//! the canonical camelCase records and the store's snake_case columns on the
//! way through ([`columns`]).
//!
//! The session pointer is held client-side in process memory, the same place
//! a browser client keeps it: a hosted row-store has no business storing a
//! device's session, and it means clearing the session can never fail.

mod columns;

use std::sync::{Arc, Mutex};

use reqwest::Method;
use serde_json::Value;
use store::{Filter, Order, RecordStore, StoreError};

/// Environment variable naming the hosted store's base URL.
pub const URL_ENV: &str = "SUPABASE_URL";
/// Environment variable naming the hosted store's anonymous API key.
pub const KEY_ENV: &str = "SUPABASE_ANON_KEY";

#[derive(Clone)]
pub struct RemoteStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    session: Arc<Mutex<Option<Value>>>,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            session: Arc::default(),
        }
    }

    /// Configuration from the environment; a `.env` file is honoured.
    pub fn from_env() -> Result<Self, StoreError> {
        dotenvy::dotenv().ok();
        let base_url = std::env::var(URL_ENV)
            .map_err(|_| StoreError::new(format!("{URL_ENV} must be set")))?;
        let api_key = std::env::var(KEY_ENV)
            .map_err(|_| StoreError::new(format!("{KEY_ENV} must be set")))?;
        Ok(Self::new(base_url, api_key))
    }

    fn request(&self, method: Method, table: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}/rest/v1/{table}", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Send a request and decode the row-array response.
    async fn run(&self, request: reqwest::RequestBuilder) -> Result<Vec<Value>, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::new(format!("store request failed: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::new(format!("failed to read store response: {e}")))?;
        if !status.is_success() {
            return Err(StoreError::new(error_message(status, &body)));
        }
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<Value> = serde_json::from_str(&body)
            .map_err(|e| StoreError::new(format!("unexpected store response shape: {e}")))?;
        Ok(rows.into_iter().map(columns::row_from_columns).collect())
    }
}

impl RecordStore for RemoteStore {
    async fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&Order>,
    ) -> Result<Vec<Value>, StoreError> {
        let mut params = filter_params(filters);
        params.push(("select".into(), "*".into()));
        if let Some(order) = order {
            params.push(order_param(order));
        }
        self.run(self.request(Method::GET, table).query(&params)).await
    }

    async fn select_one(
        &self,
        table: &str,
        filters: &[Filter],
    ) -> Result<Option<Value>, StoreError> {
        let mut params = filter_params(filters);
        params.push(("select".into(), "*".into()));
        params.push(("limit".into(), "1".into()));
        let rows = self
            .run(self.request(Method::GET, table).query(&params))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, StoreError> {
        let rows = self
            .run(
                self.request(Method::POST, table)
                    .header("Prefer", "return=representation")
                    .json(&columns::row_to_columns(row)),
            )
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::new("insert returned no row"))
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        self.run(
            self.request(Method::PATCH, table)
                .query(&filter_params(filters))
                .header("Prefer", "return=representation")
                .json(&columns::row_to_columns(patch)),
        )
        .await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<u64, StoreError> {
        let rows = self
            .run(
                self.request(Method::DELETE, table)
                    .query(&filter_params(filters))
                    .header("Prefer", "return=representation"),
            )
            .await?;
        Ok(rows.len() as u64)
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

fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|f| {
            (
                columns::to_snake(&f.column),
                format!("eq.{}", param_value(&f.value)),
            )
        })
        .collect()
}

fn param_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn order_param(order: &Order) -> (String, String) {
    let direction = if order.descending { "desc" } else { "asc" };
    (
        "order".to_string(),
        format!("{}.{direction}", columns::to_snake(&order.column)),
    )
}

/// PostgREST error bodies are JSON objects with a `message` field; fall back
/// to the HTTP status when the body is something else.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| format!("store request failed with status {status}"))
}
