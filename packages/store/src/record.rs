//! # Record store — table-like access over swappable backends
//!
//! [`RecordStore`] is the single seam between the SmartStudy services and
//! whatever actually holds the data. It models the smallest contract the
//! services need: named tables of JSON rows, equality filters, a
//! single-column ordering, shallow row patches, and one persisted
//! "current session" pointer.
//!
//! ## Row operations
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`select`](RecordStore::select) | All rows matching every filter, optionally ordered by one column. |
//! | [`select_one`](RecordStore::select_one) | The first matching row, or `None`. |
//! | [`insert`](RecordStore::insert) | Append a row; returns the row as stored. |
//! | [`update`](RecordStore::update) | Shallow-merge a patch object into every matching row; returns the updated rows. |
//! | [`delete`](RecordStore::delete) | Remove matching rows; returns how many were removed. |
//!
//! ## Session pointer
//!
//! [`session`](RecordStore::session) / [`set_session`](RecordStore::set_session) /
//! [`clear_session`](RecordStore::clear_session) hold the single
//! currently-authenticated user record (or none). Keeping the pointer on the
//! same trait as the rows means swapping the backend swaps both together and
//! the services never touch process-wide state.
//!
//! Every method is asynchronous and resolves to either data or a
//! [`StoreError`] carrying a display-ready message. Implementations live in
//! sibling modules ([`crate::MemoryStore`], [`crate::LocalStore`]) and, for
//! the hosted backend, in the api crate.

use serde_json::Value;

use crate::error::StoreError;

/// An equality condition on a single column.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    /// Match rows whose `column` equals `value`.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// A single-column ordering.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }
}

/// Async trait for storing and retrieving user-scoped records.
pub trait RecordStore {
    fn select(
        &self,
        table: &str,
        filters: &[Filter],
        order: Option<&Order>,
    ) -> impl std::future::Future<Output = Result<Vec<Value>, StoreError>>;

    fn select_one(
        &self,
        table: &str,
        filters: &[Filter],
    ) -> impl std::future::Future<Output = Result<Option<Value>, StoreError>>;

    fn insert(
        &self,
        table: &str,
        row: Value,
    ) -> impl std::future::Future<Output = Result<Value, StoreError>>;

    fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: Value,
    ) -> impl std::future::Future<Output = Result<Vec<Value>, StoreError>>;

    fn delete(
        &self,
        table: &str,
        filters: &[Filter],
    ) -> impl std::future::Future<Output = Result<u64, StoreError>>;

    /// The persisted current-session record, if any.
    fn session(&self) -> impl std::future::Future<Output = Result<Option<Value>, StoreError>>;

    fn set_session(
        &self,
        user: Value,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;

    fn clear_session(&self) -> impl std::future::Future<Output = Result<(), StoreError>>;
}
