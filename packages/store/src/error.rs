use thiserror::Error;

/// Failure reported by a backing store. Carries a display-ready message.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{0}")]
pub struct StoreError(String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}
