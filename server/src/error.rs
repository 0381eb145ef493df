//! Error types for the todo store and the resolvers on top of it.
//!
//! # Design
//! Clients only ever see a flat message. `NotFound` and `Validation` carry
//! their message through unchanged; storage failures are logged with full
//! detail and replaced by a generic message before leaving the server.

use thiserror::Error;

/// Message returned to clients when an id matches no record.
pub const NOT_FOUND_MESSAGE: &str = "Todo not found";

/// Message returned to clients for any storage-level failure.
pub const STORAGE_FAILURE_MESSAGE: &str = "storage failure";

#[derive(Debug, Error)]
pub enum StoreError {
    /// No record matches the requested id.
    #[error("Todo not found")]
    NotFound,

    /// Input rejected before touching the database.
    #[error("{0}")]
    Validation(String),

    /// Any read or write error from SQLite.
    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Convert into the error surfaced in the GraphQL `errors` array.
    pub fn into_graphql(self) -> async_graphql::Error {
        match self {
            StoreError::NotFound => async_graphql::Error::new(NOT_FOUND_MESSAGE),
            StoreError::Validation(msg) => async_graphql::Error::new(msg),
            err @ (StoreError::Storage(_) | StoreError::Migrate(_)) => {
                tracing::error!(error = %err, "todo store operation failed");
                async_graphql::Error::new(STORAGE_FAILURE_MESSAGE)
            }
        }
    }
}
