//! Error types for the todo API client.
//!
//! # Design
//! The server reports failures as flat GraphQL messages with no error codes.
//! The one message callers need to branch on, a missing record, is lifted
//! into `NotFound`; everything else keeps its message text.

use std::fmt;

/// Message the server uses when an id matches no record.
pub const NOT_FOUND_MESSAGE: &str = "Todo not found";

/// Errors returned by `TodoClient` parse methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The requested todo does not exist.
    NotFound,

    /// The server answered with a GraphQL `errors` array.
    Graphql(Vec<String>),

    /// The server returned a non-200 status.
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),
}

impl ApiError {
    pub(crate) fn from_messages(messages: Vec<String>) -> Self {
        if messages.iter().any(|m| m == NOT_FOUND_MESSAGE) {
            ApiError::NotFound
        } else {
            ApiError::Graphql(messages)
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound => write!(f, "{NOT_FOUND_MESSAGE}"),
            ApiError::Graphql(messages) => write!(f, "{}", messages.join("; ")),
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
