//! Error types for the Curated API client.
//!
//! # Design
//! Each failure kind gets its own variant so callers can branch on it:
//! usage mistakes (`MissingPublicationId`, `Config`) are raised before any
//! request exists, `Transport` covers everything that stops a response from
//! arriving, and `Http` carries the raw status and body of any non-2xx reply.
//! Nothing here is retried.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by the client, its transports and its configuration.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A publication-scoped operation was attempted before a publication id
    /// was selected.
    #[error("publication id has not been set")]
    MissingPublicationId,

    /// The client configuration is incomplete or malformed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The request never produced a response (connect, DNS, timeout, I/O).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status for `Http` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
