//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers distinguish "the
//! resource does not exist" from "the server returned an unexpected status."
//! All other non-2xx responses land in `HttpError` with the raw status code
//! and body for debugging. `Transport` covers failures before any response
//! arrived (connection refused, timeouts, a panicked blocking task).

use thiserror::Error;

/// Errors returned by `TodoClient` parse methods, transports and facades.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404, or the store has no item with that id.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),
}
