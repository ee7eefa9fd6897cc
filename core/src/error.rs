//! Error types for the values API client.
//!
//! # Design
//! Three kinds, one per way an exchange can go wrong: the round trip never
//! completed (`Transport`), the server answered with a non-2xx status
//! (`Service`), or a body that claimed to be XML did not have the expected
//! shape (`MalformedPayload`). Nothing is retried internally; every error
//! propagates to the caller as-is.

use thiserror::Error;

/// Errors returned by `EntityClient` operations and the XML codec.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The exchange could not be completed: connection refused, DNS
    /// failure, timeout.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server responded with a status outside the 2xx range.
    #[error("Response from Service: {status} : {reason}")]
    Service { status: u16, reason: String },

    /// An XML body did not parse to the expected single-value or list shape.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl ClientError {
    pub(crate) fn malformed(err: impl std::fmt::Display) -> Self {
        ClientError::MalformedPayload(err.to_string())
    }
}
