// SPDX-FileCopyrightText: 2026 Trundle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Trundle client state layer.

use thiserror::Error;

use crate::types::OrderStatus;

/// The primary error type used across all Trundle components.
///
/// Variants follow the failure taxonomy of the client layer: transport
/// failures (no response), rejections (the service answered with an error
/// status), malformed payloads, and locally disallowed operations.
#[derive(Debug, Error)]
pub enum TrundleError {
    /// The service never produced a response (network unreachable, timeout).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The service responded with an error status and message.
    ///
    /// The message is preserved verbatim so callers can surface it
    /// directly for user display (login/register failures).
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A response body or stream frame could not be parsed.
    #[error("malformed payload: {message}")]
    Malformed { message: String },

    /// An order status transition that is not permitted from this layer.
    ///
    /// Rejected locally before any network call is made.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Durable storage errors (database open, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TrundleError {
    /// True when this error is the authorization-denied signal (HTTP 401-class).
    pub fn is_auth_denied(&self) -> bool {
        matches!(self, TrundleError::Rejected { status, .. } if *status == 401 || *status == 403)
    }

    /// The verbatim service message, if this error carries one.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            TrundleError::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}
