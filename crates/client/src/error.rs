//! Unified error handling for the client.
//!
//! Two layers: [`ApiError`] is what the HTTP layer produces, [`ClientError`]
//! is what components surface to callers. All operations return
//! `Result<T, ClientError>`; nothing in this crate panics on a failed
//! request or retries silently.

use thiserror::Error;

use bobr_core::{OrderStatus, PriceError};

use crate::store::StateError;

/// Errors produced by the REST layer.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failed (connection refused, timeout, TLS, ...).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend rejected the bearer token (401).
    #[error("unauthorized")]
    Unauthorized,

    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other non-success response, carrying the backend's message.
    #[error("request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Message from the backend's `{"error": ...}` body, or a body excerpt.
        message: String,
    },
}

impl ApiError {
    /// Whether this error means the session token is no longer valid.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// Application-level error type for the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A backend request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Local state (token, cart snapshot) could not be read or written.
    #[error("local state error: {0}")]
    State(#[from] StateError),

    /// No session; log in first.
    #[error("not logged in")]
    Unauthenticated,

    /// Checkout was attempted with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A status edit that the transition table forbids.
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Status the order is currently in.
        from: OrderStatus,
        /// Requested target status.
        to: OrderStatus,
    },

    /// A price failed validation before any request was made.
    #[error("invalid price: {0}")]
    Price(#[from] PriceError),

    /// A referenced product is not in the current catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(bobr_core::ProductId),
}

impl ClientError {
    /// Whether this error carries a backend 401, i.e. the session must be
    /// invalidated.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(ApiError::Unauthorized))
    }
}

/// Result type alias for `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Rejected {
            status: 400,
            message: "Invalid status".to_string(),
        };
        assert_eq!(err.to_string(), "request rejected (400): Invalid status");

        let err = ClientError::InvalidTransition {
            from: OrderStatus::Completed,
            to: OrderStatus::New,
        };
        assert_eq!(
            err.to_string(),
            "invalid status transition: completed -> new"
        );
    }

    #[test]
    fn test_unauthorized_detection() {
        assert!(ClientError::Api(ApiError::Unauthorized).is_unauthorized());
        assert!(!ClientError::Unauthenticated.is_unauthorized());
        assert!(!ClientError::EmptyCart.is_unauthorized());
    }
}
