//! Client error types
//!
//! Every failure the client sees is returned to the caller as an `ApiError`,
//! including the ones that also raised a UI alert.

use std::time::Duration;

use greenbidz_domain::{server_message, DomainError};
use serde_json::Value;
use thiserror::Error;

use crate::ports::outbound::TransportError;

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Connection could not be established
    #[error("Network Error: {0}")]
    Network(String),

    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// Request was sent but no response arrived
    #[error("No response received: {0}")]
    NoResponse(String),

    /// Server answered with a non-2xx status
    #[error("{}", http_display(*status, message.as_deref()))]
    Http {
        status: u16,
        message: Option<String>,
        body: Value,
    },

    /// Request could not be prepared (bad URL, bad header value, ...)
    #[error("Request setup failed: {0}")]
    Setup(String),

    #[error("Failed to serialize request: {0}")]
    Serialize(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Input rejected before any request was built
    #[error("Invalid input: {0}")]
    Invalid(#[from] DomainError),
}

fn http_display(status: u16, message: Option<&str>) -> String {
    match message {
        Some(message) => format!("HTTP {status}: {message}"),
        None => format!("Request failed with status {status}"),
    }
}

impl From<TransportError> for ApiError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Network { message } => ApiError::Network(message),
            TransportError::Timeout { after } => ApiError::Timeout(after),
            TransportError::NoResponse { message } => ApiError::NoResponse(message),
            TransportError::Setup { message } => ApiError::Setup(message),
        }
    }
}

impl ApiError {
    /// Build an HTTP error, pulling `message` out of the server body.
    pub fn http(status: u16, body: Value) -> Self {
        ApiError::Http {
            status,
            message: server_message(&body),
            body,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `message` field of the server payload, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Http { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// No HTTP status was received.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ApiError::Network(_) | ApiError::Timeout(_) | ApiError::NoResponse(_)
        )
    }

    /// Message for a call-site dialog: the server message when present,
    /// otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_error_extracts_server_message() {
        let err = ApiError::http(422, json!({ "message": "Price is required" }));
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.server_message(), Some("Price is required"));
        assert_eq!(err.to_string(), "HTTP 422: Price is required");
    }

    #[test]
    fn test_http_error_without_message_uses_status() {
        let err = ApiError::http(409, Value::Null);
        assert_eq!(err.to_string(), "Request failed with status 409");
        assert_eq!(err.user_message("Could not save"), "Could not save");
    }

    #[test]
    fn test_transport_errors_are_network_class() {
        let timeout: ApiError = TransportError::Timeout {
            after: Duration::from_secs(30),
        }
        .into();
        assert!(timeout.is_network());
        assert_eq!(timeout.to_string(), "Request timed out after 30000ms");

        let setup: ApiError = TransportError::setup("bad header").into();
        assert!(!setup.is_network());
    }

    #[test]
    fn test_unauthorized_check() {
        assert!(ApiError::http(401, Value::Null).is_unauthorized());
        assert!(!ApiError::http(403, Value::Null).is_unauthorized());
    }

    #[test]
    fn test_not_found_check() {
        let missing = ApiError::http(404, json!({ "message": "Product not found" }));
        assert!(missing.is_not_found());
        assert!(!missing.is_unauthorized());
        assert_eq!(missing.user_message("Could not load"), "Product not found");

        assert!(!ApiError::http(410, Value::Null).is_not_found());
        assert!(!ApiError::NoResponse("socket hang up".into()).is_not_found());
    }
}
