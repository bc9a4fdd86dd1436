//! Maps a failed request to the alert shown for it.
//!
//! Priority order: connection failure, HTTP status, no response, anything
//! else. HTTP statuses are looked up in [`STATUS_RULES`]; statuses not in the
//! table fall back to a generic "Request Failed" alert.

use crate::ports::outbound::Alert;

use super::error::ApiError;

pub const CONNECTION_ERROR_TITLE: &str = "Connection Error";
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Unable to connect to the server. Please check your internet connection.";
pub const NO_RESPONSE_TITLE: &str = "Network Error";
pub const NO_RESPONSE_MESSAGE: &str = "No response received from the server. Please try again.";
pub const SESSION_EXPIRED_TITLE: &str = "Session Expired";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";
pub const REQUEST_FAILED_TITLE: &str = "Request Failed";
pub const GENERIC_ERROR_TITLE: &str = "Error";
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    Fixed(&'static str),
    /// The server's `message` field, or the fallback when absent
    ServerOr(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRule {
    pub status: u16,
    pub title: &'static str,
    pub message: MessageSource,
}

pub const STATUS_RULES: &[StatusRule] = &[
    StatusRule {
        status: 403,
        title: "Access Denied",
        message: MessageSource::Fixed("You do not have permission to perform this action."),
    },
    StatusRule {
        status: 404,
        title: "Not Found",
        message: MessageSource::Fixed("The requested resource was not found."),
    },
    StatusRule {
        status: 413,
        title: "File Too Large",
        message: MessageSource::Fixed(
            "The uploaded file is too large. Please choose a smaller file.",
        ),
    },
    StatusRule {
        status: 415,
        title: "Unsupported File Type",
        message: MessageSource::Fixed("The uploaded file type is not supported."),
    },
    StatusRule {
        status: 422,
        title: "Validation Error",
        message: MessageSource::ServerOr("Please check your input and try again."),
    },
    StatusRule {
        status: 500,
        title: "Server Error",
        message: MessageSource::Fixed("Something went wrong on our end. Please try again later."),
    },
];

/// What the response interceptor should do with a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// 401: clear the session (once per request) and ask for login
    SessionExpired,
    /// Show this alert
    Alert(Alert),
}

pub fn session_expired_alert() -> Alert {
    Alert::login_required(SESSION_EXPIRED_TITLE, SESSION_EXPIRED_MESSAGE)
}

pub fn classify(error: &ApiError) -> Classification {
    match error {
        ApiError::Network(_) => {
            Classification::Alert(Alert::error(CONNECTION_ERROR_TITLE, CONNECTION_ERROR_MESSAGE))
        }
        ApiError::Http { status: 401, .. } => Classification::SessionExpired,
        ApiError::Http {
            status, message, ..
        } => Classification::Alert(status_alert(*status, message.as_deref())),
        ApiError::Timeout(_) | ApiError::NoResponse(_) => {
            Classification::Alert(Alert::error(NO_RESPONSE_TITLE, NO_RESPONSE_MESSAGE))
        }
        other => {
            let message = other.to_string();
            let message = if message.is_empty() {
                GENERIC_ERROR_MESSAGE.to_string()
            } else {
                message
            };
            Classification::Alert(Alert::error(GENERIC_ERROR_TITLE, message))
        }
    }
}

fn status_alert(status: u16, server_message: Option<&str>) -> Alert {
    match STATUS_RULES.iter().find(|rule| rule.status == status) {
        Some(rule) => {
            let message = match rule.message {
                MessageSource::Fixed(text) => text,
                MessageSource::ServerOr(fallback) => server_message.unwrap_or(fallback),
            };
            Alert::error(rule.title, message)
        }
        None => {
            let message = server_message
                .map(str::to_string)
                .unwrap_or_else(|| format!("Request failed with status {status}"));
            Alert::error(REQUEST_FAILED_TITLE, message)
        }
    }
}
