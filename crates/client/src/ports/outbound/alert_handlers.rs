//! UI feedback boundary.
//!
//! The network layer reports failures through this trait and never sees a UI
//! component type. The UI installs one implementation in the
//! [`AlertRegistry`](crate::application::alerts::AlertRegistry).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Error,
    Success,
    LoginRequired,
    Info,
    Confirm,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Success => "success",
            Self::LoginRequired => "login_required",
            Self::Info => "info",
            Self::Confirm => "confirm",
        };
        f.write_str(name)
    }
}

/// A title/message pair to show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(kind: AlertKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AlertKind::Error, title, message)
    }

    pub fn login_required(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AlertKind::LoginRequired, title, message)
    }
}

/// Optional UI callbacks. Every method defaults to doing nothing, so a UI only
/// implements the ones it renders.
#[cfg_attr(test, mockall::automock)]
pub trait AlertHandlers: Send + Sync {
    fn show_error(&self, _alert: &Alert) {}

    fn show_success(&self, _alert: &Alert) {}

    fn show_login_required(&self, _alert: &Alert) {}

    fn show_alert(&self, _alert: &Alert) {}

    fn show_confirm(&self, _alert: &Alert) {}
}
