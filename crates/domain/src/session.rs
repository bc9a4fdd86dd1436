//! Persisted session state and the storage keys it lives under.

use serde::{Deserialize, Serialize};

/// Keys in the device key/value store.
///
/// Plain strings with no schema versioning; the mobile app and this client
/// must agree on them byte for byte.
pub mod storage_keys {
    pub const USER_TOKEN: &str = "userToken";
    pub const IS_LOGGED_IN: &str = "isLoggedIn";
    pub const USER_DATA: &str = "userData";
    pub const SELECTED_LANGUAGE: &str = "selected_language";

    /// Keys removed when the session is invalidated.
    pub const SESSION_KEYS: [&str; 3] = [USER_TOKEN, IS_LOGGED_IN, USER_DATA];
}

/// Literal stored under [`storage_keys::IS_LOGGED_IN`] for an active session.
pub const LOGGED_IN_FLAG: &str = "true";

/// Credentials read from persisted storage before each request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredentials {
    pub token: Option<String>,
    pub is_logged_in: bool,
}

impl SessionCredentials {
    /// Build from the raw stored strings. The login flag only counts when it is
    /// exactly `"true"`.
    pub fn from_stored(token: Option<String>, logged_in_flag: Option<&str>) -> Self {
        Self {
            token,
            is_logged_in: logged_in_flag == Some(LOGGED_IN_FLAG),
        }
    }

    /// The token to send as a bearer credential, if both the flag and a
    /// non-empty token are present.
    pub fn bearer_token(&self) -> Option<&str> {
        if !self.is_logged_in {
            return None;
        }
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }
}
