//! Session state management
//!
//! Reads and writes the persisted login state. The request interceptor reads
//! credentials on every call; login writes them; logout and the 401 handler
//! clear them.

use std::sync::Arc;

use greenbidz_domain::{storage_keys, Language, SessionCredentials, LOGGED_IN_FLAG};
use serde::{de::DeserializeOwned, Serialize};

use super::error::ApiError;
use crate::ports::outbound::SessionStorage;

#[derive(Clone)]
pub struct SessionManager {
    storage: Arc<dyn SessionStorage>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    pub fn credentials(&self) -> SessionCredentials {
        let token = self.storage.load(storage_keys::USER_TOKEN);
        let flag = self.storage.load(storage_keys::IS_LOGGED_IN);
        SessionCredentials::from_stored(token, flag.as_deref())
    }

    pub fn is_logged_in(&self) -> bool {
        self.credentials().is_authenticated()
    }

    /// Persist a successful login.
    pub fn store_login<U: Serialize>(&self, token: &str, user_data: &U) -> Result<(), ApiError> {
        let user_json =
            serde_json::to_string(user_data).map_err(|e| ApiError::Serialize(e.to_string()))?;
        self.storage.save(storage_keys::USER_TOKEN, token);
        self.storage.save(storage_keys::IS_LOGGED_IN, LOGGED_IN_FLAG);
        self.storage.save(storage_keys::USER_DATA, &user_json);
        Ok(())
    }

    /// Remove token, login flag and cached user data. Idempotent.
    pub fn clear(&self) {
        for key in storage_keys::SESSION_KEYS {
            self.storage.remove(key);
        }
        tracing::info!("Session cleared");
    }

    /// Cached user data written at login, if it parses as `T`.
    pub fn user_data<T: DeserializeOwned>(&self) -> Option<T> {
        let raw = self.storage.load(storage_keys::USER_DATA)?;
        match serde_json::from_str(&raw) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!("Stored user data is not valid: {}", e);
                None
            }
        }
    }

    /// Language chosen in the app; falls back to English when unset or unknown.
    pub fn selected_language(&self) -> Language {
        self.storage
            .load(storage_keys::SELECTED_LANGUAGE)
            .and_then(|code| match code.parse() {
                Ok(lang) => Some(lang),
                Err(e) => {
                    tracing::debug!("Ignoring stored language: {}", e);
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn set_selected_language(&self, language: Language) {
        self.storage
            .save(storage_keys::SELECTED_LANGUAGE, language.code());
    }
}
