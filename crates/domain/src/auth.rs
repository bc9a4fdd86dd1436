//! Credential exchange and account registration payloads.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::upload::Upload;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, DomainError> {
        let username = username.into();
        let password = password.into();
        if username.trim().is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }
        if password.is_empty() {
            return Err(DomainError::validation("password cannot be empty"));
        }
        Ok(Self {
            username: username.trim().to_string(),
            password,
        })
    }
}

/// Response of the JWT token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_nicename: String,
    #[serde(default)]
    pub user_display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub avatar: Option<Upload>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.username.trim().is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }
        if !self.email.contains('@') {
            return Err(DomainError::validation("email address is not valid"));
        }
        if self.password.len() < 6 {
            return Err(DomainError::validation(
                "password must be at least 6 characters",
            ));
        }
        Ok(())
    }

    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("username".to_string(), self.username.trim().to_string()),
            ("email".to_string(), self.email.trim().to_string()),
            ("password".to_string(), self.password.clone()),
        ];
        let optional = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("company", &self.company),
            ("phone", &self.phone),
            ("country", &self.country),
        ];
        fields.extend(
            optional
                .into_iter()
                .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone()))),
        );
        fields
    }
}
