//! Client configuration

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://greenbidz.com/wp-json/greenbidz-api/v1";
pub const DEFAULT_AUTH_URL: &str = "https://greenbidz.com/wp-json/jwt-auth/v1/token";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a whole number of seconds, got '{value}'")]
    InvalidSeconds { key: &'static str, value: String },

    #[error("{key} must not be zero")]
    ZeroTimeout { key: &'static str },

    #[error("{key} must be 'development' or 'production', got '{value}'")]
    InvalidEnvironment { key: &'static str, value: String },

    #[error("{key} is not a valid URL: {message}")]
    InvalidUrl { key: &'static str, message: String },
}

/// Runtime environment. Development enables request/response debug logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl Default for Environment {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Environment::Development
        } else {
            Environment::Production
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(()),
        }
    }
}

/// Client configuration loaded from environment
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every relative API path is appended to
    pub api_base_url: String,
    /// JWT token endpoint used by login
    pub auth_url: String,
    /// Default per-request timeout
    pub timeout: Duration,
    /// Timeout for image analysis and product submission
    pub upload_timeout: Duration,
    pub environment: Environment,
    /// Directory for the session file; platform data dir when unset
    pub storage_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
            environment: Environment::default(),
            storage_dir: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Call [`load_dotenv`] first to pick up `.env.local` / `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset and blank values take the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let api_base_url = get("GREENBIDZ_API_BASE_URL").unwrap_or(defaults.api_base_url);
        validate_url("GREENBIDZ_API_BASE_URL", &api_base_url)?;
        let auth_url = get("GREENBIDZ_AUTH_URL").unwrap_or(defaults.auth_url);
        validate_url("GREENBIDZ_AUTH_URL", &auth_url)?;

        let timeout = match get("GREENBIDZ_TIMEOUT_SECS") {
            Some(value) => parse_seconds("GREENBIDZ_TIMEOUT_SECS", value)?,
            None => defaults.timeout,
        };
        let upload_timeout = match get("GREENBIDZ_UPLOAD_TIMEOUT_SECS") {
            Some(value) => parse_seconds("GREENBIDZ_UPLOAD_TIMEOUT_SECS", value)?,
            None => defaults.upload_timeout,
        };

        let environment = match get("GREENBIDZ_ENV") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidEnvironment {
                    key: "GREENBIDZ_ENV",
                    value,
                })?,
            None => defaults.environment,
        };

        Ok(Self {
            api_base_url,
            auth_url,
            timeout,
            upload_timeout,
            environment,
            storage_dir: get("GREENBIDZ_STORAGE_DIR").map(PathBuf::from),
        })
    }
}

fn parse_seconds(key: &'static str, value: String) -> Result<Duration, ConfigError> {
    let secs: u64 = value
        .parse()
        .map_err(|_| ConfigError::InvalidSeconds { key, value })?;
    if secs == 0 {
        return Err(ConfigError::ZeroTimeout { key });
    }
    Ok(Duration::from_secs(secs))
}

fn validate_url(key: &'static str, value: &str) -> Result<(), ConfigError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl {
            key,
            message: e.to_string(),
        })
}

/// Load `.env.local` then `.env` from `dir`. Earlier files win; variables
/// already set in the process are never overridden.
pub fn load_dotenv(dir: &Path) {
    for filename in [".env.local", ".env"] {
        let path = dir.join(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(&path) {
                tracing::warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.auth_url, DEFAULT_AUTH_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.upload_timeout, Duration::from_secs(120));
        assert!(config.storage_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("GREENBIDZ_API_BASE_URL", "https://staging.greenbidz.com/api"),
            ("GREENBIDZ_TIMEOUT_SECS", " 10 "),
            ("GREENBIDZ_ENV", "Production"),
            ("GREENBIDZ_STORAGE_DIR", "/tmp/gbz"),
        ]))
        .unwrap();
        assert_eq!(config.api_base_url, "https://staging.greenbidz.com/api");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/gbz")));
    }

    #[test]
    fn test_blank_value_falls_back_to_default() {
        let config = ClientConfig::from_lookup(lookup(&[("GREENBIDZ_UPLOAD_TIMEOUT_SECS", "  ")]))
            .unwrap();
        assert_eq!(config.upload_timeout, DEFAULT_UPLOAD_TIMEOUT);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = ClientConfig::from_lookup(lookup(&[("GREENBIDZ_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeconds { .. }));

        let err = ClientConfig::from_lookup(lookup(&[("GREENBIDZ_UPLOAD_TIMEOUT_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout { .. }));

        let err = ClientConfig::from_lookup(lookup(&[("GREENBIDZ_ENV", "staging")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvironment { .. }));

        let err = ClientConfig::from_lookup(lookup(&[("GREENBIDZ_AUTH_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_load_dotenv_ignores_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        load_dotenv(dir.path());
    }
}
