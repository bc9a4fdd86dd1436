//! GreenBidz client crate.
//!
//! Shared HTTP client with request/response interceptors, the alert dispatch
//! boundary the UI plugs into, and typed marketplace operations.

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod telemetry;

// Re-export commonly used entrypoints
pub use application::{
    AlertGuard, AlertRegistry, ApiClient, ApiError, ApiRequest, GreenbidzApi, SessionManager,
};
pub use config::{load_dotenv, ClientConfig, ConfigError, Environment};
pub use ports::outbound::{Alert, AlertHandlers, AlertKind, HttpTransport, SessionStorage};
