//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! so the HTTP client and typed operations never depend on reqwest, the
//! filesystem or any UI type directly.

pub mod alert_handlers;
pub mod http_transport;
pub mod request_id;
pub mod session_storage;

pub use alert_handlers::{Alert, AlertHandlers, AlertKind};
pub use http_transport::{
    HttpMethod, HttpTransport, MultipartBody, PreparedRequest, RequestBody, TransportError,
    TransportResponse,
};
pub use request_id::RequestId;
pub use session_storage::SessionStorage;

#[cfg(test)]
pub use alert_handlers::MockAlertHandlers;
#[cfg(test)]
pub use http_transport::MockHttpTransport;
#[cfg(test)]
pub use session_storage::MockSessionStorage;
