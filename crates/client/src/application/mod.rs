//! Application layer: the HTTP client, its interceptors and the typed API.

pub mod alerts;
pub mod api;
pub mod classifier;
pub mod client;
pub mod error;
pub mod request;
pub mod retry_ledger;
pub mod session;

pub use alerts::{AlertGuard, AlertRegistry};
pub use api::GreenbidzApi;
pub use classifier::{classify, Classification};
pub use client::ApiClient;
pub use error::ApiError;
pub use request::{ApiRequest, Target};
pub use retry_ledger::RetryLedger;
pub use session::SessionManager;
