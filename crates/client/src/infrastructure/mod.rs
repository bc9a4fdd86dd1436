//! Adapters for the outbound ports.

pub mod http_client;
pub mod storage;
pub mod testing;
pub mod uploads;

pub use http_client::ReqwestTransport;
pub use storage::{FileSessionStorage, MemorySessionStorage};
pub use uploads::{load_upload, load_uploads, UploadError, MAX_UPLOAD_BYTES};
