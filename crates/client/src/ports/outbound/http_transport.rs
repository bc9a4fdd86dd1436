//! HTTP transport port - object-safe network boundary
//!
//! The transport performs exactly one exchange per call. Auth headers,
//! failure classification and alerting live in `ApiClient`; a transport only
//! reports what happened on the wire.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use greenbidz_domain::Upload;
use serde_json::Value;
use url::Url;

use super::RequestId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// multipart/form-data content: plain fields followed by file parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub files: Vec<Upload>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = (String, String)>) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn file(mut self, upload: Upload) -> Self {
        self.files.push(upload);
        self
    }

    pub fn files(mut self, uploads: impl IntoIterator<Item = Upload>) -> Self {
        self.files.extend(uploads);
        self
    }

    pub fn total_file_bytes(&self) -> usize {
        self.files.iter().map(Upload::len).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartBody),
}

impl RequestBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// A request after the request interceptor ran: absolute URL, final headers.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub id: RequestId,
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    pub timeout: Duration,
}

impl PreparedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// What came back from the server, whatever the status.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    /// Parsed JSON body; non-JSON text is carried as `Value::String`, an
    /// empty body as `Value::Null`.
    pub body: Value,
}

impl TransportResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures where no HTTP status was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The connection could not be established
    #[error("Network Error: {message}")]
    Network { message: String },

    #[error("Request timed out after {}ms", after.as_millis())]
    Timeout { after: Duration },

    /// The request left the device but nothing usable came back
    #[error("No response received: {message}")]
    NoResponse { message: String },

    /// The request could not be built
    #[error("Request setup failed: {message}")]
    Setup { message: String },
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn no_response(message: impl Into<String>) -> Self {
        Self::NoResponse {
            message: message.into(),
        }
    }

    pub fn setup(message: impl Into<String>) -> Self {
        Self::Setup {
            message: message.into(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: PreparedRequest) -> Result<TransportResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let request = PreparedRequest {
            id: RequestId::new(),
            method: HttpMethod::Get,
            url: Url::parse("https://example.test/products").unwrap(),
            headers: vec![("Authorization".to_string(), "Bearer t".to_string())],
            body: RequestBody::Empty,
            timeout: Duration::from_secs(30),
        };
        assert_eq!(request.header("authorization"), Some("Bearer t"));
        assert_eq!(request.header("content-type"), None);
    }

    #[test]
    fn success_is_2xx_only() {
        assert!(TransportResponse::new(204, Value::Null).is_success());
        assert!(!TransportResponse::new(301, Value::Null).is_success());
        assert!(!TransportResponse::new(401, Value::Null).is_success());
    }

    #[test]
    fn multipart_builder_accumulates_parts() {
        let body = MultipartBody::new()
            .text("title", "Lathe")
            .file(Upload::new("images[]", "a.jpg", "image/jpeg", vec![0; 10]))
            .file(Upload::new("images[]", "b.jpg", "image/jpeg", vec![0; 5]));
        assert_eq!(body.fields.len(), 1);
        assert_eq!(body.total_file_bytes(), 15);
    }
}
