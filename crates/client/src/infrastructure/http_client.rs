//! reqwest-backed HTTP transport

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method};
use serde_json::Value;

use crate::ports::outbound::{
    HttpMethod, HttpTransport, MultipartBody, PreparedRequest, RequestBody, TransportError,
    TransportResponse,
};

/// Sends prepared requests over HTTPS with reqwest.
///
/// Timeouts are per request (`PreparedRequest::timeout`), so one client
/// serves both short API calls and long uploads.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("greenbidz-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::setup(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client (custom TLS, proxies, ...).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: PreparedRequest) -> Result<TransportResponse, TransportError> {
        let PreparedRequest {
            id,
            method,
            url,
            headers,
            body,
            timeout,
        } = request;
        let is_multipart = body.is_multipart();

        let mut builder = self.client.request(to_method(method), url).timeout(timeout);
        for (name, value) in &headers {
            // reqwest writes the multipart content type itself, with the boundary.
            if is_multipart && name.eq_ignore_ascii_case("content-type") {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| map_error(e, timeout))?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| map_error(e, timeout))?;

        tracing::trace!(request_id = %id.short(), status, bytes = bytes.len(), "Response received");
        Ok(TransportResponse::new(status, parse_body(&bytes)))
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn build_form(body: MultipartBody) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for (name, value) in body.fields {
        form = form.text(name, value);
    }
    for upload in body.files {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)
            .map_err(|e| TransportError::setup(format!("invalid MIME type: {e}")))?;
        form = form.part(upload.field, part);
    }
    Ok(form)
}

fn map_error(error: reqwest::Error, timeout: std::time::Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout { after: timeout }
    } else if error.is_connect() {
        TransportError::network(error.to_string())
    } else if error.is_builder() {
        TransportError::setup(error.to_string())
    } else {
        TransportError::no_response(error.to_string())
    }
}

/// JSON when it parses, the raw text otherwise, `Null` for an empty body.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
