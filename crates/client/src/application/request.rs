//! Request description handed to `ApiClient`.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;
use crate::ports::outbound::{HttpMethod, MultipartBody, RequestBody, RequestId};

/// Where the request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Path relative to the API base URL, e.g. `/products/42`
    Path(String),
    /// Absolute URL outside the API namespace (the JWT token endpoint)
    Absolute(String),
}

/// One logical API call. Interceptors read it and never mutate it; each
/// request gets its own [`RequestId`] at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    id: RequestId,
    method: HttpMethod,
    target: Target,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: RequestBody,
    timeout: Option<Duration>,
    skip_auth: bool,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            method,
            target: Target::Path(path.into()),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            timeout: None,
            skip_auth: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Send to an absolute URL instead of a path under the base URL.
    pub fn absolute(method: HttpMethod, url: impl Into<String>) -> Self {
        let mut request = Self::new(method, String::new());
        request.target = Target::Absolute(url.into());
        request
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json_value(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Serialize(e.to_string()))?;
        Ok(self.json_value(value))
    }

    pub fn multipart(mut self, body: MultipartBody) -> Self {
        self.body = RequestBody::Multipart(body);
        self
    }

    /// Override the client's default timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Do not attach the stored bearer token.
    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn timeout_override(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn skips_auth(&self) -> bool {
        self.skip_auth
    }
}
