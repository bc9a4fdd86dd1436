//! HTTP client with request/response interceptors
//!
//! Request interceptor (`prepare`): resolve the URL, attach the stored bearer
//! token unless the request skips auth, set content headers, log in
//! development.
//!
//! Response interceptor: pass successes through; classify failures, raise
//! the matching alert, clear the session on the first 401 of a request, then
//! return the original error. Nothing is retried or replayed.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

use super::alerts::AlertRegistry;
use super::classifier::{classify, session_expired_alert, Classification};
use super::error::ApiError;
use super::request::{ApiRequest, Target};
use super::retry_ledger::RetryLedger;
use super::session::SessionManager;
use crate::config::{ClientConfig, Environment};
use crate::ports::outbound::{HttpTransport, PreparedRequest, RequestBody, TransportResponse};

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_MULTIPART: &str = "multipart/form-data";

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    default_timeout: Duration,
    upload_timeout: Duration,
    environment: Environment,
    transport: Arc<dyn HttpTransport>,
    session: SessionManager,
    alerts: AlertRegistry,
    retry_ledger: Arc<RetryLedger>,
}

impl ApiClient {
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn HttpTransport>,
        session: SessionManager,
        alerts: AlertRegistry,
    ) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            default_timeout: config.timeout,
            upload_timeout: config.upload_timeout,
            environment: config.environment,
            transport,
            session,
            alerts,
            retry_ledger: Arc::new(RetryLedger::default()),
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn alerts(&self) -> &AlertRegistry {
        &self.alerts
    }

    pub fn upload_timeout(&self) -> Duration {
        self.upload_timeout
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run `request` through both interceptors and the transport.
    pub async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let prepared = match self.prepare(&request) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::error!(request_id = %request.id().short(), "Request setup failed: {}", e);
                return Err(self.intercept_failure(&request, e));
            }
        };

        match self.send(prepared).await {
            Ok(response) => Ok(self.intercept_success(&request, response)),
            Err(e) => Err(self.intercept_failure(&request, e)),
        }
    }

    /// Send without interceptors: no bearer token, no alerts, no session
    /// side effects. Used for the credential exchange.
    pub async fn execute_raw(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let prepared = self.build(&request, false)?;
        let response = self.send(prepared).await?;
        Ok(response.body)
    }

    pub async fn execute_as<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let value = self.execute(request).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute_as(ApiRequest::get(path)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute_as(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute_as(ApiRequest::put(path).json(body)?).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute_as(ApiRequest::patch(path).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute_as(ApiRequest::delete(path)).await
    }

    /// Request interceptor.
    pub fn prepare(&self, request: &ApiRequest) -> Result<PreparedRequest, ApiError> {
        let prepared = self.build(request, !request.skips_auth())?;

        if self.environment.is_development() {
            tracing::debug!(
                request_id = %prepared.id.short(),
                method = %prepared.method,
                url = %prepared.url,
                headers = ?prepared.headers,
                body = ?prepared.body,
                "API request"
            );
        }

        Ok(prepared)
    }

    fn build(&self, request: &ApiRequest, attach_auth: bool) -> Result<PreparedRequest, ApiError> {
        let url = self.resolve_url(request)?;

        let mut headers = vec![("Accept".to_string(), CONTENT_TYPE_JSON.to_string())];
        match request.body() {
            RequestBody::Json(_) => {
                headers.push(("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()))
            }
            RequestBody::Multipart(_) => {
                headers.push(("Content-Type".to_string(), CONTENT_TYPE_MULTIPART.to_string()))
            }
            RequestBody::Empty => {}
        }
        if attach_auth {
            if let Some(token) = self.session.credentials().bearer_token() {
                headers.push(("Authorization".to_string(), format!("Bearer {token}")));
            }
        }
        for (name, value) in request.headers() {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }
        for (name, value) in &headers {
            validate_header(name, value)?;
        }

        Ok(PreparedRequest {
            id: request.id(),
            method: request.method(),
            url,
            headers,
            body: request.body().clone(),
            timeout: request.timeout_override().unwrap_or(self.default_timeout),
        })
    }

    fn resolve_url(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let raw = match request.target() {
            Target::Path(path) => format!("{}/{}", self.base_url, path.trim_start_matches('/')),
            Target::Absolute(url) => url.clone(),
        };
        let mut url =
            Url::parse(&raw).map_err(|e| ApiError::Setup(format!("invalid URL '{raw}': {e}")))?;

        if !request.query_pairs().is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in request.query_pairs() {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn send(&self, prepared: PreparedRequest) -> Result<TransportResponse, ApiError> {
        let response = self.transport.send(prepared).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::http(response.status, response.body))
        }
    }

    fn intercept_success(&self, request: &ApiRequest, response: TransportResponse) -> Value {
        if self.environment.is_development() {
            tracing::debug!(
                request_id = %request.id().short(),
                status = response.status,
                data = ?response.body,
                "API response"
            );
        }
        response.body
    }

    /// Response interceptor failure path. Raises the side effects for
    /// `error` and hands it back unchanged.
    ///
    /// A 401 clears the session at most once per request id, however many
    /// times this runs for the same request.
    pub fn intercept_failure(&self, request: &ApiRequest, error: ApiError) -> ApiError {
        let request_id = request.id();
        match classify(&error) {
            Classification::SessionExpired => {
                if self.retry_ledger.mark(request_id) {
                    tracing::warn!(
                        request_id = %request_id.short(),
                        "Unauthorized response, clearing session"
                    );
                    self.session.clear();
                    self.alerts.dispatch(&session_expired_alert());
                } else {
                    tracing::debug!(
                        request_id = %request_id.short(),
                        "Session already cleared for this request"
                    );
                }
            }
            Classification::Alert(alert) => {
                tracing::warn!(
                    request_id = %request_id.short(),
                    status = ?error.status(),
                    title = %alert.title,
                    "API request failed: {}",
                    error
                );
                self.alerts.dispatch(&alert);
            }
        }
        error
    }
}

fn validate_header(name: &str, value: &str) -> Result<(), ApiError> {
    let name_ok = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && b != b':');
    if !name_ok {
        return Err(ApiError::Setup(format!("invalid header name '{name}'")));
    }
    if value.bytes().any(|b| b == b'\r' || b == b'\n' || b == 0) {
        return Err(ApiError::Setup(format!("invalid value for header '{name}'")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemorySessionStorage;
    use crate::ports::outbound::{
        MockAlertHandlers, MockHttpTransport, MultipartBody, SessionStorage, TransportError,
    };
    use greenbidz_domain::storage_keys;
    use serde_json::json;

    fn config() -> ClientConfig {
        ClientConfig {
            api_base_url: "https://api.test/v1/".to_string(),
            environment: Environment::Development,
            ..ClientConfig::default()
        }
    }

    fn logged_in_storage() -> Arc<MemorySessionStorage> {
        let storage = Arc::new(MemorySessionStorage::new());
        storage.save(storage_keys::USER_TOKEN, "tok-123");
        storage.save(storage_keys::IS_LOGGED_IN, "true");
        storage.save(storage_keys::USER_DATA, "{}");
        storage
    }

    fn client_with(
        transport: MockHttpTransport,
        storage: Arc<MemorySessionStorage>,
        alerts: AlertRegistry,
    ) -> ApiClient {
        ApiClient::new(
            &config(),
            Arc::new(transport),
            SessionManager::new(storage),
            alerts,
        )
    }

    #[test]
    fn test_prepare_attaches_bearer_token() {
        let client = client_with(
            MockHttpTransport::new(),
            logged_in_storage(),
            AlertRegistry::new(),
        );
        let prepared = client.prepare(&ApiRequest::get("/user-profile")).unwrap();

        assert_eq!(prepared.url.as_str(), "https://api.test/v1/user-profile");
        assert_eq!(prepared.header("Authorization"), Some("Bearer tok-123"));
        assert_eq!(prepared.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_prepare_skip_auth_omits_header() {
        let client = client_with(
            MockHttpTransport::new(),
            logged_in_storage(),
            AlertRegistry::new(),
        );
        let prepared = client
            .prepare(&ApiRequest::post("/register").skip_auth())
            .unwrap();
        assert_eq!(prepared.header("Authorization"), None);
    }

    #[test]
    fn test_prepare_without_login_flag_omits_header() {
        let storage = Arc::new(MemorySessionStorage::new());
        storage.save(storage_keys::USER_TOKEN, "tok-123");
        let client = client_with(MockHttpTransport::new(), storage, AlertRegistry::new());

        let prepared = client.prepare(&ApiRequest::get("/products")).unwrap();
        assert_eq!(prepared.header("Authorization"), None);
    }

    #[test]
    fn test_prepare_encodes_query_and_content_type() {
        let client = client_with(
            MockHttpTransport::new(),
            logged_in_storage(),
            AlertRegistry::new(),
        );
        let prepared = client
            .prepare(
                &ApiRequest::post("/submit-product")
                    .query("language", "zh-hant")
                    .multipart(MultipartBody::new().text("title", "Lathe"))
                    .timeout(Duration::from_secs(120)),
            )
            .unwrap();

        assert_eq!(
            prepared.url.as_str(),
            "https://api.test/v1/submit-product?language=zh-hant"
        );
        assert_eq!(prepared.header("content-type"), Some(CONTENT_TYPE_MULTIPART));
        assert_eq!(prepared.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_prepare_rejects_token_with_newline() {
        let storage = Arc::new(MemorySessionStorage::new());
        storage.save(storage_keys::USER_TOKEN, "tok\r\nX-Evil: 1");
        storage.save(storage_keys::IS_LOGGED_IN, "true");
        let client = client_with(MockHttpTransport::new(), storage, AlertRegistry::new());

        let err = client.prepare(&ApiRequest::get("/products")).unwrap_err();
        assert!(matches!(err, ApiError::Setup(_)));
    }

    #[tokio::test]
    async fn test_setup_error_never_reaches_transport() {
        let mut transport = MockHttpTransport::new();
        transport.expect_send().never();
        let mut handlers = MockAlertHandlers::new();
        handlers.expect_show_error().times(1).return_const(());

        let alerts = AlertRegistry::new();
        alerts.set_handlers(Some(Arc::new(handlers)));
        let client = client_with(transport, logged_in_storage(), alerts);

        let request = ApiRequest::absolute(crate::ports::outbound::HttpMethod::Get, "not a url");
        let err = client.execute(request).await.unwrap_err();
        assert!(matches!(err, ApiError::Setup(_)));
    }

    #[tokio::test]
    async fn test_success_passes_body_through_without_alert() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Ok(TransportResponse::new(200, json!({ "success": true }))));
        let mut handlers = MockAlertHandlers::new();
        handlers.expect_show_error().never();

        let alerts = AlertRegistry::new();
        alerts.set_handlers(Some(Arc::new(handlers)));
        let client = client_with(transport, logged_in_storage(), alerts);

        let body = client.execute(ApiRequest::get("/products")).await.unwrap();
        assert_eq!(body, json!({ "success": true }));
    }

    #[test]
    fn test_unauthorized_clears_session_once_per_request() {
        let storage = logged_in_storage();
        let mut handlers = MockAlertHandlers::new();
        handlers.expect_show_login_required().times(1).return_const(());

        let alerts = AlertRegistry::new();
        alerts.set_handlers(Some(Arc::new(handlers)));
        let client = client_with(MockHttpTransport::new(), storage.clone(), alerts);

        let request = ApiRequest::get("/user-profile");
        let first = client.intercept_failure(&request, ApiError::http(401, Value::Null));
        assert!(first.is_unauthorized());
        assert!(storage.load(storage_keys::USER_TOKEN).is_none());

        // Session restored by a new login; replaying the chain for the same
        // request must not clear it again.
        storage.save(storage_keys::USER_TOKEN, "tok-456");
        storage.save(storage_keys::IS_LOGGED_IN, "true");
        let second = client.intercept_failure(&request, ApiError::http(401, Value::Null));
        assert!(second.is_unauthorized());
        assert_eq!(
            storage.load(storage_keys::USER_TOKEN).as_deref(),
            Some("tok-456")
        );
    }

    #[tokio::test]
    async fn test_transport_error_is_returned_after_alert() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(TransportError::network("connection refused")));
        let mut handlers = MockAlertHandlers::new();
        handlers
            .expect_show_error()
            .withf(|alert| alert.title == "Connection Error")
            .times(1)
            .return_const(());

        let alerts = AlertRegistry::new();
        alerts.set_handlers(Some(Arc::new(handlers)));
        let client = client_with(transport, logged_in_storage(), alerts);

        let err = client.execute(ApiRequest::get("/categories")).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn test_execute_raw_has_no_side_effects() {
        let storage = logged_in_storage();
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .withf(|req| req.header("Authorization").is_none())
            .times(1)
            .returning(|_| Ok(TransportResponse::new(401, json!({ "message": "bad password" }))));
        let mut handlers = MockAlertHandlers::new();
        handlers.expect_show_login_required().never();
        handlers.expect_show_error().never();

        let alerts = AlertRegistry::new();
        alerts.set_handlers(Some(Arc::new(handlers)));
        let client = client_with(transport, storage.clone(), alerts);

        let err = client
            .execute_raw(ApiRequest::post("/token").skip_auth())
            .await
            .unwrap_err();
        assert_eq!(err.server_message(), Some("bad password"));
        assert_eq!(
            storage.load(storage_keys::USER_TOKEN).as_deref(),
            Some("tok-123")
        );
    }

    #[tokio::test]
    async fn test_execute_as_reports_parse_errors() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(TransportResponse::new(200, json!("not a list"))));
        let client = client_with(transport, logged_in_storage(), AlertRegistry::new());

        let err = client.get::<Vec<u32>>("/products").await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
