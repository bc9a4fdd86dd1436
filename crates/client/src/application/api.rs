//! Typed marketplace operations.
//!
//! Each operation builds one `ApiRequest` and hands it to `ApiClient`. None
//! of them retry; failures come back as `ApiError` after the client's alert
//! side effects.

use greenbidz_domain::{
    AnalysisResult, AuctionGroup, Category, CategoryId, Country, DomainError, Envelope, Language,
    LoginRequest, LoginResponse, Product, ProductId, ProductStatus, ProductSubmission,
    ProfileUpdate, RegisterRequest, Subcategory, Upload, UserProfile,
};
use serde::de::{Deserialize, DeserializeOwned};
use serde_json::{json, Value};

use std::sync::Arc;

use super::alerts::AlertRegistry;
use super::client::ApiClient;
use super::error::ApiError;
use super::request::ApiRequest;
use super::session::SessionManager;
use crate::config::ClientConfig;
use crate::infrastructure::{FileSessionStorage, ReqwestTransport};
use crate::ports::outbound::{HttpMethod, MultipartBody};

/// Endpoint paths relative to the API base URL.
pub mod paths {
    pub const SUBMIT_PRODUCT: &str = "/submit-product";
    pub const REGISTER: &str = "/register";
    pub const USER_PROFILE: &str = "/user-profile";
    pub const USER_PROFILE_UPDATE: &str = "/user-profile/update";
    pub const PRODUCTS: &str = "/products";
    pub const MY_PRODUCTS: &str = "/my-products";
    pub const PRODUCT_VIEW: &str = "/product/view";
    pub const PRODUCT_DELETE: &str = "/product/delete";
    pub const PRODUCT_STATUS_UPDATE: &str = "/product/status-update";
    pub const CATEGORIES: &str = "/categories";
    pub const SUBCATEGORIES: &str = "/subcategories";
    pub const COUNTRIES: &str = "/countries";
    pub const AUCTION_GROUPS: &str = "/auction-groups";
    // Path spelling is the server's.
    pub const ANALYZE_IMAGES: &str = "/analize_process_images";
}

pub const IMAGE_FIELD: &str = "images[]";
pub const AVATAR_FIELD: &str = "avatar";

#[derive(Clone)]
pub struct GreenbidzApi {
    client: ApiClient,
    auth_url: String,
}

impl GreenbidzApi {
    pub fn new(client: ApiClient, auth_url: impl Into<String>) -> Self {
        Self {
            client,
            auth_url: auth_url.into(),
        }
    }

    /// Wire the production adapters: reqwest transport, file-backed session
    /// and an empty alert registry.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new()?;
        let storage = FileSessionStorage::in_dir(config.storage_dir.as_deref());
        let client = ApiClient::new(
            config,
            Arc::new(transport),
            SessionManager::new(Arc::new(storage)),
            AlertRegistry::new(),
        );
        Ok(Self::new(client, config.auth_url.as_str()))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &SessionManager {
        self.client.session()
    }

    pub fn alerts(&self) -> &AlertRegistry {
        self.client.alerts()
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Exchange credentials for a JWT and persist the session.
    ///
    /// Goes through [`ApiClient::execute_raw`]: a stale token must not be sent
    /// with the credentials, and a rejected password is not a session expiry.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let credentials = LoginRequest::new(username, password)?;
        let request = ApiRequest::absolute(HttpMethod::Post, self.auth_url.as_str())
            .json(&credentials)?
            .skip_auth();

        let value = self.client.execute_raw(request).await.inspect_err(|e| {
            tracing::warn!(username = %credentials.username, "Login failed: {}", e);
        })?;
        let response: LoginResponse = decode(value)?;
        if response.token.is_empty() {
            return Err(ApiError::Parse("token endpoint returned an empty token".into()));
        }

        let user = json!({
            "user_email": response.user_email,
            "user_nicename": response.user_nicename,
            "user_display_name": response.user_display_name,
        });
        self.session().store_login(&response.token, &user)?;
        tracing::info!(user = %response.user_nicename, "Logged in");
        Ok(response)
    }

    pub fn logout(&self) {
        self.session().clear();
    }

    pub fn is_logged_in(&self) -> bool {
        self.session().is_logged_in()
    }

    pub fn selected_language(&self) -> Language {
        self.session().selected_language()
    }

    pub fn set_selected_language(&self, language: Language) {
        self.session().set_selected_language(language);
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<Value, ApiError> {
        request.validate()?;
        let mut body = MultipartBody::new().fields(request.form_fields());
        if let Some(avatar) = &request.avatar {
            body = body.file(with_field(avatar, AVATAR_FIELD));
        }
        self.client
            .execute(ApiRequest::post(paths::REGISTER).multipart(body).skip_auth())
            .await
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub async fn get_user_profile(&self) -> Result<UserProfile, ApiError> {
        let value = self.client.execute(ApiRequest::get(paths::USER_PROFILE)).await?;
        decode(value)
    }

    /// JSON update, or multipart when a new avatar is attached.
    pub async fn update_user_profile(&self, update: &ProfileUpdate) -> Result<Value, ApiError> {
        let request = ApiRequest::post(paths::USER_PROFILE_UPDATE);
        let request = match &update.avatar {
            Some(avatar) => request.multipart(
                MultipartBody::new()
                    .fields(update.form_fields())
                    .file(with_field(avatar, AVATAR_FIELD)),
            ),
            None => request.json(update)?,
        };
        self.client.execute(request).await
    }

    // =========================================================================
    // Listings
    // =========================================================================

    pub async fn get_products(&self) -> Result<Vec<Product>, ApiError> {
        let value = self.client.execute(ApiRequest::get(paths::PRODUCTS)).await?;
        decode(value)
    }

    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let path = format!("{}/{}", paths::PRODUCTS, id);
        let value = self.client.execute(ApiRequest::get(path)).await?;
        decode(value)
    }

    pub async fn get_my_products(&self, language: Option<Language>) -> Result<Vec<Product>, ApiError> {
        let request = ApiRequest::get(paths::MY_PRODUCTS).query("language", self.language(language));
        let value = self.client.execute(request).await?;
        decode(value)
    }

    pub async fn view_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let request = ApiRequest::post(paths::PRODUCT_VIEW).query("product_id", id);
        let value = self.client.execute(request).await?;
        decode(value)
    }

    /// Returns the server payload as-is.
    pub async fn delete_product(&self, id: ProductId) -> Result<Value, ApiError> {
        let request = ApiRequest::post(paths::PRODUCT_DELETE).query("product_id", id);
        self.client.execute(request).await
    }

    /// Returns the server payload as-is.
    pub async fn update_product_status(
        &self,
        id: ProductId,
        status: ProductStatus,
    ) -> Result<Value, ApiError> {
        let request = ApiRequest::post(paths::PRODUCT_STATUS_UPDATE)
            .query("product_id", id)
            .query("status", status);
        self.client.execute(request).await
    }

    /// Create a listing, or update one when `product_id` is set. Covers draft
    /// saves and direct publishing alike; the difference is `status`.
    pub async fn submit_product(&self, submission: &ProductSubmission) -> Result<Value, ApiError> {
        submission.validate()?;
        let body = MultipartBody::new()
            .fields(submission.form_fields())
            .files(submission.images.iter().map(|image| with_field(image, IMAGE_FIELD)));

        tracing::info!(
            product_id = ?submission.product_id,
            status = %submission.status,
            images = body.files.len(),
            bytes = body.total_file_bytes(),
            "Submitting product"
        );
        self.client
            .execute(
                ApiRequest::post(paths::SUBMIT_PRODUCT)
                    .multipart(body)
                    .timeout(self.client.upload_timeout()),
            )
            .await
    }

    /// Upload files alone to the submission endpoint.
    pub async fn upload_files(&self, uploads: Vec<Upload>) -> Result<Value, ApiError> {
        if uploads.is_empty() {
            return Err(DomainError::validation("no files to upload").into());
        }
        self.client
            .execute(
                ApiRequest::post(paths::SUBMIT_PRODUCT)
                    .multipart(MultipartBody::new().files(uploads))
                    .timeout(self.client.upload_timeout()),
            )
            .await
    }

    // =========================================================================
    // AI image analysis
    // =========================================================================

    pub async fn analyze_images(
        &self,
        images: Vec<Upload>,
        language: Option<Language>,
    ) -> Result<AnalysisResult, ApiError> {
        if images.is_empty() {
            return Err(DomainError::validation("at least one image is required").into());
        }
        let body = MultipartBody::new()
            .text("language", self.language(language).code())
            .files(images.iter().map(|image| with_field(image, IMAGE_FIELD)));
        let value = self
            .client
            .execute(
                ApiRequest::post(paths::ANALYZE_IMAGES)
                    .multipart(body)
                    .timeout(self.client.upload_timeout()),
            )
            .await?;
        decode(value)
    }

    // =========================================================================
    // Reference data
    // =========================================================================

    pub async fn get_categories(&self, language: Option<Language>) -> Result<Vec<Category>, ApiError> {
        self.reference_list(ApiRequest::get(paths::CATEGORIES), language)
            .await
    }

    pub async fn get_subcategories(
        &self,
        parent_id: CategoryId,
        language: Option<Language>,
    ) -> Result<Vec<Subcategory>, ApiError> {
        self.reference_list(
            ApiRequest::get(paths::SUBCATEGORIES).query("parent_id", parent_id),
            language,
        )
        .await
    }

    pub async fn get_countries(&self, language: Option<Language>) -> Result<Vec<Country>, ApiError> {
        self.reference_list(ApiRequest::get(paths::COUNTRIES), language)
            .await
    }

    pub async fn get_auction_groups(
        &self,
        language: Option<Language>,
    ) -> Result<Vec<AuctionGroup>, ApiError> {
        self.reference_list(ApiRequest::get(paths::AUCTION_GROUPS), language)
            .await
    }

    async fn reference_list<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        language: Option<Language>,
    ) -> Result<Vec<T>, ApiError> {
        let request = request.query("language", self.language(language));
        let value = self.client.execute(request).await?;
        decode(value)
    }

    fn language(&self, language: Option<Language>) -> Language {
        language.unwrap_or_else(|| self.selected_language())
    }
}

fn with_field(upload: &Upload, field: &str) -> Upload {
    Upload {
        field: field.to_string(),
        ..upload.clone()
    }
}

/// Decode a payload that is either wrapped in an [`Envelope`]'s `data` or
/// is the value itself. Envelope first: all-optional types accept the
/// wrapper object too.
fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    if value.get("data").is_some() {
        let wrapped = <Envelope<T> as Deserialize>::deserialize(&value)
            .ok()
            .and_then(Envelope::into_data);
        if let Some(data) = wrapped {
            return Ok(data);
        }
    }
    <T as Deserialize>::deserialize(&value).map_err(|e| ApiError::Parse(e.to_string()))
}
