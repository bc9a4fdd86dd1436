//! Marketplace listings and the payload used to create or edit them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::aliases::aliased_serde;
use crate::common::string::{lenient_string, lenient_vec};
use crate::error::DomainError;
use crate::ids::{AuctionGroupId, CategoryId, CountryId, ProductId};
use crate::upload::Upload;

/// Listing lifecycle status as WordPress post statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Draft,
    Pending,
    Publish,
    Private,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Publish => "publish",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "pending" => Ok(Self::Pending),
            "publish" | "published" => Ok(Self::Publish),
            "private" => Ok(Self::Private),
            _ => Err(DomainError::unknown_variant("product status", s)),
        }
    }
}

/// A listing as returned by `/products`, `/my-products` and `/product/view`.
///
/// Each field accepts its WordPress names too (`ID`/`product_id`,
/// `post_title`/`name`, `post_content`, `post_status`); the first present key
/// wins when a payload carries several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default, deserialize_with = "lenient_string")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub images: Vec<String>,
    /// Fields this client does not model are kept so edits can round-trip them.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

aliased_serde!(Product {
    "id" = ["ID", "product_id"],
    "title" = ["post_title", "name"],
    "description" = ["post_content"],
    "status" = ["post_status"],
});

impl Product {
    pub fn is_draft(&self) -> bool {
        self.status == ProductStatus::Draft
    }
}

/// Everything needed to create a listing or update an existing draft.
///
/// One type covers the "save draft", "save and publish" and "direct submit"
/// flows of the app; they differ only in `status` and `product_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductSubmission {
    /// Set when editing an existing listing
    pub product_id: Option<ProductId>,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub subcategory_id: Option<CategoryId>,
    pub country_id: Option<CountryId>,
    pub auction_group_id: Option<AuctionGroupId>,
    pub price: Option<String>,
    pub quantity: Option<u32>,
    pub condition: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub status: ProductStatus,
    /// Free-form attributes, e.g. specifications from image analysis
    pub attributes: BTreeMap<String, String>,
    pub images: Vec<Upload>,
}

impl ProductSubmission {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("product title cannot be empty"));
        }
        if self.product_id.is_none() && self.status != ProductStatus::Draft && self.images.is_empty()
        {
            return Err(DomainError::validation(
                "a new listing needs at least one image unless saved as draft",
            ));
        }
        Ok(())
    }

    /// Plain form fields in a stable order.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        let mut push = |key: &str, value: String| fields.push((key.to_string(), value));

        if let Some(id) = self.product_id {
            push("product_id", id.to_string());
        }
        push("title", self.title.clone());
        if let Some(description) = &self.description {
            push("description", description.clone());
        }
        if let Some(id) = self.category_id {
            push("category_id", id.to_string());
        }
        if let Some(id) = self.subcategory_id {
            push("subcategory_id", id.to_string());
        }
        if let Some(id) = self.country_id {
            push("country_id", id.to_string());
        }
        if let Some(id) = self.auction_group_id {
            push("auction_group_id", id.to_string());
        }
        if let Some(price) = &self.price {
            push("price", price.clone());
        }
        if let Some(quantity) = self.quantity {
            push("quantity", quantity.to_string());
        }
        if let Some(condition) = &self.condition {
            push("condition", condition.clone());
        }
        if let Some(brand) = &self.brand {
            push("brand", brand.clone());
        }
        if let Some(model) = &self.model {
            push("model", model.clone());
        }
        push("status", self.status.to_string());
        for (key, value) in &self.attributes {
            push(&format!("attributes[{key}]"), value.clone());
        }
        fields
    }
}
