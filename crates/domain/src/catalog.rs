//! Reference data used by the listing form pickers.

use serde::{Deserialize, Serialize};

use crate::common::aliases::aliased_serde;
use crate::common::string::lenient_string;
use crate::ids::{AuctionGroupId, CategoryId, CountryId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
}

aliased_serde!(Category { "id" = ["term_id"] });

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct Subcategory {
    pub id: CategoryId,
    pub name: String,
    pub parent_id: CategoryId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: Option<String>,
}

aliased_serde!(Subcategory {
    "id" = ["term_id"],
    "parent_id" = ["parent"],
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub id: CountryId,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct AuctionGroup {
    pub id: AuctionGroupId,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_date: Option<String>,
}

aliased_serde!(AuctionGroup { "name" = ["title"] });
