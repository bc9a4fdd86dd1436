//! Result of the AI image-analysis step of listing creation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::aliases::aliased_serde;
use crate::common::string::lenient_string;
use crate::product::ProductSubmission;

/// Fields the analysis service suggests for a new listing. Every field is
/// optional; the service omits what it could not recognize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self")]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subcategory: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub suggested_price: Option<String>,
    #[serde(default)]
    pub specifications: BTreeMap<String, Value>,
}

aliased_serde!(AnalysisResult {
    "title" = ["product_title"],
    "suggested_price" = ["price"],
});

impl AnalysisResult {
    /// Seed a draft submission with the suggested fields. The user still
    /// picks category ids and images in the form.
    pub fn to_draft(&self) -> ProductSubmission {
        let mut draft = ProductSubmission::new(self.title.clone().unwrap_or_default());
        draft.description = self.description.clone();
        draft.brand = self.brand.clone();
        draft.model = self.model.clone();
        draft.condition = self.condition.clone();
        draft.price = self.suggested_price.clone();
        draft.attributes = self
            .specifications
            .iter()
            .map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (key.clone(), text)
            })
            .collect();
        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductStatus;
    use serde_json::json;

    #[test]
    fn tolerates_partial_results() {
        let result: AnalysisResult =
            serde_json::from_value(json!({ "product_title": "Air compressor", "price": 800 }))
                .unwrap();
        assert_eq!(result.title.as_deref(), Some("Air compressor"));
        assert_eq!(result.suggested_price.as_deref(), Some("800"));
        assert!(result.brand.is_none());
    }

    #[test]
    fn draft_carries_suggestions_and_stringified_specs() {
        let result: AnalysisResult = serde_json::from_value(json!({
            "title": "Air compressor",
            "brand": "Atlas Copco",
            "specifications": { "power_kw": 7.5, "voltage": "380V" }
        }))
        .unwrap();

        let draft = result.to_draft();
        assert_eq!(draft.title, "Air compressor");
        assert_eq!(draft.status, ProductStatus::Draft);
        assert_eq!(draft.attributes.get("power_kw").map(String::as_str), Some("7.5"));
        assert_eq!(draft.attributes.get("voltage").map(String::as_str), Some("380V"));
    }
}
