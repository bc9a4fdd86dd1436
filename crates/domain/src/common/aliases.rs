//! Key aliasing for WordPress payloads.
//!
//! The same value arrives under different keys depending on the endpoint
//! (`id`, `ID`, `product_id`), and some responses carry several of them at
//! once. Plain `#[serde(alias)]` rejects those as duplicate fields, so the
//! wire types collapse the candidates to one canonical key before the derived
//! deserializer runs.

use serde_json::{Map, Value};

/// Keep the first non-null value among `canonical` and `aliases` (in that
/// order) under `canonical`, and drop every alias key.
pub fn collapse_aliases(fields: &mut Map<String, Value>, canonical: &str, aliases: &[&str]) {
    let mut chosen = fields.remove(canonical).filter(|value| !value.is_null());
    for alias in aliases {
        let value = fields.remove(*alias).filter(|value| !value.is_null());
        if chosen.is_none() {
            chosen = value;
        }
    }
    if let Some(value) = chosen {
        fields.insert(canonical.to_string(), value);
    }
}

/// Implement `Serialize`/`Deserialize` for a struct derived with
/// `#[serde(remote = "Self")]`, collapsing the listed aliases first.
///
/// ```ignore
/// aliased_serde!(Product { "id" = ["ID", "product_id"] });
/// ```
macro_rules! aliased_serde {
    ($ty:ident { $($canonical:literal = [$($alias:literal),+ $(,)?]),+ $(,)? }) => {
        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                $ty::serialize(self, serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let mut fields = <serde_json::Map<String, serde_json::Value> as serde::Deserialize>::deserialize(
                    deserializer,
                )?;
                $(
                    $crate::common::aliases::collapse_aliases(&mut fields, $canonical, &[$($alias),+]);
                )+
                $ty::deserialize(serde_json::Value::Object(fields)).map_err(serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use aliased_serde;
