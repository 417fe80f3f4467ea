//! Domain types shared by the catalog, the index backends and the search core.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Flat attribute mapping returned with every result.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// A search input type, each mapped to its own named vector space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Image,
    Text,
}

impl Modality {
    pub const ALL: [Modality; 2] = [Modality::Image, Modality::Text];

    /// Name of the vector in the index.
    pub fn as_str(self) -> &'static str {
        match self {
            Modality::Image => "image",
            Modality::Text => "text",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Modality {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Modality::Image),
            "text" => Ok(Modality::Text),
            other => Err(crate::Error::InvalidQuery(format!("unknown modality '{other}'"))),
        }
    }
}

/// One product row of the catalog.
///
/// `sku` is stored normalized (see [`crate::catalog::normalize_sku`]). Facet
/// attributes are optional because the source table has gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_image_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occasion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_of_origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_color_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecom_price: Option<f64>,
}

impl CatalogItem {
    /// String value of a named field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        let v = match name {
            "sku" => return Some(self.sku.as_str()),
            "product_name" => &self.product_name,
            "description" => &self.description,
            "main_image_file" => &self.main_image_file,
            "style" => &self.style,
            "category" => &self.category,
            "class" => &self.class,
            "occasion" => &self.occasion,
            "orientation" => &self.orientation,
            "country_of_origin" => &self.country_of_origin,
            "dominant_color_hex" => &self.dominant_color_hex,
            _ => return None,
        };
        v.as_deref()
    }

    /// Flat payload view; missing attributes are omitted.
    pub fn to_payload(&self) -> Payload {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => Payload::new(),
        }
    }

    /// Text used for the item's text embedding.
    pub fn embedding_text(&self) -> String {
        [self.product_name.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(". ")
    }
}

/// A result of any search path.
///
/// `score` is `None` for exact SKU lookups and present (higher is better) for
/// vector and fusion searches. Lists of results keep the order produced by the
/// index and are never re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub payload: Payload,
    #[serde(default)]
    pub score: Option<f32>,
}

impl ScoredResult {
    pub fn scored(payload: Payload, score: f32) -> Self { Self { payload, score: Some(score) } }

    pub fn exact(item: &CatalogItem) -> Self { Self { payload: item.to_payload(), score: None } }

    pub fn sku(&self) -> Option<&str> { self.payload.get("sku").and_then(|v| v.as_str()) }
}
