//! Request and response bodies for the search API

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ris_core::filter::FacetSelections;
use ris_core::types::Modality;
use ris_search::{Direction, PageView, ResultSource};

/// A facet selection given either as one value or as a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

pub fn selections(filters: BTreeMap<String, OneOrMany>) -> FacetSelections {
    filters
        .into_iter()
        .map(|(field, values)| {
            let values = match values {
                OneOrMany::One(v) => vec![v],
                OneOrMany::Many(vs) => vs,
            };
            (field, values)
        })
        .collect()
}

/// Color proximity request; tolerance falls back to the configured default.
#[derive(Debug, Clone, Deserialize)]
pub struct ColorRequest {
    pub hex: String,
    pub tolerance: Option<f64>,
}

/// Options shared by every search body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchOptions {
    pub top_k: Option<usize>,
    #[serde(default)]
    pub filters: BTreeMap<String, OneOrMany>,
    pub color: Option<ColorRequest>,
}

fn default_vector_name() -> Modality { Modality::Image }

#[derive(Debug, Deserialize)]
pub struct VectorSearchRequest {
    pub vector: Vec<f32>,
    #[serde(default = "default_vector_name")]
    pub using: Modality,
    #[serde(flatten)]
    pub options: SearchOptions,
}

#[derive(Debug, Deserialize)]
pub struct TextSearchRequest {
    pub text: String,
    #[serde(flatten)]
    pub options: SearchOptions,
}

#[derive(Debug, Deserialize)]
pub struct ImageSearchRequest {
    pub image_base64: String,
    #[serde(flatten)]
    pub options: SearchOptions,
}

#[derive(Debug, Deserialize)]
pub struct HybridSearchRequest {
    pub text: Option<String>,
    pub image_base64: Option<String>,
    #[serde(flatten)]
    pub options: SearchOptions,
}

/// What a session search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionSearchKind {
    Image,
    Text,
    Hybrid,
    Sku,
    Similar,
}

#[derive(Debug, Deserialize)]
pub struct SessionSearchRequest {
    pub kind: SessionSearchKind,
    pub text: Option<String>,
    pub image_base64: Option<String>,
    pub sku: Option<String>,
    #[serde(flatten)]
    pub options: SearchOptions,
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub direction: Direction,
}

/// Current page of a session with its navigation state.
#[derive(Debug, Serialize)]
pub struct SessionPage {
    pub source: Option<ResultSource>,
    pub label: Option<&'static str>,
    #[serde(flatten)]
    pub page: PageView,
}

#[derive(Debug, Serialize)]
pub struct FacetField {
    pub field: String,
    pub label: String,
    pub options: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FacetsResponse {
    pub fields: Vec<FacetField>,
    pub default_color_tolerance: f64,
}
