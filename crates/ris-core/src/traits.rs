//! Collaborator seams consumed by the search core.
//!
//! Implementations live in `ris-embed` (embedders) and `ris-index` (vector
//! indexes). They report failures through `anyhow`; the search core maps them
//! onto [`crate::Error`].

use std::collections::BTreeMap;

use crate::catalog::normalize_sku;
use crate::filter::{Filter, ANY, FACET_FIELDS};
use crate::types::{CatalogItem, Modality, ScoredResult};

pub trait TextEmbedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_text(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

pub trait ImageEmbedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_image(&self, image_bytes: &[u8]) -> anyhow::Result<Vec<f32>>;
}

/// Resolves an image reference stored in the catalog into raw bytes.
pub trait ImageLoader: Send + Sync {
    fn load(&self, reference: &str) -> anyhow::Result<Vec<u8>>;
}

/// Per-modality candidate retrieval executed before fusion.
#[derive(Debug, Clone, PartialEq)]
pub struct Prefetch {
    pub using: Modality,
    pub vector: Vec<f32>,
    pub limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fusion {
    /// Reciprocal Rank Fusion; the smoothing constant belongs to the index.
    Rrf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Nearest { using: Modality, vector: Vec<f32> },
    Fusion(Fusion),
}

/// One request against a vector index.
///
/// `filter` restricts every prefetch as well as the final result list.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub prefetch: Vec<Prefetch>,
    pub query: Query,
    pub filter: Filter,
    pub limit: usize,
}

pub trait VectorIndex: Send + Sync {
    /// Results ordered by descending score, at most `request.limit` of them.
    fn query(&self, request: &QueryRequest) -> anyhow::Result<Vec<ScoredResult>>;
}

/// Read-only row access over the product table.
pub trait CatalogStore: Send + Sync {
    fn items(&self) -> &[CatalogItem];

    /// Rows whose `field` equals `value` exactly.
    fn rows_where(&self, field: &str, value: &str) -> Vec<&CatalogItem> {
        self.items().iter().filter(|item| item.field(field) == Some(value)).collect()
    }

    /// Sorted distinct non-missing values of `field`.
    fn distinct_values(&self, field: &str) -> Vec<String> {
        let mut values: Vec<String> = self.items().iter().filter_map(|item| item.field(field)).map(str::to_string).collect();
        values.sort();
        values.dedup();
        values
    }

    /// Rows whose SKU equals `raw` after normalization.
    fn find_sku(&self, raw: &str) -> Vec<&CatalogItem> { self.rows_where("sku", &normalize_sku(raw)) }

    /// Option lists per facet field: the sentinel first, then sorted distinct values.
    fn facet_options(&self) -> BTreeMap<String, Vec<String>> {
        FACET_FIELDS
            .iter()
            .map(|(field, _)| {
                let mut opts = vec![ANY.to_string()];
                opts.extend(self.distinct_values(field));
                ((*field).to_string(), opts)
            })
            .collect()
    }
}
