//! Query orchestration: validation, filter construction, embedding and index dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;

use ris_core::color::{build_filter_with_color, ColorFallback, ColorPick};
use ris_core::config::Dimensions;
use ris_core::filter::{FacetSelections, Filter};
use ris_core::traits::{CatalogStore, Fusion, ImageEmbedder, ImageLoader, Prefetch, Query, QueryRequest, TextEmbedder, VectorIndex};
use ris_core::types::{Modality, ScoredResult};
use ris_core::{Error, Result};

/// Facet selections plus an optional color pick, as chosen by the caller.
#[derive(Debug, Clone, Default)]
pub struct FacetFilters {
    pub selections: FacetSelections,
    pub color: Option<ColorPick>,
}

impl FacetFilters {
    pub fn new(selections: FacetSelections) -> Self { Self { selections, color: None } }

    pub fn with_color(mut self, color: ColorPick) -> Self {
        self.color = Some(color);
        self
    }
}

/// Which inputs drive a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Image,
    Text,
    Hybrid,
}

impl std::str::FromStr for SearchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "text" => Ok(Self::Text),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(Error::InvalidQuery(format!("unknown search mode '{other}'"))),
        }
    }
}

/// Raw query inputs before embedding.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub mode: SearchMode,
    pub image: Option<Vec<u8>>,
    pub text: Option<String>,
}

impl SearchQuery {
    pub fn text(text: impl Into<String>) -> Self { Self { mode: SearchMode::Text, image: None, text: Some(text.into()) } }

    pub fn image(bytes: Vec<u8>) -> Self { Self { mode: SearchMode::Image, image: Some(bytes), text: None } }

    fn text_input(&self) -> Option<&str> { self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) }

    fn image_input(&self) -> Option<&[u8]> { self.image.as_deref().filter(|b| !b.is_empty()) }
}

/// External collaborators the service dispatches to.
pub struct Collaborators {
    pub text: Arc<dyn TextEmbedder>,
    pub image: Arc<dyn ImageEmbedder>,
    pub index: Arc<dyn VectorIndex>,
    pub catalog: Arc<dyn CatalogStore>,
    pub images: Arc<dyn ImageLoader>,
}

pub struct SearchService {
    text: Arc<dyn TextEmbedder>,
    image: Arc<dyn ImageEmbedder>,
    index: Arc<dyn VectorIndex>,
    catalog: Arc<dyn CatalogStore>,
    images: Arc<dyn ImageLoader>,
    dims: Dimensions,
    color_fallback: ColorFallback,
}

impl SearchService {
    pub fn new(parts: Collaborators, dims: Dimensions, color_fallback: ColorFallback) -> Self {
        Self {
            text: parts.text,
            image: parts.image,
            index: parts.index,
            catalog: parts.catalog,
            images: parts.images,
            dims,
            color_fallback,
        }
    }

    pub fn catalog(&self) -> &dyn CatalogStore { self.catalog.as_ref() }

    pub fn dimensions(&self) -> Dimensions { self.dims }

    fn expected_dim(&self, modality: Modality) -> usize {
        match modality {
            Modality::Image => self.dims.image,
            Modality::Text => self.dims.text,
        }
    }

    fn check_vector(&self, modality: Modality, vector: &[f32]) -> Result<()> {
        let expected = self.expected_dim(modality);
        if vector.len() != expected {
            return Err(Error::InvalidQuery(format!("{modality} vector has {} dimensions, expected {expected}", vector.len())));
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidQuery(format!("{modality} vector contains non-finite values")));
        }
        Ok(())
    }

    fn check_top_k(top_k: usize) -> Result<()> {
        if top_k == 0 {
            return Err(Error::InvalidQuery("top_k must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Index predicate for `filters`, with any color pick folded in.
    pub fn build_filter(&self, filters: &FacetFilters) -> Result<Filter> {
        build_filter_with_color(&filters.selections, filters.color.as_ref(), self.catalog.as_ref(), self.color_fallback)
    }

    fn dispatch(&self, request: &QueryRequest) -> Result<Vec<ScoredResult>> {
        let hits = self.index.query(request).map_err(Error::SearchBackend)?;
        tracing::debug!(hits = hits.len(), filter = %request.filter.summary(), "index query answered");
        Ok(hits)
    }

    /// Nearest neighbours of `vector` in the `modality` vector space.
    pub fn search_single(&self, vector: Vec<f32>, modality: Modality, top_k: usize, filters: &FacetFilters) -> Result<Vec<ScoredResult>> {
        Self::check_top_k(top_k)?;
        let filter = self.build_filter(filters)?;
        self.nearest(vector, modality, top_k, filter)
    }

    fn nearest(&self, vector: Vec<f32>, modality: Modality, top_k: usize, filter: Filter) -> Result<Vec<ScoredResult>> {
        self.check_vector(modality, &vector)?;
        let request = QueryRequest { prefetch: Vec::new(), query: Query::Nearest { using: modality, vector }, filter, limit: top_k };
        self.dispatch(&request)
    }

    /// One prefetch per supplied modality, fused with Reciprocal Rank Fusion.
    pub fn search_hybrid(&self, vectors: BTreeMap<Modality, Vec<f32>>, top_k: usize, filters: &FacetFilters) -> Result<Vec<ScoredResult>> {
        Self::check_top_k(top_k)?;
        if vectors.is_empty() {
            return Err(Error::InvalidQuery("hybrid search needs at least one query vector".to_string()));
        }
        let filter = self.build_filter(filters)?;
        self.fused(vectors, top_k, filter)
    }

    fn fused(&self, vectors: BTreeMap<Modality, Vec<f32>>, top_k: usize, filter: Filter) -> Result<Vec<ScoredResult>> {
        for (modality, vector) in &vectors {
            self.check_vector(*modality, vector)?;
        }
        let prefetch = vectors.into_iter().map(|(using, vector)| Prefetch { using, vector, limit: top_k }).collect();
        let request = QueryRequest { prefetch, query: Query::Fusion(Fusion::Rrf), filter, limit: top_k };
        self.dispatch(&request)
    }

    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let vector = self.text.embed_text(text).map_err(Error::Embedding)?;
        self.check_embedding(Modality::Text, vector)
    }

    pub fn embed_image(&self, bytes: &[u8]) -> Result<Vec<f32>> {
        let vector = self.image.embed_image(bytes).map_err(Error::Embedding)?;
        self.check_embedding(Modality::Image, vector)
    }

    fn check_embedding(&self, modality: Modality, vector: Vec<f32>) -> Result<Vec<f32>> {
        let expected = self.expected_dim(modality);
        if vector.len() != expected {
            return Err(Error::Embedding(anyhow::anyhow!("{modality} embedder returned {} dimensions, expected {expected}", vector.len())));
        }
        Ok(vector)
    }

    /// Embeds the query inputs and runs the search the mode calls for.
    ///
    /// Every input is checked before an embedder is called.
    pub fn search(&self, query: &SearchQuery, top_k: usize, filters: &FacetFilters) -> Result<Vec<ScoredResult>> {
        Self::check_top_k(top_k)?;
        let filter = self.build_filter(filters)?;
        let image = query.image_input();
        let text = query.text_input();
        match query.mode {
            SearchMode::Image if image.is_none() => return Err(Error::InvalidQuery("image search needs an image".to_string())),
            SearchMode::Text if text.is_none() => return Err(Error::InvalidQuery("text search needs a description".to_string())),
            SearchMode::Hybrid if image.is_none() && text.is_none() => {
                return Err(Error::InvalidQuery("hybrid search needs an image or a description".to_string()))
            }
            _ => {}
        }

        let started = std::time::Instant::now();
        let results = match (query.mode, image, text) {
            (SearchMode::Image, Some(bytes), _) => self.nearest(self.embed_image(bytes)?, Modality::Image, top_k, filter)?,
            (SearchMode::Text, _, Some(text)) => self.nearest(self.embed_text(text)?, Modality::Text, top_k, filter)?,
            _ => {
                let mut vectors = BTreeMap::new();
                if let Some(bytes) = image {
                    vectors.insert(Modality::Image, self.embed_image(bytes)?);
                }
                if let Some(text) = text {
                    vectors.insert(Modality::Text, self.embed_text(text)?);
                }
                self.fused(vectors, top_k, filter)?
            }
        };
        tracing::info!(mode = ?query.mode, top_k, hits = results.len(), elapsed_ms = started.elapsed().as_millis() as u64, "search finished");
        Ok(results)
    }

    /// Exact catalog rows for a SKU. Matching trims and ignores case.
    pub fn lookup_sku(&self, raw: &str) -> Vec<ScoredResult> {
        let hits: Vec<ScoredResult> = self.catalog.find_sku(raw).into_iter().map(ScoredResult::exact).collect();
        tracing::debug!(sku = raw, hits = hits.len(), "sku lookup");
        hits
    }

    /// Image search seeded by the first hit's product image, across the whole catalog.
    pub fn find_similar(&self, hits: &[ScoredResult], top_k: usize) -> Result<Vec<ScoredResult>> {
        let first = hits.first().ok_or_else(|| Error::InvalidQuery("no SKU match to search from".to_string()))?;
        let reference = first
            .payload
            .get("main_image_file")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::NotFound(format!("SKU {} has no product image", first.sku().unwrap_or("?"))))?;
        let bytes = self.images.load(reference).map_err(|e| Error::NotFound(format!("product image {reference}: {e:#}")))?;
        let vector = self.embed_image(&bytes)?;
        self.nearest(vector, Modality::Image, top_k, Filter::unrestricted())
    }
}
