#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};

use ris_core::catalog::Catalog;
use ris_core::color::ColorFallback;
use ris_core::config::Dimensions;
use ris_core::traits::{CatalogStore, ImageEmbedder, QueryRequest, TextEmbedder, VectorIndex};
use ris_core::types::{CatalogItem, ScoredResult};
use ris_index::{IndexedItem, MemoryIndex, DEFAULT_RRF_K};
use ris_search::{Collaborators, FsImageLoader, SearchService};

pub const DIMS: Dimensions = Dimensions { image: 3, text: 3 };

/// Embeds by table lookup; image bytes are read as a UTF-8 key.
pub struct LookupEmbedder {
    vectors: HashMap<String, Vec<f32>>,
}

impl LookupEmbedder {
    pub fn new(entries: &[(&str, [f32; 3])]) -> Self {
        Self { vectors: entries.iter().map(|(k, v)| ((*k).to_string(), v.to_vec())).collect() }
    }

    fn lookup(&self, key: &str) -> Result<Vec<f32>> { self.vectors.get(key).cloned().ok_or_else(|| anyhow!("no vector for '{key}'")) }
}

impl TextEmbedder for LookupEmbedder {
    fn dim(&self) -> usize { 3 }
    fn embed_text(&self, text: &str) -> Result<Vec<f32>> { self.lookup(text) }
}

impl ImageEmbedder for LookupEmbedder {
    fn dim(&self) -> usize { 3 }
    fn embed_image(&self, bytes: &[u8]) -> Result<Vec<f32>> { self.lookup(&String::from_utf8_lossy(bytes)) }
}

/// Wraps a [`LookupEmbedder`] and counts every embed call.
pub struct CountingEmbedder {
    inner: LookupEmbedder,
    calls: AtomicUsize,
}

impl CountingEmbedder {
    pub fn new(inner: LookupEmbedder) -> Self { Self { inner, calls: AtomicUsize::new(0) } }

    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl TextEmbedder for CountingEmbedder {
    fn dim(&self) -> usize { 3 }
    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed_text(text)
    }
}

impl ImageEmbedder for CountingEmbedder {
    fn dim(&self) -> usize { 3 }
    fn embed_image(&self, bytes: &[u8]) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.embed_image(bytes)
    }
}

pub struct FailingIndex;

impl VectorIndex for FailingIndex {
    fn query(&self, _request: &QueryRequest) -> Result<Vec<ScoredResult>> { bail!("connection refused") }
}

fn product(sku: &str, style: &str, color: &str, image_file: Option<&str>) -> CatalogItem {
    CatalogItem {
        sku: sku.to_string(),
        style: Some(style.to_string()),
        dominant_color_hex: Some(color.to_string()),
        main_image_file: image_file.map(str::to_string),
        ..Default::default()
    }
}

/// Four indexed products plus `ABC123`, which is in the catalog but has no vectors.
pub fn toy_catalog() -> Catalog {
    Catalog::from_items(vec![
        product("A", "Modern", "#FF0000", Some("a.jpg")),
        product("B", "Modern", "#00FF00", Some("b.jpg")),
        product("C", "Rustic", "#0000FF", Some("c.jpg")),
        product("D", "Rustic", "#FF0505", None),
        product("ABC123", "Coastal", "#123456", Some("abc123.jpg")),
    ])
}

pub fn toy_index(catalog: &Catalog) -> MemoryIndex {
    let vectors: [(&str, Option<[f32; 3]>, Option<[f32; 3]>); 4] = [
        ("A", Some([1.0, 0.0, 0.0]), Some([0.0, 0.0, 1.0])),
        ("B", Some([0.9, 0.1, 0.0]), Some([0.0, 0.6, 0.8])),
        ("C", Some([0.0, 1.0, 0.0]), Some([1.0, 0.0, 0.0])),
        ("D", None, Some([0.1, 0.0, 0.9])),
    ];
    let items = catalog
        .items()
        .iter()
        .map(|item| {
            let (image, text) = vectors
                .iter()
                .find(|(sku, _, _)| *sku == item.sku)
                .map_or((None, None), |(_, image, text)| (image.map(|v| v.to_vec()), text.map(|v| v.to_vec())));
            IndexedItem { payload: item.to_payload(), image, text }
        })
        .collect();
    MemoryIndex::new(items, DEFAULT_RRF_K)
}

pub fn embedder() -> LookupEmbedder {
    LookupEmbedder::new(&[
        ("reading lamp", [1.0, 0.0, 0.2]),
        ("red", [1.0, 0.0, 0.0]),
        ("img:C", [0.0, 1.0, 0.0]),
    ])
}

pub fn service_with(index: Arc<dyn VectorIndex>, images_dir: &Path, fallback: ColorFallback) -> SearchService {
    counting_service(index, Arc::new(CountingEmbedder::new(embedder())), images_dir, fallback)
}

pub fn counting_service(
    index: Arc<dyn VectorIndex>,
    embedder: Arc<CountingEmbedder>,
    images_dir: &Path,
    fallback: ColorFallback,
) -> SearchService {
    let catalog = Arc::new(toy_catalog());
    SearchService::new(
        Collaborators {
            text: embedder.clone(),
            image: embedder,
            index,
            catalog,
            images: Arc::new(FsImageLoader::new(images_dir)),
        },
        DIMS,
        fallback,
    )
}

pub fn toy_service(images_dir: &Path) -> SearchService {
    let index = Arc::new(toy_index(&toy_catalog()));
    service_with(index, images_dir, ColorFallback::Disable)
}

pub fn skus(results: &[ScoredResult]) -> Vec<String> {
    results.iter().map(|r| r.sku().unwrap_or_default().to_string()).collect()
}

pub fn scored(sku: &str) -> ScoredResult {
    let mut payload = ris_core::types::Payload::new();
    payload.insert("sku".to_string(), serde_json::Value::String(sku.to_string()));
    ScoredResult::scored(payload, 1.0)
}
