#![allow(dead_code)]

use ris_core::types::{CatalogItem, ScoredResult};
use ris_index::IndexedItem;

pub fn item(sku: &str, style: &str, color: &str, image: Option<Vec<f32>>, text: Option<Vec<f32>>) -> IndexedItem {
    let catalog_item = CatalogItem {
        sku: sku.to_string(),
        style: Some(style.to_string()),
        dominant_color_hex: Some(color.to_string()),
        ..Default::default()
    };
    IndexedItem { payload: catalog_item.to_payload(), image, text }
}

/// Four products on a 3-dim toy space; `image` and `text` rank them differently.
pub fn toy_items() -> Vec<IndexedItem> {
    vec![
        item("A", "Modern", "#FF0000", Some(vec![1.0, 0.0, 0.0]), Some(vec![0.0, 0.0, 1.0])),
        item("B", "Modern", "#00FF00", Some(vec![0.9, 0.1, 0.0]), Some(vec![0.0, 0.6, 0.8])),
        item("C", "Rustic", "#0000FF", Some(vec![0.0, 1.0, 0.0]), Some(vec![1.0, 0.0, 0.0])),
        item("D", "Rustic", "#FF0505", None, Some(vec![0.1, 0.0, 0.9])),
    ]
}

pub fn skus(results: &[ScoredResult]) -> Vec<String> {
    results.iter().map(|r| r.sku().unwrap_or_default().to_string()).collect()
}
