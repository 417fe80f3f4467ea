//! Turning catalog rows into indexable items.

use indicatif::{ProgressBar, ProgressStyle};

use ris_core::traits::{CatalogStore, ImageEmbedder, ImageLoader, TextEmbedder};
use ris_core::types::CatalogItem;

use crate::IndexedItem;

/// Embedders and image source used while building an index.
pub struct Embedders<'a> {
    pub text: &'a dyn TextEmbedder,
    pub image: &'a dyn ImageEmbedder,
    pub images: &'a dyn ImageLoader,
}

fn embed_item(item: &CatalogItem, embedders: &Embedders<'_>) -> IndexedItem {
    let text_input = item.embedding_text();
    let text = if text_input.is_empty() {
        None
    } else {
        match embedders.text.embed_text(&text_input) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(sku = %item.sku, error = %e, "text embedding failed");
                None
            }
        }
    };
    let image = item.main_image_file.as_deref().and_then(|reference| {
        let embedded = embedders.images.load(reference).and_then(|bytes| embedders.image.embed_image(&bytes));
        match embedded {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(sku = %item.sku, image = reference, error = %e, "image embedding failed");
                None
            }
        }
    });
    IndexedItem { payload: item.to_payload(), image, text }
}

/// Embed every catalog row. Rows whose inputs fail to embed are kept without that vector.
pub fn embed_catalog(catalog: &dyn CatalogStore, embedders: &Embedders<'_>, show_progress: bool) -> Vec<IndexedItem> {
    let items = catalog.items();
    let pb = if show_progress { ProgressBar::new(items.len() as u64) } else { ProgressBar::hidden() };
    if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} products ({percent}%) {msg}") {
        pb.set_style(style.progress_chars("#>-"));
    }
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        pb.set_message(item.sku.clone());
        out.push(embed_item(item, embedders));
        pb.inc(1);
    }
    pb.finish_with_message("embedded");
    let with_image = out.iter().filter(|i| i.image.is_some()).count();
    let with_text = out.iter().filter(|i| i.text.is_some()).count();
    tracing::info!(items = out.len(), with_image, with_text, "catalog embedded");
    out
}
