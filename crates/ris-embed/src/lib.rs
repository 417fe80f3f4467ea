//! Embedding providers for the image and text modalities.
//!
//! `APP_USE_FAKE_EMBEDDINGS=1` (or `embedding.fake = true`) swaps the local
//! models for [`FakeEmbedder`], which is fast and deterministic.

use anyhow::{ensure, Result};

use ris_core::config::EmbeddingSettings;
use ris_core::traits::{ImageEmbedder, TextEmbedder};

mod device;
pub mod fake;
pub mod pool;
pub mod text;
pub mod tokenize;
pub mod vision;

pub use fake::FakeEmbedder;
pub use vision::ClipImageModel;
pub use pool::{l2_normalize, masked_mean_l2};
pub use text::TextModel;

fn use_fake(settings: &EmbeddingSettings) -> bool {
    settings.fake
        || std::env::var("APP_USE_FAKE_EMBEDDINGS")
            .ok()
            .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Text embedder for `settings`, checked against the index's text dimensionality.
pub fn text_embedder(settings: &EmbeddingSettings, dim: usize) -> Result<Box<dyn TextEmbedder>> {
    if use_fake(settings) {
        tracing::info!(dim, "using fake text embedder");
        return Ok(Box::new(FakeEmbedder::new(dim)));
    }
    let model = TextModel::load(&text::resolve_model_dir(settings.text_model_dir.as_deref())?)?;
    ensure!(model.dim() == dim, "text model produces {} dims but the index expects {}", model.dim(), dim);
    Ok(Box::new(model))
}

/// Image embedder for `settings`, checked against the index's image dimensionality.
pub fn image_embedder(settings: &EmbeddingSettings, dim: usize) -> Result<Box<dyn ImageEmbedder>> {
    if use_fake(settings) {
        tracing::info!(dim, "using fake image embedder");
        return Ok(Box::new(FakeEmbedder::new(dim)));
    }
    let model = ClipImageModel::load(&vision::resolve_model_dir(settings.image_model_dir.as_deref())?)?;
    ensure!(model.dim() == dim, "image model produces {} dims but the index expects {}", model.dim(), dim);
    Ok(Box::new(model))
}
