//! Wires configured collaborators into a [`SearchService`].

use std::sync::Arc;

use anyhow::{Context, Result};

use ris_core::catalog::Catalog;
use ris_core::config::{expand_path, IndexBackend, Settings};
use ris_core::traits::{ImageEmbedder, TextEmbedder, VectorIndex};
use ris_index::ingest::{embed_catalog, Embedders};
use ris_index::{LanceIndex, MemoryIndex};

use crate::images::FsImageLoader;
use crate::service::{Collaborators, SearchService};

pub fn load_catalog(settings: &Settings) -> Result<Catalog> {
    let path = expand_path(&settings.catalog.path);
    Catalog::load_csv(&path).with_context(|| format!("loading catalog {}", path.display()))
}

pub fn lance_index(settings: &Settings) -> LanceIndex {
    let index = &settings.index;
    LanceIndex::new(expand_path(&index.uri).to_string_lossy().to_string(), index.table.clone(), index.dimensions, index.rrf_k)
}

pub fn build_service(settings: &Settings) -> Result<SearchService> {
    let dims = settings.index.dimensions;
    let catalog = Arc::new(load_catalog(settings)?);
    let text: Arc<dyn TextEmbedder> = Arc::from(ris_embed::text_embedder(&settings.embedding, dims.text)?);
    let image: Arc<dyn ImageEmbedder> = Arc::from(ris_embed::image_embedder(&settings.embedding, dims.image)?);
    let images = Arc::new(FsImageLoader::new(expand_path(&settings.catalog.images_dir)));

    let index: Arc<dyn VectorIndex> = match settings.index.backend {
        IndexBackend::Lance => {
            let lance = lance_index(settings);
            let rows = lance.row_count().context("opening the lance table; run `ris index` first")?;
            tracing::info!(uri = %settings.index.uri, table = %settings.index.table, rows, "opened lance index");
            Arc::new(lance)
        }
        IndexBackend::Memory => {
            let embedders = Embedders { text: text.as_ref(), image: image.as_ref(), images: &*images };
            let items = embed_catalog(&*catalog, &embedders, false);
            tracing::info!(items = items.len(), "built in-memory index");
            Arc::new(MemoryIndex::new(items, settings.index.rrf_k))
        }
    };

    Ok(SearchService::new(Collaborators { text, image, index, catalog, images }, dims, settings.search.color_fallback))
}
