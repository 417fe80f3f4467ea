use std::path::Path;

use anyhow::{bail, Context, Result};

use ris_core::catalog::Catalog;
use ris_core::color::ColorPick;
use ris_core::config::Settings;
use ris_core::filter::FacetSelections;
use ris_core::traits::CatalogStore;
use ris_core::types::ScoredResult;
use ris_index::ingest::{embed_catalog, Embedders};
use ris_search::bootstrap::{build_service, lance_index, load_catalog};
use ris_search::{FacetFilters, FsImageLoader, Pager, SearchMode, SearchQuery};

use crate::cli::{ModeArg, SearchArgs};

/// `field=value` pairs grouped by field, in command-line order.
pub fn parse_filters(pairs: &[String]) -> Result<FacetSelections> {
    let mut selections = FacetSelections::new();
    for pair in pairs {
        let Some((field, value)) = pair.split_once('=') else {
            bail!("filter '{pair}' must look like field=value");
        };
        selections.entry(field.trim().to_string()).or_default().push(value.trim().to_string());
    }
    Ok(selections)
}

pub fn resolve_mode(mode: Option<ModeArg>, has_text: bool, has_image: bool) -> Result<SearchMode> {
    Ok(match (mode, has_text, has_image) {
        (Some(ModeArg::Image), _, _) => SearchMode::Image,
        (Some(ModeArg::Text), _, _) => SearchMode::Text,
        (Some(ModeArg::Hybrid), _, _) | (None, true, true) => SearchMode::Hybrid,
        (None, true, false) => SearchMode::Text,
        (None, false, true) => SearchMode::Image,
        (None, false, false) => bail!("give --text, --image or both"),
    })
}

fn top_k(settings: &Settings, requested: Option<usize>) -> Result<usize> {
    let k = requested.unwrap_or(settings.search.default_top_k);
    if k > settings.search.max_top_k {
        bail!("--top-k {k} exceeds the maximum of {}", settings.search.max_top_k);
    }
    Ok(k)
}

pub fn index(settings: &Settings, limit: Option<usize>) -> Result<()> {
    let mut catalog = load_catalog(settings)?;
    if let Some(limit) = limit {
        println!("🔢 Limiting indexing to {limit} products");
        catalog = Catalog::from_items(catalog.items().iter().take(limit).cloned());
    }
    let dims = settings.index.dimensions;
    let text = ris_embed::text_embedder(&settings.embedding, dims.text)?;
    let image = ris_embed::image_embedder(&settings.embedding, dims.image)?;
    let images = FsImageLoader::new(ris_core::config::expand_path(&settings.catalog.images_dir));
    let embedders = Embedders { text: text.as_ref(), image: image.as_ref(), images: &images };

    let items = embed_catalog(&catalog, &embedders, true);
    let written = lance_index(settings).write(&items)?;
    println!("\n✅ Indexing completed successfully!");
    println!("📊 Wrote {written} products to {}/{}", settings.index.uri, settings.index.table);
    Ok(())
}

pub fn search(settings: &Settings, args: SearchArgs, json: bool) -> Result<()> {
    let mode = resolve_mode(args.mode, args.text.is_some(), args.image.is_some())?;
    let image = args.image.as_deref().map(read_image).transpose()?;
    let query = SearchQuery { mode, image, text: args.text };

    let mut filters = FacetFilters::new(parse_filters(&args.filters)?);
    if let Some(hex) = args.color {
        filters = filters.with_color(ColorPick::new(hex, args.tolerance.unwrap_or(settings.search.default_color_tolerance)));
    }

    let service = build_service(settings)?;
    let active = service.build_filter(&filters)?;
    if !json && !active.is_unrestricted() {
        println!("Active filters: {}", active.summary());
    }
    let results = service.search(&query, top_k(settings, args.top_k)?, &filters)?;

    let mut pager = Pager::new(settings.search.page_size).new_search(results);
    for _ in 0..args.page {
        pager = pager.next();
    }
    print_page(&pager, json)
}

pub fn sku(settings: &Settings, raw: &str, similar: bool, requested_top_k: Option<usize>, json: bool) -> Result<()> {
    let service = build_service(settings)?;
    let hits = service.lookup_sku(raw);
    if hits.is_empty() {
        if json {
            return print_page(&Pager::new(settings.search.page_size).new_search(hits), json);
        }
        println!("No product with SKU {raw}");
        return Ok(());
    }
    let results = if similar { service.find_similar(&hits, top_k(settings, requested_top_k)?)? } else { hits };
    print_page(&Pager::new(settings.search.page_size).new_search(results), json)
}

fn read_image(path: &Path) -> Result<Vec<u8>> { std::fs::read(path).with_context(|| format!("reading {}", path.display())) }

fn print_page(pager: &Pager, json: bool) -> Result<()> {
    print!("{}", render_page(pager, json)?);
    Ok(())
}

fn render_page(pager: &Pager, json: bool) -> Result<String> {
    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&pager.view())?));
    }
    if pager.total() == 0 {
        return Ok("No results.\n".to_string());
    }
    let offset = pager.page_index() * pager.page_size();
    let mut out = String::new();
    for (i, hit) in pager.current_page().iter().enumerate() {
        out.push_str(&format!("{:>3}. {}\n", offset + i + 1, describe(hit)));
    }
    out.push_str(&format!("\nPage {} of {} ({} results)\n", pager.page_index() + 1, pager.page_count(), pager.total()));
    Ok(out)
}

fn describe(hit: &ScoredResult) -> String {
    let field = |key: &str| hit.payload.get(key).and_then(|v| v.as_str()).unwrap_or("-");
    let score = hit.score.map_or_else(String::new, |s| format!("  [{s:.4}]"));
    format!("{}  {}  ({}, {}){score}", field("sku"), field("product_name"), field("style"), field("dominant_color_hex"))
}
