//! In-memory product catalog loaded from the CSV product table.

use serde::Deserialize;
use std::path::Path;

use crate::traits::CatalogStore;
use crate::types::CatalogItem;
use crate::{Error, Result};

/// Canonical form of a SKU, applied to stored rows and to lookups alike.
pub fn normalize_sku(raw: &str) -> String { raw.trim().to_uppercase() }

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    sku: Option<String>,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    main_image_file: Option<String>,
    #[serde(default)]
    style: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    class: Option<String>,
    #[serde(default)]
    occasion: Option<String>,
    #[serde(default)]
    orientation: Option<String>,
    #[serde(default)]
    country_of_origin: Option<String>,
    #[serde(default)]
    dominant_color_hex: Option<String>,
    #[serde(default)]
    ecom_price: Option<String>,
}

fn cell(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("nan"))
}

impl CsvRow {
    fn into_item(self, line: usize) -> Option<CatalogItem> {
        let Some(sku) = cell(self.sku) else {
            tracing::warn!(line, "skipping catalog row without sku");
            return None;
        };
        let ecom_price = cell(self.ecom_price).and_then(|p| match p.parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(line, price = %p, "ignoring unparseable price");
                None
            }
        });
        Some(CatalogItem {
            sku: normalize_sku(&sku),
            product_name: cell(self.product_name),
            description: cell(self.description),
            main_image_file: cell(self.main_image_file),
            style: cell(self.style),
            category: cell(self.category),
            class: cell(self.class),
            occasion: cell(self.occasion),
            orientation: cell(self.orientation),
            country_of_origin: cell(self.country_of_origin),
            dominant_color_hex: cell(self.dominant_color_hex),
            ecom_price,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Build from items, normalizing their SKUs.
    pub fn from_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let items = items
            .into_iter()
            .map(|mut item| {
                item.sku = normalize_sku(&item.sku);
                item
            })
            .collect();
        Self { items }
    }

    pub fn load_csv(path: &Path) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::Catalog(format!("failed to open {}: {}", path.display(), e)))?;
        let catalog = Self::from_csv_reader(reader)?;
        tracing::info!(path = %path.display(), items = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn from_csv_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut items = Vec::new();
        for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| Error::Catalog(format!("row {}: {}", i + 1, e)))?;
            items.extend(row.into_item(i + 1));
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }
}

impl CatalogStore for Catalog {
    fn items(&self) -> &[CatalogItem] { &self.items }
}
