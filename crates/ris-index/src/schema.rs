use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

use ris_core::config::Dimensions;

/// Scalar columns stored next to the payload so filters can be pushed down.
pub const FILTER_COLUMNS: [&str; 8] = [
    "sku",
    "style",
    "category",
    "class",
    "occasion",
    "orientation",
    "country_of_origin",
    "dominant_color_hex",
];

pub const PAYLOAD_COLUMN: &str = "payload";

fn vector_field(name: &str, dim: usize) -> anyhow::Result<Field> {
    let dim = i32::try_from(dim)?;
    Ok(Field::new(name, DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dim), true))
}

pub fn build_products_schema(dims: Dimensions) -> anyhow::Result<Arc<Schema>> {
    let mut fields: Vec<Field> = FILTER_COLUMNS
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, *name != "sku"))
        .collect();
    fields.push(Field::new(PAYLOAD_COLUMN, DataType::Utf8, false));
    fields.push(vector_field("image", dims.image)?);
    fields.push(vector_field("text", dims.text)?);
    Ok(Arc::new(Schema::new(fields)))
}
