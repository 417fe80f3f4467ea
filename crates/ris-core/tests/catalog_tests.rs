use std::fs;

use tempfile::TempDir;

use ris_core::catalog::{normalize_sku, Catalog};
use ris_core::filter::ANY;
use ris_core::traits::CatalogStore;

const CSV: &str = "\
sku,product_name,description,main_image_file,style,category,class,occasion,orientation,country_of_origin,dominant_color_hex,ecom_price,extra
abc123,Sunset Canvas,Warm tones,images/abc123.jpg,Modern,Wall Art,Canvas,Birthday,Landscape,USA,#FF0000,49.99,x
B-2,Forest Print,,NaN,Rustic,Prints,Print,NaN,Portrait,Canada,#00FF00,NaN,y
,Orphan,,,,,,,,,,,
";

fn write_catalog() -> (TempDir, std::path::PathBuf) {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("products.csv");
    fs::write(&path, CSV).expect("write csv");
    (tmp, path)
}

#[test]
fn load_csv_normalizes_and_cleans_cells() {
    let (_tmp, path) = write_catalog();
    let catalog = Catalog::load_csv(&path).expect("load");
    assert_eq!(catalog.len(), 2, "row without sku is skipped");

    let first = &catalog.items()[0];
    assert_eq!(first.sku, "ABC123");
    assert_eq!(first.ecom_price, Some(49.99));

    let second = &catalog.items()[1];
    assert_eq!(second.main_image_file, None, "NaN reads as missing");
    assert_eq!(second.description, None, "empty reads as missing");
    assert_eq!(second.ecom_price, None);
}

#[test]
fn sku_lookup_is_case_normalized() {
    let (_tmp, path) = write_catalog();
    let catalog = Catalog::load_csv(&path).expect("load");
    assert_eq!(catalog.find_sku("abc123").len(), 1);
    assert_eq!(catalog.find_sku(" ABC123 ").len(), 1);
    assert!(catalog.find_sku("zzz").is_empty());
    assert_eq!(normalize_sku("b-2"), "B-2");
}

#[test]
fn duplicate_skus_are_all_returned() {
    let catalog = Catalog::from_items(vec![
        ris_core::types::CatalogItem { sku: "dup".into(), ..Default::default() },
        ris_core::types::CatalogItem { sku: "DUP".into(), ..Default::default() },
    ]);
    assert_eq!(catalog.find_sku("Dup").len(), 2);
}

#[test]
fn facet_options_start_with_sentinel() {
    let (_tmp, path) = write_catalog();
    let catalog = Catalog::load_csv(&path).expect("load");
    let options = catalog.facet_options();
    assert_eq!(options["style"], vec![ANY.to_string(), "Modern".into(), "Rustic".into()]);
    assert_eq!(options["occasion"], vec![ANY.to_string(), "Birthday".into()]);
    assert_eq!(options.len(), 7);
}

#[test]
fn payload_omits_missing_attributes() {
    let (_tmp, path) = write_catalog();
    let catalog = Catalog::load_csv(&path).expect("load");
    let payload = catalog.items()[1].to_payload();
    assert_eq!(payload.get("sku").and_then(|v| v.as_str()), Some("B-2"));
    assert!(!payload.contains_key("main_image_file"));
    assert_eq!(payload.get("class").and_then(|v| v.as_str()), Some("Print"));
}

#[test]
fn embedding_text_joins_name_and_description() {
    let (_tmp, path) = write_catalog();
    let catalog = Catalog::load_csv(&path).expect("load");
    assert_eq!(catalog.items()[0].embedding_text(), "Sunset Canvas. Warm tones");
    assert_eq!(catalog.items()[1].embedding_text(), "Forest Print");
}
