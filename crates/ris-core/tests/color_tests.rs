use proptest::prelude::*;

use ris_core::catalog::Catalog;
use ris_core::color::{build_filter_with_color, matching_colors, ColorFallback, ColorPick, Rgb, MAX_DISTANCE};
use ris_core::filter::{FacetSelections, Match, COLOR_FIELD};
use ris_core::traits::CatalogStore;
use ris_core::types::CatalogItem;
use ris_core::Error;

fn item(sku: &str, color: &str) -> CatalogItem {
    CatalogItem { sku: sku.into(), dominant_color_hex: Some(color.into()), style: Some("Modern".into()), ..Default::default() }
}

fn sample_catalog() -> Catalog {
    Catalog::from_items(vec![item("A1", "#FF0000"), item("A2", "#FF0505"), item("A3", "#00FF00")])
}

#[test]
fn parses_with_and_without_hash() {
    assert_eq!(Rgb::parse("#FF0505").expect("hash"), Rgb(255, 5, 5));
    assert_eq!(Rgb::parse("00ff00").expect("bare"), Rgb(0, 255, 0));
    assert!(matches!(Rgb::parse("#FFF"), Err(Error::InvalidQuery(_))));
    assert!(matches!(Rgb::parse("#GG0000"), Err(Error::InvalidQuery(_))));
}

#[test]
fn end_to_end_tolerance_example() {
    let catalog = sample_catalog();
    let matched = matching_colors(&catalog, &ColorPick::new("#FF0000", 10.0)).expect("match");
    assert_eq!(matched, vec!["#FF0000".to_string(), "#FF0505".to_string()]);

    let near = Rgb::parse("#FF0000").unwrap().distance(Rgb::parse("#FF0505").unwrap());
    assert!((near - 50f64.sqrt()).abs() < 1e-9, "distance was {near}");
    assert!(near <= 10.0);
    let far = Rgb::parse("#FF0000").unwrap().distance(Rgb::parse("#00FF00").unwrap());
    assert!((far - 360.62).abs() < 1e-2, "distance was {far}");
}

#[test]
fn max_tolerance_returns_every_color() {
    let catalog = sample_catalog();
    let matched = matching_colors(&catalog, &ColorPick::new("#123456", MAX_DISTANCE)).expect("match");
    assert_eq!(matched.len(), 3);
}

#[test]
fn negative_or_nan_tolerance_is_rejected() {
    let catalog = sample_catalog();
    assert!(matches!(matching_colors(&catalog, &ColorPick::new("#FF0000", -1.0)), Err(Error::InvalidQuery(_))));
    assert!(matches!(matching_colors(&catalog, &ColorPick::new("#FF0000", f64::NAN)), Err(Error::InvalidQuery(_))));
}

#[test]
fn unparseable_catalog_colors_are_skipped() {
    let catalog = Catalog::from_items(vec![item("A1", "#FF0000"), item("B1", "red")]);
    let matched = matching_colors(&catalog, &ColorPick::new("#FF0000", MAX_DISTANCE)).expect("match");
    assert_eq!(matched, vec!["#FF0000".to_string()]);
}

#[test]
fn pick_folds_into_color_field() {
    let catalog = sample_catalog();
    let pick = ColorPick::new("#FF0000", 10.0);
    let filter = build_filter_with_color(&FacetSelections::new(), Some(&pick), &catalog, ColorFallback::Disable).expect("filter");
    assert_eq!(
        filter.condition(COLOR_FIELD).map(|c| &c.matcher),
        Some(&Match::Any(vec!["#FF0000".into(), "#FF0505".into()]))
    );
}

#[test]
fn matched_colors_reach_the_filter_verbatim() {
    let catalog = Catalog::from_items(vec![item("P1", " #FF0000 "), item("P2", "#00FF00")]);
    let mut selections = FacetSelections::new();
    selections.insert("style".into(), vec!["Modern".into()]);
    selections.insert(COLOR_FIELD.into(), vec!["#00FF00".into()]);
    let pick = ColorPick::new("#FF0000", 0.0);
    let filter = build_filter_with_color(&selections, Some(&pick), &catalog, ColorFallback::Disable).expect("filter");

    assert_eq!(filter.condition(COLOR_FIELD).map(|c| &c.matcher), Some(&Match::Value(" #FF0000 ".into())));
    let p1 = &catalog.items()[0];
    assert!(filter.matches(|field| p1.field(field)));
    assert_eq!(filter.must.iter().map(|c| c.key.as_str()).collect::<Vec<_>>(), [COLOR_FIELD, "style"]);
}

#[test]
fn empty_proximity_match_disables_color_by_default() {
    let catalog = sample_catalog();
    let pick = ColorPick::new("#0000FF", 5.0);
    let mut selections = FacetSelections::new();
    selections.insert("style".into(), vec!["Modern".into()]);
    let filter = build_filter_with_color(&selections, Some(&pick), &catalog, ColorFallback::Disable).expect("filter");
    assert!(filter.condition(COLOR_FIELD).is_none());
    assert!(filter.condition("style").is_some());
}

#[test]
fn empty_proximity_match_can_reject_everything() {
    let catalog = sample_catalog();
    let pick = ColorPick::new("#0000FF", 5.0);
    let filter = build_filter_with_color(&FacetSelections::new(), Some(&pick), &catalog, ColorFallback::MatchNothing).expect("filter");
    assert_eq!(filter.condition(COLOR_FIELD).map(|c| &c.matcher), Some(&Match::Any(vec![])));
}

fn rgb() -> impl Strategy<Value = Rgb> { (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb(r, g, b)) }

proptest! {
    #[test]
    fn distance_is_a_symmetric_non_negative_measure(a in rgb(), b in rgb()) {
        prop_assert!(a.distance(b) >= 0.0);
        prop_assert_eq!(a.distance(a), 0.0);
        prop_assert_eq!(a.distance(b), b.distance(a));
        prop_assert!(a.distance(b) <= MAX_DISTANCE + 1e-9);
    }

    #[test]
    fn hex_round_trips_through_parse(a in rgb()) {
        let hex = format!("#{:02X}{:02x}{:02X}", a.0, a.1, a.2);
        prop_assert_eq!(Rgb::parse(&hex).unwrap(), a);
    }
}
