use proptest::prelude::*;

use ris_core::filter::{build_filter, FacetSelections, Filter, Match, ANY};

fn selections(pairs: &[(&str, &[&str])]) -> FacetSelections {
    pairs.iter().map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect())).collect()
}

#[test]
fn single_value_becomes_equality_and_many_become_membership() {
    let filter = build_filter(&selections(&[("style", &["Modern"]), ("category", &["Wall Art", "Prints"])]));
    assert_eq!(filter.condition("style").map(|c| &c.matcher), Some(&Match::Value("Modern".into())));
    assert_eq!(
        filter.condition("category").map(|c| &c.matcher),
        Some(&Match::Any(vec!["Wall Art".into(), "Prints".into()]))
    );
    assert_eq!(filter.must.len(), 2);
}

#[test]
fn sentinel_is_removed_before_arity() {
    let filter = build_filter(&selections(&[("style", &[ANY]), ("class", &[ANY, "Canvas"]), ("occasion", &[])]));
    assert!(filter.condition("style").is_none(), "only the sentinel means no constraint");
    assert!(filter.condition("occasion").is_none());
    assert_eq!(filter.condition("class").map(|c| &c.matcher), Some(&Match::Value("Canvas".into())));
}

#[test]
fn empty_input_is_unrestricted_not_match_nothing() {
    let filter = build_filter(&FacetSelections::new());
    assert!(filter.is_unrestricted());
    assert!(filter.matches(|_| None), "no conditions accept any row");
}

#[test]
fn reject_all_matches_nothing() {
    let mut filter = Filter::unrestricted();
    filter.reject_all("dominant_color_hex");
    assert!(!filter.is_unrestricted());
    assert!(!filter.matches(|_| Some("#FF0000")));
}

#[test]
fn matches_requires_every_condition() {
    let filter = build_filter(&selections(&[("style", &["Modern"]), ("class", &["Canvas", "Print"])]));
    let row = |k: &str| match k {
        "style" => Some("Modern"),
        "class" => Some("Print"),
        _ => None,
    };
    assert!(filter.matches(row));
    let other = |k: &str| match k {
        "style" => Some("Rustic"),
        "class" => Some("Print"),
        _ => None,
    };
    assert!(!filter.matches(other));
    assert!(!filter.matches(|_| None), "missing field fails its condition");
}

#[test]
fn summary_lists_fields_and_values() {
    let filter = build_filter(&selections(&[("category", &["A", "B"]), ("style", &["Modern"])]));
    assert_eq!(filter.summary(), "category: A, B | style: Modern");
}

proptest! {
    #[test]
    fn fields_without_concrete_values_never_appear(
        raw in prop::collection::btree_map(
            "[a-z]{1,8}",
            prop::collection::vec(prop_oneof![Just(ANY.to_string()), Just(String::new()), "[A-Za-z]{1,6}"], 0..4),
            0..6,
        )
    ) {
        let filter = build_filter(&raw);
        for (field, values) in &raw {
            let concrete = values.iter().filter(|v| !v.trim().is_empty() && v.as_str() != ANY).count();
            prop_assert_eq!(filter.condition(field).is_some(), concrete > 0);
        }
        prop_assert!(filter.must.iter().all(|c| !c.matcher.values().is_empty()));
    }
}
