//! Facet predicate construction.
//!
//! UI selections arrive as `field -> [values]`, possibly containing the
//! [`ANY`] sentinel. They are turned into a [`Filter`]: one condition per
//! field with at least one concrete value, all conditions ANDed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel option meaning "no constraint on this field".
pub const ANY: &str = "Any";

pub const COLOR_FIELD: &str = "dominant_color_hex";

/// Facet fields offered for filtering, with their display labels.
pub const FACET_FIELDS: [(&str, &str); 7] = [
    ("style", "Style"),
    ("category", "Category"),
    ("class", "Class"),
    ("occasion", "Occasion"),
    ("orientation", "Orientation"),
    (COLOR_FIELD, "Color"),
    ("country_of_origin", "Country of Origin"),
];

/// Raw selections keyed by facet field.
pub type FacetSelections = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Match {
    /// Stored value equals this value.
    Value(String),
    /// Stored value is a member of this set. An empty set matches nothing.
    Any(Vec<String>),
}

impl Match {
    pub fn accepts(&self, stored: &str) -> bool {
        match self {
            Match::Value(v) => v == stored,
            Match::Any(vs) => vs.iter().any(|v| v == stored),
        }
    }

    pub fn values(&self) -> &[String] {
        match self {
            Match::Value(v) => std::slice::from_ref(v),
            Match::Any(vs) => vs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldCondition {
    pub key: String,
    #[serde(rename = "match")]
    pub matcher: Match,
}

/// Conjunction of field conditions. No conditions means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub must: Vec<FieldCondition>,
}

impl Filter {
    pub fn unrestricted() -> Self { Self::default() }

    pub fn is_unrestricted(&self) -> bool { self.must.is_empty() }

    pub fn condition(&self, key: &str) -> Option<&FieldCondition> { self.must.iter().find(|c| c.key == key) }

    /// Evaluate against a field lookup. Missing fields never match a condition.
    pub fn matches<'a, F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        self.must.iter().all(|c| lookup(&c.key).is_some_and(|stored| c.matcher.accepts(stored)))
    }

    /// Add a condition that no stored value can satisfy.
    pub fn reject_all(&mut self, key: &str) {
        self.must.retain(|c| c.key != key);
        self.must.push(FieldCondition { key: key.to_string(), matcher: Match::Any(Vec::new()) });
    }

    /// Human-readable "field: v1, v2" chips.
    pub fn summary(&self) -> String {
        self.must
            .iter()
            .map(|c| format!("{}: {}", c.key, c.matcher.values().join(", ")))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Concrete values of a selection with the sentinel and blanks removed.
pub fn concrete_values(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty() && *v != ANY)
        .map(str::to_string)
        .collect()
}

/// Build the predicate for a set of selections.
///
/// The sentinel is dropped before arity is decided, so `["Any"]` is the same
/// as selecting nothing. A single value becomes an equality condition, more
/// than one a membership condition.
pub fn build_filter(selections: &FacetSelections) -> Filter {
    let must = selections
        .iter()
        .filter_map(|(field, values)| {
            let mut values = concrete_values(values);
            let matcher = match values.len() {
                0 => return None,
                1 => Match::Value(values.remove(0)),
                _ => Match::Any(values),
            };
            Some(FieldCondition { key: field.clone(), matcher })
        })
        .collect();
    Filter { must }
}
