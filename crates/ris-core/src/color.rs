//! Color proximity matching over the catalog's dominant colors.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::filter::{build_filter, FacetSelections, FieldCondition, Filter, Match, COLOR_FIELD};
use crate::traits::CatalogStore;
use crate::{Error, Result};

/// Largest possible RGB distance, `sqrt(3 * 255^2)`.
pub const MAX_DISTANCE: f64 = 441.672_955_930_063_7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `RRGGBB`, with or without a leading `#`.
    pub fn parse(hex: &str) -> Result<Self> {
        let h = hex.trim();
        let h = h.strip_prefix('#').unwrap_or(h);
        if h.len() != 6 || !h.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidQuery(format!("malformed color '{hex}', expected 6 hex digits")));
        }
        let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).map_err(|e| Error::InvalidQuery(format!("malformed color '{hex}': {e}")));
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Euclidean distance in RGB space.
    pub fn distance(self, other: Rgb) -> f64 {
        let d = |a: u8, b: u8| f64::from(a) - f64::from(b);
        (d(self.0, other.0).powi(2) + d(self.1, other.1).powi(2) + d(self.2, other.2).powi(2)).sqrt()
    }
}

impl FromStr for Rgb {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

/// Behaviour when no catalog color lies within tolerance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorFallback {
    /// Drop the color constraint entirely.
    #[default]
    Disable,
    /// Keep a color constraint that nothing satisfies.
    MatchNothing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPick {
    pub hex: String,
    pub tolerance: f64,
}

impl ColorPick {
    pub fn new(hex: impl Into<String>, tolerance: f64) -> Self { Self { hex: hex.into(), tolerance } }

    fn validate(&self) -> Result<Rgb> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(Error::InvalidQuery(format!("color tolerance must be a non-negative number, got {}", self.tolerance)));
        }
        Rgb::parse(&self.hex)
    }
}

/// Distinct catalog colors within `pick.tolerance` of `pick.hex`, sorted.
///
/// Catalog colors that do not parse are skipped.
pub fn matching_colors(catalog: &dyn CatalogStore, pick: &ColorPick) -> Result<Vec<String>> {
    let target = pick.validate()?;
    let mut matched = Vec::new();
    for value in catalog.distinct_values(COLOR_FIELD) {
        match Rgb::parse(&value) {
            Ok(rgb) if rgb.distance(target) <= pick.tolerance => matched.push(value),
            Ok(_) => {}
            Err(_) => tracing::warn!(color = %value, "skipping unparseable catalog color"),
        }
    }
    tracing::debug!(picked = %pick.hex, tolerance = pick.tolerance, matched = matched.len(), "color proximity");
    Ok(matched)
}

/// Build the facet predicate, folding an optional color pick into the color field.
///
/// A pick with matches replaces any selection already made for the color
/// field. A pick without matches follows `fallback`.
pub fn build_filter_with_color(
    selections: &FacetSelections,
    pick: Option<&ColorPick>,
    catalog: &dyn CatalogStore,
    fallback: ColorFallback,
) -> Result<Filter> {
    let Some(pick) = pick else { return Ok(build_filter(selections)) };
    let mut matched = matching_colors(catalog, pick)?;
    let mut selections = selections.clone();
    selections.remove(COLOR_FIELD);
    let mut filter = build_filter(&selections);
    if matched.is_empty() {
        if fallback == ColorFallback::MatchNothing {
            filter.reject_all(COLOR_FIELD);
        }
        return Ok(filter);
    }
    // Matched values are stored catalog strings and must reach the index verbatim.
    let matcher = if matched.len() == 1 { Match::Value(matched.remove(0)) } else { Match::Any(matched) };
    filter.must.push(FieldCondition { key: COLOR_FIELD.to_string(), matcher });
    filter.must.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(filter)
}
