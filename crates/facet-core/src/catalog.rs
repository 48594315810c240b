//! Catalog data models: navigation records, allowed sets, display options,
//! resolved products, and ring-size options.
//!
//! These are mostly "dumb" data; policy (cascade order, re-pick, gating)
//! lives in `resolver`. Wire decoding tolerant of the storefront's loose JSON
//! lives in `facet-gateway`.

use serde::{Deserialize, Serialize};

use crate::dimension::FilterDimension;
use crate::estimate::AdjustOp;

/// Parse a comma-separated id list from a navigation record.
///
/// Non-numeric and zero entries are discarded rather than reported: a
/// malformed navigation field degrades to an empty (or shorter) allowed set,
/// never a hard error.
pub fn parse_id_csv(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .filter(|id| *id != 0)
        .collect()
}

/// The category-navigation record for one storefront page, already parsed.
///
/// `allowed` and `defaults` are indexed by [`FilterDimension::CATALOG`]
/// position (stone type first, quality last).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigationRecord {
    pub title: String,
    pub allowed: [Vec<i64>; 6],
    pub defaults: [Option<i64>; 6],
}

impl NavigationRecord {
    /// Build from the raw CSV fields and default scalars of a navigation
    /// record, in catalog-dimension order.
    pub fn from_raw(title: impl Into<String>, csvs: [&str; 6], defaults: [Option<i64>; 6]) -> Self {
        Self {
            title: title.into(),
            allowed: csvs.map(parse_id_csv),
            defaults,
        }
    }

    pub fn default_for(&self, dim: FilterDimension) -> Option<i64> {
        dim.is_catalog().then(|| self.defaults[dim.index()]).flatten()
    }
}

/// Server-declared permissible ids per catalog dimension.
///
/// Populated once per session from the navigation record and immutable
/// thereafter. Diamond-size candidates are numeric and resolved by the chain
/// itself, so they live on the session's option lists instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllowedSet {
    lists: [Vec<i64>; 6],
}

impl AllowedSet {
    pub fn from_navigation(nav: &NavigationRecord) -> Self {
        Self {
            lists: nav.allowed.clone(),
        }
    }

    /// Permissible ids for a catalog dimension. Non-catalog dimensions have
    /// no id-based allowed set and return empty.
    pub fn ids(&self, dim: FilterDimension) -> &[i64] {
        if dim.is_catalog() {
            &self.lists[dim.index()]
        } else {
            &[]
        }
    }

    pub fn contains(&self, dim: FilterDimension, id: i64) -> bool {
        self.ids(dim).contains(&id)
    }
}

/// A display entity for one filter dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionRecord {
    pub id: i64,
    pub display_name: String,
    /// Opaque image locator; the engine never interprets it.
    pub image_ref: Option<String>,
    /// Origin/source tag some dimensions carry (e.g. lab-grown vs natural).
    pub origin_tag: Option<String>,
}

/// The single product matching a complete selection through diamond size.
///
/// Replaced wholesale whenever the governing selection changes; `None` at the
/// session level while the selection is incomplete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProduct {
    pub id: i64,
    pub name: String,
    /// Base price before ring-size adjustment.
    pub price: f64,
    /// Base total carat weight before ring-size adjustment.
    pub carat_weight: f64,
    /// Base estimated diamond piece count before ring-size adjustment.
    pub estimated_pieces: f64,
    pub seo_url: Option<String>,
    pub image_ref: Option<String>,
}

/// One ring-size choice for a resolved product, with its symbolic
/// adjustments to the base product metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RingSizeOption {
    pub value_id: i64,
    pub value_name: String,
    /// Applied to piece count (with `estimated_weight`) and price
    /// (with `options_price`).
    pub options_symbol: Option<AdjustOp>,
    pub options_price: Option<f64>,
    /// Applied to carat weight (with `estimated_weight`).
    pub estimated_symbol: Option<AdjustOp>,
    pub estimated_weight: Option<f64>,
}
