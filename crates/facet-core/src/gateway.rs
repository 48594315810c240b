//! The catalog gateway interface and the explicit request contexts.
//!
//! `facet-core` performs no I/O. Hosts implement [`CatalogGateway`] (the HTTP
//! implementation lives in `facet-gateway`; tests use scripted in-memory
//! gateways) and hand it to [`crate::resolver::Session`].
//!
//! Identity and pricing inputs are explicit context objects rather than
//! ambient globals: nothing in the engine reads environment or storage.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::{NavigationRecord, OptionRecord, ResolvedProduct, RingSizeOption};
use crate::dimension::FilterDimension;
use crate::errors::FacetResult;
use crate::selection::Selection;

/// Opaque page-specific pricing/vendor parameters passed through to the
/// product query. The engine never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingContext {
    pub extras: BTreeMap<String, String>,
}

impl PricingContext {
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }
}

/// Caller identity for secondary actions (wishlist/compare/cart/share).
/// Supplied explicitly on every call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContext {
    pub customer_id: Option<i64>,
    pub retailer_id: Option<i64>,
}

/// Read-only catalog lookups the resolver depends on.
///
/// Implementations must preserve server list order: the re-pick policy
/// ("first element of the filtered list") is defined in terms of it.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Fetch the category-navigation record for a page slug.
    async fn navigation(&self, slug: &str) -> FacetResult<NavigationRecord>;

    /// Fetch display records for the given ids of one catalog dimension.
    async fn records_by_ids(
        &self,
        dimension: FilterDimension,
        ids: &[i64],
    ) -> FacetResult<Vec<OptionRecord>>;

    /// Fetch the option list for a catalog dimension valid under the current
    /// upstream selection. Only the dimensions upstream of `dimension` are
    /// meaningful in `upstream`.
    async fn dimension_options(
        &self,
        dimension: FilterDimension,
        upstream: &Selection,
    ) -> FacetResult<Vec<OptionRecord>>;

    /// Fetch numeric diamond-size candidates for a complete six-dimension
    /// upstream selection.
    async fn diamond_sizes(&self, upstream: &Selection) -> FacetResult<Vec<f64>>;

    /// Resolve the single product for a complete selection through diamond
    /// size. `None` when no product matches (an expected outcome, not a
    /// fault).
    async fn product(
        &self,
        selection: &Selection,
        pricing: &PricingContext,
    ) -> FacetResult<Option<ResolvedProduct>>;

    /// Fetch ring-size options for a resolved product.
    async fn ring_options(&self, product_id: i64) -> FacetResult<Vec<RingSizeOption>>;
}

/// Sessions can share one gateway behind an `Arc`.
#[async_trait]
impl<G: CatalogGateway + ?Sized> CatalogGateway for Arc<G> {
    async fn navigation(&self, slug: &str) -> FacetResult<NavigationRecord> {
        (**self).navigation(slug).await
    }

    async fn records_by_ids(
        &self,
        dimension: FilterDimension,
        ids: &[i64],
    ) -> FacetResult<Vec<OptionRecord>> {
        (**self).records_by_ids(dimension, ids).await
    }

    async fn dimension_options(
        &self,
        dimension: FilterDimension,
        upstream: &Selection,
    ) -> FacetResult<Vec<OptionRecord>> {
        (**self).dimension_options(dimension, upstream).await
    }

    async fn diamond_sizes(&self, upstream: &Selection) -> FacetResult<Vec<f64>> {
        (**self).diamond_sizes(upstream).await
    }

    async fn product(
        &self,
        selection: &Selection,
        pricing: &PricingContext,
    ) -> FacetResult<Option<ResolvedProduct>> {
        (**self).product(selection, pricing).await
    }

    async fn ring_options(&self, product_id: i64) -> FacetResult<Vec<RingSizeOption>> {
        (**self).ring_options(product_id).await
    }
}
