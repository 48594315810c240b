//! HTTP catalog client implementing `CatalogGateway`.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use facet_core::catalog::{NavigationRecord, OptionRecord, ResolvedProduct, RingSizeOption};
use facet_core::dimension::FilterDimension;
use facet_core::gateway::{CatalogGateway, PricingContext};
use facet_core::selection::Selection;
use facet_core::{FacetError, FacetResult};

use crate::wire::{NavigationWire, OptionWire, ProductWire, RingOptionWire, SizeWire};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only client for the storefront catalog endpoints.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base: Url,
    http: reqwest::Client,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> FacetResult<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| FacetError::invalid_argument(format!("invalid base url: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FacetError::gateway(format!("http client: {e}")))?;
        Ok(Self { base, http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base.as_str().trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> FacetResult<T> {
        let url = self.endpoint(path);
        debug!(%url, params = query.len(), "catalog fetch");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| FacetError::gateway(format!("GET {path}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FacetError::gateway(format!("GET {path}: status {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FacetError::malformed(format!("GET {path}: {e}")))
    }

    /// Path segment for a catalog dimension's `byids` lookup.
    fn byids_segment(dim: FilterDimension) -> Option<&'static str> {
        match dim {
            FilterDimension::StoneType => Some("stone-types"),
            FilterDimension::Design => Some("designs"),
            FilterDimension::Shape => Some("shapesnew"),
            FilterDimension::SettingStyle => Some("setting-styles"),
            FilterDimension::Metal => Some("metals"),
            FilterDimension::Quality => Some("qualities"),
            FilterDimension::DiamondSize | FilterDimension::RingSize => None,
        }
    }

    /// Path segment for a dimension's contextual option list.
    fn options_segment(dim: FilterDimension) -> Option<&'static str> {
        match dim {
            FilterDimension::Design => Some("designs"),
            FilterDimension::Shape => Some("shapesnew"),
            FilterDimension::SettingStyle => Some("setting-styles"),
            FilterDimension::Metal => Some("metals"),
            FilterDimension::Quality => Some("qualities"),
            _ => None,
        }
    }

    /// Query parameters for the upstream values strictly before `until`.
    fn upstream_query(selection: &Selection, until: FilterDimension) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        let pairs: [(FilterDimension, &'static str, Option<i64>); 6] = [
            (FilterDimension::StoneType, "stone_type", selection.stone_type),
            (FilterDimension::Design, "design", selection.design),
            (FilterDimension::Shape, "shape", selection.shape),
            (
                FilterDimension::SettingStyle,
                "setting_style",
                selection.setting_style,
            ),
            (FilterDimension::Metal, "metal", selection.metal),
            (FilterDimension::Quality, "quality", selection.quality),
        ];
        for (dim, key, value) in pairs {
            if dim.index() >= until.index() {
                break;
            }
            if let Some(v) = value {
                params.push((key, v.to_string()));
            }
        }
        params
    }
}

#[async_trait]
impl CatalogGateway for CatalogClient {
    async fn navigation(&self, slug: &str) -> FacetResult<NavigationRecord> {
        let wire: NavigationWire = self.get_json(&format!("catnav/{slug}"), &[]).await?;
        Ok(wire.into_record())
    }

    async fn records_by_ids(
        &self,
        dimension: FilterDimension,
        ids: &[i64],
    ) -> FacetResult<Vec<OptionRecord>> {
        let Some(segment) = Self::byids_segment(dimension) else {
            return Err(FacetError::invalid_argument(format!(
                "{dimension} has no byids endpoint"
            )));
        };
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let csv = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let path = format!("{segment}/byids/{csv}");
        let wires: Vec<OptionWire> = self.get_json(&path, &[]).await?;
        Ok(wires.into_iter().filter_map(OptionWire::into_record).collect())
    }

    async fn dimension_options(
        &self,
        dimension: FilterDimension,
        upstream: &Selection,
    ) -> FacetResult<Vec<OptionRecord>> {
        let Some(segment) = Self::options_segment(dimension) else {
            return Err(FacetError::invalid_argument(format!(
                "{dimension} has no contextual option endpoint"
            )));
        };
        let query = Self::upstream_query(upstream, dimension);
        let wires: Vec<OptionWire> = self.get_json(segment, &query).await?;
        Ok(wires.into_iter().filter_map(OptionWire::into_record).collect())
    }

    async fn diamond_sizes(&self, upstream: &Selection) -> FacetResult<Vec<f64>> {
        let query = Self::upstream_query(upstream, FilterDimension::DiamondSize);
        let wires: Vec<SizeWire> = self.get_json("diamond-sizesnew", &query).await?;
        Ok(wires.into_iter().filter_map(SizeWire::normalize).collect())
    }

    async fn product(
        &self,
        selection: &Selection,
        pricing: &PricingContext,
    ) -> FacetResult<Option<ResolvedProduct>> {
        let mut query = Self::upstream_query(selection, FilterDimension::DiamondSize);
        if let Some(size) = selection.diamond_size {
            query.push(("size", size.to_string()));
        }
        let extras: Vec<(&str, String)> = pricing
            .extras
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .collect();
        query.extend(extras);

        let url = self.endpoint("productnew");
        debug!(%url, "product fetch");
        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| FacetError::gateway(format!("GET productnew: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            // No product for this combination: an expected outcome.
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FacetError::gateway(format!("GET productnew: status {status}")));
        }

        let wire: Option<ProductWire> = response
            .json()
            .await
            .map_err(|e| FacetError::malformed(format!("GET productnew: {e}")))?;
        Ok(wire.and_then(ProductWire::into_product))
    }

    async fn ring_options(&self, product_id: i64) -> FacetResult<Vec<RingSizeOption>> {
        let path = format!("product-options/{product_id}");
        let wires: Vec<RingOptionWire> = self.get_json(&path, &[]).await?;
        Ok(wires.into_iter().filter_map(RingOptionWire::into_option).collect())
    }
}
