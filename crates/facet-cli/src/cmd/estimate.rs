use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use facet_core::catalog::{ResolvedProduct, RingSizeOption};
use facet_core::estimate::{self, EstimateResult};

use crate::output;

#[derive(Debug, Serialize)]
pub struct EstimateOut {
    pub product_id: i64,
    pub estimate: EstimateResult,
    pub carat_display: String,
    pub price_display: i64,
    pub pieces_display: String,
}

/// Offline estimate: product and ring-option JSON come from files, the
/// calculator runs locally.
pub fn run(product_path: &str, ring_path: Option<&str>) -> Result<()> {
    let (product, ring) = load(Path::new(product_path), ring_path.map(Path::new))?;
    let estimate = estimate::compute(&product, ring.as_ref());

    let out = EstimateOut {
        product_id: product.id,
        carat_display: estimate.carat_display(),
        price_display: estimate.price_display(),
        pieces_display: estimate.pieces_display(),
        estimate,
    };
    output::print(&out)?;
    Ok(())
}

fn load(
    product_path: &Path,
    ring_path: Option<&Path>,
) -> Result<(ResolvedProduct, Option<RingSizeOption>)> {
    let raw = fs::read_to_string(product_path)
        .with_context(|| format!("reading {}", product_path.display()))?;
    let product: ResolvedProduct =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", product_path.display()))?;

    let ring = match ring_path {
        None => None,
        Some(path) => {
            let raw =
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            Some(
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing {}", path.display()))?,
            )
        }
    };

    Ok((product, ring))
}
