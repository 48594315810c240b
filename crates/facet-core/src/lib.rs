//! facet-core
//!
//! Core engine for the facet jewelry configurator:
//! - filter dimensions with a fixed resolution order
//! - allowed-set registry parsed from category navigation records
//! - the dependent filter-chain resolver (cascade invalidation + re-pick)
//! - product and ring-option resolution gating
//! - the pure estimate calculator (symbolic price/weight adjustments)
//!
//! This crate performs no network or filesystem I/O. All catalog lookups go
//! through the [`gateway::CatalogGateway`] trait; hosts (CLI, services, UIs)
//! provide implementations and drive [`resolver::Session`].

pub mod catalog;
pub mod dimension;
pub mod errors;
pub mod estimate;
pub mod gateway;
pub mod resolver;
pub mod selection;

pub use crate::errors::{FacetError, FacetResult};

/// Convenience re-exports.
pub mod prelude {
    pub use crate::catalog::{AllowedSet, NavigationRecord, OptionRecord, ResolvedProduct, RingSizeOption};
    pub use crate::dimension::FilterDimension;
    pub use crate::estimate::{AdjustOp, EstimateResult};
    pub use crate::gateway::{CatalogGateway, ClientContext, PricingContext};
    pub use crate::resolver::{Outcome, ResolveReport, Session};
    pub use crate::selection::{Selection, SelectionValue};
    pub use crate::{FacetError, FacetResult};
}
