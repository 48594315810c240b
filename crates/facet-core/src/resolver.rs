//! The filter-chain resolver: one explicit pipeline instead of reactive
//! per-field effects.
//!
//! A [`Session`] owns all page state (allowed sets, selection, option lists,
//! resolved product, ring options, estimate). Every user action runs the same
//! pass: set the value, clear everything downstream, then re-resolve each
//! downstream dimension strictly in order. Each stage fetches the contextual
//! option list, intersects it with the allowed set, and re-picks
//! deterministically. When the
//! selection is complete through diamond size, the product and its ring
//! options resolve and the estimate recomputes.
//!
//! Fetch failures degrade to empty option sets and are recorded as warnings
//! on the [`ResolveReport`]; they never surface as errors to the caller.
//!
//! A shared generation counter implements last-write-wins by trigger order:
//! each action bumps it, and a pass re-checks it after every await,
//! abandoning its remaining work if a newer action has started. Hosts that
//! race actions from an external event loop can hold a [`Generation`] handle
//! and invalidate in-flight passes directly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{AllowedSet, NavigationRecord, OptionRecord, ResolvedProduct, RingSizeOption};
use crate::dimension::FilterDimension;
use crate::errors::{FacetError, FacetResult};
use crate::estimate::{self, EstimateResult};
use crate::gateway::{CatalogGateway, PricingContext};
use crate::selection::{Selection, SelectionValue};

/// How a resolve pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    /// The pass ran to completion and the session reflects it.
    Settled,
    /// A newer action started while this pass was awaiting a response; its
    /// remaining work was abandoned.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

/// A structured note from a resolve pass, for CLI printing or host logging.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveDiagnostic {
    pub level: DiagnosticLevel,
    pub code: String,
    pub message: String,
}

/// Result of one resolve pass.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveReport {
    pub outcome: Outcome,
    pub diagnostics: Vec<ResolveDiagnostic>,
}

impl ResolveReport {
    fn new() -> Self {
        Self {
            outcome: Outcome::Settled,
            diagnostics: Vec::new(),
        }
    }

    fn push_info(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.diagnostics.push(ResolveDiagnostic {
            level: DiagnosticLevel::Info,
            code: code.into(),
            message: message.into(),
        });
    }

    fn push_warning(&mut self, code: impl Into<String>, message: impl Into<String>) {
        self.diagnostics.push(ResolveDiagnostic {
            level: DiagnosticLevel::Warning,
            code: code.into(),
            message: message.into(),
        });
    }

    pub fn is_superseded(&self) -> bool {
        self.outcome == Outcome::Superseded
    }

    pub fn warnings(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.level, DiagnosticLevel::Warning))
            .count()
    }
}

/// Shared trigger-order counter. Cloneable so hosts can invalidate in-flight
/// passes from outside the session.
#[derive(Debug, Clone, Default)]
pub struct Generation(Arc<AtomicU64>);

impl Generation {
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Start a new trigger; returns its generation number.
    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// Current option lists per dimension, scoped to the upstream selection.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionLists {
    pub stone_types: Vec<OptionRecord>,
    pub designs: Vec<OptionRecord>,
    pub shapes: Vec<OptionRecord>,
    pub setting_styles: Vec<OptionRecord>,
    pub metals: Vec<OptionRecord>,
    pub qualities: Vec<OptionRecord>,
    pub diamond_sizes: Vec<f64>,
    pub ring_sizes: Vec<RingSizeOption>,
}

impl OptionLists {
    /// Display records for a catalog dimension; empty for the numeric and
    /// ring-size dimensions.
    pub fn records(&self, dim: FilterDimension) -> &[OptionRecord] {
        match dim {
            FilterDimension::StoneType => &self.stone_types,
            FilterDimension::Design => &self.designs,
            FilterDimension::Shape => &self.shapes,
            FilterDimension::SettingStyle => &self.setting_styles,
            FilterDimension::Metal => &self.metals,
            FilterDimension::Quality => &self.qualities,
            FilterDimension::DiamondSize | FilterDimension::RingSize => &[],
        }
    }

    fn records_mut(&mut self, dim: FilterDimension) -> &mut Vec<OptionRecord> {
        match dim {
            FilterDimension::StoneType => &mut self.stone_types,
            FilterDimension::Design => &mut self.designs,
            FilterDimension::Shape => &mut self.shapes,
            FilterDimension::SettingStyle => &mut self.setting_styles,
            FilterDimension::Metal => &mut self.metals,
            FilterDimension::Quality => &mut self.qualities,
            FilterDimension::DiamondSize | FilterDimension::RingSize => {
                unreachable!("no id records for {dim}")
            }
        }
    }

    fn clear(&mut self, dim: FilterDimension) {
        match dim {
            FilterDimension::DiamondSize => self.diamond_sizes.clear(),
            FilterDimension::RingSize => self.ring_sizes.clear(),
            _ => self.records_mut(dim).clear(),
        }
    }
}

/// Serializable view of the full session state, for hosts that render or
/// print it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub title: String,
    pub selection: Selection,
    pub options: OptionLists,
    pub product: Option<ResolvedProduct>,
    pub estimate: Option<EstimateResult>,
}

/// One page session: the single owner of all filter-chain state.
pub struct Session<G> {
    gateway: G,
    pricing: PricingContext,
    nav: NavigationRecord,
    allowed: AllowedSet,
    selection: Selection,
    /// Last held values, preferred by re-picks when still valid. Seeded from
    /// the navigation defaults at load.
    sticky: Selection,
    options: OptionLists,
    product: Option<ResolvedProduct>,
    estimate: Option<EstimateResult>,
    generation: Generation,
}

impl<G: CatalogGateway> Session<G> {
    /// Load the navigation record for `slug` and resolve the initial chain.
    ///
    /// Returns an error only if the navigation record itself cannot be
    /// fetched; everything downstream degrades per the fail-safe policy.
    pub async fn initialize(
        gateway: G,
        slug: &str,
        pricing: PricingContext,
    ) -> FacetResult<(Self, ResolveReport)> {
        let nav = gateway.navigation(slug).await?;
        let allowed = AllowedSet::from_navigation(&nav);

        let mut sticky = Selection::default();
        for dim in FilterDimension::CATALOG {
            if let Some(id) = nav.default_for(dim) {
                if allowed.contains(dim, id) {
                    // Navigation default, honored only while declared allowed.
                    let _ = sticky.set(dim, SelectionValue::Id(id));
                }
            }
        }

        let mut session = Self {
            gateway,
            pricing,
            nav,
            allowed,
            selection: Selection::default(),
            sticky,
            options: OptionLists::default(),
            product: None,
            estimate: None,
            generation: Generation::default(),
        };

        let gen = session.generation.bump();
        let mut report = ResolveReport::new();

        session.resolve_stone_types(gen, &mut report).await;
        if session.still_current(gen, &mut report) {
            session.resolve_chain(FilterDimension::Design, gen, &mut report).await;
        }
        if session.still_current(gen, &mut report) {
            session.resolve_product(gen, &mut report).await;
        }
        session.recompute_estimate();

        Ok((session, report))
    }

    /// Apply one user selection and re-resolve everything downstream of it.
    ///
    /// The value must come from the dimension's current option set; anything
    /// else is an `InvalidArgument` error, since accepting it would break the
    /// validity invariant.
    pub async fn select(
        &mut self,
        dim: FilterDimension,
        value: SelectionValue,
    ) -> FacetResult<ResolveReport> {
        self.validate_choice(dim, value)?;

        let mut report = ResolveReport::new();

        if dim == FilterDimension::RingSize {
            // Ring size sits outside the cascade: no downstream, no fetches.
            self.selection.set(dim, value)?;
            self.sticky.set(dim, value)?;
            self.recompute_estimate();
            return Ok(report);
        }

        let gen = self.generation.bump();
        self.sticky = self.selection.clone();
        self.selection.set(dim, value)?;
        self.sticky.set(dim, value)?;
        self.selection.clear_downstream(dim);

        // The prior product, estimate, and ring options are governed by the
        // selection just invalidated. Drop them before the first await so a
        // superseded pass cannot leave them exposed against an incomplete
        // selection.
        self.product = None;
        self.estimate = None;
        self.options.ring_sizes.clear();

        if let Some(next) = dim.next() {
            if next.index() <= FilterDimension::DiamondSize.index() {
                self.resolve_chain(next, gen, &mut report).await;
            }
        }
        if self.still_current(gen, &mut report) {
            self.resolve_product(gen, &mut report).await;
        }
        self.recompute_estimate();

        Ok(report)
    }

    /// A cloneable handle for invalidating in-flight passes externally.
    pub fn generation(&self) -> Generation {
        self.generation.clone()
    }

    pub fn title(&self) -> &str {
        &self.nav.title
    }

    pub fn allowed(&self) -> &AllowedSet {
        &self.allowed
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn options(&self) -> &OptionLists {
        &self.options
    }

    pub fn product(&self) -> Option<&ResolvedProduct> {
        self.product.as_ref()
    }

    pub fn estimate(&self) -> Option<&EstimateResult> {
        self.estimate.as_ref()
    }

    /// The ring-size option matching the current ring-size selection.
    pub fn selected_ring_option(&self) -> Option<&RingSizeOption> {
        let id = self.selection.ring_size?;
        self.options.ring_sizes.iter().find(|o| o.value_id == id)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            title: self.nav.title.clone(),
            selection: self.selection.clone(),
            options: self.options.clone(),
            product: self.product.clone(),
            estimate: self.estimate,
        }
    }

    fn validate_choice(&self, dim: FilterDimension, value: SelectionValue) -> FacetResult<()> {
        match dim {
            FilterDimension::DiamondSize => {
                let v = value.as_size().ok_or_else(|| {
                    FacetError::invalid_argument("diamondSize takes a numeric size")
                })?;
                if !self.options.diamond_sizes.contains(&v) {
                    return Err(FacetError::invalid_argument(format!(
                        "{v} is not in the current diamond-size candidates"
                    )));
                }
            }
            FilterDimension::RingSize => {
                let id = value
                    .as_id()
                    .ok_or_else(|| FacetError::invalid_argument("ringSize takes an id"))?;
                if !self.options.ring_sizes.iter().any(|o| o.value_id == id) {
                    return Err(FacetError::invalid_argument(format!(
                        "ring size {id} is not in the current option set"
                    )));
                }
            }
            _ => {
                let id = value
                    .as_id()
                    .ok_or_else(|| FacetError::invalid_argument(format!("{dim} takes an id")))?;
                if !self.options.records(dim).iter().any(|r| r.id == id) {
                    return Err(FacetError::invalid_argument(format!(
                        "{id} is not in the current {dim} option set"
                    )));
                }
            }
        }
        Ok(())
    }

    fn still_current(&self, gen: u64, report: &mut ResolveReport) -> bool {
        if self.generation.current() == gen {
            return true;
        }
        if report.outcome != Outcome::Superseded {
            report.outcome = Outcome::Superseded;
            report.push_info("resolve.superseded", "a newer action started; pass abandoned");
        }
        false
    }

    /// Initial stone-type list: display records for the allowed ids.
    async fn resolve_stone_types(&mut self, gen: u64, report: &mut ResolveReport) {
        let dim = FilterDimension::StoneType;
        let ids = self.allowed.ids(dim).to_vec();
        if ids.is_empty() {
            report.push_warning("allowed.empty", "navigation record allows no stone types");
            self.options.stone_types.clear();
            self.selection.clear(dim);
            return;
        }

        let list = match self.gateway.records_by_ids(dim, &ids).await {
            Ok(records) => records
                .into_iter()
                .filter(|r| self.allowed.contains(dim, r.id))
                .collect(),
            Err(e) => {
                report.push_warning("fetch.stoneType", format!("stone type lookup failed: {e}"));
                Vec::new()
            }
        };
        if !self.still_current(gen, report) {
            return;
        }

        self.options.stone_types = list;
        let candidates: Vec<i64> = self.options.stone_types.iter().map(|r| r.id).collect();
        let preferred = self.sticky.get(dim).and_then(SelectionValue::as_id);
        self.apply_id_pick(dim, re_pick_id(&candidates, preferred));
    }

    /// Re-resolve every dimension from `start` through diamond size, in order.
    /// Each stage uses the settled output of the previous one.
    async fn resolve_chain(
        &mut self,
        start: FilterDimension,
        gen: u64,
        report: &mut ResolveReport,
    ) {
        let order = FilterDimension::ORDER;
        let stages = &order[start.index()..=FilterDimension::DiamondSize.index()];

        for &dim in stages {
            if !self.selection.upstream_complete(dim) {
                // An upstream gap means this dimension cannot hold anything.
                self.options.clear(dim);
                self.selection.clear(dim);
                continue;
            }

            if dim == FilterDimension::DiamondSize {
                let sizes = match self.gateway.diamond_sizes(&self.selection).await {
                    Ok(sizes) => sizes,
                    Err(e) => {
                        report.push_warning(
                            "fetch.diamondSize",
                            format!("diamond size lookup failed: {e}"),
                        );
                        Vec::new()
                    }
                };
                if !self.still_current(gen, report) {
                    return;
                }
                self.options.diamond_sizes = sizes;
                let preferred = self.sticky.diamond_size;
                let pick = re_pick_size(&self.options.diamond_sizes, preferred);
                self.selection.diamond_size = pick;
            } else {
                let fetched = self.gateway.dimension_options(dim, &self.selection).await;
                if !self.still_current(gen, report) {
                    return;
                }
                let list: Vec<OptionRecord> = match fetched {
                    Ok(records) => records
                        .into_iter()
                        .filter(|r| self.allowed.contains(dim, r.id))
                        .collect(),
                    Err(e) => {
                        report.push_warning(
                            format!("fetch.{dim}"),
                            format!("{dim} lookup failed: {e}"),
                        );
                        Vec::new()
                    }
                };
                *self.options.records_mut(dim) = list;
                let candidates: Vec<i64> =
                    self.options.records(dim).iter().map(|r| r.id).collect();
                let preferred = self.sticky.get(dim).and_then(SelectionValue::as_id);
                self.apply_id_pick(dim, re_pick_id(&candidates, preferred));
            }
        }
    }

    /// Product gating plus ring-option follow-up. Runs with the prior
    /// product already dropped; a stale product must never survive an
    /// incomplete selection.
    async fn resolve_product(&mut self, gen: u64, report: &mut ResolveReport) {
        if !self.selection.is_product_ready() {
            self.product = None;
            self.options.ring_sizes.clear();
            self.selection.ring_size = None;
            return;
        }

        let fetched = self.gateway.product(&self.selection, &self.pricing).await;
        if !self.still_current(gen, report) {
            return;
        }
        self.product = match fetched {
            Ok(Some(p)) => Some(p),
            Ok(None) => {
                report.push_info("product.none", "no product matches the current selection");
                None
            }
            Err(e) => {
                report.push_warning("fetch.product", format!("product lookup failed: {e}"));
                None
            }
        };

        // The ring-option list follows the product identifier.
        match self.product.as_ref().map(|p| p.id) {
            None => {
                self.options.ring_sizes.clear();
                self.selection.ring_size = None;
            }
            Some(id) => {
                let fetched = self.gateway.ring_options(id).await;
                if !self.still_current(gen, report) {
                    return;
                }
                self.options.ring_sizes = match fetched {
                    Ok(list) => list,
                    Err(e) => {
                        report.push_warning(
                            "fetch.ringSize",
                            format!("ring option lookup failed: {e}"),
                        );
                        Vec::new()
                    }
                };
                let candidates: Vec<i64> =
                    self.options.ring_sizes.iter().map(|o| o.value_id).collect();
                let preferred = self.selection.ring_size.or(self.sticky.ring_size);
                self.selection.ring_size = re_pick_id(&candidates, preferred);
            }
        }
    }

    fn apply_id_pick(&mut self, dim: FilterDimension, pick: Option<i64>) {
        match pick {
            Some(id) => {
                // The pick came from the candidate list, so set cannot fail.
                let _ = self.selection.set(dim, SelectionValue::Id(id));
            }
            None => self.selection.clear(dim),
        }
    }

    fn recompute_estimate(&mut self) {
        self.estimate = self
            .product
            .as_ref()
            .map(|p| estimate::compute(p, self.selected_ring_option()));
    }
}

/// Re-pick policy: keep the preferred value if still a candidate, else the
/// first candidate in returned order, else nothing. Deterministic by
/// construction.
fn re_pick_id(candidates: &[i64], preferred: Option<i64>) -> Option<i64> {
    match preferred {
        Some(p) if candidates.contains(&p) => Some(p),
        _ => candidates.first().copied(),
    }
}

fn re_pick_size(candidates: &[f64], preferred: Option<f64>) -> Option<f64> {
    match preferred {
        Some(p) if candidates.contains(&p) => Some(p),
        _ => candidates.first().copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn re_pick_keeps_valid_preferred() {
        assert_eq!(re_pick_id(&[1, 2, 3], Some(2)), Some(2));
        assert_eq!(re_pick_id(&[1, 2, 3], Some(9)), Some(1));
        assert_eq!(re_pick_id(&[1, 2, 3], None), Some(1));
        assert_eq!(re_pick_id(&[], Some(2)), None);
    }

    #[test]
    fn re_pick_size_by_value() {
        assert_eq!(re_pick_size(&[0.5, 1.0, 1.5], Some(1.0)), Some(1.0));
        assert_eq!(re_pick_size(&[0.75, 1.25], Some(1.0)), Some(0.75));
        assert_eq!(re_pick_size(&[], None), None);
    }

    #[test]
    fn generation_bumps_monotonically() {
        let g = Generation::default();
        let a = g.bump();
        let b = g.bump();
        assert!(b > a);
        assert_eq!(g.current(), b);
    }

    proptest! {
        #[test]
        fn re_pick_is_deterministic(candidates in proptest::collection::vec(1i64..100, 0..12), preferred in proptest::option::of(1i64..100)) {
            let a = re_pick_id(&candidates, preferred);
            let b = re_pick_id(&candidates, preferred);
            prop_assert_eq!(a, b);
            if let Some(v) = a {
                prop_assert!(candidates.contains(&v));
            } else {
                prop_assert!(candidates.is_empty());
            }
        }
    }
}
