//! End-to-end resolver scenarios against a scripted in-memory gateway:
//! default picks, cascade invalidation, re-pick determinism, product gating,
//! ring-option follow-up, estimate recompute, fail-safe degradation, and
//! superseded passes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use facet_core::catalog::{NavigationRecord, OptionRecord, ResolvedProduct, RingSizeOption};
use facet_core::dimension::FilterDimension;
use facet_core::estimate::AdjustOp;
use facet_core::gateway::{CatalogGateway, PricingContext};
use facet_core::resolver::{Generation, Session};
use facet_core::selection::{Selection, SelectionValue};
use facet_core::{FacetError, FacetResult};

fn opt(id: i64, name: &str) -> OptionRecord {
    OptionRecord {
        id,
        display_name: name.to_string(),
        image_ref: None,
        origin_tag: None,
    }
}

fn ring(value_id: i64, name: &str) -> RingSizeOption {
    RingSizeOption {
        value_id,
        value_name: name.to_string(),
        options_symbol: None,
        options_price: None,
        estimated_symbol: None,
        estimated_weight: None,
    }
}

fn product(id: i64) -> ResolvedProduct {
    ResolvedProduct {
        id,
        name: "eternity band".to_string(),
        price: 1000.0,
        carat_weight: 1.5,
        estimated_pieces: 2.0,
        seo_url: Some("eternity-band".to_string()),
        image_ref: None,
    }
}

#[derive(Default)]
struct MockGateway {
    nav: Mutex<NavigationRecord>,
    options: Mutex<HashMap<FilterDimension, Vec<OptionRecord>>>,
    /// Optional stone-type-dependent design lists; overrides `options` for
    /// the design dimension when the stone type has an entry.
    design_by_stone: Mutex<HashMap<i64, Vec<OptionRecord>>>,
    sizes: Mutex<Vec<f64>>,
    product: Mutex<Option<ResolvedProduct>>,
    rings: Mutex<Vec<RingSizeOption>>,
    fail: Mutex<Vec<FilterDimension>>,
    /// Bump this generation the next time the given dimension is fetched,
    /// simulating a newer user action arriving mid-flight.
    bump_on: Mutex<Option<(FilterDimension, Generation)>>,
    calls: Mutex<Vec<String>>,
}

impl MockGateway {
    fn log(&self, entry: impl Into<String>) {
        self.calls.lock().unwrap().push(entry.into());
    }

    fn calls_named(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn maybe_bump(&self, dim: FilterDimension) {
        let mut slot = self.bump_on.lock().unwrap();
        if let Some((target, generation)) = slot.as_ref() {
            if *target == dim {
                generation.bump();
                *slot = None;
            }
        }
    }
}

#[async_trait]
impl CatalogGateway for MockGateway {
    async fn navigation(&self, slug: &str) -> FacetResult<NavigationRecord> {
        self.log(format!("nav:{slug}"));
        Ok(self.nav.lock().unwrap().clone())
    }

    async fn records_by_ids(
        &self,
        dimension: FilterDimension,
        ids: &[i64],
    ) -> FacetResult<Vec<OptionRecord>> {
        self.log(format!("byids:{dimension}:{ids:?}"));
        if self.fail.lock().unwrap().contains(&dimension) {
            return Err(FacetError::gateway("scripted failure"));
        }
        let all = self.options.lock().unwrap();
        Ok(all
            .get(&dimension)
            .map(|list| {
                list.iter()
                    .filter(|r| ids.contains(&r.id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn dimension_options(
        &self,
        dimension: FilterDimension,
        upstream: &Selection,
    ) -> FacetResult<Vec<OptionRecord>> {
        self.log(format!(
            "options:{dimension}:stone={:?}",
            upstream.stone_type
        ));
        self.maybe_bump(dimension);
        if self.fail.lock().unwrap().contains(&dimension) {
            return Err(FacetError::gateway("scripted failure"));
        }
        if dimension == FilterDimension::Design {
            if let Some(stone) = upstream.stone_type {
                if let Some(list) = self.design_by_stone.lock().unwrap().get(&stone) {
                    return Ok(list.clone());
                }
            }
        }
        Ok(self
            .options
            .lock()
            .unwrap()
            .get(&dimension)
            .cloned()
            .unwrap_or_default())
    }

    async fn diamond_sizes(&self, _upstream: &Selection) -> FacetResult<Vec<f64>> {
        self.log("sizes");
        Ok(self.sizes.lock().unwrap().clone())
    }

    async fn product(
        &self,
        selection: &Selection,
        _pricing: &PricingContext,
    ) -> FacetResult<Option<ResolvedProduct>> {
        assert!(
            selection.is_product_ready(),
            "product query fired on an incomplete selection"
        );
        self.log("product");
        Ok(self.product.lock().unwrap().clone())
    }

    async fn ring_options(&self, product_id: i64) -> FacetResult<Vec<RingSizeOption>> {
        self.log(format!("rings:{product_id}"));
        Ok(self.rings.lock().unwrap().clone())
    }
}

/// A fully stocked catalog: two stone types (default 2), and one level of
/// options per downstream dimension.
fn stocked() -> Arc<MockGateway> {
    let gw = MockGateway::default();
    *gw.nav.lock().unwrap() = NavigationRecord::from_raw(
        "Diamond Bands",
        ["1,2", "10,11", "20,21", "30", "40,41", "50"],
        [Some(2), None, None, None, None, None],
    );
    let mut options = HashMap::new();
    options.insert(
        FilterDimension::StoneType,
        vec![opt(1, "lab grown"), opt(2, "natural")],
    );
    options.insert(
        FilterDimension::Design,
        vec![opt(10, "classic"), opt(11, "pave")],
    );
    options.insert(FilterDimension::Shape, vec![opt(20, "round"), opt(21, "princess")]);
    options.insert(FilterDimension::SettingStyle, vec![opt(30, "prong")]);
    options.insert(FilterDimension::Metal, vec![opt(40, "14k white"), opt(41, "14k yellow")]);
    options.insert(FilterDimension::Quality, vec![opt(50, "VS1")]);
    *gw.options.lock().unwrap() = options;
    *gw.sizes.lock().unwrap() = vec![0.5, 1.0, 1.5];
    *gw.product.lock().unwrap() = Some(product(500));
    *gw.rings.lock().unwrap() = vec![ring(6, "6"), ring(7, "7"), ring(8, "8")];
    Arc::new(gw)
}

#[tokio::test]
async fn initial_load_prefers_allowed_navigation_default() {
    let gw = stocked();
    let (session, report) = Session::initialize(gw.clone(), "bands", PricingContext::default())
        .await
        .unwrap();

    assert!(!report.is_superseded());
    // AllowedSet.stoneType = [1,2], declared default 2.
    assert_eq!(session.selection().stone_type, Some(2));
    // Everything downstream re-picked first-in-list.
    assert_eq!(session.selection().design, Some(10));
    assert_eq!(session.selection().shape, Some(20));
    assert_eq!(session.selection().setting_style, Some(30));
    assert_eq!(session.selection().metal, Some(40));
    assert_eq!(session.selection().quality, Some(50));
    assert_eq!(session.selection().diamond_size, Some(0.5));
    assert_eq!(session.product().map(|p| p.id), Some(500));
    assert_eq!(session.selection().ring_size, Some(6));
    assert!(session.estimate().is_some());
}

#[tokio::test]
async fn navigation_default_outside_allowed_set_falls_back_to_first() {
    let gw = stocked();
    gw.nav.lock().unwrap().defaults[0] = Some(9); // not in [1,2]
    let (session, _) = Session::initialize(gw, "bands", PricingContext::default())
        .await
        .unwrap();
    assert_eq!(session.selection().stone_type, Some(1));
}

#[tokio::test]
async fn upstream_change_clears_downstream_then_reresolves_with_new_value() {
    let gw = stocked();
    // Designs depend on the stone type: stone 1 carries a different list.
    gw.design_by_stone
        .lock()
        .unwrap()
        .insert(1, vec![opt(11, "pave")]);

    let (mut session, _) = Session::initialize(gw.clone(), "bands", PricingContext::default())
        .await
        .unwrap();
    assert_eq!(session.selection().design, Some(10));

    let report = session
        .select(FilterDimension::StoneType, SelectionValue::Id(1))
        .await
        .unwrap();
    assert!(!report.is_superseded());

    // Design re-fetch ran against the settled stone type 1 and the whole
    // chain re-picked from the new lists.
    let calls = gw.calls.lock().unwrap().clone();
    assert!(calls.contains(&"options:design:stone=Some(1)".to_string()));
    assert_eq!(session.selection().stone_type, Some(1));
    assert_eq!(session.selection().design, Some(11));
    assert!(session.selection().is_product_ready());
}

#[tokio::test]
async fn empty_downstream_list_clears_chain_and_gates_product() {
    let gw = stocked();
    gw.design_by_stone.lock().unwrap().insert(1, Vec::new());

    let (mut session, _) = Session::initialize(gw.clone(), "bands", PricingContext::default())
        .await
        .unwrap();
    assert!(session.product().is_some());
    let product_calls_before = gw.calls_named("product");

    session
        .select(FilterDimension::StoneType, SelectionValue::Id(1))
        .await
        .unwrap();

    // No design can be picked, so everything after stone type is null and
    // the product query never fired again.
    assert_eq!(session.selection().design, None);
    assert_eq!(session.selection().shape, None);
    assert_eq!(session.selection().diamond_size, None);
    assert_eq!(session.selection().ring_size, None);
    assert!(session.product().is_none());
    assert!(session.estimate().is_none());
    assert!(session.options().ring_sizes.is_empty());
    assert_eq!(gw.calls_named("product"), product_calls_before);
}

#[tokio::test]
async fn diamond_size_kept_when_still_offered_and_repicked_when_not() {
    let gw = stocked();
    let (mut session, _) = Session::initialize(gw.clone(), "bands", PricingContext::default())
        .await
        .unwrap();

    session
        .select(FilterDimension::DiamondSize, SelectionValue::Size(1.0))
        .await
        .unwrap();
    assert_eq!(session.selection().diamond_size, Some(1.0));

    // Same candidates after an upstream change: 1.0 survives the re-pick.
    session
        .select(FilterDimension::Metal, SelectionValue::Id(41))
        .await
        .unwrap();
    assert_eq!(session.selection().diamond_size, Some(1.0));

    // Candidates change under it: first of the new list wins.
    *gw.sizes.lock().unwrap() = vec![0.75, 1.25];
    session
        .select(FilterDimension::Metal, SelectionValue::Id(40))
        .await
        .unwrap();
    assert_eq!(session.selection().diamond_size, Some(0.75));
}

#[tokio::test]
async fn ring_selection_survives_upstream_change_when_product_is_unchanged() {
    let gw = stocked();
    let (mut session, _) = Session::initialize(gw.clone(), "bands", PricingContext::default())
        .await
        .unwrap();

    session
        .select(FilterDimension::RingSize, SelectionValue::Id(7))
        .await
        .unwrap();
    assert_eq!(session.selection().ring_size, Some(7));

    session
        .select(FilterDimension::Metal, SelectionValue::Id(41))
        .await
        .unwrap();

    // The list was re-fetched for the re-resolved product and value 7
    // re-picked from it.
    assert_eq!(session.product().map(|p| p.id), Some(500));
    assert_eq!(session.selection().ring_size, Some(7));
}

#[tokio::test]
async fn ring_options_follow_a_product_identity_change() {
    let gw = stocked();
    let (mut session, _) = Session::initialize(gw.clone(), "bands", PricingContext::default())
        .await
        .unwrap();
    assert_eq!(session.product().map(|p| p.id), Some(500));

    *gw.product.lock().unwrap() = Some(product(501));
    *gw.rings.lock().unwrap() = vec![ring(9, "9")];
    session
        .select(FilterDimension::Metal, SelectionValue::Id(41))
        .await
        .unwrap();

    assert_eq!(session.product().map(|p| p.id), Some(501));
    assert_eq!(session.selection().ring_size, Some(9));
}

#[tokio::test]
async fn estimate_recomputes_with_ring_adjustments() {
    let gw = stocked();
    *gw.rings.lock().unwrap() = vec![
        ring(6, "6"),
        RingSizeOption {
            value_id: 7,
            value_name: "7".to_string(),
            options_symbol: Some(AdjustOp::Add),
            options_price: Some(100.0),
            estimated_symbol: Some(AdjustOp::Sub),
            estimated_weight: Some(0.1),
        },
    ];
    let (mut session, _) = Session::initialize(gw, "bands", PricingContext::default())
        .await
        .unwrap();

    // Base product: price 1000, carat 1.5, pieces 2. Ring 6 carries no
    // adjustments.
    let base = *session.estimate().unwrap();
    assert_eq!(base.price, 1000.0);

    session
        .select(FilterDimension::RingSize, SelectionValue::Id(7))
        .await
        .unwrap();
    let adjusted = *session.estimate().unwrap();
    assert!((adjusted.price - 1100.0).abs() < 1e-9);
    assert!((adjusted.carat_weight - 1.4).abs() < 1e-9);
    assert!((adjusted.diamond_pieces - 2.1).abs() < 1e-9);
}

#[tokio::test]
async fn fetch_failure_degrades_to_empty_with_a_warning() {
    let gw = stocked();
    gw.fail.lock().unwrap().push(FilterDimension::Shape);

    let (session, report) = Session::initialize(gw, "bands", PricingContext::default())
        .await
        .unwrap();

    assert!(report.warnings() >= 1);
    assert!(session.options().shapes.is_empty());
    assert_eq!(session.selection().shape, None);
    assert_eq!(session.selection().metal, None);
    assert!(session.product().is_none());
}

#[tokio::test]
async fn selecting_a_value_outside_the_option_set_is_rejected() {
    let gw = stocked();
    let (mut session, _) = Session::initialize(gw, "bands", PricingContext::default())
        .await
        .unwrap();

    let err = session
        .select(FilterDimension::Design, SelectionValue::Id(999))
        .await
        .unwrap_err();
    assert!(matches!(err, FacetError::InvalidArgument(_)));

    let err = session
        .select(FilterDimension::DiamondSize, SelectionValue::Size(9.9))
        .await
        .unwrap_err();
    assert!(matches!(err, FacetError::InvalidArgument(_)));
}

#[tokio::test]
async fn in_flight_pass_is_abandoned_when_a_newer_action_starts() {
    let gw = stocked();
    let (mut session, _) = Session::initialize(gw.clone(), "bands", PricingContext::default())
        .await
        .unwrap();

    // Simulate a newer trigger arriving while the design response for this
    // pass is still in flight.
    *gw.bump_on.lock().unwrap() = Some((FilterDimension::Design, session.generation()));

    let report = session
        .select(FilterDimension::StoneType, SelectionValue::Id(1))
        .await
        .unwrap();

    assert!(report.is_superseded());
    // The stale design response was not applied: the dimension stays cleared
    // for the superseding action to resolve.
    assert_eq!(session.selection().design, None);
}

#[tokio::test]
async fn superseded_pass_never_exposes_the_prior_product() {
    let gw = stocked();
    let (mut session, _) = Session::initialize(gw.clone(), "bands", PricingContext::default())
        .await
        .unwrap();
    assert_eq!(session.product().map(|p| p.id), Some(500));

    *gw.bump_on.lock().unwrap() = Some((FilterDimension::Design, session.generation()));
    let report = session
        .select(FilterDimension::StoneType, SelectionValue::Id(1))
        .await
        .unwrap();

    // The pass died mid-chain with the selection incomplete; the product
    // resolved for the old selection must not linger.
    assert!(report.is_superseded());
    assert!(!session.selection().is_product_ready());
    assert!(session.product().is_none());
    assert!(session.estimate().is_none());
    assert!(session.options().ring_sizes.is_empty());
    assert_eq!(session.selection().ring_size, None);
}
