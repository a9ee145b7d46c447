//! Placement editing through the public surface

mod common;

use common::{approx_tol, DxfBuilder};
use floorplan_anchor::error::StoreError;
use floorplan_anchor::placement::{
    meters_per_degree, Confirmation, EditState, InMemoryPlacementStore, PlacementConfig, PlacementStore,
    ScaleOutcome,
};
use floorplan_anchor::render::RenderConfig;
use floorplan_anchor::types::DrawingUnit;
use floorplan_anchor::{
    DecodeCache, FloorPlan, GeoBounds, GeoPoint, GeographicPlacement, ItemId, PlacementError, PlanPayload,
};

/// A 4000 x 3000 mm room
fn room_payload() -> PlanPayload {
    PlanPayload::vector(
        DxfBuilder::new()
            .units(4)
            .entities(|e| {
                e.lwpolyline(
                    "WALLS",
                    &[(0.0, 0.0), (4000.0, 0.0), (4000.0, 3000.0), (0.0, 3000.0)],
                    true,
                );
            })
            .build(),
    )
}

fn attach(cache: &DecodeCache) -> FloorPlan {
    FloorPlan::attach(
        ItemId::from("listing-7"),
        &room_payload(),
        GeoPoint::new(37.9838, 23.7275),
        cache,
        &PlacementConfig::default(),
    )
    .unwrap()
}

/// Rejects every write
struct ReadOnlyStore;

impl PlacementStore for ReadOnlyStore {
    fn save(&mut self, _: &ItemId, _: &GeographicPlacement) -> Result<(), StoreError> {
        Err(StoreError::Rejected("read-only".into()))
    }

    fn load(&self, _: &ItemId) -> Option<GeographicPlacement> {
        None
    }
}

#[test]
fn test_initial_placement_spans_default_width() {
    let cache = DecodeCache::new();
    let plan = attach(&cache);
    let placement = plan.controller().unwrap().placement();

    let (w, h) = placement.bounds.size_meters();
    assert!(approx_tol(w, 100.0, 1e-6));
    assert!(approx_tol(h, 75.0, 1e-6));
    assert_eq!(placement.intrinsic_width, 4000.0);
    assert_eq!(placement.rotation, 0.0);

    let center = placement.bounds.center();
    assert!(approx_tol(center.lat, 37.9838, 1e-12));
    assert!(approx_tol(center.lng, 23.7275, 1e-12));
}

#[test]
fn test_portrait_plan_fixes_height() {
    let placement =
        GeographicPlacement::initial(2.0, 8.0, GeoPoint::new(-33.86, 151.21), &PlacementConfig { default_span_meters: 40.0 })
            .unwrap();
    let (w, h) = placement.bounds.size_meters();
    assert!(approx_tol(w, 10.0, 1e-6));
    assert!(approx_tol(h, 40.0, 1e-6));
}

#[test]
fn test_longitude_degrees_shrink_with_latitude() {
    let (lat_eq, lng_eq) = meters_per_degree(0.0);
    let (lat_60, lng_60) = meters_per_degree(60.0);
    assert!(lat_60 > lat_eq);
    assert!(approx_tol(lng_60 / lng_eq, 0.5, 0.01));
}

#[test]
fn test_known_scale_from_declared_units() {
    let cache = DecodeCache::new();
    let mut plan = attach(&cache);
    let unit = plan.suggested_unit().unwrap();
    assert_eq!(unit, DrawingUnit::Millimeters);

    let controller = plan.controller_mut().unwrap();
    let session = controller.begin_edit().unwrap();
    let outcome = session
        .apply_known_scale(unit.meters_per_unit().unwrap(), Confirmation::Unconfirmed)
        .unwrap();
    assert_eq!(outcome, ScaleOutcome::Applied);

    let mut store = InMemoryPlacementStore::new();
    let committed = *controller.commit(&mut store).unwrap();
    let (w, h) = committed.bounds.size_meters();
    assert!(approx_tol(w, 4.0, 1e-6));
    assert!(approx_tol(h, 3.0, 1e-6));
    assert_eq!(store.load(&ItemId::from("listing-7")), Some(committed));
}

#[test]
fn test_scale_guard_after_manual_edit() {
    let cache = DecodeCache::new();
    let mut plan = attach(&cache);
    let controller = plan.controller_mut().unwrap();
    let session = controller.begin_edit().unwrap();

    let dragged = GeoBounds::new(37.98, 23.72, 37.99, 23.74).unwrap();
    session.set_bounds(dragged);
    assert!(session.is_transformed());

    let outcome = session.apply_known_scale(0.01, Confirmation::Unconfirmed).unwrap();
    assert_eq!(outcome, ScaleOutcome::NeedsConfirmation);
    assert_eq!(session.draft().bounds, dragged);

    session.apply_known_scale(0.01, Confirmation::Confirmed).unwrap();
    let (lat_m, lng_m) = meters_per_degree(dragged.center().lat);
    let bounds = session.draft().bounds;
    assert!(approx_tol(bounds.lng_span(), 4000.0 * 0.01 / lng_m, 1e-12));
    assert!(approx_tol(bounds.lat_span(), 3000.0 * 0.01 / lat_m, 1e-12));
    assert!(approx_tol(bounds.center().lat, dragged.center().lat, 1e-12));
}

#[test]
fn test_edits_hidden_until_commit_and_discard_writes_nothing() {
    let cache = DecodeCache::new();
    let mut plan = attach(&cache);
    let config = RenderConfig::default();
    let committed = plan.render(&config);

    {
        let controller = plan.controller_mut().unwrap();
        let session = controller.begin_edit().unwrap();
        session.rotate_by(90.0);
        session.rotate_by(-45.0);
        session.translate(0.0002, -0.0001).unwrap();
    }
    assert_eq!(plan.render(&config), committed);
    assert_ne!(plan.render_draft(&config).unwrap(), committed);
    assert_eq!(plan.controller().unwrap().draft().unwrap().rotation, 45.0);

    let mut store = InMemoryPlacementStore::new();
    plan.controller_mut().unwrap().discard().unwrap();
    assert!(store.is_empty());
    assert_eq!(plan.render(&config), committed);
    assert_eq!(plan.controller().unwrap().state(), &EditState::Idle);

    // A fresh session starts from the committed placement
    let session = plan.controller_mut().unwrap().begin_edit().unwrap();
    assert_eq!(session.draft().rotation, 0.0);
    plan.controller_mut().unwrap().commit(&mut store).unwrap();
    assert_eq!(store.writes(), 1);
}

#[test]
fn test_store_failure_keeps_session_open() {
    let cache = DecodeCache::new();
    let mut plan = attach(&cache);
    let controller = plan.controller_mut().unwrap();
    controller.begin_edit().unwrap().rotate_by(12.5);

    let err = controller.commit(&mut ReadOnlyStore).unwrap_err();
    assert_eq!(err, PlacementError::Store(StoreError::Rejected("read-only".into())));
    assert!(controller.is_editing());
    assert_eq!(controller.placement().rotation, 0.0);

    let mut store = InMemoryPlacementStore::new();
    assert_eq!(controller.commit(&mut store).unwrap().rotation, 12.5);
}

#[test]
fn test_independent_plans_share_the_decode() {
    let cache = DecodeCache::new();
    let mut first = attach(&cache);
    let second = FloorPlan::attach(
        ItemId::from("listing-8"),
        &room_payload(),
        GeoPoint::new(40.0, 22.0),
        &cache,
        &PlacementConfig::default(),
    )
    .unwrap();
    assert_eq!(cache.len(), 1);
    assert!(std::sync::Arc::ptr_eq(first.document().unwrap(), second.document().unwrap()));

    first.controller_mut().unwrap().begin_edit().unwrap().rotate_by(30.0);
    assert!(second.controller().unwrap().draft().is_none());
}

#[test]
fn test_invalid_bounds_rejected() {
    assert!(matches!(
        GeoBounds::new(40.0, 22.0, 39.0, 23.0),
        Err(PlacementError::InvalidBounds { .. })
    ));
    assert!(GeoBounds::new(40.0, 22.0, 41.0, f64::NAN).is_err());
    assert!(matches!(
        GeographicPlacement::initial(0.0, 1.0, GeoPoint::new(0.0, 0.0), &PlacementConfig::default()),
        Err(PlacementError::InvalidAspect(_))
    ));
}
