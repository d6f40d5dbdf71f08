// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route planner tests: leg layers, shared polyline, marker rebuild policy.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use bikertown_planner::models::{
    Place, RouteLeg, RoutePlan, SearchOutcome, SelectedResult, WaypointList,
};
use bikertown_planner::route_sync::RoutePlanner;
use bikertown_planner::scene::{MarkerKind, ROUTE_LEG_COLORS};
use bikertown_planner::services::RouteCalculator;
use common::{place, MockRouteCalculator};

const CENTER: [f64; 2] = [106.701755, 10.776652];

fn resolved_list(places: &[Place]) -> WaypointList {
    WaypointList::initialize(places.iter().cloned().map(Some).collect())
}

fn two_leg_plan() -> RoutePlan {
    RoutePlan {
        legs: vec![
            RouteLeg {
                line_string: vec![[106.7, 10.8], [107.0, 11.0]],
            },
            RouteLeg {
                line_string: vec![[107.0, 11.0], [108.4, 11.9]],
            },
        ],
    }
}

#[tokio::test]
async fn test_compute_route_draws_layers_and_shares_coords() {
    let routes = Arc::new(MockRouteCalculator::new());
    routes.set_plan(two_leg_plan());
    let mut planner = RoutePlanner::new(Arc::clone(&routes) as Arc<dyn RouteCalculator>, CENTER);

    let waypoints = resolved_list(&[
        place("Saigon", 106.7, 10.8),
        place("Bao Loc", 107.0, 11.0),
        place("Da Lat", 108.4, 11.9),
    ]);
    planner.compute_route(&waypoints).await;

    assert_eq!(routes.calls.load(Ordering::SeqCst), 1);

    let layers = planner.scene().route_layers();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0].id, "route-leg-0");
    assert_eq!(layers[1].id, "route-leg-1");
    assert_eq!(layers[0].color, ROUTE_LEG_COLORS[0]);
    assert_eq!(layers[1].color, ROUTE_LEG_COLORS[1]);

    let coords = planner.route_coords();
    let shared = coords.read().await.clone();
    assert_eq!(
        shared,
        vec![[106.7, 10.8], [107.0, 11.0], [107.0, 11.0], [108.4, 11.9]]
    );
}

#[tokio::test]
async fn test_unresolved_endpoints_skip_the_provider() {
    let routes = Arc::new(MockRouteCalculator::new());
    let mut planner = RoutePlanner::new(Arc::clone(&routes) as Arc<dyn RouteCalculator>, CENTER);

    planner.compute_route(&WaypointList::new()).await;
    assert_eq!(routes.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_provider_failure_clears_layers_and_keeps_going() {
    let routes = Arc::new(MockRouteCalculator::new());
    routes.set_plan(two_leg_plan());
    let mut planner = RoutePlanner::new(Arc::clone(&routes) as Arc<dyn RouteCalculator>, CENTER);

    let waypoints = resolved_list(&[place("Saigon", 106.7, 10.8), place("Da Lat", 108.4, 11.9)]);
    planner.compute_route(&waypoints).await;
    assert_eq!(planner.scene().route_layers().len(), 2);

    routes.set_fail(true);
    planner.compute_route(&waypoints).await;

    // Layers are gone; the rest of the planner stays usable
    assert!(planner.scene().route_layers().is_empty());
}

#[tokio::test]
async fn test_empty_legs_clear_layers_and_polyline() {
    let routes = Arc::new(MockRouteCalculator::new());
    routes.set_plan(two_leg_plan());
    let mut planner = RoutePlanner::new(Arc::clone(&routes) as Arc<dyn RouteCalculator>, CENTER);

    let waypoints = resolved_list(&[place("Saigon", 106.7, 10.8), place("Da Lat", 108.4, 11.9)]);
    planner.compute_route(&waypoints).await;

    routes.set_plan(RoutePlan::default());
    planner.compute_route(&waypoints).await;

    assert!(planner.scene().route_layers().is_empty());
    let coords = planner.route_coords();
    assert!(coords.read().await.is_empty());
}

#[tokio::test]
async fn test_endpoint_markers_are_replaced_not_duplicated() {
    let routes = Arc::new(MockRouteCalculator::new());
    let mut planner = RoutePlanner::new(routes, CENTER);

    let mut waypoints = resolved_list(&[place("Saigon", 106.7, 10.8), place("Da Lat", 108.4, 11.9)]);
    planner.sync_markers(&waypoints);

    let start = planner.scene().start_marker().unwrap().clone();
    assert_eq!(start.kind, MarkerKind::Start);
    assert_eq!(start.coords, [106.7, 10.8]);

    // Endpoint moves: the singleton is swapped out
    waypoints.resolve(1, place("Vung Tau", 107.08, 10.35));
    planner.sync_markers(&waypoints);

    let start = planner.scene().start_marker().unwrap();
    assert_eq!(start.coords, [107.08, 10.35]);
    assert_eq!(start.label, "Vung Tau");

    let destination = planner.scene().destination_marker().unwrap();
    assert_eq!(destination.kind, MarkerKind::Destination);
}

#[tokio::test]
async fn test_stop_markers_follow_remove_all_rebuild_all() {
    let routes = Arc::new(MockRouteCalculator::new());
    let mut planner = RoutePlanner::new(routes, CENTER);

    let mut waypoints = resolved_list(&[
        place("Saigon", 106.7, 10.8),
        place("Bao Loc", 107.8, 11.5),
        place("Di Linh", 108.07, 11.58),
        place("Da Lat", 108.4, 11.9),
    ]);
    planner.sync_markers(&waypoints);
    assert_eq!(planner.scene().stop_markers().len(), 2);

    waypoints.delete(2);
    planner.sync_markers(&waypoints);
    assert_eq!(planner.scene().stop_markers().len(), 1);
    assert_eq!(planner.scene().stop_markers()[0].label, "Di Linh");
}

#[tokio::test]
async fn test_unresolved_stops_get_no_markers() {
    let routes = Arc::new(MockRouteCalculator::new());
    let mut planner = RoutePlanner::new(routes, CENTER);

    let mut waypoints = resolved_list(&[place("Saigon", 106.7, 10.8), place("Da Lat", 108.4, 11.9)]);
    waypoints.add_stop();
    planner.sync_markers(&waypoints);

    assert!(planner.scene().stop_markers().is_empty());
    assert!(planner.scene().start_marker().is_some());
}

#[tokio::test]
async fn test_select_result_camera_and_transient_marker() {
    let routes = Arc::new(MockRouteCalculator::new());
    let mut planner = RoutePlanner::new(routes, CENTER);

    let fuel = SelectedResult::Fuel(place("Petrolimex 31", 106.72, 10.81));
    planner.select_result(&fuel);

    assert_eq!(planner.scene().camera().center, [106.72, 10.81]);
    assert_eq!(planner.scene().camera().zoom, 14.0);
    assert_eq!(planner.scene().search_markers().len(), 1);
    assert_eq!(
        planner.scene().search_markers()[0].kind,
        MarkerKind::FuelStation
    );

    // Plain results only move the camera
    let search = SelectedResult::Search(place("Ben Thanh", 106.698, 10.772));
    planner.select_result(&search);
    assert_eq!(planner.scene().camera().center, [106.698, 10.772]);
    assert!(planner.scene().search_markers().is_empty());
}

#[tokio::test]
async fn test_apply_outcome_drives_search_overlay() {
    let routes = Arc::new(MockRouteCalculator::new());
    let mut planner = RoutePlanner::new(routes, CENTER);

    planner.apply_outcome(&SearchOutcome::Search {
        results: vec![place("Ben Thanh", 106.698, 10.772)],
    });
    assert_eq!(planner.scene().search_markers().len(), 1);
    assert_eq!(
        planner.scene().search_markers()[0].kind,
        MarkerKind::SearchResult
    );

    planner.apply_outcome(&SearchOutcome::Cleared);
    assert!(planner.scene().search_markers().is_empty());
}
