// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route calculation and map-scene synchronization.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::place::{SearchOutcome, SelectedResult};
use crate::models::route::RouteOptions;
use crate::models::waypoint::WaypointList;
use crate::scene::{Bounds, MapScene, MarkerKind};
use crate::services::location::RouteCalculator;

/// Flat route polyline shared with the suggestion engine and fuel overlay.
///
/// Explicitly injected into every consumer instead of living in ambient
/// state; the route planner is the only writer.
pub type SharedRouteCoords = Arc<RwLock<Vec<[f64; 2]>>>;

const SELECT_ZOOM: f64 = 14.0;

/// Owns the map scene and keeps it consistent with the waypoint model.
pub struct RoutePlanner {
    routes: Arc<dyn RouteCalculator>,
    scene: MapScene,
    route_coords: SharedRouteCoords,
    options: RouteOptions,
}

impl RoutePlanner {
    pub fn new(routes: Arc<dyn RouteCalculator>, center: [f64; 2]) -> Self {
        Self {
            routes,
            scene: MapScene::new(center),
            route_coords: Arc::new(RwLock::new(Vec::new())),
            options: RouteOptions::default(),
        }
    }

    pub fn scene(&self) -> &MapScene {
        &self.scene
    }

    /// Handle to the shared route polyline for injection into siblings.
    pub fn route_coords(&self) -> SharedRouteCoords {
        Arc::clone(&self.route_coords)
    }

    /// Request fresh leg geometry and redraw the route layers.
    ///
    /// Waypoints without both endpoints resolved are skipped. Provider
    /// failures and empty responses clear the layers, get logged, and leave
    /// the rest of the planner usable; neither is fatal.
    pub async fn compute_route(&mut self, waypoints: &WaypointList) {
        let (Some(origin), Some(destination)) = (
            waypoints.start().place.as_ref().map(|p| p.coords),
            waypoints.destination().place.as_ref().map(|p| p.coords),
        ) else {
            return;
        };

        let vias: Vec<[f64; 2]> = waypoints
            .interior()
            .iter()
            .filter_map(|waypoint| waypoint.place.as_ref().map(|p| p.coords))
            .collect();

        let plan = match self
            .routes
            .calculate_route(origin, destination, &vias, &self.options)
            .await
        {
            Ok(plan) => plan,
            Err(error) => {
                tracing::warn!(error = %error, "Route calculation failed");
                self.scene.clear_route_layers();
                return;
            }
        };

        if plan.legs.is_empty() {
            tracing::warn!("No route legs in response");
            self.scene.clear_route_layers();
            *self.route_coords.write().await = Vec::new();
            return;
        }

        self.scene.set_route_layers(&plan.legs);
        *self.route_coords.write().await = plan.flat_coords();
        tracing::info!(legs = plan.legs.len(), "Route drawn");
    }

    /// Rebuild every marker from the waypoint model and refit the viewport
    /// when both endpoints are known.
    pub fn sync_markers(&mut self, waypoints: &WaypointList) {
        self.scene.set_start_marker(waypoints.start().place.as_ref());
        self.scene
            .set_destination_marker(waypoints.destination().place.as_ref());

        self.scene.rebuild_stop_markers(
            waypoints
                .interior()
                .iter()
                .filter_map(|waypoint| waypoint.place.as_ref()),
        );

        if let (Some(start), Some(destination)) = (
            waypoints.start().place.as_ref(),
            waypoints.destination().place.as_ref(),
        ) {
            self.scene
                .fit_bounds(Bounds::from_points(start.coords, destination.coords));
        }
    }

    /// Render a search outcome as overlay markers, then refit the saved
    /// viewport so the trip stays framed.
    pub fn apply_outcome(&mut self, outcome: &SearchOutcome) {
        match outcome {
            SearchOutcome::Search { results } => {
                self.scene
                    .set_search_markers(MarkerKind::SearchResult, results);
            }
            SearchOutcome::Fuel { stations } => {
                self.scene
                    .set_search_markers(MarkerKind::FuelStation, stations);
            }
            SearchOutcome::Cleared => self.scene.clear_search_markers(),
        }

        if let Some(bounds) = self.scene.bounds() {
            self.scene.fit_bounds(bounds);
        }
    }

    /// Camera and transient-marker behavior for one picked result.
    ///
    /// Fuel picks get a single transient marker; plain results only move the
    /// camera. Both replace whatever transient markers were shown before,
    /// independent of the waypoint and route state.
    pub fn select_result(&mut self, selected: &SelectedResult) {
        self.scene.clear_search_markers();
        self.scene.fly_to(selected.place().coords, SELECT_ZOOM);

        if let SelectedResult::Fuel(place) = selected {
            self.scene
                .set_search_markers(MarkerKind::FuelStation, std::slice::from_ref(place));
        }
    }

    /// Drop the transient search overlay; stop-change paths rebuild markers
    /// from the model right after.
    pub fn clear_search_overlay(&mut self) {
        self.scene.clear_search_markers();
    }
}
