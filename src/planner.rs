// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Composition root: wires the waypoint model, suggestion engine, route
//! sync, and fuel overlay behind one event-emitting facade.
//!
//! All mutable planning state lives here and is only touched through these
//! async methods, so the usual single-event-loop assumptions hold: no locks
//! beyond what the shared route polyline and suggestion set already carry,
//! and ordering races are handled by the engine's generation counter.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::fuel::{FuelOverlay, FuelTuning};
use crate::models::place::{SearchOutcome, SelectedResult, Suggestion};
use crate::models::trip::{TripSchedule, UpdateTripRequest};
use crate::models::waypoint::{Waypoint, WaypointList};
use crate::route_sync::RoutePlanner;
use crate::scene::MapScene;
use crate::search::{SearchTuning, SuggestionEngine};
use crate::services::location::{PlaceIndex, RouteCalculator};
use crate::services::trips::TripApiClient;

/// Notifications pushed to the host view.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerEvent {
    /// Autocomplete state for one waypoint field (empty list clears it)
    SuggestionsUpdated {
        waypoint_id: u32,
        suggestions: Vec<Suggestion>,
    },
    /// Batch search or fuel overlay results for map rendering
    SearchResults(SearchOutcome),
    /// A single result was picked
    ResultSelected(SelectedResult),
    /// The stop list changed; the host re-renders the sidebar
    StopsChanged(Vec<Waypoint>),
}

/// The trip-planning engine behind the map view.
pub struct TripPlanner {
    places: Arc<dyn PlaceIndex>,
    waypoints: WaypointList,
    search: SuggestionEngine,
    route: RoutePlanner,
    fuel: FuelOverlay,
    trips: TripApiClient,
    schedule: TripSchedule,
    events: UnboundedSender<PlannerEvent>,
}

impl TripPlanner {
    pub fn new(
        config: &Config,
        places: Arc<dyn PlaceIndex>,
        routes: Arc<dyn RouteCalculator>,
        trips: TripApiClient,
        schedule: TripSchedule,
        events: UnboundedSender<PlannerEvent>,
    ) -> Self {
        let route = RoutePlanner::new(routes, config.default_bias);
        let search = SuggestionEngine::new(
            Arc::clone(&places),
            route.route_coords(),
            SearchTuning::from_config(config),
            events.clone(),
        );
        let fuel = FuelOverlay::new(Arc::clone(&places), FuelTuning::from_config(config));

        Self {
            places,
            waypoints: WaypointList::new(),
            search,
            route,
            fuel,
            trips,
            schedule,
            events,
        }
    }

    pub fn waypoints(&self) -> &WaypointList {
        &self.waypoints
    }

    pub fn scene(&self) -> &MapScene {
        self.route.scene()
    }

    pub fn schedule(&self) -> &TripSchedule {
        &self.schedule
    }

    pub fn set_schedule(&mut self, schedule: TripSchedule) {
        self.schedule = schedule;
    }

    /// Load a stored trip: reverse-geocode each saved coordinate in order
    /// (start, interior stops, destination), seed the stop list, draw the
    /// markers, and compute the initial route.
    ///
    /// Positions the provider cannot resolve stay unresolved; the trip still
    /// loads.
    pub async fn load_trip(&mut self, coords: &[[f64; 2]]) -> Result<()> {
        let mut places = Vec::with_capacity(coords.len());
        for &position in coords {
            match self.places.search_position(position).await {
                Ok(found) => {
                    if found.is_none() {
                        tracing::warn!(?position, "No place found at stored position");
                    }
                    places.push(found);
                }
                Err(error) => {
                    tracing::warn!(error = %error, ?position, "Reverse geocode failed");
                    places.push(None);
                }
            }
        }

        self.waypoints = WaypointList::initialize(places);
        self.route.sync_markers(&self.waypoints);
        if self.waypoints.endpoints_resolved() {
            self.route.compute_route(&self.waypoints).await;
        }
        self.emit_stops();
        Ok(())
    }

    /// A keystroke in one waypoint field: update the label and kick the
    /// debounced suggestion search. The field becomes the active target for
    /// the next selection.
    pub async fn set_waypoint_text(&mut self, id: u32, text: &str) {
        if !self.waypoints.set_text(id, text) {
            return;
        }
        self.waypoints.set_active(id);
        self.search.on_input(id, text).await;
    }

    /// Pick one suggestion: resolve its coordinates, fill the active
    /// waypoint, rebuild markers, recompute the route, and notify the host.
    pub async fn select_suggestion(&mut self, suggestion: &Suggestion) -> Result<()> {
        let Some(active) = self.waypoints.active_id() else {
            return Err(AppError::BadRequest(
                "No waypoint field is active".to_string(),
            ));
        };

        let place = self.search.resolve_selection(suggestion).await?;
        self.waypoints.resolve(active, place.clone());

        self.emit_stops();
        self.apply_stop_changes().await;

        let _ = self
            .events
            .send(PlannerEvent::ResultSelected(SelectedResult::Search(place)));
        Ok(())
    }

    /// Enter pressed: resolve all visible suggestions and show the batch on
    /// the map as plain search results.
    pub async fn confirm_search(&mut self) {
        let results = self.search.confirm_search().await;
        let outcome = SearchOutcome::Search { results };
        self.route.apply_outcome(&outcome);
        let _ = self.events.send(PlannerEvent::SearchResults(outcome));
    }

    /// Pick a single result straight from the results or fuel list; flies
    /// the viewport there without touching the stop list.
    pub fn select_search_result(&mut self, selected: SelectedResult) {
        self.route.select_result(&selected);
        let _ = self.events.send(PlannerEvent::ResultSelected(selected));
    }

    /// Insert a blank stop before the destination. No route recompute until
    /// the new stop resolves.
    pub fn add_stop(&mut self) -> u32 {
        let id = self.waypoints.add_stop();
        self.emit_stops();
        id
    }

    /// Delete one interior stop. Endpoints never expose delete, and the
    /// model itself refuses to shrink below two entries.
    pub async fn delete_stop(&mut self, id: u32) {
        if id == self.waypoints.start().id || id == self.waypoints.destination().id {
            return;
        }
        if !self.waypoints.delete(id) {
            return;
        }
        self.emit_stops();
        self.apply_stop_changes().await;
    }

    /// Drag-and-drop swap of two positions. Markers and route only refresh
    /// once every waypoint is resolved; a half-filled list just reorders.
    pub async fn reorder(&mut self, dragged: usize, drop: usize) {
        if !self.waypoints.reorder(dragged, drop) {
            return;
        }
        self.emit_stops();
        if self.waypoints.is_fully_resolved() {
            self.apply_stop_changes().await;
        }
    }

    /// Flip the fuel-station overlay, streaming results to the host and
    /// mirroring them into the scene.
    pub async fn toggle_fuel(&mut self) -> Result<()> {
        let coords = self.route.route_coords();
        let snapshot = coords.read().await.clone();

        let Self {
            fuel,
            route,
            events,
            ..
        } = self;

        fuel.toggle(&snapshot, &mut |outcome| {
            route.apply_outcome(&outcome);
            let _ = events.send(PlannerEvent::SearchResults(outcome));
        })
        .await
    }

    /// Persist the current stops and schedule.
    pub async fn save_trip(&mut self, trip_id: u64) -> Result<()> {
        if self.schedule.end_date < self.schedule.start_date {
            return Err(AppError::BadRequest(
                "End date is before start date".to_string(),
            ));
        }

        let request = UpdateTripRequest::from_waypoints(&self.waypoints, &self.schedule);
        self.trips.update_trip(trip_id, &request).await
    }

    /// Marker rebuild plus route recompute after a stop-list change.
    async fn apply_stop_changes(&mut self) {
        self.route.clear_search_overlay();
        self.route.sync_markers(&self.waypoints);
        if self.waypoints.endpoints_resolved() {
            self.route.compute_route(&self.waypoints).await;
        }
    }

    fn emit_stops(&self) {
        let _ = self
            .events
            .send(PlannerEvent::StopsChanged(self.waypoints.waypoints().to_vec()));
    }
}
