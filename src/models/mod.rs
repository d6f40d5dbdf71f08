// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the planner.

pub mod place;
pub mod route;
pub mod suggestion;
pub mod trip;
pub mod waypoint;

pub use place::{Place, PlaceResult, SearchOutcome, SelectedResult, Suggestion};
pub use route::{OptimizeFor, RouteLeg, RouteOptions, RoutePlan, TravelMode};
pub use suggestion::SuggestionSet;
pub use trip::{TripSchedule, TripStop, TripUpdate, UpdateTripRequest};
pub use waypoint::{Waypoint, WaypointList};
