// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! BikerTown trip planner core.
//!
//! Headless engine behind the club's trip-planning map view: the ordered
//! waypoint list, debounced place search with route-biased fan-out, route
//! geometry and marker synchronization, and the fuel-station overlay with
//! its proximity cache. A host view renders the [`scene::MapScene`] and
//! listens on the planner event channel; all provider traffic goes through
//! the trait seams in [`services`].

pub mod config;
pub mod error;
pub mod fuel;
pub mod models;
pub mod planner;
pub mod route_sync;
pub mod scene;
pub mod search;
pub mod services;
pub mod spatial;

pub use error::{AppError, Result};
pub use planner::{PlannerEvent, TripPlanner};
