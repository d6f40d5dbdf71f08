// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - provider clients and the session layer.

pub mod location;
pub mod session;
pub mod trips;

pub use location::{LocationApi, LocationService, PlaceIndex, RouteCalculator, SearchArea};
pub use session::{CachedSession, SessionProvider, SessionToken, TokenSource};
pub use trips::TripApiClient;
