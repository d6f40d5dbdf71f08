// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Place and search result types.

use serde::{Deserialize, Serialize};

/// A resolved place: display label plus `[lng, lat]` coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub label: String,
    pub coords: [f64; 2],
}

/// An autocomplete candidate returned by the place index.
///
/// Suggestions carry only a label; coordinates arrive with the follow-up
/// `get_place` lookup once one is picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Provider-assigned id, the deduplication key
    pub place_id: String,
    /// Display label
    pub text: String,
}

/// A text-search hit, which (unlike a suggestion) already has coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceResult {
    pub place_id: String,
    pub place: Place,
}

/// Outcome of a map search, matched exhaustively by the host view.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Plain text-search results
    Search { results: Vec<Place> },
    /// Fuel stations along the route
    Fuel { stations: Vec<Place> },
    /// Previously rendered results should be removed
    Cleared,
}

/// A single result picked from the suggestion or fuel list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectedResult {
    Search(Place),
    Fuel(Place),
}

impl SelectedResult {
    pub fn place(&self) -> &Place {
        match self {
            SelectedResult::Search(place) | SelectedResult::Fuel(place) => place,
        }
    }
}
