// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Location provider client for place search and route calculation.
//!
//! Handles:
//! - Place-name suggestions biased toward a coordinate
//! - Place resolution by provider id (with an in-memory cache)
//! - Text search within a bias point or bounding box
//! - Reverse geocoding for loaded trips
//! - Multi-leg route calculation with leg geometry

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::place::{Place, PlaceResult, Suggestion};
use crate::models::route::{RouteLeg, RouteOptions, RoutePlan};
use crate::services::session::SessionProvider;

/// Spatial constraint applied to a text search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchArea {
    /// Weight results toward a `[lng, lat]` point
    Bias([f64; 2]),
    /// Restrict results to `[west, south, east, north]`
    BBox([f64; 4]),
}

/// Place index operations the planner depends on.
#[async_trait]
pub trait PlaceIndex: Send + Sync {
    /// Autocomplete candidates for a partial query, biased toward a point.
    async fn suggest(&self, text: &str, bias: [f64; 2], max_results: u32)
        -> Result<Vec<Suggestion>>;

    /// Resolve a suggestion id to its label and coordinates.
    async fn get_place(&self, place_id: &str) -> Result<Place>;

    /// Full text search constrained to an area.
    async fn search_text(&self, text: &str, area: SearchArea) -> Result<Vec<PlaceResult>>;

    /// Reverse geocode a coordinate to the nearest place, if any.
    async fn search_position(&self, position: [f64; 2]) -> Result<Option<Place>>;
}

/// Route calculation, kept separate so tests can stub it independently.
#[async_trait]
pub trait RouteCalculator: Send + Sync {
    async fn calculate_route(
        &self,
        origin: [f64; 2],
        destination: [f64; 2],
        waypoints: &[[f64; 2]],
        options: &RouteOptions,
    ) -> Result<RoutePlan>;
}

/// Raw location provider client. Methods take the bearer token explicitly;
/// `LocationService` below owns token acquisition.
#[derive(Clone)]
pub struct LocationApi {
    http: reqwest::Client,
    base_url: String,
    place_index: String,
    route_calculator: String,
    country_filter: String,
}

impl LocationApi {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.location_base_url.trim_end_matches('/').to_string(),
            place_index: config.place_index.clone(),
            route_calculator: config.route_calculator.clone(),
            country_filter: config.country_filter.clone(),
        }
    }

    pub async fn suggest(
        &self,
        token: &str,
        text: &str,
        bias: [f64; 2],
        max_results: u32,
    ) -> Result<Vec<Suggestion>> {
        let url = format!(
            "{}/places/v0/indexes/{}/search/suggestions",
            self.base_url, self.place_index
        );
        let body = SuggestionsRequest {
            text,
            bias_position: bias,
            filter_countries: std::slice::from_ref(&self.country_filter),
            max_results,
        };

        let response: SuggestionsResponse = self.post_json(&url, token, &body).await?;

        // Entries missing either field are unusable in the picker
        Ok(response
            .results
            .into_iter()
            .filter_map(|entry| match (entry.place_id, entry.text) {
                (Some(place_id), Some(text)) => Some(Suggestion { place_id, text }),
                _ => None,
            })
            .collect())
    }

    pub async fn get_place(&self, token: &str, place_id: &str) -> Result<Place> {
        let url = format!(
            "{}/places/v0/indexes/{}/places/{}",
            self.base_url,
            self.place_index,
            urlencoding::encode(place_id)
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Location(e.to_string()))?;

        let body: PlaceResponse = check_response_json(response).await?;
        body.place
            .into_place()
            .ok_or_else(|| AppError::NotFound(format!("Place {}", place_id)))
    }

    pub async fn search_text(
        &self,
        token: &str,
        text: &str,
        area: SearchArea,
    ) -> Result<Vec<PlaceResult>> {
        let url = format!(
            "{}/places/v0/indexes/{}/search/text",
            self.base_url, self.place_index
        );
        let body = TextSearchRequest {
            text,
            bias_position: match area {
                SearchArea::Bias(point) => Some(point),
                SearchArea::BBox(_) => None,
            },
            filter_b_box: match area {
                SearchArea::Bias(_) => None,
                SearchArea::BBox(bbox) => Some(bbox),
            },
            filter_countries: std::slice::from_ref(&self.country_filter),
        };

        let response: TextSearchResponse = self.post_json(&url, token, &body).await?;

        Ok(response
            .results
            .into_iter()
            .filter_map(|entry| {
                let place = entry.place.into_place()?;
                let place_id = entry.place_id?;
                Some(PlaceResult { place_id, place })
            })
            .collect())
    }

    pub async fn search_position(&self, token: &str, position: [f64; 2]) -> Result<Option<Place>> {
        let url = format!(
            "{}/places/v0/indexes/{}/search/position",
            self.base_url, self.place_index
        );
        let body = PositionSearchRequest {
            position,
            max_results: 1,
            filter_countries: std::slice::from_ref(&self.country_filter),
        };

        let response: TextSearchResponse = self.post_json(&url, token, &body).await?;

        Ok(response
            .results
            .into_iter()
            .find_map(|entry| entry.place.into_place()))
    }

    pub async fn calculate_route(
        &self,
        token: &str,
        origin: [f64; 2],
        destination: [f64; 2],
        waypoints: &[[f64; 2]],
        options: &RouteOptions,
    ) -> Result<RoutePlan> {
        let url = format!(
            "{}/routes/v0/calculators/{}/calculate/route",
            self.base_url, self.route_calculator
        );
        let body = CalculateRouteRequest {
            departure_position: origin,
            destination_position: destination,
            waypoint_positions: if waypoints.is_empty() {
                None
            } else {
                Some(waypoints)
            },
            travel_mode: options.travel_mode.as_str(),
            avoid: AvoidanceOptions {
                controlled_access_highways: options.avoid_controlled_access_highways,
            },
            optimize_routing_for: options.optimize_for.as_str(),
            include_leg_geometry: options.include_leg_geometry,
        };

        let response: CalculateRouteResponse = self.post_json(&url, token, &body).await?;

        Ok(RoutePlan {
            legs: response
                .legs
                .into_iter()
                .map(|leg| RouteLeg {
                    line_string: leg
                        .geometry
                        .map(|geometry| geometry.line_string)
                        .unwrap_or_default(),
                })
                .collect(),
        })
    }

    /// Generic POST with a JSON body and JSON response.
    async fn post_json<B, T>(&self, url: &str, token: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Location(e.to_string()))?;

        check_response_json(response).await
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("Location provider rate limit hit (429)");
            return Err(AppError::Location("rate limited".to_string()));
        }

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AppError::Unauthorized);
        }

        return Err(AppError::Location(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Location(format!("JSON parse error: {}", e)))
}

// ─────────────────────────────────────────────────────────────────────────────
// LocationService - high-level service with session wiring and place cache
// ─────────────────────────────────────────────────────────────────────────────

/// High-level location service: acquires the session token per call and
/// caches resolved places by provider id, so repeated lookups of the same
/// suggestion (confirm-search, re-selection) skip the network.
pub struct LocationService {
    api: LocationApi,
    session: Arc<dyn SessionProvider>,
    place_cache: DashMap<String, Place>,
}

impl LocationService {
    pub fn new(config: &Config, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            api: LocationApi::new(config),
            session,
            place_cache: DashMap::new(),
        }
    }
}

#[async_trait]
impl PlaceIndex for LocationService {
    async fn suggest(
        &self,
        text: &str,
        bias: [f64; 2],
        max_results: u32,
    ) -> Result<Vec<Suggestion>> {
        let token = self.session.bearer_token().await?;
        self.api.suggest(&token, text, bias, max_results).await
    }

    async fn get_place(&self, place_id: &str) -> Result<Place> {
        if let Some(cached) = self.place_cache.get(place_id) {
            return Ok(cached.clone());
        }

        let token = self.session.bearer_token().await?;
        let place = self.api.get_place(&token, place_id).await?;
        self.place_cache.insert(place_id.to_string(), place.clone());
        Ok(place)
    }

    async fn search_text(&self, text: &str, area: SearchArea) -> Result<Vec<PlaceResult>> {
        let token = self.session.bearer_token().await?;
        self.api.search_text(&token, text, area).await
    }

    async fn search_position(&self, position: [f64; 2]) -> Result<Option<Place>> {
        let token = self.session.bearer_token().await?;
        self.api.search_position(&token, position).await
    }
}

#[async_trait]
impl RouteCalculator for LocationService {
    async fn calculate_route(
        &self,
        origin: [f64; 2],
        destination: [f64; 2],
        waypoints: &[[f64; 2]],
        options: &RouteOptions,
    ) -> Result<RoutePlan> {
        let token = self.session.bearer_token().await?;
        self.api
            .calculate_route(&token, origin, destination, waypoints, options)
            .await
    }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SuggestionsRequest<'a> {
    text: &'a str,
    bias_position: [f64; 2],
    filter_countries: &'a [String],
    max_results: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SuggestionsResponse {
    #[serde(default)]
    results: Vec<SuggestionEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SuggestionEntry {
    place_id: Option<String>,
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TextSearchRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bias_position: Option<[f64; 2]>,
    #[serde(rename = "FilterBBox", skip_serializing_if = "Option::is_none")]
    filter_b_box: Option<[f64; 4]>,
    filter_countries: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct PositionSearchRequest<'a> {
    position: [f64; 2],
    max_results: u32,
    filter_countries: &'a [String],
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TextSearchResponse {
    #[serde(default)]
    results: Vec<TextSearchEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TextSearchEntry {
    place: WirePlace,
    place_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PlaceResponse {
    place: WirePlace,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WirePlace {
    label: Option<String>,
    geometry: Option<WireGeometry>,
}

impl WirePlace {
    fn into_place(self) -> Option<Place> {
        let point = self.geometry?.point?;
        Some(Place {
            label: self.label.unwrap_or_default(),
            coords: point,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireGeometry {
    point: Option<[f64; 2]>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CalculateRouteRequest<'a> {
    departure_position: [f64; 2],
    destination_position: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    waypoint_positions: Option<&'a [[f64; 2]]>,
    travel_mode: &'a str,
    avoid: AvoidanceOptions,
    optimize_routing_for: &'a str,
    include_leg_geometry: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct AvoidanceOptions {
    controlled_access_highways: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CalculateRouteResponse {
    #[serde(default)]
    legs: Vec<WireLeg>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireLeg {
    geometry: Option<WireLegGeometry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireLegGeometry {
    #[serde(default)]
    line_string: Vec<[f64; 2]>,
}
