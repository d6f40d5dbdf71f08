// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fuel-station overlay along the planned route.
//!
//! Toggling the overlay on searches for stations near evenly spaced sample
//! points of the route polyline, one bounding-box query per point. The result
//! is cached under a digest of the sample points, so flipping the overlay off
//! and on again without a route change costs no provider calls. The
//! distance-filtered sample is the cost bound: a long route still only issues
//! a handful of queries.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};

use crate::config::Config;
use crate::error::Result;
use crate::models::place::{Place, SearchOutcome};
use crate::services::location::{PlaceIndex, SearchArea};
use crate::spatial::{filter_coords_by_distance, hash_bias_points};

/// What we ask the place index for.
const FUEL_QUERY: &str = "gas station";

/// How many bounding-box queries run at once.
const FAN_OUT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct FuelTuning {
    pub bias_min_distance_km: f64,
    pub poi_bbox_delta_deg: f64,
    pub default_bias: [f64; 2],
}

impl FuelTuning {
    pub fn from_config(config: &Config) -> Self {
        Self {
            bias_min_distance_km: config.bias_min_distance_km,
            poi_bbox_delta_deg: config.poi_bbox_delta_deg,
            default_bias: config.default_bias,
        }
    }
}

/// Toggleable fuel-station overlay with a proximity cache.
///
/// States: hidden, fetching, shown. Toggling on with a matching cache goes
/// straight to shown; a fetch that ends with zero unique stations drops back
/// to hidden. Toggling off keeps the cache.
pub struct FuelOverlay {
    places: Arc<dyn PlaceIndex>,
    tuning: FuelTuning,
    shown: bool,
    stations: Vec<Place>,
    last_hash: Option<String>,
}

impl FuelOverlay {
    pub fn new(places: Arc<dyn PlaceIndex>, tuning: FuelTuning) -> Self {
        Self {
            places,
            tuning,
            shown: false,
            stations: Vec::new(),
            last_hash: None,
        }
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Flip the overlay, streaming progressive outcomes through `emit`.
    ///
    /// `route_coords` is the flat route polyline; the bias sample and its
    /// digest are derived here so the cache key always reflects the current
    /// route.
    pub async fn toggle(
        &mut self,
        route_coords: &[[f64; 2]],
        emit: &mut (dyn FnMut(SearchOutcome) + Send),
    ) -> Result<()> {
        let bias_points = filter_coords_by_distance(route_coords, self.tuning.bias_min_distance_km);
        let hash = hash_bias_points(&bias_points);

        self.shown = !self.shown;

        if !self.shown {
            emit(SearchOutcome::Cleared);
            return Ok(());
        }

        let cache_hit =
            !self.stations.is_empty() && self.last_hash.as_deref() == Some(hash.as_str());
        if cache_hit {
            tracing::debug!(stations = self.stations.len(), "Fuel cache hit");
            emit(SearchOutcome::Fuel {
                stations: self.stations.clone(),
            });
            return Ok(());
        }

        tracing::debug!(bias_points = bias_points.len(), "Fetching fuel stations");
        let stations = self.fetch(&bias_points, emit).await?;

        if stations.is_empty() {
            tracing::info!("No fuel stations found along route");
            self.shown = false;
            emit(SearchOutcome::Fuel {
                stations: Vec::new(),
            });
        }

        self.stations = stations;
        self.last_hash = Some(hash);
        Ok(())
    }

    /// Bounded fan-out over the bias points, emitting after each new unique
    /// station so the host renders them as they arrive.
    async fn fetch(
        &self,
        bias_points: &[[f64; 2]],
        emit: &mut (dyn FnMut(SearchOutcome) + Send),
    ) -> Result<Vec<Place>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut stations: Vec<Place> = Vec::new();

        if bias_points.is_empty() {
            let results = self
                .places
                .search_text(FUEL_QUERY, SearchArea::Bias(self.tuning.default_bias))
                .await?;
            for result in results {
                push_unique(&mut seen, &mut stations, result.place_id, result.place, emit);
            }
            return Ok(stations);
        }

        let delta = self.tuning.poi_bbox_delta_deg;
        let mut queries = stream::iter(bias_points.iter().map(|&point| {
            let places = Arc::clone(&self.places);
            let [lng, lat] = point;
            async move {
                places
                    .search_text(
                        FUEL_QUERY,
                        SearchArea::BBox([lng - delta, lat - delta, lng + delta, lat + delta]),
                    )
                    .await
            }
        }))
        .buffer_unordered(FAN_OUT_CONCURRENCY);

        while let Some(result) = queries.next().await {
            for entry in result? {
                push_unique(&mut seen, &mut stations, entry.place_id, entry.place, emit);
            }
        }
        Ok(stations)
    }
}

fn push_unique(
    seen: &mut HashSet<String>,
    stations: &mut Vec<Place>,
    place_id: String,
    place: Place,
    emit: &mut (dyn FnMut(SearchOutcome) + Send),
) {
    if !seen.insert(place_id) {
        return;
    }
    stations.push(place);
    emit(SearchOutcome::Fuel {
        stations: stations.clone(),
    });
}
