// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Debounced, route-biased place suggestion engine.
//!
//! One engine serves every waypoint input field. Each keystroke restarts the
//! debounce timer and bumps a generation counter; when the timer fires, one
//! suggestion query goes out per route bias point (or one against the default
//! bias when no route exists yet). Batches merge into a unique-by-id set and
//! the set-so-far is pushed to the host after every completed query, so
//! suggestions stream in instead of waiting for the whole fan-out.
//!
//! The generation counter is what keeps a slow, stale query from overwriting
//! fresher results: every merge and emit first checks that its generation is
//! still current.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use futures_util::future;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Duration;

use crate::config::Config;
use crate::error::Result;
use crate::models::place::{Place, Suggestion};
use crate::models::suggestion::SuggestionSet;
use crate::planner::PlannerEvent;
use crate::route_sync::SharedRouteCoords;
use crate::services::location::PlaceIndex;
use crate::spatial::filter_coords_by_distance;

/// How many fan-out queries run at once.
const FAN_OUT_CONCURRENCY: usize = 4;

/// Tuning knobs lifted out of [`Config`].
#[derive(Debug, Clone)]
pub struct SearchTuning {
    pub debounce_ms: u64,
    pub suggest_max_results: u32,
    pub suggest_total_cap: usize,
    pub bias_min_distance_km: f64,
    pub default_bias: [f64; 2],
}

impl SearchTuning {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce_ms: config.debounce_ms,
            suggest_max_results: config.suggest_max_results,
            suggest_total_cap: config.suggest_total_cap,
            bias_min_distance_km: config.bias_min_distance_km,
            default_bias: config.default_bias,
        }
    }
}

pub struct SuggestionEngine {
    shared: Arc<EngineInner>,
    debounce: Mutex<Option<JoinHandle<()>>>,
}

struct EngineInner {
    places: Arc<dyn PlaceIndex>,
    route_coords: SharedRouteCoords,
    tuning: SearchTuning,
    generation: AtomicU64,
    current: Mutex<SuggestionSet>,
    events: UnboundedSender<PlannerEvent>,
}

impl SuggestionEngine {
    pub fn new(
        places: Arc<dyn PlaceIndex>,
        route_coords: SharedRouteCoords,
        tuning: SearchTuning,
        events: UnboundedSender<PlannerEvent>,
    ) -> Self {
        Self {
            shared: Arc::new(EngineInner {
                places,
                route_coords,
                tuning,
                generation: AtomicU64::new(0),
                current: Mutex::new(SuggestionSet::new()),
                events,
            }),
            debounce: Mutex::new(None),
        }
    }

    /// A keystroke in a waypoint field.
    ///
    /// Cancels any pending debounce, invalidates in-flight queries, and either
    /// clears the suggestions (empty input) or schedules a fresh fan-out.
    pub async fn on_input(&self, waypoint_id: u32, text: &str) {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(pending) = self.debounce.lock().await.take() {
            pending.abort();
        }

        if text.trim().is_empty() {
            self.shared.current.lock().await.clear();
            self.shared.emit_current(waypoint_id).await;
            return;
        }

        self.shared.current.lock().await.clear();

        let shared = Arc::clone(&self.shared);
        let query = text.to_string();
        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(shared.tuning.debounce_ms)).await;
            if !shared.is_current(generation) {
                return; // superseded while waiting
            }
            tracing::debug!(%query, waypoint_id, "Debounce fired");
            // Detached: a later keystroke aborts only the pending timer.
            // Queries already in flight run to completion and the generation
            // check throws their results away.
            tokio::spawn(async move {
                shared.fan_out(waypoint_id, generation, query).await;
            });
        });

        *self.debounce.lock().await = Some(task);
    }

    /// Snapshot of the currently displayed suggestions.
    pub async fn suggestions(&self) -> Vec<Suggestion> {
        self.shared.current.lock().await.to_vec()
    }

    /// Drop whatever the picker currently shows.
    pub async fn clear(&self) {
        self.shared.current.lock().await.clear();
    }

    /// Resolve a picked suggestion to full coordinates and clear the picker.
    ///
    /// The picker is only cleared on success, so a failed lookup leaves the
    /// list intact for another try.
    pub async fn resolve_selection(&self, suggestion: &Suggestion) -> Result<Place> {
        let place = self.shared.places.get_place(&suggestion.place_id).await?;
        self.clear().await;
        Ok(place)
    }

    /// Enter pressed: resolve every displayed suggestion's coordinates
    /// concurrently and return the whole batch at once.
    ///
    /// Individual lookup failures are logged and skipped rather than sinking
    /// the batch.
    pub async fn confirm_search(&self) -> Vec<Place> {
        if let Some(pending) = self.debounce.lock().await.take() {
            pending.abort();
        }

        let snapshot = self.shared.current.lock().await.to_vec();
        let lookups = snapshot.into_iter().map(|suggestion| {
            let places = Arc::clone(&self.shared.places);
            async move {
                let outcome = places.get_place(&suggestion.place_id).await;
                (suggestion.place_id, outcome)
            }
        });

        let mut results = Vec::new();
        for (place_id, outcome) in future::join_all(lookups).await {
            match outcome {
                Ok(place) => results.push(place),
                Err(error) => {
                    tracing::warn!(%place_id, error = %error, "Failed to resolve suggestion")
                }
            }
        }
        results
    }
}

impl EngineInner {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn emit_current(&self, waypoint_id: u32) {
        let suggestions = self.current.lock().await.to_vec();
        let _ = self.events.send(PlannerEvent::SuggestionsUpdated {
            waypoint_id,
            suggestions,
        });
    }

    /// One suggestion query per bias point, merged as they complete.
    async fn fan_out(&self, waypoint_id: u32, generation: u64, query: String) {
        let route_coords = self.route_coords.read().await.clone();
        let bias_points = filter_coords_by_distance(&route_coords, self.tuning.bias_min_distance_km);

        let targets = if bias_points.is_empty() {
            vec![self.tuning.default_bias]
        } else {
            bias_points
        };

        let mut queries = stream::iter(targets.into_iter().map(|bias| {
            let places = Arc::clone(&self.places);
            let query = query.clone();
            let max_results = self.tuning.suggest_max_results;
            async move { places.suggest(&query, bias, max_results).await }
        }))
        .buffer_unordered(FAN_OUT_CONCURRENCY);

        while let Some(result) = queries.next().await {
            if !self.is_current(generation) {
                tracing::debug!(%query, "Discarding stale suggestion batch");
                return;
            }

            let batch = match result {
                Ok(batch) => batch,
                Err(error) => {
                    tracing::warn!(%query, error = %error, "Suggestion query failed");
                    return;
                }
            };

            let total = {
                let mut current = self.current.lock().await;
                current.merge(batch);
                current.len()
            };
            self.emit_current(waypoint_id).await;

            if total >= self.tuning.suggest_total_cap {
                tracing::debug!(total, "Suggestion cap reached, skipping remaining queries");
                return;
            }
        }
    }
}
