// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared mock providers for the integration tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bikertown_planner::error::{AppError, Result};
use bikertown_planner::models::{Place, PlaceResult, RouteOptions, RoutePlan, Suggestion};
use bikertown_planner::services::{PlaceIndex, RouteCalculator, SearchArea};
use tokio::time::Duration;

/// Scripted in-memory place index.
///
/// Suggestion batches are configured per query text and served one batch per
/// call, so a fan-out over N bias points consumes N batches. Text-search and
/// position results are plain queues.
#[derive(Default)]
#[allow(dead_code)]
pub struct MockPlaceIndex {
    pub suggest_calls: AtomicUsize,
    pub place_calls: AtomicUsize,
    pub text_calls: AtomicUsize,
    pub position_calls: AtomicUsize,

    suggestion_batches: Mutex<HashMap<String, VecDeque<Vec<Suggestion>>>>,
    delays_ms: Mutex<HashMap<String, u64>>,
    places: Mutex<HashMap<String, Place>>,
    text_results: Mutex<VecDeque<Vec<PlaceResult>>>,
    position_results: Mutex<VecDeque<Option<Place>>>,

    pub recorded_queries: Mutex<Vec<String>>,
    pub recorded_areas: Mutex<Vec<SearchArea>>,
}

#[allow(dead_code)]
impl MockPlaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one suggestion batch for a query; each `suggest` call for that
    /// query pops the next batch (empty once exhausted).
    pub fn push_suggestions(&self, query: &str, batch: Vec<Suggestion>) {
        self.suggestion_batches
            .lock()
            .unwrap()
            .entry(query.to_string())
            .or_default()
            .push_back(batch);
    }

    /// Delay every `suggest` call for a query (stale-response simulation).
    pub fn set_delay(&self, query: &str, millis: u64) {
        self.delays_ms
            .lock()
            .unwrap()
            .insert(query.to_string(), millis);
    }

    pub fn insert_place(&self, place_id: &str, place: Place) {
        self.places
            .lock()
            .unwrap()
            .insert(place_id.to_string(), place);
    }

    pub fn push_text_results(&self, results: Vec<PlaceResult>) {
        self.text_results.lock().unwrap().push_back(results);
    }

    pub fn push_position_result(&self, result: Option<Place>) {
        self.position_results.lock().unwrap().push_back(result);
    }
}

#[async_trait]
impl PlaceIndex for MockPlaceIndex {
    async fn suggest(
        &self,
        text: &str,
        _bias: [f64; 2],
        _max_results: u32,
    ) -> Result<Vec<Suggestion>> {
        self.suggest_calls.fetch_add(1, Ordering::SeqCst);
        self.recorded_queries.lock().unwrap().push(text.to_string());

        let delay = self.delays_ms.lock().unwrap().get(text).copied();
        if let Some(millis) = delay {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }

        let batch = self
            .suggestion_batches
            .lock()
            .unwrap()
            .get_mut(text)
            .and_then(|batches| batches.pop_front())
            .unwrap_or_default();
        Ok(batch)
    }

    async fn get_place(&self, place_id: &str) -> Result<Place> {
        self.place_calls.fetch_add(1, Ordering::SeqCst);
        self.places
            .lock()
            .unwrap()
            .get(place_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Place {}", place_id)))
    }

    async fn search_text(&self, text: &str, area: SearchArea) -> Result<Vec<PlaceResult>> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.recorded_queries.lock().unwrap().push(text.to_string());
        self.recorded_areas.lock().unwrap().push(area);

        Ok(self
            .text_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn search_position(&self, _position: [f64; 2]) -> Result<Option<Place>> {
        self.position_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .position_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

/// Route calculator returning a canned plan (or a scripted failure).
#[derive(Default)]
#[allow(dead_code)]
pub struct MockRouteCalculator {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
    plan: Mutex<RoutePlan>,
}

#[allow(dead_code)]
impl MockRouteCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_plan(&self, plan: RoutePlan) {
        *self.plan.lock().unwrap() = plan;
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl RouteCalculator for MockRouteCalculator {
    async fn calculate_route(
        &self,
        _origin: [f64; 2],
        _destination: [f64; 2],
        _waypoints: &[[f64; 2]],
        _options: &RouteOptions,
    ) -> Result<RoutePlan> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Location("route calculator unavailable".into()));
        }
        Ok(self.plan.lock().unwrap().clone())
    }
}

/// Session provider handing out a fixed token.
#[allow(dead_code)]
pub struct MockSession;

#[async_trait]
impl bikertown_planner::services::SessionProvider for MockSession {
    async fn bearer_token(&self) -> Result<String> {
        Ok("test-token".to_string())
    }
}

/// Places used all over the suites.
#[allow(dead_code)]
pub fn place(label: &str, lng: f64, lat: f64) -> Place {
    Place {
        label: label.to_string(),
        coords: [lng, lat],
    }
}

#[allow(dead_code)]
pub fn suggestion(id: &str, text: &str) -> Suggestion {
    Suggestion {
        place_id: id.to_string(),
        text: text.to_string(),
    }
}
