// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip persistence client for the club backend.

use std::sync::Arc;

use reqwest::StatusCode;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::trip::UpdateTripRequest;
use crate::services::session::SessionProvider;

/// Client for the trip REST API.
#[derive(Clone)]
pub struct TripApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionProvider>,
}

impl TripApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    /// `PATCH /update-trip/{trip_id}` with the current stops and schedule.
    ///
    /// A 401 means the session lapsed; callers surface it as the
    /// re-authentication path rather than a failure.
    pub async fn update_trip(&self, trip_id: u64, request: &UpdateTripRequest) -> Result<()> {
        request
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let token = self.session.bearer_token().await?;
        let url = format!("{}/update-trip/{}", self.base_url, trip_id);

        let response = self
            .http
            .patch(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::TripApi(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                tracing::info!(trip_id, "Trip saved");
                Ok(())
            }
            StatusCode::UNAUTHORIZED => Err(AppError::SessionExpired),
            StatusCode::NOT_FOUND => Err(AppError::NotFound(format!("Trip {}", trip_id))),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::TripApi(format!("HTTP {}: {}", status, body)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trip::{TripSchedule, UpdateTripRequest};
    use crate::models::waypoint::WaypointList;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime};

    struct StaticSession;

    #[async_trait]
    impl SessionProvider for StaticSession {
        async fn bearer_token(&self) -> Result<String> {
            Ok("test-token".to_string())
        }
    }

    #[tokio::test]
    async fn test_invalid_payload_fails_before_any_network() {
        // Unreachable base URL: validation has to reject first
        let client = TripApiClient::new("http://127.0.0.1:1", Arc::new(StaticSession));

        let schedule = TripSchedule {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
            start_time: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
        };
        let request = UpdateTripRequest::from_waypoints(&WaypointList::new(), &schedule);

        match client.update_trip(7, &request).await {
            Err(AppError::BadRequest(_)) => {}
            other => panic!("expected BadRequest, got {:?}", other.map(|_| ())),
        }
    }
}
