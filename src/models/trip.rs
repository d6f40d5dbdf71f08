// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trip persistence payloads for the club backend.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::waypoint::WaypointList;

/// Dates and departure time edited alongside the stop list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSchedule {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: NaiveTime,
}

/// Body of `PATCH /update-trip/{trip_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTripRequest {
    #[validate(nested)]
    pub updated_trip: TripUpdate,
    pub stops_of_trip: Vec<TripStop>,
}

/// Trip header fields.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TripUpdate {
    #[validate(length(min = 1, message = "start is required"))]
    pub start: String,
    #[validate(length(min = 1, message = "destination is required"))]
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub time: NaiveTime,
    /// `[lng, lat]`, empty while the start is unresolved
    pub start_coordinates: Vec<f64>,
    /// `[lng, lat]`, empty while the destination is unresolved
    pub destination_coordinates: Vec<f64>,
}

/// One stop row, sent for every waypoint including the endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripStop {
    pub id: u32,
    pub stop_name: String,
    pub stop_coordinates: Vec<f64>,
}

impl UpdateTripRequest {
    /// Build the save payload from the current stop list and schedule.
    pub fn from_waypoints(waypoints: &WaypointList, schedule: &TripSchedule) -> Self {
        let coords_of = |waypoint: &crate::models::Waypoint| -> Vec<f64> {
            waypoint
                .place
                .as_ref()
                .map(|p| p.coords.to_vec())
                .unwrap_or_default()
        };

        Self {
            updated_trip: TripUpdate {
                start: waypoints.start().text.clone(),
                destination: waypoints.destination().text.clone(),
                start_date: schedule.start_date,
                end_date: schedule.end_date,
                time: schedule.start_time,
                start_coordinates: coords_of(waypoints.start()),
                destination_coordinates: coords_of(waypoints.destination()),
            },
            stops_of_trip: waypoints
                .waypoints()
                .iter()
                .map(|waypoint| TripStop {
                    id: waypoint.id,
                    stop_name: waypoint.text.clone(),
                    stop_coordinates: coords_of(waypoint),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::place::Place;

    fn schedule() -> TripSchedule {
        TripSchedule {
            start_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
            start_time: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
        }
    }

    fn sample_list() -> WaypointList {
        let mut list = WaypointList::new();
        list.resolve(
            1,
            Place {
                label: "Saigon".to_string(),
                coords: [106.7, 10.8],
            },
        );
        list.resolve(
            2,
            Place {
                label: "Da Lat".to_string(),
                coords: [108.4, 11.9],
            },
        );
        list
    }

    #[test]
    fn test_payload_matches_backend_schema() {
        let request = UpdateTripRequest::from_waypoints(&sample_list(), &schedule());
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "updated_trip": {
                    "start": "Saigon",
                    "destination": "Da Lat",
                    "start_date": "2026-03-14",
                    "end_date": "2026-03-16",
                    "time": "07:30:00",
                    "start_coordinates": [106.7, 10.8],
                    "destination_coordinates": [108.4, 11.9],
                },
                "stops_of_trip": [
                    { "id": 1, "stop_name": "Saigon", "stop_coordinates": [106.7, 10.8] },
                    { "id": 2, "stop_name": "Da Lat", "stop_coordinates": [108.4, 11.9] },
                ],
            })
        );
    }

    #[test]
    fn test_every_waypoint_becomes_a_stop_row() {
        let mut list = sample_list();
        list.add_stop();
        let request = UpdateTripRequest::from_waypoints(&list, &schedule());

        assert_eq!(request.stops_of_trip.len(), 3);
        assert_eq!(request.stops_of_trip[1].stop_name, "New stop");
        assert!(request.stops_of_trip[1].stop_coordinates.is_empty());
    }

    #[test]
    fn test_validation_rejects_blank_endpoints() {
        let request = UpdateTripRequest::from_waypoints(&WaypointList::new(), &schedule());
        assert!(request.validate().is_err());

        let request = UpdateTripRequest::from_waypoints(&sample_list(), &schedule());
        assert!(request.validate().is_ok());
    }
}
