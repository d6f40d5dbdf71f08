// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Geodesic helpers for route sampling and proximity cache keys.

use geo::{Distance, Haversine, Point};
use sha2::{Digest, Sha256};

/// Great-circle distance between two `[lng, lat]` coordinates in kilometers.
pub fn haversine_km(a: [f64; 2], b: [f64; 2]) -> f64 {
    Haversine.distance(Point::new(a[0], a[1]), Point::new(b[0], b[1])) / 1000.0
}

/// Thin a polyline so consecutive retained points stay at least `min_km` apart.
///
/// The first point is always kept. Each candidate is measured against the
/// previously *retained* point, not against all of them, so the output is an
/// evenly spaced sample along the line. This bounds the number of outbound
/// place queries on a long route.
pub fn filter_coords_by_distance(coords: &[[f64; 2]], min_km: f64) -> Vec<[f64; 2]> {
    let Some(first) = coords.first() else {
        return Vec::new();
    };

    let mut filtered = vec![*first];
    let mut last = *first;
    for &coord in &coords[1..] {
        if haversine_km(last, coord) >= min_km {
            filtered.push(coord);
            last = coord;
        }
    }
    filtered
}

/// Deterministic digest of a bias-point sequence, used as the fuel-overlay
/// cache key.
///
/// Points are canonicalized to `"lng,lat"` strings and serialized as a JSON
/// array before hashing: the same sequence always yields the same key, and
/// reordering or altering any coordinate changes it.
pub fn hash_bias_points(points: &[[f64; 2]]) -> String {
    let canonical: Vec<String> = points
        .iter()
        .map(|point| format!("{},{}", point[0], point[1]))
        .collect();
    let serialized = serde_json::to_string(&canonical).unwrap_or_default();
    hex::encode(Sha256::digest(serialized.as_bytes()))
}
