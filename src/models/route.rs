// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route geometry returned by the route calculator.

/// One leg of a multi-stop route, between two consecutive waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    /// Ordered `[lng, lat]` pairs along this leg
    pub line_string: Vec<[f64; 2]>,
}

/// A calculated route: ordered legs from origin to destination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutePlan {
    pub legs: Vec<RouteLeg>,
}

impl RoutePlan {
    /// Concatenate every leg into the flat polyline used for bias sampling.
    pub fn flat_coords(&self) -> Vec<[f64; 2]> {
        self.legs
            .iter()
            .flat_map(|leg| leg.line_string.iter().copied())
            .collect()
    }
}

/// Two-wheeled is the club default; the rest exist for completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelMode {
    Motorcycle,
    Car,
    Walking,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Motorcycle => "Motorcycle",
            TravelMode::Car => "Car",
            TravelMode::Walking => "Walking",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizeFor {
    FastestRoute,
    ShortestRoute,
}

impl OptimizeFor {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizeFor::FastestRoute => "FastestRoute",
            OptimizeFor::ShortestRoute => "ShortestRoute",
        }
    }
}

/// Options sent with every route calculation.
#[derive(Debug, Clone)]
pub struct RouteOptions {
    pub travel_mode: TravelMode,
    pub avoid_controlled_access_highways: bool,
    pub optimize_for: OptimizeFor,
    pub include_leg_geometry: bool,
}

impl Default for RouteOptions {
    /// Motorcycle profile, highways excluded, fastest route, geometry included.
    fn default() -> Self {
        Self {
            travel_mode: TravelMode::Motorcycle,
            avoid_controlled_access_highways: true,
            optimize_for: OptimizeFor::FastestRoute,
            include_leg_geometry: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_coords_concatenates_legs_in_order() {
        let plan = RoutePlan {
            legs: vec![
                RouteLeg {
                    line_string: vec![[106.0, 10.0], [106.1, 10.1]],
                },
                RouteLeg {
                    line_string: vec![[106.1, 10.1], [106.2, 10.2]],
                },
            ],
        };

        assert_eq!(
            plan.flat_coords(),
            vec![[106.0, 10.0], [106.1, 10.1], [106.1, 10.1], [106.2, 10.2]]
        );
    }

    #[test]
    fn test_flat_coords_empty_plan() {
        assert!(RoutePlan::default().flat_coords().is_empty());
    }
}
