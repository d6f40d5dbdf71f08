// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Pure-state map scene: markers, route layers, camera.
//!
//! The host view renders this state; the planner only mutates it. Markers are
//! derived from the waypoint model plus search state and rebuilt on every
//! relevant change, never edited independently of it.

use geojson::{Feature, Geometry, Value};

use crate::models::place::Place;
use crate::models::route::RouteLeg;

/// Route leg colors, cycled so consecutive legs stay distinguishable.
pub const ROUTE_LEG_COLORS: [&str; 7] = [
    "#3887be", // blue
    "#38be7d", // green
    "#be3838", // red
    "#beae38", // yellow
    "#8e38be", // purple
    "#be38b0", // magenta
    "#38bebe", // cyan
];

const DEFAULT_ZOOM: f64 = 13.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Start,
    Destination,
    Stop,
    SearchResult,
    FuelStation,
}

/// How the host should draw a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerStyle {
    Color(&'static str),
    Icon(&'static str),
}

impl MarkerKind {
    pub fn style(&self) -> MarkerStyle {
        match self {
            MarkerKind::Start => MarkerStyle::Color("black"),
            MarkerKind::Destination => MarkerStyle::Color("red"),
            MarkerKind::Stop => MarkerStyle::Color("#3fb1ce"),
            MarkerKind::SearchResult => MarkerStyle::Color("purple"),
            MarkerKind::FuelStation => MarkerStyle::Icon("gas-station"),
        }
    }
}

/// One rendered marker. Owned exclusively by the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub coords: [f64; 2],
    pub label: String,
}

impl Marker {
    fn for_place(kind: MarkerKind, place: &Place) -> Self {
        Self {
            kind,
            coords: place.coords,
            label: place.label.clone(),
        }
    }
}

/// One rendered route leg layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLayer {
    /// Layer/source id, `route-leg-{i}`
    pub id: String,
    pub color: &'static str,
    pub geometry: Feature,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: [f64; 2],
    pub zoom: f64,
}

/// A `[lng, lat]` bounding box the camera was last fitted to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: [f64; 2],
    pub north_east: [f64; 2],
}

impl Bounds {
    pub fn from_points(a: [f64; 2], b: [f64; 2]) -> Self {
        Self {
            south_west: [a[0].min(b[0]), a[1].min(b[1])],
            north_east: [a[0].max(b[0]), a[1].max(b[1])],
        }
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.south_west[0] + self.north_east[0]) / 2.0,
            (self.south_west[1] + self.north_east[1]) / 2.0,
        ]
    }
}

/// Everything the host needs to draw the map.
#[derive(Debug, Clone)]
pub struct MapScene {
    camera: Camera,
    bounds: Option<Bounds>,
    start_marker: Option<Marker>,
    destination_marker: Option<Marker>,
    stop_markers: Vec<Marker>,
    search_markers: Vec<Marker>,
    route_layers: Vec<RouteLayer>,
}

impl MapScene {
    pub fn new(center: [f64; 2]) -> Self {
        Self {
            camera: Camera {
                center,
                zoom: DEFAULT_ZOOM,
            },
            bounds: None,
            start_marker: None,
            destination_marker: None,
            stop_markers: Vec::new(),
            search_markers: Vec::new(),
            route_layers: Vec::new(),
        }
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn start_marker(&self) -> Option<&Marker> {
        self.start_marker.as_ref()
    }

    pub fn destination_marker(&self) -> Option<&Marker> {
        self.destination_marker.as_ref()
    }

    pub fn stop_markers(&self) -> &[Marker] {
        &self.stop_markers
    }

    pub fn search_markers(&self) -> &[Marker] {
        &self.search_markers
    }

    pub fn route_layers(&self) -> &[RouteLayer] {
        &self.route_layers
    }

    /// Replace the start marker (singleton, removed before re-adding).
    pub fn set_start_marker(&mut self, place: Option<&Place>) {
        self.start_marker = place.map(|p| Marker::for_place(MarkerKind::Start, p));
    }

    /// Replace the destination marker (singleton, removed before re-adding).
    pub fn set_destination_marker(&mut self, place: Option<&Place>) {
        self.destination_marker = place.map(|p| Marker::for_place(MarkerKind::Destination, p));
    }

    /// Remove-all, rebuild-all for interior stop markers. Stop counts are
    /// single-digit, so the redundant churn is cheaper than per-marker diffs.
    pub fn rebuild_stop_markers<'a, I>(&mut self, stops: I)
    where
        I: IntoIterator<Item = &'a Place>,
    {
        self.stop_markers.clear();
        self.stop_markers.extend(
            stops
                .into_iter()
                .map(|place| Marker::for_place(MarkerKind::Stop, place)),
        );
    }

    /// Replace the search overlay markers with one batch of the given kind.
    pub fn set_search_markers(&mut self, kind: MarkerKind, places: &[Place]) {
        self.search_markers = places
            .iter()
            .map(|place| Marker::for_place(kind, place))
            .collect();
    }

    pub fn clear_search_markers(&mut self) {
        self.search_markers.clear();
    }

    /// Replace all route leg layers, one per leg, colors cycled.
    pub fn set_route_layers(&mut self, legs: &[RouteLeg]) {
        self.route_layers.clear();
        for (index, leg) in legs.iter().enumerate() {
            if leg.line_string.is_empty() {
                continue;
            }
            self.route_layers.push(RouteLayer {
                id: format!("route-leg-{}", index),
                color: ROUTE_LEG_COLORS[index % ROUTE_LEG_COLORS.len()],
                geometry: line_feature(&leg.line_string),
            });
        }
    }

    pub fn clear_route_layers(&mut self) {
        self.route_layers.clear();
    }

    pub fn fly_to(&mut self, center: [f64; 2], zoom: f64) {
        self.camera = Camera { center, zoom };
    }

    /// Fit the viewport to a bounding box and remember it for later refits.
    pub fn fit_bounds(&mut self, bounds: Bounds) {
        self.camera.center = bounds.center();
        self.bounds = Some(bounds);
    }
}

fn line_feature(coords: &[[f64; 2]]) -> Feature {
    let line = Value::LineString(coords.iter().map(|c| vec![c[0], c[1]]).collect());
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(line)),
        id: None,
        properties: None,
        foreign_members: None,
    }
}
