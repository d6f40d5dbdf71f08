// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ordered trip stop list: start, interior stops, destination.

use serde::{Deserialize, Serialize};

use crate::models::place::Place;

/// Label given to a freshly added stop before the rider picks a place.
const NEW_STOP_LABEL: &str = "New stop";

/// One stop in a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Sequential id, unique within the list, renumbered after edits
    pub id: u32,
    /// User-visible editable label (may be empty while unresolved)
    pub text: String,
    /// Resolved place, or `None` until a suggestion is selected
    pub place: Option<Place>,
}

impl Waypoint {
    fn blank(id: u32) -> Self {
        Self {
            id,
            text: String::new(),
            place: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.place.is_some()
    }
}

/// The ordered stop list.
///
/// Index 0 is always the start and the last index is always the destination,
/// regardless of how many stops sit between them. The list never shrinks
/// below two entries.
#[derive(Debug, Clone)]
pub struct WaypointList {
    entries: Vec<Waypoint>,
    /// Waypoint targeted by the next resolved selection (the focused field).
    active_id: Option<u32>,
}

impl Default for WaypointList {
    fn default() -> Self {
        Self::new()
    }
}

impl WaypointList {
    /// Two blank waypoints: start and destination.
    pub fn new() -> Self {
        Self {
            entries: vec![Waypoint::blank(1), Waypoint::blank(2)],
            active_id: None,
        }
    }

    /// Populate 1:1 from a loaded trip, deriving labels from resolved places.
    /// Unresolvable positions stay blank; fewer than two entries fall back to
    /// the blank start/destination pair.
    pub fn initialize(places: Vec<Option<Place>>) -> Self {
        let mut entries: Vec<Waypoint> = places
            .into_iter()
            .enumerate()
            .map(|(position, place)| Waypoint {
                id: position as u32 + 1,
                text: place
                    .as_ref()
                    .map(|p| p.label.clone())
                    .unwrap_or_default(),
                place,
            })
            .collect();

        while entries.len() < 2 {
            entries.push(Waypoint::blank(entries.len() as u32 + 1));
        }

        Self {
            entries,
            active_id: None,
        }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn start(&self) -> &Waypoint {
        &self.entries[0]
    }

    pub fn destination(&self) -> &Waypoint {
        &self.entries[self.entries.len() - 1]
    }

    /// Interior stops, i.e. everything strictly between start and destination.
    pub fn interior(&self) -> &[Waypoint] {
        &self.entries[1..self.entries.len() - 1]
    }

    pub fn get(&self, id: u32) -> Option<&Waypoint> {
        self.entries.iter().find(|w| w.id == id)
    }

    pub fn active_id(&self) -> Option<u32> {
        self.active_id
    }

    /// Mark the waypoint whose field has focus; ignored for unknown ids.
    pub fn set_active(&mut self, id: u32) {
        if self.get(id).is_some() {
            self.active_id = Some(id);
        }
    }

    /// Whether every waypoint carries a resolved place.
    pub fn is_fully_resolved(&self) -> bool {
        self.entries.iter().all(Waypoint::is_resolved)
    }

    /// Whether both endpoints are resolved (the route precondition).
    pub fn endpoints_resolved(&self) -> bool {
        self.start().is_resolved() && self.destination().is_resolved()
    }

    /// Update one waypoint's editable label without touching its resolution
    /// state. Returns `false` for unknown ids.
    pub fn set_text(&mut self, id: u32, text: &str) -> bool {
        match self.entries.iter_mut().find(|w| w.id == id) {
            Some(waypoint) => {
                waypoint.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Fill one waypoint's label and place together (suggestion selected).
    pub fn resolve(&mut self, id: u32, place: Place) -> bool {
        match self.entries.iter_mut().find(|w| w.id == id) {
            Some(waypoint) => {
                waypoint.text = place.label.clone();
                waypoint.place = Some(place);
                true
            }
            None => false,
        }
    }

    /// Insert a blank stop just before the destination.
    ///
    /// The new stop takes over the destination's old id and the destination
    /// moves to `max(id) + 1`; the new stop becomes the active target for the
    /// next resolved selection. Returns the new stop's id.
    pub fn add_stop(&mut self) -> u32 {
        let last = self.entries.len() - 1;
        let max_id = self.entries.iter().map(|w| w.id).max().unwrap_or(0);
        let inherited_id = self.entries[last].id;

        self.entries[last].id = max_id + 1;
        self.entries.insert(
            last,
            Waypoint {
                id: inherited_id,
                text: NEW_STOP_LABEL.to_string(),
                place: None,
            },
        );
        self.active_id = Some(inherited_id);
        inherited_id
    }

    /// Swap the waypoints at two positions and renumber ids to `1..=N`.
    ///
    /// This is a two-element swap, not a general move. Equal or out-of-range
    /// indices are a silent no-op. Returns whether a swap happened; the
    /// caller recomputes the route only when the list is fully resolved.
    pub fn reorder(&mut self, dragged: usize, drop: usize) -> bool {
        if dragged == drop || dragged >= self.entries.len() || drop >= self.entries.len() {
            return false;
        }
        self.entries.swap(dragged, drop);
        self.renumber();
        true
    }

    /// Remove one waypoint by id and renumber the survivors.
    ///
    /// A no-op while only start and destination remain; deleting endpoints is
    /// prevented at the call site, which only exposes delete on interior
    /// stops.
    pub fn delete(&mut self, id: u32) -> bool {
        if self.entries.len() <= 2 {
            return false;
        }
        let before = self.entries.len();
        self.entries.retain(|w| w.id != id);
        if self.entries.len() == before {
            return false;
        }
        if self.active_id == Some(id) {
            self.active_id = None;
        }
        self.renumber();
        true
    }

    fn renumber(&mut self) {
        for (position, waypoint) in self.entries.iter_mut().enumerate() {
            waypoint.id = position as u32 + 1;
        }
    }
}
