// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Unique-by-id suggestion accumulation.

use std::collections::HashMap;

use crate::models::place::Suggestion;

/// Insertion-ordered collection of suggestions, unique by provider place id.
///
/// Fan-out queries finish in any order, so the merge has to be commutative
/// and idempotent: re-inserting an id overwrites the stored record (last
/// write wins) without growing the set, and the set only grows on new ids.
#[derive(Debug, Clone, Default)]
pub struct SuggestionSet {
    entries: Vec<Suggestion>,
    index: HashMap<String, usize>,
}

impl SuggestionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one suggestion. The record for an already-seen id is replaced
    /// in place so the visible list does not jump around.
    pub fn insert(&mut self, suggestion: Suggestion) {
        match self.index.get(&suggestion.place_id) {
            Some(&position) => self.entries[position] = suggestion,
            None => {
                self.index
                    .insert(suggestion.place_id.clone(), self.entries.len());
                self.entries.push(suggestion);
            }
        }
    }

    /// Merge a whole query batch.
    pub fn merge<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = Suggestion>,
    {
        for suggestion in batch {
            self.insert(suggestion);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn as_slice(&self) -> &[Suggestion] {
        &self.entries
    }

    pub fn to_vec(&self) -> Vec<Suggestion> {
        self.entries.clone()
    }
}
