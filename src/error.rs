// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types shared across the planner.

/// Error type for everything the planner can fail at.
///
/// Nothing here is fatal: provider failures degrade to a logged, visible
/// UI state and the waypoint workflow stays usable.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Session expired, sign in again")]
    SessionExpired,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Location provider error: {0}")]
    Location(String),

    #[error("Trip API error: {0}")]
    TripApi(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the user has to go back through sign-in to recover.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, AppError::Unauthorized | AppError::SessionExpired)
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
