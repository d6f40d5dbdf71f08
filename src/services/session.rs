// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token management for the location provider and trip backend.
//!
//! The auth service itself is external; this layer only caches the bearer
//! token it issues and refreshes proactively so provider calls never go out
//! with a token about to lapse.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::error::Result;

/// Margin before token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// A bearer token plus its expiry, as issued by the auth service.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Anything that can hand out a currently valid bearer token.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String>;
}

/// The external auth backend that mints fresh tokens.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<SessionToken>;
}

/// Caching session layer.
///
/// Serves the cached token while it is comfortably inside its validity
/// window. The cache lock is held across a refresh, so concurrent callers
/// wait for the single in-flight fetch and then see the fresh token instead
/// of each hitting the auth service.
pub struct CachedSession<S> {
    source: S,
    cached: Mutex<Option<SessionToken>>,
}

impl<S: TokenSource> CachedSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: Mutex::new(None),
        }
    }

    /// A bearer token valid for at least the refresh margin.
    pub async fn current_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        let margin = Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);

        if let Some(token) = cached.as_ref() {
            if now + margin < token.expires_at {
                return Ok(token.token.clone());
            }
        }

        tracing::info!("Session token missing or expiring, refreshing");
        let fresh = self.source.fetch_token().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}

#[async_trait]
impl<S: TokenSource> SessionProvider for CachedSession<S> {
    async fn bearer_token(&self) -> Result<String> {
        self.current_token().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSource {
        fetches: AtomicUsize,
        lifetime_secs: i64,
    }

    #[async_trait]
    impl TokenSource for CountingSource {
        async fn fetch_token(&self) -> Result<SessionToken> {
            let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(SessionToken {
                token: format!("token-{}", n),
                expires_at: Utc::now() + Duration::seconds(self.lifetime_secs),
            })
        }
    }

    fn session(lifetime_secs: i64) -> CachedSession<CountingSource> {
        CachedSession::new(CountingSource {
            fetches: AtomicUsize::new(0),
            lifetime_secs,
        })
    }

    #[tokio::test]
    async fn test_valid_token_served_from_cache() {
        let session = session(3600);

        assert_eq!(session.current_token().await.unwrap(), "token-1");
        assert_eq!(session.current_token().await.unwrap(), "token-1");
        assert_eq!(session.source.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_token_inside_margin_is_refreshed() {
        // Lifetime shorter than the refresh margin, so every call refreshes
        let session = session(60);

        assert_eq!(session.current_token().await.unwrap(), "token-1");
        assert_eq!(session.current_token().await.unwrap(), "token-2");
        assert_eq!(session.source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let session = Arc::new(session(3600));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let session = Arc::clone(&session);
                tokio::spawn(async move { session.current_token().await.unwrap() })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap(), "token-1");
        }
        assert_eq!(session.source.fetches.load(Ordering::SeqCst), 1);
    }
}
