use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use courierds_config::RateLimitConfig;
use courierds_core::AppError;
use governor::{
    DefaultKeyedRateLimiter, RateLimiter,
    clock::{Clock, DefaultClock},
};
use tracing::warn;

use crate::metrics::track_rate_limited;
use crate::state::AppState;

/// Token bucket per client IP for the credential endpoints.
pub struct AuthRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl AuthRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            limiter: RateLimiter::keyed(config.auth_quota()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Option<Arc<Self>> {
        config.enabled.then(|| Arc::new(Self::new(config)))
    }

    /// Takes one token for `key`, or returns how long until one is available.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.limiter
            .check_key(&key.to_string())
            .map_err(|not_until| not_until.wait_time_from(DefaultClock::default().now()))
    }

    /// Drops buckets that have refilled completely.
    pub fn purge_stale(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

impl fmt::Debug for AuthRateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRateLimiter")
            .field("tracked_clients", &self.tracked_clients())
            .finish()
    }
}

/// Peer address when the server was started with connect info, otherwise
/// the first `X-Forwarded-For` entry or `X-Real-IP`.
pub fn client_key(peer: Option<SocketAddr>, headers: &HeaderMap) -> String {
    if let Some(addr) = peer {
        return addr.ip().to_string();
    }

    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(limiter) = state.auth_rate_limiter.as_ref() else {
        return next.run(req).await;
    };

    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_key(peer, req.headers());

    match limiter.check(&key) {
        Ok(()) => next.run(req).await,
        Err(wait) => {
            let retry_after = wait.as_secs().max(1);
            warn!(client = %key, path = %req.uri().path(), retry_after, "Rate limit exceeded");
            track_rate_limited(req.uri().path());
            AppError::too_many_requests(retry_after).into_response()
        }
    }
}
