//! Per-client request quota

use crate::error::ApiError;
use axum::{
    extract::{ConnectInfo, MatchedPath, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// How often replenished per-client state is dropped
pub const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Quota keyed by client address and route template
pub type ClientRateLimiter = DefaultKeyedRateLimiter<String>;

/// Limiter allowing `per_minute` requests per key, or `None` when disabled
pub fn client_limiter(per_minute: u32) -> Option<Arc<ClientRateLimiter>> {
    NonZeroU32::new(per_minute).map(|n| Arc::new(RateLimiter::keyed(Quota::per_minute(n))))
}

/// Periodically forget clients whose quota has fully replenished.
/// Keyed limiters never shrink on their own.
pub fn spawn_pruner(limiter: Arc<ClientRateLimiter>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            limiter.retain_recent();
            limiter.shrink_to_fit();
            tracing::trace!(keys = limiter.len(), "Pruned rate limiter state");
        }
    })
}

// The route template, not the raw path: ids in the URI are client-chosen.
fn client_key(request: &Request) -> String {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or("unmatched");
    format!("{}:{}", ip, route)
}

pub async fn rate_limit(
    State(limiter): State<Arc<ClientRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);
    if limiter.check_key(&key).is_err() {
        tracing::debug!(key = %key, "Rate limit exceeded");
        return ApiError::TooManyRequests.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_disables() {
        assert!(client_limiter(0).is_none());
    }

    #[test]
    fn test_quota_exhausts_per_key() {
        let limiter = client_limiter(2).unwrap();
        let key = "127.0.0.1:/api/v1/agents".to_string();
        assert!(limiter.check_key(&key).is_ok());
        assert!(limiter.check_key(&key).is_ok());
        assert!(limiter.check_key(&key).is_err());

        let other = "127.0.0.2:/api/v1/agents".to_string();
        assert!(limiter.check_key(&other).is_ok());
    }

    #[tokio::test]
    async fn test_key_uses_route_template() {
        use axum::{body::Body, http, routing::get, Router};
        use tower::ServiceExt;

        let limiter = client_limiter(10_000).unwrap();
        let app = Router::new()
            .route("/agents/:id", get(|| async { "ok" }))
            .route_layer(axum::middleware::from_fn_with_state(
                limiter.clone(),
                rate_limit,
            ));

        for id in 1..=500 {
            let request = http::Request::builder()
                .uri(format!("/agents/{}", id))
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), http::StatusCode::OK);
        }

        assert_eq!(limiter.len(), 1);
    }

    #[tokio::test]
    async fn test_pruner_drops_replenished_clients() {
        // one cell per millisecond, so a single request replenishes almost at once
        let limiter = client_limiter(60_000).unwrap();
        limiter.check_key(&"10.0.0.1:/agents/:id".to_string()).unwrap();
        limiter.check_key(&"10.0.0.2:/agents/:id".to_string()).unwrap();
        assert_eq!(limiter.len(), 2);

        let pruner = spawn_pruner(limiter.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(200)).await;
        pruner.abort();

        assert!(limiter.is_empty());
    }
}
