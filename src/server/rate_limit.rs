//! Per-client token bucket rate limiting

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::RateLimitConfig;
use crate::server::AppState;

#[derive(Debug, Clone)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Token buckets keyed by client address
#[derive(Default)]
pub struct RateLimiter {
    buckets: Mutex<HashMap<String, Bucket>>,
}

impl RateLimiter {
    /// Takes one token from `key`'s bucket, refilling it for the time elapsed
    /// since the last call. Returns false when the bucket is drained.
    pub async fn allow(&self, key: &str, cfg: &RateLimitConfig) -> bool {
        let now = Instant::now();
        let mut buckets = self.buckets.lock().await;
        let bucket = buckets.entry(key.to_string()).or_insert_with(|| Bucket {
            tokens: cfg.capacity,
            last_refill: now,
        });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.last_refill = now;
        bucket.tokens = (bucket.tokens + elapsed * cfg.refill_per_sec).min(cfg.capacity);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Middleware rejecting requests from clients that drained their bucket
pub async fn enforce(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.rate_limit.enabled {
        return next.run(request).await;
    }

    // ConnectInfo is absent when the router is driven without a real
    // listener (tests); those requests share one bucket.
    let key = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if state.limiter.allow(&key, &state.rate_limit).await {
        next.run(request).await
    } else {
        debug!(client = %key, "rate limit exceeded");
        (StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(capacity: f64, refill_per_sec: f64) -> RateLimitConfig {
        RateLimitConfig {
            enabled: true,
            capacity,
            refill_per_sec,
        }
    }

    #[tokio::test]
    async fn allows_up_to_capacity_then_rejects() {
        let limiter = RateLimiter::default();
        let cfg = config(2.0, 0.0);

        assert!(limiter.allow("10.0.0.1", &cfg).await);
        assert!(limiter.allow("10.0.0.1", &cfg).await);
        assert!(!limiter.allow("10.0.0.1", &cfg).await);
    }

    #[tokio::test]
    async fn buckets_are_independent_per_client() {
        let limiter = RateLimiter::default();
        let cfg = config(1.0, 0.0);

        assert!(limiter.allow("10.0.0.1", &cfg).await);
        assert!(!limiter.allow("10.0.0.1", &cfg).await);
        assert!(limiter.allow("10.0.0.2", &cfg).await);
    }

    #[tokio::test]
    async fn drained_bucket_refills_over_time() {
        let limiter = RateLimiter::default();
        let cfg = config(1.0, 50.0);

        assert!(limiter.allow("10.0.0.1", &cfg).await);
        assert!(!limiter.allow("10.0.0.1", &cfg).await);

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(limiter.allow("10.0.0.1", &cfg).await);
    }
}
