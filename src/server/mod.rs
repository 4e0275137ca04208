//! HTTP routing layer
//!
//! A thin adapter over the resolution core: parses path parameters, calls the
//! resolver, and translates its results into redirects and HTTP status codes.
//! No resolution logic lives here.

pub mod rate_limit;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;

use crate::config::RateLimitConfig;
use crate::server::rate_limit::RateLimiter;
use crate::version::resolver::VersionResolver;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<VersionResolver>,
    pub limiter: Arc<RateLimiter>,
    pub rate_limit: RateLimitConfig,
}

impl AppState {
    pub fn new(resolver: VersionResolver, rate_limit: RateLimitConfig) -> Self {
        Self {
            resolver: Arc::new(resolver),
            limiter: Arc::new(RateLimiter::default()),
            rate_limit,
        }
    }
}

/// Builds the service router
///
/// The catch-all `/{version}` route does not shadow `/latest/{channel}`;
/// axum prefers the more specific match.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/latest/{channel}", get(routes::latest))
        .route("/{version}", get(routes::by_id))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::enforce,
        ))
        .with_state(state)
}
