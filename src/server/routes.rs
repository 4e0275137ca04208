//! Request handlers
//!
//! Each handler resolves an identifier through the core and answers with a
//! 302 redirect to the server artifact, or with the status code matching the
//! failure kind: 502 for upstream failures, 500 for validation failures, 404
//! when the requested version does not exist.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::warn;

use crate::server::AppState;
use crate::version::error::ResolveError;
use crate::version::types::Channel;

pub async fn index() -> &'static str {
    concat!("version-gateway ", env!("CARGO_PKG_VERSION"))
}

/// `GET /latest/{channel}` — redirect to the current version of a channel
pub async fn latest(State(state): State<AppState>, Path(channel): Path<String>) -> Response {
    // Input validation happens here, before the core is reached
    let Ok(channel) = channel.parse::<Channel>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "bad_channel",
                "message": "channel must be \"release\" or \"snapshot\"",
            })),
        )
            .into_response();
    };

    match state.resolver.get_latest(channel).await {
        Ok(details) => found_redirect(&details.downloads.server.url),
        Err(err) => error_response(err),
    }
}

/// `GET /{version}` — redirect to an explicit version id
pub async fn by_id(State(state): State<AppState>, Path(version): Path<String>) -> Response {
    match state.resolver.get_version_details(&version).await {
        Ok(details) => found_redirect(&details.downloads.server.url),
        Err(err) => error_response(err),
    }
}

fn found_redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            let mut response = StatusCode::FOUND.into_response();
            response.headers_mut().insert(header::LOCATION, value);
            response
        }
        // An artifact URL that is not a valid header value means the
        // upstream record is unusable
        Err(_) => {
            warn!(location, "artifact URL is not a valid Location header");
            error_response(ResolveError::Validation(format!(
                "artifact URL is not a valid redirect target: {location}"
            )))
        }
    }
}

/// Maps each failure kind to its status code, keeping the kinds distinct
fn error_response(err: ResolveError) -> Response {
    match err {
        ResolveError::Upstream { code, status, body } => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "error": "upstream",
                "message": format!("upstream returned {code} {status}"),
                "upstreamBody": body,
            })),
        )
            .into_response(),
        ResolveError::Validation(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "validation",
                "message": message,
            })),
        )
            .into_response(),
        ResolveError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": format!("version not found: {id}"),
            })),
        )
            .into_response(),
    }
}
