//! Candidate List Route
//!
//! `GET /domains.json` answers network-first: a fresh list when the
//! upstream document is usable, else the cached one. The `x-config-source`
//! header says which.
//!
//! The upstream URL must not resolve back to this route, or every request
//! fetches itself until the fetch timeout fires. Configuration validation
//! rejects the loopback forms of that loop; a public name that resolves
//! here cannot be detected.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::server::AppState;

/// Path the candidate list is served on
pub const DOMAINS_PATH: &str = "/domains.json";

/// Response header carrying the list's provenance
pub const CONFIG_SOURCE_HEADER: &str = "x-config-source";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub fn config_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(DOMAINS_PATH, get(domains_handler))
        .with_state(state)
}

async fn domains_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.engine.config_store().get_fresh_or_cached().await {
        Ok(snapshot) => {
            let mut response = Json(snapshot.candidates).into_response();
            response.headers_mut().insert(
                HeaderName::from_static(CONFIG_SOURCE_HEADER),
                HeaderValue::from_static(snapshot.provenance.as_str()),
            );
            response
        }
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: e.to_string(),
                code: e.code().to_string(),
            }),
        )
            .into_response(),
    }
}
