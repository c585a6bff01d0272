// HTTP handlers: version, cache stats query, poll ingestion

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use bytes::Bytes;
use chrono::Utc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use super::AppState;
use crate::cache::PollResponse;
use crate::history::filter::{CacheStatFilter, CacheStatsParams};

pub(super) const NAME: &str = env!("CARGO_PKG_NAME");
pub(super) const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Time the poller spent on the request, in milliseconds.
pub(super) const REQUEST_DURATION_HEADER: &str = "x-request-duration-ms";
/// Transport failure reported by the poller instead of a payload.
pub(super) const POLL_ERROR_HEADER: &str = "x-poll-error";

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/cache-stats: filtered stat history of every known cache.
pub(super) async fn cache_stats_handler(
    State(state): State<AppState>,
    Query(params): Query<CacheStatsParams>,
    RawQuery(raw_query): RawQuery,
) -> impl IntoResponse {
    let topology = state.topology.load();
    let filter = CacheStatFilter::new(&params, topology.clone());
    match state.history.marshal(
        &topology.monitor_config,
        &filter,
        raw_query.as_deref().unwrap_or_default(),
    ) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, operation = "cache_stats", "marshalling cache stats");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// POST /api/cache-stats/{cache}: one finished poll of `cache`, pushed by the poller.
/// An empty body with no error header counts as a poll without payload.
pub(super) async fn ingest_handler(
    State(state): State<AppState>,
    Path(cache): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let request_time = headers
        .get(REQUEST_DURATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or_default();
    let error = headers
        .get(POLL_ERROR_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let poll = PollResponse {
        cache_id: cache,
        body: (!body.is_empty()).then_some(body),
        request_time,
        completed_at: Utc::now(),
        error,
        poll_id: state.poll_seq.fetch_add(1, Ordering::Relaxed) + 1,
        poll_finished: None,
    };
    state.handler.handle(poll).await;
    StatusCode::ACCEPTED
}
