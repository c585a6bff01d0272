// HTTP routes

mod http;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tower_http::cors::{Any, CorsLayer};

use crate::cache::Handler;
use crate::history::HistoryStore;
use crate::topology::SharedTopology;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) handler: Handler,
    pub(crate) history: Arc<HistoryStore>,
    pub(crate) topology: SharedTopology,
    /// Source of poll ids for pushed polls.
    pub(crate) poll_seq: Arc<AtomicU64>,
}

pub fn app(handler: Handler, history: Arc<HistoryStore>, topology: SharedTopology) -> Router {
    let state = AppState {
        handler,
        history,
        topology,
        poll_seq: Arc::new(AtomicU64::new(0)),
    };
    Router::new()
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/cache-stats", get(http::cache_stats_handler)) // GET /api/cache-stats
        // POST /api/cache-stats/{cache}
        .route("/api/cache-stats/{cache}", post(http::ingest_handler))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
