use axum::routing::{get, post};
use axum::{Extension, Router};
use std::sync::Arc;

use super::handlers;
use crate::contract::client::PodsApi;

/// Register all REST routes for the aggregator
pub fn register_routes(router: Router, api: Arc<dyn PodsApi>) -> Router {
    router
        .route("/api/pods", get(handlers::list_pods))
        .route("/api/refresh", post(handlers::refresh_pods))
        .route("/api/stats", get(handlers::node_stats_missing_address))
        .route("/api/stats/{address}", get(handlers::node_stats))
        .layer(Extension(api))
}
