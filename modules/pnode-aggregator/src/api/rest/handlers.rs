//! REST handlers for the pNode aggregator.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};

use super::dto::{ApiEnvelope, PodsData, StatsData};
use super::error::ApiError;
use crate::contract::AggregatorError;
use crate::contract::client::PodsApi;

pub type ApiResult<T> = Result<Json<ApiEnvelope<T>>, ApiError>;

/// GET /api/pods
///
/// Current network view, served from cache while fresh.
pub async fn list_pods(Extension(api): Extension<Arc<dyn PodsApi>>) -> ApiResult<PodsData> {
    let pods = api.current_view().await?;
    Ok(Json(ApiEnvelope::ok(pods.into())))
}

/// POST /api/refresh
///
/// Rebuild the view regardless of cache state.
pub async fn refresh_pods(Extension(api): Extension<Arc<dyn PodsApi>>) -> ApiResult<PodsData> {
    let pods = api.force_refresh().await?;
    Ok(Json(ApiEnvelope::ok(pods.into())))
}

/// GET /api/stats/{address}
pub async fn node_stats(
    Extension(api): Extension<Arc<dyn PodsApi>>,
    Path(address): Path<String>,
) -> ApiResult<StatsData> {
    let stats = api.node_stats(&address).await?;
    Ok(Json(ApiEnvelope::ok(StatsData { stats })))
}

/// GET /api/stats
pub async fn node_stats_missing_address() -> ApiError {
    ApiError(AggregatorError::Validation(
        "address parameter is required".to_owned(),
    ))
}
