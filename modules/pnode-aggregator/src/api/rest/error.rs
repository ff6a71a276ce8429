use super::dto::ErrorBody;
use crate::contract::AggregatorError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// HTTP mapping of [`AggregatorError`]
#[derive(Debug)]
pub struct ApiError(pub AggregatorError);

impl From<AggregatorError> for ApiError {
    fn from(e: AggregatorError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AggregatorError::Validation(_) => StatusCode::BAD_REQUEST,
            AggregatorError::Seed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = ErrorBody {
            success: false,
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
