//! Shared error handling for the token endpoints.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Endpoint error with automatic response conversion. Validation failures
/// carry client-facing messages; infrastructure failures carry nothing and
/// log their details instead.
pub enum ApiError {
    /// 400 with one or more messages in `{"errors": [..]}`.
    Validation(Vec<String>),
    /// 500 with a generic body.
    Internal,
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(vec![msg.into()])
    }

    pub fn internal(context: &str, e: impl std::fmt::Display) -> Self {
        error!("{}: {}", context, e);
        Self::Internal
    }
}

#[derive(Serialize)]
struct ErrorsResponse {
    errors: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, errors) = match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, errors),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                vec!["Internal server error".to_string()],
            ),
        };
        (status, Json(ErrorsResponse { errors })).into_response()
    }
}
