use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors a handler can surface to the caller.
///
/// Tracking input problems are not errors (the normalizer substitutes
/// sentinels) and neither are webhook failures (reported out-of-band).
/// What is left is a request the server could not read at all.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
    #[error("{0}")]
    Internal(String),
}

/// Failure body, the counterpart of `{"success": true, ...}`.
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);
        let body = Json(ErrorBody {
            success: false,
            error: self.to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
