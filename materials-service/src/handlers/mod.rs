use axum::http::StatusCode;

use crate::models::ApiError;

pub mod download;
pub mod health;
pub mod upload;
pub mod validation;

/// OPTIONS: empty 200, CORS headers come from the route's layer
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
