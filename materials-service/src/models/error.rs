use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NO_FILE_MESSAGE: &str = "Nenhum arquivo enviado";
pub const MISSING_ID_MESSAGE: &str = "ID do material é obrigatório";
pub const NOT_FOUND_MESSAGE: &str = "Material não encontrado";

/// Errors returned to HTTP clients as `{"error": "..."}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Método não permitido")]
    MethodNotAllowed,

    /// Backend failure reported behind the generic server-error prefix
    #[error("Erro interno do servidor: {0}")]
    Internal(String),

    /// Backend failure reported with the raw backend message
    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    pub fn no_file() -> Self {
        ApiError::BadRequest(NO_FILE_MESSAGE.to_string())
    }

    pub fn missing_id() -> Self {
        ApiError::BadRequest(MISSING_ID_MESSAGE.to_string())
    }

    pub fn material_not_found() -> Self {
        ApiError::NotFound(NOT_FOUND_MESSAGE.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
