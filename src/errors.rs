use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Access token unavailable")]
    TokenUnavailable,

    #[error("Image host unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Image host rejected the request: {0}")]
    UpstreamRejected(String),

    /// Raised by cache backends that can fail. The in-process backend never does.
    #[allow(dead_code)]
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Document store error: {0}")]
    StoreUnavailable(#[from] mongodb::error::Error),

    #[error("No image file provided")]
    NoFileProvided,

    #[error("Invalid input: {0}")]
    UnprocessableEntity(String),

    #[error("Internal server error")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::TokenUnavailable => {
                tracing::warn!("Access token unavailable, redirecting to home page");
                return Redirect::to("/").into_response();
            }
            AppError::UpstreamUnavailable(message) => {
                tracing::error!("Image host unavailable: {}", message);
                (
                    StatusCode::BAD_GATEWAY,
                    "Image host is currently unavailable".to_string(),
                )
            }
            AppError::UpstreamRejected(message) => {
                tracing::error!("Image host rejected the request: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Image host rejected the request".to_string(),
                )
            }
            AppError::CacheUnavailable(message) => {
                tracing::error!("Cache unavailable: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::StoreUnavailable(store_error) => {
                tracing::error!("Document store error: {:?}", store_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::NoFileProvided => (
                StatusCode::BAD_REQUEST,
                "No image file provided".to_string(),
            ),
            AppError::UnprocessableEntity(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::InternalServerError(message) => {
                tracing::error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        tracing::error!("Multipart processing error: {:?}", err);
        AppError::UnprocessableEntity(format!("Could not read form data: {}", err))
    }
}
