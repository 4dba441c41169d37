use crate::price_service::CalculateError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use skindex_api_types::result::JsonError;
use skindex_db::IndexError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error("market data provider error: {0}")]
    Market(#[from] csmarket::Error),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<CalculateError> for ApiError {
    fn from(error: CalculateError) -> Self {
        match error {
            CalculateError::Index(e) => ApiError::Index(e),
            CalculateError::Market(e) => ApiError::Market(e),
        }
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Index(IndexError::NotFound(_)) | ApiError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Index(IndexError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Index(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Market(_) => StatusCode::BAD_GATEWAY,
            ApiError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("request failed: {self}");
        }
        (
            status,
            Json(JsonError {
                error_message: self.to_string(),
            }),
        )
            .into_response()
    }
}
