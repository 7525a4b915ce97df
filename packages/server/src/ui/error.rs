//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    infrastructure::dto::http::ErrorResponse,
    usecase::{ListConversationError, PostMessageError},
};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorResponse {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<PostMessageError> for ApiError {
    fn from(err: PostMessageError) -> Self {
        match err {
            PostMessageError::Storage(detail) => ApiError::Internal(detail),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<ListConversationError> for ApiError {
    fn from(err: ListConversationError) -> Self {
        match err {
            ListConversationError::Storage(detail) => ApiError::Internal(detail),
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}
