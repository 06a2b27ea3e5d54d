//! Error type returned by every REST handler.
//!
//! Client errors carry their message in the response body. Upstream and
//! database failures are logged with their full source chain and answered
//! with a generic message.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::api::dto::ErrorResponse;
use crate::services::assistant::ReplyError;
use crate::services::llm_client::LlmClientError;
use crate::storage::repository::RepositoryError;

pub const CONVERSATION_NOT_FOUND: &str = "Conversation not found";

#[derive(Debug, Error)]
pub enum ApiError {
    /// The referenced conversation does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Body(#[from] JsonRejection),

    #[error(transparent)]
    Path(#[from] PathRejection),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error("LLM call failed")]
    Upstream(#[source] LlmClientError),

    #[error("database error: {0}")]
    Database(#[source] sea_orm::DbErr),
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(_) => ApiError::NotFound(CONVERSATION_NOT_FOUND.to_string()),
            RepositoryError::DbError(db) => ApiError::Database(db),
        }
    }
}

impl From<ReplyError> for ApiError {
    fn from(e: ReplyError) -> Self {
        match e {
            ReplyError::Repository(repo) => repo.into(),
            ReplyError::EmptyHistory => ApiError::InvalidRequest(ReplyError::EmptyHistory.to_string()),
            ReplyError::Llm(source) => ApiError::Upstream(source),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::Path(rejection) => rejection.status(),
            ApiError::Query(rejection) => rejection.status(),
            ApiError::Upstream(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            ApiError::NotFound(m) | ApiError::InvalidRequest(m) => m.clone(),
            ApiError::Validation(e) => e.to_string(),
            ApiError::Body(rejection) => rejection.body_text(),
            ApiError::Path(rejection) => rejection.body_text(),
            ApiError::Query(rejection) => rejection.body_text(),
            ApiError::Upstream(source) => {
                tracing::error!(error = %source, "LLM call failed");
                self.to_string()
            }
            ApiError::Database(source) => {
                tracing::error!(error = %source, "database error");
                "internal server error".to_string()
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}
