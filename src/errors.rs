use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::services::emission_analytics::AnalyticsError;

/// Errors surfaced by the resource services and their HTTP handlers
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Analytics(AnalyticsError::InvalidRange { .. }) => StatusCode::BAD_REQUEST,
            AppError::Analytics(AnalyticsError::InvalidGoal(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Auth(err) => err.status_code(),
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Analytics(AnalyticsError::InvalidRange { .. }) => "INVALID_RANGE",
            AppError::Analytics(AnalyticsError::InvalidGoal(_)) => "INVALID_GOAL",
            AppError::Auth(_) => "UNAUTHORIZED",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Auth(err) = self {
            return err.into_response();
        }

        let status = self.status_code();
        // Storage and internal failures are logged, not echoed to the client.
        let message = match &self {
            AppError::Database(err) => {
                tracing::error!("Database error: {}", err);
                "Something went wrong".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                "Something went wrong".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": self.error_code(),
            "message": message,
        }));

        (status, body).into_response()
    }
}
