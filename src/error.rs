use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::constants::*;
use crate::transaction::TransactionError;

/// Validation messages keyed by field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Not logged in")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.into()]);
        AppError::Validation(fields)
    }

    pub fn internal(context: &str) -> Self {
        AppError::Internal(context.to_string())
    }
}

impl From<TransactionError> for AppError {
    fn from(e: TransactionError) -> Self {
        match e {
            TransactionError::Begin => AppError::internal("failed to begin transaction"),
            TransactionError::Commit => AppError::internal("failed to commit transaction"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, fields) = match self {
            AppError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "The given data was invalid".to_string(),
                Some(fields),
            ),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, ERR_UNAUTHORIZED.to_string(), None),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ERR_INVALID_CREDENTIALS.to_string(),
                None,
            ),
            AppError::Forbidden => (StatusCode::FORBIDDEN, ERR_FORBIDDEN.to_string(), None),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Debt not found".to_string(), None),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            AppError::Database(e) => {
                error!("database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ERR_DATABASE_OPERATION.to_string(),
                    None,
                )
            }
            AppError::Internal(context) => {
                error!("internal error: {}", context);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message,
            fields,
        });

        (status, body).into_response()
    }
}
