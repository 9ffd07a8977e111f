//! Error types for the bookshelf server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::remote::RemoteError;

/// Application error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    BadValue = 1,
    NoSuchData = 2,
    RemoteUnavailable = 3,
    RemoteFailure = 4,
    LocalOnly = 5,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The entity only exists locally and the operation needs the remote
    #[error("Local-only entity: {0}")]
    LocalOnly(String),

    /// A read could not be served by the remote and has no local answer
    #[error("Remote catalog unavailable: {0}")]
    RemoteUnavailable(#[source] RemoteError),

    /// A remote write the caller must hear about (delete, update)
    #[error("Remote catalog error: {0}")]
    Remote(#[source] RemoteError),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg.clone()),
            AppError::LocalOnly(msg) => (StatusCode::CONFLICT, ErrorCode::LocalOnly, msg.clone()),
            AppError::RemoteUnavailable(e) => {
                tracing::warn!("Remote unavailable: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorCode::RemoteUnavailable,
                    e.to_string(),
                )
            }
            AppError::Remote(e) => {
                tracing::error!("Remote error: {}", e);
                (StatusCode::BAD_GATEWAY, ErrorCode::RemoteFailure, e.to_string())
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
