//! # HTTP Errors
//!
//! Maps ingest failures onto status codes. The error text is returned to
//! the client verbatim.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::ingest::{ErrorClass, IngestError};

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP boundary errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Multipart body has no part with the expected name
    #[error("Missing file field '{0}'")]
    MissingFile(&'static str),

    /// Multipart body could not be read
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Ingest(e) => match e.class() {
                ErrorClass::UnknownTable => StatusCode::BAD_REQUEST,
                ErrorClass::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorClass::NotFound => StatusCode::NOT_FOUND,
                ErrorClass::ServerFault => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::MissingFile(_) | ApiError::InvalidUpload(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Ingest(e) => e.client_message(),
            other => other.to_string(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
