//! HTTP error responses

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contact_core::{ContactError, FieldError};
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Contact(#[from] ContactError),

    /// Body could not be read as a JSON object
    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Contact(e) => match e {
                ContactError::Validation(_) => StatusCode::BAD_REQUEST,
                ContactError::InvalidId(_) => StatusCode::BAD_REQUEST,
                ContactError::NotFound(_) => StatusCode::NOT_FOUND,
                ContactError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Contact(ContactError::Validation(errors)) => Self {
                message: "Validation failed".to_string(),
                errors,
            },
            ApiError::Contact(ContactError::NotFound(_)) => Self {
                message: "Contact not found".to_string(),
                errors: Vec::new(),
            },
            ApiError::Contact(ContactError::Storage(message)) => Self {
                message,
                errors: Vec::new(),
            },
            other => Self {
                message: other.to_string(),
                errors: Vec::new(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
