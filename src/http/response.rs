//! Response envelopes and the mapping from errors to status codes.
//!
//! Success bodies are `{"data": ...}`. Error bodies are
//! `{"code": ..., "message": ..., "fields": [...]}` where `code` is the
//! status reason in snake case (`not_found`, `bad_request`, ...) and
//! `fields` only appears for validation failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::ServiceError;
use crate::user::FieldViolation;

pub const MSG_UNAUTHORIZED: &str = "don't have permission to make the request";
pub const MSG_INVALID_ID: &str = "invalid ID";
pub const MSG_INVALID_FIELDS: &str = "some fields are invalid";
pub const MSG_NOT_FOUND: &str = "user not found";
pub const MSG_INTERNAL: &str = "an internal error occurred";

/// Success envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldViolation>,
}

/// Everything a handler can fail with.
#[derive(Debug)]
pub enum HttpError {
    /// Missing or rejected bearer token.
    Unauthorized,
    /// The `:id` path segment is not a positive integer.
    InvalidId(String),
    /// The request body could not be decoded.
    InvalidBody(String),
    Service(ServiceError),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        HttpError::Service(err)
    }
}

/// `Not Found` -> `not_found`.
pub fn status_code_name(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("unknown")
        .to_ascii_lowercase()
        .replace(' ', "_")
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::Unauthorized => StatusCode::UNAUTHORIZED,
            HttpError::InvalidId(_) | HttpError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            HttpError::Service(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    fn body(self) -> ErrorBody {
        let status = self.status();
        let (message, fields) = match self {
            HttpError::Unauthorized => (MSG_UNAUTHORIZED.to_string(), Vec::new()),
            HttpError::InvalidId(raw) => {
                debug!(raw = %raw, "invalid id in path");
                (MSG_INVALID_ID.to_string(), Vec::new())
            }
            HttpError::InvalidBody(msg) => (msg, Vec::new()),
            HttpError::Service(ServiceError::NotFound(_)) => (MSG_NOT_FOUND.to_string(), Vec::new()),
            HttpError::Service(ServiceError::Validation(fields)) => {
                (MSG_INVALID_FIELDS.to_string(), fields)
            }
            HttpError::Service(ServiceError::InvalidInput(msg)) => (msg, Vec::new()),
            HttpError::Service(ServiceError::Filter(e)) => (e.to_string(), Vec::new()),
            HttpError::Service(ServiceError::Store(e)) => {
                error!(error = %e, "store failure");
                (MSG_INTERNAL.to_string(), Vec::new())
            }
            HttpError::Service(ServiceError::IdsExhausted) => {
                error!("user ids exhausted");
                (MSG_INTERNAL.to_string(), Vec::new())
            }
        };
        ErrorBody {
            code: status_code_name(status),
            message,
            fields,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.body())).into_response()
    }
}
