//! Error types for the queue API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! error body has the shape `{ "error", "status" }`, plus `"details"` with
//! per-field messages for validation failures.

use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use validator::ValidationErrors;
use walkin_core::{SettingError, StoreError};

/// Errors that can occur in the queue API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request body was not valid JSON for the endpoint.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The body parsed but failed field validation.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// An invalid query parameter was provided.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A numeric id could not be parsed from the request path.
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// A setting value has the wrong format for its key.
    #[error("invalid setting: {0}")]
    InvalidSetting(#[from] SettingError),

    /// The request conflicts with current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidQuery(rejection.body_text())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateStaff { .. } => Self::Conflict(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::InvalidBody(msg) | Self::InvalidQuery(msg) | Self::InvalidId(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "invalid request data".to_owned()),
            Self::InvalidSetting(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let mut body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });
        if let Self::Validation(errors) = &self
            && let Some(obj) = body.as_object_mut()
        {
            obj.insert("details".to_owned(), field_messages(errors));
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Flatten validation errors into `{ field: [message, ...] }`.
fn field_messages(errors: &ValidationErrors) -> serde_json::Value {
    let fields: BTreeMap<String, Vec<String>> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), ToString::to_string)
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect();
    serde_json::json!(fields)
}
