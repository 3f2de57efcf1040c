//! Mapping of pipeline failures onto HTTP responses.
//!
//! External-call failures become 500 `{message, error}`; an orphaned
//! admission also reports the id it left behind. Unsupported methods
//! become 405 `{message}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::PipelineError;
use crate::model::RequestId;

pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method Not Allowed";

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    request_id: Option<RequestId>,
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let (status, message, request_id) = match &self {
            PipelineError::Persist { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to record request",
                None,
            ),
            PipelineError::Publish { request_id, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Request recorded but could not be sent to queue",
                Some(*request_id),
            ),
            PipelineError::Query { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list requests",
                None,
            ),
            PipelineError::UnsupportedOperation { method } => {
                tracing::debug!(%method, "rejected unsupported method");
                (StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE, None)
            }
        };

        let error = self.cause().map(ToString::to_string);
        if let Some(ref cause) = error {
            tracing::error!(stage = ?self.stage(), error = %cause, "request failed");
        }

        let body = ErrorBody {
            message,
            error,
            request_id,
        };
        (status, Json(body)).into_response()
    }
}
