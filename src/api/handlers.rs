use axum::Json;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use super::state::AppState;
use crate::error::PipelineError;
use crate::model::{Request, RequestId};

pub const CREATED_MESSAGE: &str = "Request created and sent to queue";

/// Body of a successful `POST /requests`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    #[serde(rename = "requestId")]
    pub request_id: RequestId,
}

/// Body of a successful `GET /requests`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub requests: Vec<Request>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// `POST /requests`. The body, if any, is ignored.
pub async fn create_request(
    State(state): State<AppState>,
) -> Result<Json<CreatedResponse>, PipelineError> {
    let admission = state.admission.admit().await?;
    Ok(Json(CreatedResponse {
        message: CREATED_MESSAGE.to_string(),
        request_id: admission.request_id,
    }))
}

/// `GET /requests`.
pub async fn list_requests(
    State(state): State<AppState>,
) -> Result<Json<ListResponse>, PipelineError> {
    let requests = state.query.list_requests().await?;
    Ok(Json(ListResponse { requests }))
}

/// `OPTIONS /requests`: empty 200; the CORS headers come from the router layers.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any other method on `/requests`.
pub async fn method_not_allowed(method: Method) -> PipelineError {
    PipelineError::UnsupportedOperation {
        method: method.to_string(),
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
