//! HTTP client for the requests resource, plus a cancellable status poller.

pub mod poller;

use async_trait::async_trait;
use serde::Deserialize;

use crate::api::REQUESTS_PATH;
use crate::api::handlers::{CreatedResponse, ListResponse};
use crate::error::{Error, Result};
use crate::model::{Request, sort_newest_first};
use crate::service::QueryService;

pub const DEFAULT_URL: &str = "http://localhost:3000";

/// Anything a poller can ask for the current list of requests.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Request>>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    requests_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    error: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            requests_url: format!("{}{REQUESTS_PATH}", base_url.trim_end_matches('/')),
        }
    }

    /// `POST /requests` with an empty JSON object.
    pub async fn create_request(&self) -> Result<CreatedResponse> {
        let response = self
            .http
            .post(&self.requests_url)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        Ok(response.json().await?)
    }

    /// `GET /requests`, sorted newest first.
    pub async fn list_requests(&self) -> Result<Vec<Request>> {
        let response = self.http.get(&self.requests_url).send().await?;
        if !response.status().is_success() {
            return Err(error_from(response).await);
        }
        let mut requests = response.json::<ListResponse>().await?.requests;
        sort_newest_first(&mut requests);
        Ok(requests)
    }
}

async fn error_from(response: reqwest::Response) -> Error {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(ErrorBody {
            message,
            error: Some(cause),
        }) => Error::Other(format!("{status}: {message}: {cause}")),
        Ok(ErrorBody { message, error: None }) => Error::Other(format!("{status}: {message}")),
        Err(_) => Error::Other(format!("unexpected response status {status}")),
    }
}

#[async_trait]
impl StatusSource for ApiClient {
    async fn fetch(&self) -> Result<Vec<Request>> {
        self.list_requests().await
    }
}

#[async_trait]
impl StatusSource for QueryService {
    async fn fetch(&self) -> Result<Vec<Request>> {
        Ok(self.list_requests().await?)
    }
}
