//! Test doubles for the store and queue seams.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use http_body_util::BodyExt;
use intake::adapter::memory::{MemoryQueue, MemoryStore};
use intake::adapter::{RequestQueue, RequestStore};
use intake::api::{AppState, build_router};
use intake::error::{Error, Result};
use intake::model::{Request as TrackedRequest, RequestId};
use intake::service::Timeouts;
use tower::ServiceExt;

/// How a fake collaborator behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ok,
    Fail,
    /// Never completes; only a timeout gets the caller out.
    Stall,
}

async fn act(mode: Mode, what: &str) -> Result<()> {
    match mode {
        Mode::Ok => Ok(()),
        Mode::Fail => Err(Error::Other(format!("{what} unavailable"))),
        Mode::Stall => std::future::pending::<Result<()>>().await,
    }
}

/// Memory store whose writes and reads can be made to fail or stall.
pub struct FakeStore {
    pub inner: MemoryStore,
    pub writes: Mode,
    pub reads: Mode,
}

impl FakeStore {
    pub fn new(writes: Mode, reads: Mode) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::new(),
            writes,
            reads,
        })
    }

    pub fn healthy() -> Arc<Self> {
        Self::new(Mode::Ok, Mode::Ok)
    }
}

#[async_trait]
impl RequestStore for FakeStore {
    async fn create_request(&self, request: &TrackedRequest) -> Result<()> {
        act(self.writes, "store").await?;
        self.inner.create_request(request).await
    }

    async fn list_requests(&self, partition_key: &str) -> Result<Vec<TrackedRequest>> {
        act(self.reads, "store").await?;
        self.inner.list_requests(partition_key).await
    }
}

/// Memory queue that counts publish attempts, successful or not.
pub struct FakeQueue {
    pub inner: MemoryQueue,
    pub mode: Mode,
    attempts: AtomicUsize,
}

impl FakeQueue {
    pub fn new(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryQueue::new(),
            mode,
            attempts: AtomicUsize::new(0),
        })
    }

    pub fn healthy() -> Arc<Self> {
        Self::new(Mode::Ok)
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequestQueue for FakeQueue {
    async fn publish(&self, request_id: RequestId) -> Result<i64> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        act(self.mode, "queue").await?;
        self.inner.publish(request_id).await
    }
}

/// Store that serves a fixed list of records, in the given order.
pub struct SeededStore(pub Vec<TrackedRequest>);

#[async_trait]
impl RequestStore for SeededStore {
    async fn create_request(&self, _request: &TrackedRequest) -> Result<()> {
        Err(Error::Other("read-only".to_string()))
    }

    async fn list_requests(&self, partition_key: &str) -> Result<Vec<TrackedRequest>> {
        Ok(self
            .0
            .iter()
            .filter(|r| r.partition_key == partition_key)
            .cloned()
            .collect())
    }
}

/// A record with the given timestamp and a fresh id.
pub fn record_at(created_at: i64) -> TrackedRequest {
    TrackedRequest {
        created_at,
        ..TrackedRequest::received()
    }
}

pub fn test_app(store: Arc<dyn RequestStore>, queue: Arc<dyn RequestQueue>) -> Router {
    build_router(AppState::new(store, queue, Timeouts::default()))
}

pub async fn send(app: &Router, method: Method, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
