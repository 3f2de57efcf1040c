//! Seams to the two external collaborators: the record store and the queue.
//!
//! The services only see these traits. Postgres + pgmq implement them in
//! [`crate::db`]; [`memory`] implements them in process.

pub mod memory;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::model::{Request, RequestId};

/// Durable record store keyed by partition key + request id.
#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Write a new record. Fails if the (partition, id) key already exists.
    async fn create_request(&self, request: &Request) -> Result<()>;

    /// All records under `partition_key`, in whatever order the store keeps them.
    async fn list_requests(&self, partition_key: &str) -> Result<Vec<Request>>;
}

/// Message queue with at-least-once delivery.
#[async_trait]
pub trait RequestQueue: Send + Sync {
    /// Send `{"requestId": ...}`. Returns the queue's message id as the ack.
    async fn publish(&self, request_id: RequestId) -> Result<i64>;
}

/// Bound an external call by `limit`. Expiry is reported as [`Error::Timeout`].
pub async fn bounded<T, F>(limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(limit)),
    }
}
