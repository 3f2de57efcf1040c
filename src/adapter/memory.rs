//! In-process store and queue.
//!
//! Used by `intake serve --in-memory` and by tests. Records live in a map of
//! partition key to insertion-ordered list; published messages are kept so
//! callers can inspect what was sent.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use super::{RequestQueue, RequestStore};
use crate::error::{Error, Result};
use crate::model::{QueueMessage, Request, RequestId};

#[derive(Debug, Default)]
pub struct MemoryStore {
    partitions: Mutex<HashMap<String, Vec<Request>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records across all partitions.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.values().map(Vec::len).sum())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<Request>>>> {
        self.partitions
            .lock()
            .map_err(|_| Error::Other("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn create_request(&self, request: &Request) -> Result<()> {
        let mut partitions = self.lock()?;
        let partition = partitions
            .entry(request.partition_key.clone())
            .or_default();
        if partition
            .iter()
            .any(|r| r.request_id == request.request_id)
        {
            return Err(Error::Duplicate(request.request_id));
        }
        partition.push(request.clone());
        Ok(())
    }

    async fn list_requests(&self, partition_key: &str) -> Result<Vec<Request>> {
        let partitions = self.lock()?;
        Ok(partitions.get(partition_key).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Default)]
pub struct MemoryQueue {
    next_id: AtomicI64,
    messages: Mutex<Vec<(i64, serde_json::Value)>>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Message bodies sent so far, oldest first.
    pub fn sent(&self) -> Result<Vec<serde_json::Value>> {
        Ok(self.lock()?.iter().map(|(_, body)| body.clone()).collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<(i64, serde_json::Value)>>> {
        self.messages
            .lock()
            .map_err(|_| Error::Other("memory queue lock poisoned".to_string()))
    }
}

#[async_trait]
impl RequestQueue for MemoryQueue {
    async fn publish(&self, request_id: RequestId) -> Result<i64> {
        let body = serde_json::to_value(QueueMessage { request_id })?;
        let msg_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock()?.push((msg_id, body));
        Ok(msg_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PARTITION_KEY;

    #[tokio::test]
    async fn store_rejects_duplicate_key() {
        let store = MemoryStore::new();
        let request = Request::received();
        store.create_request(&request).await.unwrap();

        let err = store.create_request(&request).await.unwrap_err();
        assert!(matches!(err, Error::Duplicate(id) if id == request.request_id));
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn store_lists_only_the_asked_partition() {
        let store = MemoryStore::new();
        store.create_request(&Request::received()).await.unwrap();
        store
            .create_request(&Request {
                partition_key: "other".to_string(),
                ..Request::received()
            })
            .await
            .unwrap();

        assert_eq!(store.list_requests(PARTITION_KEY).await.unwrap().len(), 1);
        assert!(store.list_requests("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn queue_assigns_increasing_ids() {
        let queue = MemoryQueue::new();
        let a = queue.publish(RequestId::new()).await.unwrap();
        let b = queue.publish(RequestId::new()).await.unwrap();
        assert!(b > a);
        assert_eq!(queue.sent().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn poisoned_locks_are_reported_not_hidden() {
        let store = MemoryStore::new();
        let queue = MemoryQueue::new();
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _partitions = store.partitions.lock().unwrap();
            let _messages = queue.messages.lock().unwrap();
            panic!("poison both locks");
        }));

        assert!(matches!(store.len(), Err(Error::Other(_))));
        assert!(matches!(store.is_empty(), Err(Error::Other(_))));
        assert!(matches!(queue.sent(), Err(Error::Other(_))));
        assert!(store.list_requests(PARTITION_KEY).await.is_err());
        assert!(queue.publish(RequestId::new()).await.is_err());
    }
}
