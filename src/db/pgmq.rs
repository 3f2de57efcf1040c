//! pgmq queue operations via direct SQLx.
//!
//! Calls pgmq's SQL functions: pgmq.create, pgmq.send, pgmq.read.

use async_trait::async_trait;
use opentelemetry::KeyValue;

use crate::adapter::RequestQueue;
use crate::error::Result;
use crate::model::{QueueMessage, RequestId};
use crate::telemetry::metrics;

/// A message read from a pgmq queue.
#[derive(Debug, Clone)]
pub struct PgmqMessage {
    pub msg_id: i64,
    pub read_ct: i32,
    pub enqueued_at: chrono::DateTime<chrono::Utc>,
    pub message: serde_json::Value,
}

impl super::Db {
    /// Create the configured queue (idempotent).
    pub async fn create_queue(&self) -> Result<()> {
        sqlx::query("SELECT pgmq.create($1)")
            .bind(&self.queue_name)
            .execute(&self.pool)
            .await?;
        self.count_queue_op("create");
        Ok(())
    }

    /// Send a JSON payload to the configured queue. Returns the message ID.
    pub async fn send_to_queue(&self, payload: &serde_json::Value) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT pgmq.send($1, $2, 0)")
            .bind(&self.queue_name)
            .bind(payload)
            .fetch_one(&self.pool)
            .await?;
        self.count_queue_op("send");
        Ok(row.0)
    }

    /// Read the next visible message (visibility timeout in seconds).
    /// Returns None if the queue is empty.
    pub async fn read_from_queue(&self, vt_seconds: i32) -> Result<Option<PgmqMessage>> {
        let row = sqlx::query_as::<
            _,
            (
                i64,
                i32,
                chrono::DateTime<chrono::Utc>,
                serde_json::Value,
            ),
        >("SELECT msg_id, read_ct, enqueued_at, message FROM pgmq.read($1, $2, 1)")
        .bind(&self.queue_name)
        .bind(vt_seconds)
        .fetch_optional(&self.pool)
        .await?;

        let msg = row.map(|(msg_id, read_ct, enqueued_at, message)| PgmqMessage {
            msg_id,
            read_ct,
            enqueued_at,
            message,
        });
        self.count_queue_op(if msg.is_some() { "read" } else { "read_empty" });
        Ok(msg)
    }

    fn count_queue_op(&self, operation: &'static str) {
        metrics::queue_operations().add(
            1,
            &[
                KeyValue::new("queue", self.queue_name.clone()),
                KeyValue::new("operation", operation),
            ],
        );
    }
}

#[async_trait]
impl RequestQueue for super::Db {
    async fn publish(&self, request_id: RequestId) -> Result<i64> {
        let payload = serde_json::to_value(QueueMessage { request_id })?;
        self.send_to_queue(&payload).await
    }
}
