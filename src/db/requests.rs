//! Request records in `app_requests`, keyed by (partition_key, request_id).

use async_trait::async_trait;
use opentelemetry::KeyValue;
use uuid::Uuid;

use crate::adapter::RequestStore;
use crate::error::{Error, Result};
use crate::model::{Request, RequestId, RequestStatus};
use crate::telemetry::metrics;

/// Postgres unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

#[async_trait]
impl RequestStore for super::Db {
    async fn create_request(&self, request: &Request) -> Result<()> {
        let result = sqlx::query(
            "INSERT INTO app_requests (partition_key, request_id, created_at, status, finished_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&request.partition_key)
        .bind(request.request_id.0)
        .bind(request.created_at)
        .bind(request.status.as_str())
        .bind(request.finished_at)
        .execute(&self.pool)
        .await;

        if let Err(sqlx::Error::Database(ref db_err)) = result {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return Err(Error::Duplicate(request.request_id));
            }
        }
        result?;

        metrics::store_operations().add(1, &[KeyValue::new("operation", "put")]);
        Ok(())
    }

    async fn list_requests(&self, partition_key: &str) -> Result<Vec<Request>> {
        let rows: Vec<RequestRow> = sqlx::query_as(
            "SELECT partition_key, request_id, created_at, status, finished_at
             FROM app_requests WHERE partition_key = $1",
        )
        .bind(partition_key)
        .fetch_all(&self.pool)
        .await?;

        metrics::store_operations().add(1, &[KeyValue::new("operation", "query")]);
        Ok(rows.into_iter().map(Request::from).collect())
    }
}

/// Internal row type for sqlx::FromRow.
#[derive(sqlx::FromRow)]
struct RequestRow {
    partition_key: String,
    request_id: Uuid,
    created_at: i64,
    status: String,
    finished_at: Option<i64>,
}

impl From<RequestRow> for Request {
    fn from(row: RequestRow) -> Self {
        Self {
            partition_key: row.partition_key,
            request_id: RequestId(row.request_id),
            created_at: row.created_at,
            status: RequestStatus::from(row.status),
            finished_at: row.finished_at,
        }
    }
}
