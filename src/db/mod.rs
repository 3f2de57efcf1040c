//! Postgres connection pool, migrations, and health check.
//!
//! One pool backs both adapters: request records live in the
//! `app_requests` table and queue messages go through pgmq.

pub mod pgmq;
pub mod requests;

use crate::error::Result;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Default pgmq queue for admitted requests.
pub const DEFAULT_QUEUE: &str = "request_queue";

/// Database handle. Owns the connection pool and the queue name.
pub struct Db {
    pool: PgPool,
    queue_name: String,
}

impl Db {
    /// Connect to Postgres and create a connection pool.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await?;
        Ok(Self {
            pool,
            queue_name: DEFAULT_QUEUE.to_string(),
        })
    }

    /// Publish to `queue_name` instead of the default queue.
    pub fn with_queue(mut self, queue_name: impl Into<String>) -> Self {
        self.queue_name = queue_name.into();
        self
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    /// Run all pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| crate::error::Error::Other(format!("migration failed: {e}")))?;
        Ok(())
    }

    /// Simple health check: run a SELECT 1.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
