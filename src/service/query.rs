//! Status listing for polling clients.

use std::sync::Arc;
use std::time::{Duration, Instant};

use opentelemetry::KeyValue;
use tracing::{Instrument, debug, warn};

use crate::adapter::{RequestStore, bounded};
use crate::error::PipelineError;
use crate::model::{PARTITION_KEY, Request, sort_newest_first};
use crate::telemetry::metrics;
use crate::telemetry::pipeline::start_list_span;

#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn RequestStore>,
    timeout: Duration,
}

impl QueryService {
    pub fn new(store: Arc<dyn RequestStore>) -> Self {
        Self {
            store,
            timeout: super::Timeouts::default().store,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Every known request, newest `created_at` first.
    ///
    /// Store order is never trusted. An empty store yields an empty list.
    pub async fn list_requests(&self) -> Result<Vec<Request>, PipelineError> {
        let started = Instant::now();
        let result = bounded(self.timeout, self.store.list_requests(PARTITION_KEY))
            .instrument(start_list_span(PARTITION_KEY))
            .await;

        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::requests_listed().add(1, &[KeyValue::new("result", outcome)]);
        metrics::operation_duration_ms().record(
            started.elapsed().as_secs_f64() * 1000.0,
            &[KeyValue::new("operation", "list")],
        );

        let mut requests = result.map_err(|cause| {
            warn!(error = %cause, "listing requests failed");
            PipelineError::Query { cause }
        })?;
        sort_newest_first(&mut requests);
        debug!(count = requests.len(), "listed requests");
        Ok(requests)
    }
}
