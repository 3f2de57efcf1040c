//! Request admission: persist a new record, then publish it to the queue.
//!
//! Persist always happens before publish, so every queued id has a record
//! behind it. A failed publish leaves the record in place (orphaned, stuck at
//! `RECEIVED`) and is reported to the caller; nothing is rolled back.

use std::sync::Arc;
use std::time::Instant;

use opentelemetry::KeyValue;
use tracing::{Instrument, info, warn};

use super::Timeouts;
use crate::adapter::{RequestQueue, RequestStore, bounded};
use crate::error::{PipelineError, Stage};
use crate::model::{Request, RequestId};
use crate::telemetry::metrics;
use crate::telemetry::pipeline::{record_stage, start_admission_span};

/// What a successful admission hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub request_id: RequestId,
    pub created_at: i64,
}

#[derive(Clone)]
pub struct AdmissionService {
    store: Arc<dyn RequestStore>,
    queue: Arc<dyn RequestQueue>,
    timeouts: Timeouts,
}

impl AdmissionService {
    pub fn new(store: Arc<dyn RequestStore>, queue: Arc<dyn RequestQueue>) -> Self {
        Self {
            store,
            queue,
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Admit one new request.
    ///
    /// Not idempotent: every call creates a distinct request.
    pub async fn admit(&self) -> Result<Admission, PipelineError> {
        let request = Request::received();
        let span = start_admission_span(&request.request_id);
        let started = Instant::now();

        let result = self.persist_then_publish(&request, &span).instrument(span.clone()).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(PipelineError::Persist { .. }) => "persist_error",
            Err(_) => "publish_error",
        };
        metrics::requests_admitted().add(1, &[KeyValue::new("result", outcome)]);
        metrics::operation_duration_ms().record(
            started.elapsed().as_secs_f64() * 1000.0,
            &[KeyValue::new("operation", "admit")],
        );
        result
    }

    async fn persist_then_publish(
        &self,
        request: &Request,
        span: &tracing::Span,
    ) -> Result<Admission, PipelineError> {
        let request_id = request.request_id;

        record_stage(span, Stage::Persist);
        bounded(self.timeouts.store, self.store.create_request(request))
            .await
            .map_err(|cause| {
                warn!(request_id = %request_id, error = %cause, "persist failed; nothing published");
                PipelineError::Persist { cause }
            })?;

        record_stage(span, Stage::Publish);
        let msg_id = bounded(self.timeouts.queue, self.queue.publish(request_id))
            .await
            .map_err(|cause| {
                warn!(request_id = %request_id, error = %cause, "publish failed; record left orphaned at RECEIVED");
                PipelineError::Publish { request_id, cause }
            })?;

        info!(request_id = %request_id, msg_id, "request admitted");
        Ok(Admission {
            request_id,
            created_at: request.created_at,
        })
    }
}
