//! Span helpers for the admission pipeline.

use tracing::Span;

use crate::error::Stage;
use crate::model::RequestId;

/// Start a span covering one admission.
///
/// `admission.stage` is declared empty and filled in by [`record_stage`]
/// as the request moves through persist and publish.
pub fn start_admission_span(request_id: &RequestId) -> Span {
    tracing::info_span!(
        "request.admit",
        "request.id" = %request_id,
        "admission.stage" = tracing::field::Empty,
    )
}

/// Mark the stage the admission has reached.
pub fn record_stage(span: &Span, stage: Stage) {
    span.record("admission.stage", tracing::field::display(stage));
}

/// Start a span covering one status listing.
pub fn start_list_span(partition_key: &str) -> Span {
    tracing::info_span!("request.list", "request.partition" = partition_key)
}
