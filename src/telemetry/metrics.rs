//! Metric instruments.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! Without an OTLP endpoint the global provider is a no-op.

use opentelemetry::metrics::{Counter, Histogram, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("intake")
}

/// Counter: admission outcomes.
/// Labels: `result` ("ok" | "persist_error" | "publish_error").
pub fn requests_admitted() -> Counter<u64> {
    meter()
        .u64_counter("intake.requests.admitted")
        .with_description("Number of admission attempts by outcome")
        .build()
}

/// Counter: status listings served.
/// Labels: `result` ("ok" | "error").
pub fn requests_listed() -> Counter<u64> {
    meter()
        .u64_counter("intake.requests.listed")
        .with_description("Number of status listings served")
        .build()
}

/// Counter: queue operations (create, send, read).
/// Labels: `queue`, `operation`.
pub fn queue_operations() -> Counter<u64> {
    meter()
        .u64_counter("intake.queue.operations")
        .with_description("Number of queue operations")
        .build()
}

/// Counter: store operations (put, query).
/// Labels: `operation`.
pub fn store_operations() -> Counter<u64> {
    meter()
        .u64_counter("intake.store.operations")
        .with_description("Number of record store operations")
        .build()
}

/// Histogram: operation duration in milliseconds.
/// Labels: `operation` ("admit" | "list").
pub fn operation_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("intake.operation.duration_ms")
        .with_description("Operation duration in milliseconds")
        .with_unit("ms")
        .build()
}
