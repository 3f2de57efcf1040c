//! HTTP surface: one method-routed resource plus a health check.
//!
//! [`build_router`] is shared by the binary and the integration tests so
//! both run the same middleware stack.

pub mod error;
pub mod handlers;
pub mod state;

use axum::Router;
use axum::http::{HeaderValue, header};
use axum::routing::get;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub use state::AppState;

/// Path of the requests resource.
pub const REQUESTS_PATH: &str = "/requests";

pub const ALLOW_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token,X-Amz-User-Agent";
pub const ALLOW_METHODS: &str = "OPTIONS,POST,GET";

/// Build the application router with all middleware layers.
///
/// Every response, errors and 404s included, carries the permissive CORS
/// headers so a browser client on another origin can call the service.
pub fn build_router(state: AppState) -> Router {
    // axum sends HEAD to the GET handler unless HEAD has its own route.
    let requests = get(handlers::list_requests)
        .head(handlers::method_not_allowed)
        .post(handlers::create_request)
        .options(handlers::preflight)
        .fallback(handlers::method_not_allowed);

    Router::new()
        .route("/health", get(handlers::health))
        .route(REQUESTS_PATH, requests)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .with_state(state)
}
