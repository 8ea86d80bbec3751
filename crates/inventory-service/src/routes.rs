//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{health, inventory};
use crate::state::AppState;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// - `GET /ping` - Liveness probe
/// - `GET /health` - Health check
/// - `PUT /customer/:customer_id/product/:product_id` - Add or remove stock
/// - `GET /customer/:customer_id/product/:product_id/summary` - Summary
/// - `GET /customer/:customer_id/product/:product_id/log` - Ledger
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;
    let request_log = state.config.request_log;

    let state = Arc::new(state);

    let router = Router::new()
        .route("/ping", get(health::ping))
        .route("/health", get(health::health))
        .route(
            "/customer/:customer_id/product/:product_id",
            put(inventory::update),
        )
        .route(
            "/customer/:customer_id/product/:product_id/summary",
            get(inventory::summary),
        )
        .route(
            "/customer/:customer_id/product/:product_id/log",
            get(inventory::log),
        )
        .fallback(inventory::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(RequestBodyLimitLayer::new(max_body_bytes))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    request_timeout_seconds,
                ))),
        )
        .with_state(state);

    if request_log {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
