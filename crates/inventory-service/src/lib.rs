//! Inventory ledger HTTP API service.
//!
//! This crate exposes the accounting engine over HTTP:
//!
//! - `PUT /customer/:customer_id/product/:product_id` adds or removes stock
//! - `GET .../summary` and `GET .../log` read current or point-in-time state
//! - `GET /ping` and `GET /health` report liveness
//!
//! Errors use one JSON shape, `{"error": {"code", "message", "details"}}`,
//! with codes `invalid_value`, `locked`, `not_available`, `not_found` and
//! `internal_error`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers are async for the router

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
