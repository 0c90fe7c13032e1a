//! HTTP route handlers for the checkout address-validation service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Health check
//!
//! # Address validation
//! POST /addresses/{id}/validate     - Run the validation workflow
//! POST /addresses/{id}/accept       - Accept a proposed correction
//! POST /addresses/{id}/decline      - Keep the address as entered
//! POST /addresses/{id}/ignore       - Dismiss the review without deciding
//! ```

pub mod addresses;

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the address validation routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/addresses/{id}/validate", post(addresses::validate))
        .route("/addresses/{id}/accept", post(addresses::accept))
        .route("/addresses/{id}/decline", post(addresses::decline))
        .route("/addresses/{id}/ignore", post(addresses::ignore))
}

/// Create the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(address_routes())
}

/// Health check endpoint.
async fn health() -> StatusCode {
    StatusCode::OK
}
