//! HTTP route handlers for the ops service.
//!
//! # Route Structure
//!
//! ```text
//! GET   /health                                                   - Liveness check
//! GET   /health/ready                                             - Readiness check (DB ping)
//!
//! # Vendors
//! GET   /api/merchants/{merchant_id}/vendors/dashboard            - Vendor dashboard
//! PATCH /api/merchants/{merchant_id}/vendors/{vendor_id}/settings - Update vendor settings
//!
//! # Inventory
//! GET   /api/merchants/{merchant_id}/inventory/snapshot           - Inventory snapshot
//! GET   /api/merchants/{merchant_id}/catalog/audit                - Catalog audit report
//! ```
//!
//! All tenant-scoped routes take the merchant ID from the path; handlers pass
//! it down explicitly, never from ambient state.

pub mod inventory;
pub mod vendors;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the complete router: health probes plus the API surface.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(vendors::router())
        .merge(inventory::router())
}

/// Liveness: the process is up. Checks no dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness: pings the database, 503 until it answers.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
