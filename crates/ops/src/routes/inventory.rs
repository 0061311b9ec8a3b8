//! Inventory snapshot and catalog audit API handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use restock_core::MerchantId;

use crate::error::AppError;
use crate::models::inventory::{CatalogAuditReport, InventorySnapshot, SnapshotFilter};
use crate::services::{audit, snapshot};
use crate::state::AppState;

/// Build the inventory router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/merchants/{merchant_id}/inventory/snapshot",
            get(inventory_snapshot),
        )
        .route(
            "/api/merchants/{merchant_id}/catalog/audit",
            get(catalog_audit),
        )
}

/// Per-(variation, location) stock and velocity view with suggested order
/// quantities. Supports `?location_id=` and `?low_stock_only=true` filters.
///
/// # Errors
///
/// Returns a server error if the snapshot queries fail.
async fn inventory_snapshot(
    State(state): State<AppState>,
    Path(merchant_id): Path<MerchantId>,
    Query(filter): Query<SnapshotFilter>,
) -> Result<Json<Vec<InventorySnapshot>>, AppError> {
    let rows = snapshot::inventory_snapshot(
        state.pool(),
        &merchant_id,
        &filter,
        &state.config().reorder_defaults,
        state.images(),
    )
    .await?;
    Ok(Json(rows))
}

/// Read-only data-quality report over the merchant's tracked variations.
///
/// # Errors
///
/// Returns a server error if the audit query fails.
async fn catalog_audit(
    State(state): State<AppState>,
    Path(merchant_id): Path<MerchantId>,
) -> Result<Json<CatalogAuditReport>, AppError> {
    let report = audit::catalog_audit(state.pool(), &merchant_id).await?;
    Ok(Json(report))
}
