//! Vendor dashboard and settings API handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};

use restock_core::{MerchantId, VendorId};

use crate::db::VendorRepository;
use crate::error::AppError;
use crate::models::vendor::{Vendor, VendorDashboard, VendorSettingsPatch};
use crate::services::dashboard;
use crate::state::AppState;

/// Build the vendors router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/merchants/{merchant_id}/vendors/dashboard",
            get(vendor_dashboard),
        )
        .route(
            "/api/merchants/{merchant_id}/vendors/{vendor_id}/settings",
            patch(update_vendor_settings),
        )
}

/// Per-vendor reorder rollups plus the merchant-wide out-of-stock count.
///
/// # Errors
///
/// Returns a server error if any dashboard query fails.
async fn vendor_dashboard(
    State(state): State<AppState>,
    Path(merchant_id): Path<MerchantId>,
) -> Result<Json<VendorDashboard>, AppError> {
    let dashboard = dashboard::vendor_dashboard(
        state.pool(),
        &merchant_id,
        &state.config().reorder_defaults,
    )
    .await?;
    Ok(Json(dashboard))
}

/// Apply an allowlisted partial update to a vendor's settings.
///
/// Unknown body keys are dropped by deserialization, an empty patch returns
/// the unchanged record, and a vendor that does not exist or belongs to a
/// different merchant is a plain 404.
///
/// # Errors
///
/// Returns 404 when the vendor is not found for this merchant, or a server
/// error if the update fails.
async fn update_vendor_settings(
    State(state): State<AppState>,
    Path((merchant_id, vendor_id)): Path<(MerchantId, VendorId)>,
    Json(body): Json<VendorSettingsPatch>,
) -> Result<Json<Vendor>, AppError> {
    let repo = VendorRepository::new(state.pool());
    let updated = repo
        .update_settings(vendor_id, &merchant_id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("vendor {vendor_id}")))?;

    tracing::info!(
        merchant_id = %merchant_id,
        vendor_id = %vendor_id,
        "vendor settings updated"
    );

    Ok(Json(updated))
}
