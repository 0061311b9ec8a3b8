//! Catalog audit: read-only data-quality report over the merchant's tracked
//! variations.

use sqlx::PgPool;

use restock_core::MerchantId;

use crate::db::InventoryRepository;
use crate::error::AppError;
use crate::models::inventory::{AuditFinding, AuditIssue, AuditVariation, CatalogAuditReport};

/// Classify one variation's audit issues, in a stable order.
///
/// `no_reorder_threshold` reuses the availability and floor concepts from the
/// stock-health predicates: at/below zero stock, no floor configured at any
/// level, and nothing already on order means the variation can silently stay
/// empty forever.
fn classify(variation: &AuditVariation) -> Vec<AuditIssue> {
    let mut issues = Vec::new();

    if variation.vendor_link_count == 0 {
        issues.push(AuditIssue::MissingVendor);
    } else if !variation.has_cost {
        issues.push(AuditIssue::MissingCost);
    }

    if variation.stock.available() <= 0
        && !variation.has_any_floor
        && variation.stock.outstanding_po_qty == 0
    {
        issues.push(AuditIssue::NoReorderThreshold);
    }

    issues
}

/// Run the catalog audit for a merchant.
///
/// # Errors
///
/// Returns `AppError::Database` if the audit query fails.
pub async fn catalog_audit(
    pool: &PgPool,
    merchant_id: &MerchantId,
) -> Result<CatalogAuditReport, AppError> {
    let repo = InventoryRepository::new(pool);
    let variations = repo.audit_variations(merchant_id).await?;
    let checked = i64::try_from(variations.len()).unwrap_or(i64::MAX);

    let findings: Vec<AuditFinding> = variations
        .into_iter()
        .filter_map(|variation| {
            let issues = classify(&variation);
            if issues.is_empty() {
                return None;
            }
            Some(AuditFinding {
                variation_id: variation.variation_id,
                item_id: variation.item_id,
                sku: variation.sku,
                issues,
            })
        })
        .collect();

    tracing::debug!(
        merchant_id = %merchant_id,
        checked,
        flagged = findings.len(),
        "catalog audit computed"
    );

    Ok(CatalogAuditReport { checked, findings })
}
