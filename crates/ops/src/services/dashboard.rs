//! Vendor dashboard aggregation.
//!
//! One variation-facts query for the whole merchant, folded per vendor in
//! Rust through the shared stock-health predicates. The vendor stats, the
//! unassigned bucket, and the global OOS count are independent reads with no
//! wrapping transaction; under concurrent webhook-driven inventory writes
//! they may observe slightly different snapshots, which is accepted (see
//! DESIGN.md).

use std::collections::{HashMap, HashSet};

use sqlx::PgPool;

use restock_core::{MerchantId, VendorId, VendorStatusInputs, compute_status};

use crate::config::ReorderDefaults;
use crate::db::{self, InventoryRepository, VendorRepository};
use crate::error::AppError;
use crate::models::inventory::VariationFact;
use crate::models::vendor::{VendorDashboard, VendorStat, VendorWithOrders};
use crate::services::stock_health;

/// Display name for the synthetic no-vendor bucket.
const UNASSIGNED_NAME: &str = "Unassigned";

#[derive(Debug, Default)]
struct FoldedStats {
    total_items: i64,
    oos_count: i64,
    reorder_count: i64,
    reorder_value: i64,
    costed_reorder_count: i64,
}

/// Fold one vendor's fact rows into aggregate stats, deduplicated by
/// variation.
fn fold_facts(facts: &[&VariationFact], threshold_days: i64) -> FoldedStats {
    let mut stats = FoldedStats::default();
    let mut seen = HashSet::new();

    for fact in facts {
        if !seen.insert(&fact.variation_id) {
            continue;
        }
        stats.total_items += 1;
        if stock_health::is_out_of_stock(&fact.stock) {
            stats.oos_count += 1;
        }
        if stock_health::needs_reorder(&fact.stock, threshold_days) {
            stats.reorder_count += 1;
            if let Some(cost) = stock_health::reorder_value_contribution(
                &fact.stock,
                fact.unit_cost_cents,
                threshold_days,
            ) {
                stats.reorder_value += cost;
                stats.costed_reorder_count += 1;
            }
        }
    }

    stats
}

fn vendor_stat(vendor: VendorWithOrders, stats: &FoldedStats) -> VendorStat {
    let status = compute_status(&VendorStatusInputs {
        oos_count: stats.oos_count,
        reorder_count: stats.reorder_count,
        reorder_value: stats.reorder_value,
        costed_reorder_count: stats.costed_reorder_count,
        minimum_order_amount: vendor.vendor.minimum_order_amount,
    });

    VendorStat {
        id: vendor.vendor.id,
        name: vendor.vendor.name,
        schedule_type: vendor.vendor.schedule_type,
        order_day: vendor.vendor.order_day,
        receive_day: vendor.vendor.receive_day,
        lead_time_days: vendor.vendor.lead_time_days,
        minimum_order_amount: vendor.vendor.minimum_order_amount,
        payment_method: vendor.vendor.payment_method,
        payment_terms: vendor.vendor.payment_terms,
        contact_email: vendor.vendor.contact_email,
        order_method: vendor.vendor.order_method,
        notes: vendor.vendor.notes,
        default_supply_days: vendor.vendor.default_supply_days,
        total_items: stats.total_items,
        oos_count: stats.oos_count,
        reorder_count: stats.reorder_count,
        reorder_value: stats.reorder_value,
        costed_reorder_count: stats.costed_reorder_count,
        pending_po_value: vendor.pending_po_value,
        last_ordered_at: vendor.last_ordered_at,
        status,
    }
}

/// Fold vendor facts into per-vendor dashboard rows. Every ACTIVE vendor
/// appears, including those with zero linked items.
fn fold_vendor_stats(
    vendors: Vec<VendorWithOrders>,
    facts: &[VariationFact],
    threshold_days: i64,
) -> Vec<VendorStat> {
    let mut by_vendor: HashMap<VendorId, Vec<&VariationFact>> = HashMap::new();
    for fact in facts {
        if let Some(vendor_id) = fact.vendor_id {
            by_vendor.entry(vendor_id).or_default().push(fact);
        }
    }

    vendors
        .into_iter()
        .map(|vendor| {
            let vendor_facts = by_vendor
                .get(&vendor.vendor.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let stats = fold_facts(vendor_facts, threshold_days);
            vendor_stat(vendor, &stats)
        })
        .collect()
}

/// Fold the no-vendor-link facts into the synthetic unassigned bucket.
/// Counts only - there is no vendor to cost against - and `None` when the
/// bucket would be empty (never show an empty unassigned row).
fn fold_unassigned(facts: &[VariationFact], threshold_days: i64) -> Option<VendorStat> {
    let refs: Vec<&VariationFact> = facts.iter().collect();
    let stats = fold_facts(&refs, threshold_days);
    if stats.total_items == 0 {
        return None;
    }

    let status = compute_status(&VendorStatusInputs {
        oos_count: stats.oos_count,
        reorder_count: stats.reorder_count,
        reorder_value: 0,
        costed_reorder_count: 0,
        minimum_order_amount: 0,
    });

    Some(VendorStat {
        id: VendorId::UNASSIGNED,
        name: UNASSIGNED_NAME.to_string(),
        schedule_type: None,
        order_day: None,
        receive_day: None,
        lead_time_days: None,
        minimum_order_amount: 0,
        payment_method: None,
        payment_terms: None,
        contact_email: None,
        order_method: None,
        notes: None,
        default_supply_days: None,
        total_items: stats.total_items,
        oos_count: stats.oos_count,
        reorder_count: stats.reorder_count,
        reorder_value: 0,
        costed_reorder_count: 0,
        pending_po_value: 0,
        last_ordered_at: None,
        status,
    })
}

/// Build the vendor dashboard for a merchant.
///
/// # Errors
///
/// Returns `AppError::Database` if any query fails.
pub async fn vendor_dashboard(
    pool: &PgPool,
    merchant_id: &MerchantId,
    defaults: &ReorderDefaults,
) -> Result<VendorDashboard, AppError> {
    let settings = db::merchant_settings::get_settings(pool, merchant_id).await?;
    let supply_days = settings
        .default_supply_days
        .map_or(defaults.default_supply_days, i64::from);
    let safety_days = settings
        .reorder_safety_days
        .map_or(defaults.reorder_safety_days, i64::from);
    let threshold_days = supply_days + safety_days;

    let vendor_repo = VendorRepository::new(pool);
    let inventory_repo = InventoryRepository::new(pool);

    let vendors = vendor_repo.list_active_with_orders(merchant_id).await?;
    let facts = inventory_repo.vendor_variation_facts(merchant_id).await?;
    let unassigned_facts = inventory_repo
        .unassigned_variation_facts(merchant_id)
        .await?;
    let global_oos_count = inventory_repo.global_oos_count(merchant_id).await?;

    let mut stats = fold_vendor_stats(vendors, &facts, threshold_days);
    if let Some(unassigned) = fold_unassigned(&unassigned_facts, threshold_days) {
        stats.push(unassigned);
    }

    tracing::debug!(
        merchant_id = %merchant_id,
        vendors = stats.len(),
        global_oos_count,
        threshold_days,
        "vendor dashboard computed"
    );

    Ok(VendorDashboard {
        vendors: stats,
        global_oos_count,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use restock_core::{VariationId, VendorStatus};

    use crate::models::inventory::StockFacts;
    use crate::models::vendor::Vendor;

    fn vendor(id: i32, minimum_order_amount: i64) -> VendorWithOrders {
        VendorWithOrders {
            vendor: Vendor {
                id: VendorId::new(id),
                merchant_id: "M1".into(),
                name: format!("Vendor {id}"),
                status: "ACTIVE".to_string(),
                schedule_type: None,
                order_day: None,
                receive_day: None,
                lead_time_days: None,
                minimum_order_amount,
                payment_method: None,
                payment_terms: None,
                contact_email: None,
                order_method: None,
                default_supply_days: None,
                notes: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            pending_po_value: 0,
            last_ordered_at: None,
        }
    }

    fn fact(vendor_id: Option<i32>, variation: &str, stock: StockFacts) -> VariationFact {
        VariationFact {
            vendor_id: vendor_id.map(VendorId::new),
            variation_id: VariationId::from(variation),
            unit_cost_cents: None,
            stock,
        }
    }

    fn oos_stock() -> StockFacts {
        StockFacts {
            on_hand: Some(0),
            has_zero_stock_row: true,
            ..StockFacts::default()
        }
    }

    fn healthy_stock() -> StockFacts {
        StockFacts {
            on_hand: Some(1000),
            ..StockFacts::default()
        }
    }

    #[test]
    fn test_vendor_with_zero_items_appears_as_ok() {
        let stats = fold_vendor_stats(vec![vendor(1, 0)], &[], 37);
        assert_eq!(stats.len(), 1);
        let s = &stats[0];
        assert_eq!(s.total_items, 0);
        assert_eq!(s.oos_count, 0);
        assert_eq!(s.reorder_count, 0);
        assert_eq!(s.reorder_value, 0);
        assert_eq!(s.status, VendorStatus::Ok);
    }

    #[test]
    fn test_fold_dedupes_by_variation() {
        // Same variation twice for one vendor counts once.
        let facts = vec![
            fact(Some(1), "VAR_A", oos_stock()),
            fact(Some(1), "VAR_A", oos_stock()),
            fact(Some(1), "VAR_B", healthy_stock()),
        ];
        let stats = fold_vendor_stats(vec![vendor(1, 0)], &facts, 37);
        assert_eq!(stats[0].total_items, 2);
        assert_eq!(stats[0].oos_count, 1);
        assert_eq!(stats[0].status, VendorStatus::HasOos);
    }

    #[test]
    fn test_reorder_value_and_ready_status() {
        let mut costed = fact(Some(1), "VAR_A", oos_stock());
        costed.unit_cost_cents = Some(30_000);
        let mut costed_b = fact(Some(1), "VAR_B", oos_stock());
        costed_b.unit_cost_cents = Some(30_000);

        let stats = fold_vendor_stats(vec![vendor(1, 50_000)], &[costed, costed_b], 37);
        // OOS wins over the minimum-order comparison.
        assert_eq!(stats[0].status, VendorStatus::HasOos);
        assert_eq!(stats[0].reorder_count, 2);
        assert_eq!(stats[0].reorder_value, 60_000);
        assert_eq!(stats[0].costed_reorder_count, 2);
    }

    #[test]
    fn test_below_min_without_oos() {
        let mut low = fact(Some(1), "VAR_A", StockFacts {
            on_hand: Some(2),
            effective_alert_min: Some(5),
            ..StockFacts::default()
        });
        low.unit_cost_cents = Some(10_000);

        let stats = fold_vendor_stats(vec![vendor(1, 50_000)], &[low], 37);
        assert_eq!(stats[0].oos_count, 0);
        assert_eq!(stats[0].reorder_count, 1);
        assert_eq!(stats[0].status, VendorStatus::BelowMin);
    }

    #[test]
    fn test_facts_only_count_for_their_vendor() {
        let facts = vec![
            fact(Some(1), "VAR_A", oos_stock()),
            fact(Some(2), "VAR_B", healthy_stock()),
        ];
        let stats = fold_vendor_stats(vec![vendor(1, 0), vendor(2, 0)], &facts, 37);
        assert_eq!(stats[0].total_items, 1);
        assert_eq!(stats[0].status, VendorStatus::HasOos);
        assert_eq!(stats[1].total_items, 1);
        assert_eq!(stats[1].status, VendorStatus::Ok);
    }

    #[test]
    fn test_unassigned_bucket_hidden_when_empty() {
        assert!(fold_unassigned(&[], 37).is_none());
    }

    #[test]
    fn test_unassigned_bucket_counts_only() {
        let mut f = fact(None, "VAR_A", oos_stock());
        // Even if a cost sneaks into the row, the bucket carries no money.
        f.unit_cost_cents = Some(9_999);
        let bucket = fold_unassigned(&[f, fact(None, "VAR_B", healthy_stock())], 37).unwrap();
        assert_eq!(bucket.id, VendorId::UNASSIGNED);
        assert_eq!(bucket.name, "Unassigned");
        assert_eq!(bucket.total_items, 2);
        assert_eq!(bucket.oos_count, 1);
        assert_eq!(bucket.reorder_value, 0);
        assert_eq!(bucket.costed_reorder_count, 0);
        assert_eq!(bucket.status, VendorStatus::HasOos);
    }
}
