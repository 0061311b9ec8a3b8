//! Inventory snapshot view: per-(variation, location) stock, velocity, and
//! suggested order quantities.

use std::collections::HashMap;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use restock_core::{
    MerchantId, ReorderParams, VariationId, calculate_days_of_stock, calculate_reorder_quantity,
    coerce,
};

use crate::config::ReorderDefaults;
use crate::db::inventory::SnapshotRow;
use crate::db::{self, InventoryRepository, RepositoryError};
use crate::error::AppError;
use crate::models::inventory::{InventorySnapshot, SnapshotFilter};

const IMAGE_CACHE_CAPACITY: u64 = 50_000;
const IMAGE_CACHE_TTL: Duration = Duration::from_secs(300);

/// Batched, cached primary-image lookup.
///
/// Image URLs change rarely (only on a catalog sync), so resolved URLs are
/// cached per (merchant, variation) for a few minutes. Misses are fetched in
/// a single `ANY($1)` query, never one round trip per row.
pub struct ImageResolver {
    cache: Cache<(String, String), Option<String>>,
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageResolver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(IMAGE_CACHE_CAPACITY)
                .time_to_live(IMAGE_CACHE_TTL)
                .build(),
        }
    }

    /// Resolve primary image URLs for a set of variations, keyed by
    /// variation ID. Variations without an image are cached as absent so
    /// repeated dashboard loads do not re-query them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the batched lookup fails.
    pub async fn resolve(
        &self,
        repo: &InventoryRepository<'_>,
        merchant_id: &MerchantId,
        variation_ids: &[VariationId],
    ) -> Result<HashMap<VariationId, String>, RepositoryError> {
        let mut resolved = HashMap::new();
        let mut misses = Vec::new();

        for id in variation_ids {
            let key = (merchant_id.as_str().to_string(), id.as_str().to_string());
            match self.cache.get(&key).await {
                Some(Some(url)) => {
                    resolved.insert(id.clone(), url);
                }
                Some(None) => {}
                None => misses.push(id.clone()),
            }
        }

        if misses.is_empty() {
            return Ok(resolved);
        }

        let fetched = repo.image_urls(merchant_id, &misses).await?;
        for id in misses {
            let key = (merchant_id.as_str().to_string(), id.as_str().to_string());
            let url = fetched.get(&id).cloned();
            self.cache.insert(key, url.clone()).await;
            if let Some(url) = url {
                resolved.insert(id, url);
            }
        }

        Ok(resolved)
    }
}

/// Reorder-threshold inputs resolved once per request from merchant settings
/// and environment defaults.
#[derive(Debug, Clone, Copy)]
struct Thresholds {
    supply_days: i64,
    safety_days: i64,
}

/// Materialize one snapshot row into the API shape. The image is attached
/// afterwards from the batched lookup.
fn materialize(row: &SnapshotRow, thresholds: Thresholds) -> InventorySnapshot {
    let on_hand = coerce::decimal_to_opt_i64(row.on_hand);
    let committed = coerce::decimal_to_i64(row.committed);
    let available = on_hand.unwrap_or(0) - committed;

    let velocity_91 = row.velocity(91);
    let velocity_182 = row.velocity(182);
    let velocity_365 = row.velocity(365);

    let cheapest_vendor = row.cheapest_vendor();
    // Vendor-specific targets win; lead time is 0 when no costed vendor is
    // linked (there is nobody to wait on).
    let supply_days = cheapest_vendor
        .as_ref()
        .and_then(|v| v.default_supply_days)
        .map_or(thresholds.supply_days, i64::from);
    let lead_time_days = cheapest_vendor
        .as_ref()
        .and_then(|v| v.lead_time_days)
        .map_or(0, i64::from);

    let suggested_quantity = calculate_reorder_quantity(&ReorderParams {
        velocity: velocity_91.daily_avg,
        supply_days,
        lead_time_days,
        safety_days: thresholds.safety_days,
        reorder_multiple: row.reorder_multiple.map_or(1, i64::from).max(1),
        case_pack: row.case_pack_quantity.map_or(1, i64::from).max(1),
        stock_alert_min: row.effective_alert_min.map_or(0, i64::from),
        stock_alert_max: row.effective_alert_max.map(i64::from),
        current_stock: available,
    });

    InventorySnapshot {
        variation_id: VariationId::from(row.variation_id.as_str()),
        item_id: row.item_id.as_str().into(),
        sku: row.sku.clone(),
        item_name: row.item_name.clone(),
        variation_name: row.variation_name.clone(),
        location_id: row.location_id.as_str().into(),
        location_name: row.location_name.clone(),
        on_hand,
        committed,
        available,
        days_until_stockout: calculate_days_of_stock(available, velocity_91.daily_avg),
        suggested_quantity,
        velocity_91,
        velocity_182,
        velocity_365,
        cheapest_vendor,
        image_url: None,
    }
}

/// Low-stock filter predicate: exhausted, or at/below the effective floor
/// (a floor of 0 means no floor).
fn is_low_stock(row: &SnapshotRow) -> bool {
    let available =
        coerce::decimal_to_opt_i64(row.on_hand).unwrap_or(0) - coerce::decimal_to_i64(row.committed);
    if available <= 0 {
        return true;
    }
    row.effective_alert_min
        .is_some_and(|min| min > 0 && available <= i64::from(min))
}

/// Build the inventory snapshot for a merchant.
///
/// One aggregate query produces all rows; filtering and reorder math happen
/// in process, and images are attached from one batched lookup at the end.
///
/// # Errors
///
/// Returns `AppError::Database` if any query fails.
pub async fn inventory_snapshot(
    pool: &PgPool,
    merchant_id: &MerchantId,
    filter: &SnapshotFilter,
    defaults: &ReorderDefaults,
    images: &ImageResolver,
) -> Result<Vec<InventorySnapshot>, AppError> {
    let settings = db::merchant_settings::get_settings(pool, merchant_id).await?;
    let thresholds = Thresholds {
        supply_days: settings
            .default_supply_days
            .map_or(defaults.default_supply_days, i64::from),
        safety_days: settings
            .reorder_safety_days
            .map_or(defaults.reorder_safety_days, i64::from),
    };

    let repo = InventoryRepository::new(pool);
    let rows = repo.snapshot_rows(merchant_id, filter).await?;

    let mut snapshots: Vec<InventorySnapshot> = rows
        .iter()
        .filter(|row| !filter.low_stock_only || is_low_stock(row))
        .map(|row| materialize(row, thresholds))
        .collect();

    let mut ids: Vec<VariationId> = snapshots.iter().map(|s| s.variation_id.clone()).collect();
    ids.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
    ids.dedup();

    let image_urls = images.resolve(&repo, merchant_id, &ids).await?;
    for snapshot in &mut snapshots {
        snapshot.image_url = image_urls.get(&snapshot.variation_id).cloned();
    }

    tracing::debug!(
        merchant_id = %merchant_id,
        rows = snapshots.len(),
        low_stock_only = filter.low_stock_only,
        "inventory snapshot computed"
    );

    Ok(snapshots)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn row() -> SnapshotRow {
        SnapshotRow {
            variation_id: "VAR_1".to_string(),
            item_id: "ITEM_1".to_string(),
            sku: Some("SKU-1".to_string()),
            variation_name: "Small".to_string(),
            item_name: "Widget".to_string(),
            location_id: "LOC_1".to_string(),
            location_name: "Main".to_string(),
            on_hand: None,
            committed: None,
            daily_avg_91: None,
            weekly_avg_91: None,
            total_sold_91: None,
            daily_avg_182: None,
            weekly_avg_182: None,
            total_sold_182: None,
            daily_avg_365: None,
            weekly_avg_365: None,
            total_sold_365: None,
            case_pack_quantity: None,
            reorder_multiple: None,
            effective_alert_min: None,
            effective_alert_max: None,
            cheapest_vendor_id: None,
            cheapest_vendor_name: None,
            cheapest_unit_cost_cents: None,
            cheapest_lead_time_days: None,
            cheapest_default_supply_days: None,
        }
    }

    const THRESHOLDS: Thresholds = Thresholds {
        supply_days: 30,
        safety_days: 7,
    };

    #[test]
    fn test_materialize_available_and_stockout_days() {
        let mut r = row();
        r.on_hand = Some(Decimal::from(12));
        r.committed = Some(Decimal::from(2));
        r.daily_avg_91 = Some(Decimal::new(20, 1)); // 2.0/day

        let snapshot = materialize(&r, THRESHOLDS);
        assert_eq!(snapshot.on_hand, Some(12));
        assert_eq!(snapshot.committed, 2);
        assert_eq!(snapshot.available, 10);
        assert!((snapshot.days_until_stockout - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_materialize_missing_inventory_row() {
        let snapshot = materialize(&row(), THRESHOLDS);
        assert_eq!(snapshot.on_hand, None);
        assert_eq!(snapshot.available, 0);
        assert!((snapshot.days_until_stockout - 0.0).abs() < f64::EPSILON);
        // Zero velocity, empty shelf: minimum order of one unit.
        assert_eq!(snapshot.suggested_quantity, 1);
    }

    #[test]
    fn test_materialize_uses_merchant_thresholds() {
        // 2/day over 30 + 7 days = 74, minus 10 available = 64.
        let mut r = row();
        r.on_hand = Some(Decimal::from(10));
        r.daily_avg_91 = Some(Decimal::from(2));

        let snapshot = materialize(&r, THRESHOLDS);
        assert_eq!(snapshot.suggested_quantity, 64);
    }

    #[test]
    fn test_materialize_vendor_overrides_win() {
        // Vendor supply target 10 and lead time 4: 2 * (10 + 4 + 7) = 42.
        let mut r = row();
        r.on_hand = Some(Decimal::from(0));
        r.daily_avg_91 = Some(Decimal::from(2));
        r.cheapest_vendor_id = Some(7);
        r.cheapest_vendor_name = Some("Acme".to_string());
        r.cheapest_unit_cost_cents = Some(500);
        r.cheapest_lead_time_days = Some(4);
        r.cheapest_default_supply_days = Some(10);

        let snapshot = materialize(&r, THRESHOLDS);
        assert_eq!(snapshot.suggested_quantity, 42);
        let vendor = snapshot.cheapest_vendor.unwrap();
        assert_eq!(vendor.name, "Acme");
        assert_eq!(vendor.unit_cost_cents, 500);
    }

    #[test]
    fn test_materialize_packaging_constraints() {
        // 1/day * 37 days = 37, case pack 6 -> 42.
        let mut r = row();
        r.on_hand = Some(Decimal::from(0));
        r.daily_avg_91 = Some(Decimal::from(1));
        r.case_pack_quantity = Some(6);

        let snapshot = materialize(&r, THRESHOLDS);
        assert_eq!(snapshot.suggested_quantity, 42);
    }

    #[test]
    fn test_low_stock_filter() {
        let mut exhausted = row();
        exhausted.on_hand = Some(Decimal::from(0));
        assert!(is_low_stock(&exhausted));

        let mut committed_out = row();
        committed_out.on_hand = Some(Decimal::from(3));
        committed_out.committed = Some(Decimal::from(3));
        assert!(is_low_stock(&committed_out));

        let mut at_floor = row();
        at_floor.on_hand = Some(Decimal::from(5));
        at_floor.effective_alert_min = Some(5);
        assert!(is_low_stock(&at_floor));

        let mut healthy = row();
        healthy.on_hand = Some(Decimal::from(100));
        healthy.effective_alert_min = Some(5);
        assert!(!is_low_stock(&healthy));

        // A floor of 0 is no floor.
        let mut no_floor = row();
        no_floor.on_hand = Some(Decimal::from(1));
        no_floor.effective_alert_min = Some(0);
        assert!(!is_low_stock(&no_floor));
    }
}
