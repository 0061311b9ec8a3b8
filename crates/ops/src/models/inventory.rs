//! Inventory domain models.
//!
//! Everything here is fully typed: driver decimals and nullable aggregates
//! are coerced once, in the repository layer's row conversions, so these
//! structs never carry stringly numbers.

use serde::{Deserialize, Serialize};

use restock_core::{ItemId, LocationId, VariationId, VendorId};

/// Materialized stock facts for one variation (merchant-wide) or one
/// (variation, location) pair, consumed by the stock-health predicates.
///
/// `on_hand` is `None` when no IN_STOCK inventory row exists at all - a
/// LEFT JOIN miss, which is semantically different from a row recording
/// zero. The out-of-stock predicate requires an actual zero-quantity row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockFacts {
    /// Sum of IN_STOCK quantities; `None` when no inventory row exists.
    pub on_hand: Option<i64>,
    /// Sum of RESERVED_FOR_SALE (committed) quantities.
    pub committed: i64,
    /// True when an IN_STOCK row exists with quantity exactly 0.
    pub has_zero_stock_row: bool,
    /// Effective stock floor: location override, else variation global,
    /// else absent. A floor of 0 means "no floor".
    pub effective_alert_min: Option<i64>,
    /// Effective stock ceiling, resolved the same way.
    pub effective_alert_max: Option<i64>,
    /// Average units sold per day (91-day trailing window).
    pub daily_velocity: f64,
    /// Outstanding (ordered minus received) quantity across non-terminal
    /// purchase orders.
    pub outstanding_po_qty: i64,
}

impl StockFacts {
    /// Available quantity: on-hand minus committed. A missing inventory row
    /// counts as zero on hand - a tracked variation with no row is still
    /// reorderable.
    #[must_use]
    pub fn available(&self) -> i64 {
        self.on_hand.unwrap_or(0) - self.committed
    }
}

/// One (vendor, variation) fact row for the dashboard aggregation, or a
/// vendor-less row for the unassigned bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariationFact {
    /// Linked vendor; `None` in the unassigned-bucket query.
    pub vendor_id: Option<VendorId>,
    /// The variation.
    pub variation_id: VariationId,
    /// Unit cost from the vendor link, cents. `None` = cost unknown.
    pub unit_cost_cents: Option<i64>,
    /// Stock facts aggregated across the merchant's locations.
    pub stock: StockFacts,
}

/// Sales-velocity rollup for one trailing window.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct VelocityWindow {
    /// Average units sold per day.
    pub daily_avg: f64,
    /// Average units sold per week.
    pub weekly_avg: f64,
    /// Total units sold in the window.
    pub total_sold: i64,
}

/// Cheapest-cost vendor for a variation (unit cost ascending, ties broken by
/// earliest association).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheapestVendor {
    /// The vendor.
    pub vendor_id: VendorId,
    /// Vendor display name.
    pub name: String,
    /// Unit cost in cents.
    pub unit_cost_cents: i64,
    /// Vendor lead time, days.
    pub lead_time_days: Option<i32>,
    /// Vendor-specific supply-days target.
    pub default_supply_days: Option<i32>,
}

/// One row of the inventory snapshot view: a variation at a location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySnapshot {
    /// The variation.
    pub variation_id: VariationId,
    /// Parent item.
    pub item_id: ItemId,
    /// SKU code, when set.
    pub sku: Option<String>,
    /// Item display name.
    pub item_name: String,
    /// Variation display name.
    pub variation_name: String,
    /// The location.
    pub location_id: LocationId,
    /// Location display name.
    pub location_name: String,
    /// On-hand quantity; `None` when no inventory row exists here.
    pub on_hand: Option<i64>,
    /// Committed (reserved) quantity.
    pub committed: i64,
    /// Available quantity (on-hand minus committed).
    pub available: i64,
    /// 91-day velocity rollup.
    pub velocity_91: VelocityWindow,
    /// 182-day velocity rollup.
    pub velocity_182: VelocityWindow,
    /// 365-day velocity rollup.
    pub velocity_365: VelocityWindow,
    /// Days until stockout at the 91-day velocity, from *available* stock.
    pub days_until_stockout: f64,
    /// Suggested order quantity for this variation at this location.
    pub suggested_quantity: i64,
    /// Cheapest linked vendor, when any link carries a cost.
    pub cheapest_vendor: Option<CheapestVendor>,
    /// Primary item image, resolved in one batched lookup.
    pub image_url: Option<String>,
}

/// Filters for the inventory snapshot view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotFilter {
    /// Restrict to one location.
    pub location_id: Option<LocationId>,
    /// Only rows that are out of stock or at/below their effective floor.
    #[serde(default)]
    pub low_stock_only: bool,
}

/// Data-quality issue flagged by the catalog audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditIssue {
    /// No vendor link carries a unit cost.
    MissingCost,
    /// No vendor linked at all.
    MissingVendor,
    /// At/below zero stock with no floor configured anywhere
    /// (variation-level, location-level, or Square-native alert).
    NoReorderThreshold,
}

/// Audit input for one variation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditVariation {
    /// The variation.
    pub variation_id: VariationId,
    /// Parent item.
    pub item_id: ItemId,
    /// SKU code, when set.
    pub sku: Option<String>,
    /// Number of vendor links.
    pub vendor_link_count: i64,
    /// True when at least one vendor link carries a positive unit cost.
    pub has_cost: bool,
    /// True when a floor is configured at any level.
    pub has_any_floor: bool,
    /// Stock facts aggregated across locations.
    pub stock: StockFacts,
}

/// Catalog audit output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogAuditReport {
    /// Variations checked.
    pub checked: i64,
    /// Variations with at least one issue, with their issues.
    pub findings: Vec<AuditFinding>,
}

/// Issues found for one variation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditFinding {
    /// The variation.
    pub variation_id: VariationId,
    /// Parent item.
    pub item_id: ItemId,
    /// SKU code, when set.
    pub sku: Option<String>,
    /// Issues flagged, in a stable order.
    pub issues: Vec<AuditIssue>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_available_subtracts_committed() {
        let facts = StockFacts {
            on_hand: Some(10),
            committed: 4,
            ..StockFacts::default()
        };
        assert_eq!(facts.available(), 6);
    }

    #[test]
    fn test_missing_row_counts_as_zero_on_hand() {
        let facts = StockFacts {
            on_hand: None,
            committed: 2,
            ..StockFacts::default()
        };
        assert_eq!(facts.available(), -2);
    }

    #[test]
    fn test_audit_issue_labels() {
        assert_eq!(
            serde_json::to_string(&AuditIssue::NoReorderThreshold).unwrap(),
            "\"no_reorder_threshold\""
        );
    }
}
