//! Stock-health predicates.
//!
//! The single source of truth for "is this out of stock" and "does this need
//! reordering". The vendor dashboard, the unassigned bucket, the inventory
//! snapshot view, and the catalog audit all call these functions on the same
//! materialized [`StockFacts`], so the numbers on every screen agree.
//!
//! Discontinued and soft-deleted variations never reach these predicates;
//! they are filtered at the query boundary.

use crate::models::inventory::StockFacts;

/// True when an IN_STOCK inventory row exists with quantity exactly 0.
///
/// The row must exist: a LEFT JOIN miss is not proof of zero stock and never
/// counts as out-of-stock. This guards against phantom counts from join
/// fan-out.
#[must_use]
pub fn is_out_of_stock(facts: &StockFacts) -> bool {
    facts.has_zero_stock_row
}

/// True when the variation should be reordered, given the merchant's
/// reorder-threshold window in days.
///
/// Triggers when available stock is at/below zero, at/below the effective
/// floor (a floor of 0 means "no floor"), or running out within the
/// threshold window at the current velocity. Suppressed when stock already
/// sits at/above the effective ceiling, and when a non-terminal purchase
/// order has outstanding quantity while availability is still positive -
/// an existing PO does not change the urgency of already-empty shelves, so
/// suppression never applies at/below zero.
#[must_use]
pub fn needs_reorder(facts: &StockFacts, threshold_days: i64) -> bool {
    let available = facts.available();

    if let Some(max) = facts.effective_alert_max
        && available >= max
    {
        return false;
    }

    let below_floor = facts
        .effective_alert_min
        .is_some_and(|min| min > 0 && available <= min);
    #[allow(clippy::cast_precision_loss)] // stock counts and day windows are small
    let runs_out_within_threshold = facts.daily_velocity > 0.0
        && available > 0
        && (available as f64) / facts.daily_velocity < threshold_days as f64;

    if available > 0 && !below_floor && !runs_out_within_threshold {
        return false;
    }

    // Any outstanding PO quantity suppresses the flag while shelves are not
    // yet empty. Partial coverage still suppresses (source behavior; see
    // DESIGN.md).
    if available > 0 && facts.outstanding_po_qty > 0 {
        return false;
    }

    true
}

/// Unit-cost contribution toward a vendor's reorder value: `Some(cost)` only
/// when the variation needs reordering and carries a known positive cost.
/// Callers sum the values and count the `Some`s (the "costed reorder count")
/// to decide whether a cost-based minimum-order comparison is meaningful.
#[must_use]
pub fn reorder_value_contribution(
    facts: &StockFacts,
    unit_cost_cents: Option<i64>,
    threshold_days: i64,
) -> Option<i64> {
    if !needs_reorder(facts, threshold_days) {
        return None;
    }
    unit_cost_cents.filter(|&cost| cost > 0)
}
