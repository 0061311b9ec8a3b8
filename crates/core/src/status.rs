//! Vendor status classification.
//!
//! A small deterministic state machine mapping aggregated vendor stats to a
//! priority-ordered status label. Consumed by the vendor dashboard; the
//! priority ranking lets the UI sort vendors by urgency.

use serde::{Deserialize, Serialize};

use crate::coerce;

/// Dashboard status for a vendor, in strict priority order (first match
/// wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorStatus {
    /// At least one linked variation is out of stock. Always wins.
    HasOos,
    /// Reorderable value is below the vendor's minimum order amount.
    BelowMin,
    /// Reorderable value meets or exceeds the minimum order amount.
    Ready,
    /// Items need reordering but no cost data or no minimum is configured.
    NeedsOrder,
    /// Nothing to do.
    Ok,
}

impl VendorStatus {
    /// Fixed urgency ranking for sorting (0 = most urgent).
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::HasOos => 0,
            Self::BelowMin => 1,
            Self::Ready => 2,
            Self::NeedsOrder => 3,
            Self::Ok => 4,
        }
    }

    /// Stable string label, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HasOos => "has_oos",
            Self::BelowMin => "below_min",
            Self::Ready => "ready",
            Self::NeedsOrder => "needs_order",
            Self::Ok => "ok",
        }
    }
}

/// Aggregated vendor stats consumed by [`compute_status`].
///
/// Every field deserializes leniently (numbers, numeric strings, null, or
/// missing all coerce, defaulting to 0), so the classifier is total over any
/// payload shape an upstream driver produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VendorStatusInputs {
    /// Distinct out-of-stock variations linked to this vendor.
    #[serde(default, deserialize_with = "coerce::lenient_i64")]
    pub oos_count: i64,
    /// Distinct variations needing reorder.
    #[serde(default, deserialize_with = "coerce::lenient_i64")]
    pub reorder_count: i64,
    /// Sum of unit costs for reorderable variations with known cost, cents.
    #[serde(default, deserialize_with = "coerce::lenient_i64")]
    pub reorder_value: i64,
    /// How many reorderable variations had a known positive cost.
    #[serde(default, deserialize_with = "coerce::lenient_i64")]
    pub costed_reorder_count: i64,
    /// Vendor's minimum order amount, cents. 0 = not configured.
    #[serde(default, deserialize_with = "coerce::lenient_i64")]
    pub minimum_order_amount: i64,
}

/// Classify aggregated vendor stats into a [`VendorStatus`].
///
/// Priority order is strict: out-of-stock always wins; the cost-based
/// minimum-order comparison only applies when cost data exists and a minimum
/// is configured; meeting the minimum exactly counts as [`VendorStatus::Ready`].
/// Pure and total - same input, same label, never panics.
#[must_use]
pub fn compute_status(stats: &VendorStatusInputs) -> VendorStatus {
    if stats.oos_count > 0 {
        return VendorStatus::HasOos;
    }
    if stats.reorder_count > 0 && stats.costed_reorder_count > 0 && stats.minimum_order_amount > 0
    {
        return if stats.reorder_value < stats.minimum_order_amount {
            VendorStatus::BelowMin
        } else {
            VendorStatus::Ready
        };
    }
    if stats.reorder_count > 0 {
        return VendorStatus::NeedsOrder;
    }
    VendorStatus::Ok
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn stats() -> VendorStatusInputs {
        VendorStatusInputs::default()
    }

    #[test]
    fn test_oos_always_wins() {
        let status = compute_status(&VendorStatusInputs {
            oos_count: 1,
            reorder_count: 5,
            reorder_value: 60_000,
            costed_reorder_count: 5,
            minimum_order_amount: 50_000,
        });
        assert_eq!(status, VendorStatus::HasOos);
    }

    #[test]
    fn test_below_min() {
        let status = compute_status(&VendorStatusInputs {
            reorder_count: 5,
            reorder_value: 40_000,
            costed_reorder_count: 5,
            minimum_order_amount: 50_000,
            ..stats()
        });
        assert_eq!(status, VendorStatus::BelowMin);
    }

    #[test]
    fn test_ready_above_minimum() {
        let status = compute_status(&VendorStatusInputs {
            reorder_count: 5,
            reorder_value: 60_000,
            costed_reorder_count: 5,
            minimum_order_amount: 50_000,
            ..stats()
        });
        assert_eq!(status, VendorStatus::Ready);
    }

    #[test]
    fn test_ready_at_exact_minimum() {
        // Equality counts as meeting the minimum.
        let status = compute_status(&VendorStatusInputs {
            reorder_count: 5,
            reorder_value: 50_000,
            costed_reorder_count: 5,
            minimum_order_amount: 50_000,
            ..stats()
        });
        assert_eq!(status, VendorStatus::Ready);
    }

    #[test]
    fn test_needs_order_without_cost_data() {
        let status = compute_status(&VendorStatusInputs {
            reorder_count: 3,
            minimum_order_amount: 50_000,
            ..stats()
        });
        assert_eq!(status, VendorStatus::NeedsOrder);
    }

    #[test]
    fn test_needs_order_without_minimum() {
        let status = compute_status(&VendorStatusInputs {
            reorder_count: 3,
            reorder_value: 10_000,
            costed_reorder_count: 3,
            ..stats()
        });
        assert_eq!(status, VendorStatus::NeedsOrder);
    }

    #[test]
    fn test_ok_when_nothing_to_do() {
        assert_eq!(compute_status(&stats()), VendorStatus::Ok);
    }

    #[test]
    fn test_total_over_stringly_payloads() {
        // Driver artifacts: numbers as strings, nulls, missing keys.
        let inputs: VendorStatusInputs = serde_json::from_str(
            r#"{"oos_count": "0", "reorder_count": "5", "reorder_value": "60000",
                "costed_reorder_count": 5, "minimum_order_amount": null}"#,
        )
        .unwrap();
        assert_eq!(compute_status(&inputs), VendorStatus::NeedsOrder);

        let inputs: VendorStatusInputs = serde_json::from_str(r"{}").unwrap();
        assert_eq!(compute_status(&inputs), VendorStatus::Ok);
    }

    #[test]
    fn test_pure_and_idempotent() {
        let inputs = VendorStatusInputs {
            reorder_count: 2,
            ..stats()
        };
        assert_eq!(compute_status(&inputs), compute_status(&inputs));
    }

    #[test]
    fn test_priority_ranking() {
        assert_eq!(VendorStatus::HasOos.priority(), 0);
        assert_eq!(VendorStatus::BelowMin.priority(), 1);
        assert_eq!(VendorStatus::Ready.priority(), 2);
        assert_eq!(VendorStatus::NeedsOrder.priority(), 3);
        assert_eq!(VendorStatus::Ok.priority(), 4);
    }

    #[test]
    fn test_serialized_labels() {
        assert_eq!(
            serde_json::to_string(&VendorStatus::HasOos).unwrap(),
            "\"has_oos\""
        );
        assert_eq!(VendorStatus::NeedsOrder.as_str(), "needs_order");
    }
}
