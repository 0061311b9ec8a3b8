//! Vendor domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use restock_core::{MerchantId, VendorId, VendorStatus};

/// A supplier configured by a merchant.
///
/// Rows in `ops.vendors` are created and updated only through the
/// allowlisted settings mutator; the webhook/sync layer never touches them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    /// Unique vendor ID.
    pub id: VendorId,
    /// Owning merchant (tenant).
    pub merchant_id: MerchantId,
    /// Display name.
    pub name: String,
    /// Lifecycle status; only `ACTIVE` vendors appear in dashboards.
    pub status: String,
    /// Ordering schedule type (e.g., "weekly", "biweekly").
    pub schedule_type: Option<String>,
    /// Day of week orders are placed (0 = Sunday).
    pub order_day: Option<i32>,
    /// Day of week deliveries arrive.
    pub receive_day: Option<i32>,
    /// Lead time between order and delivery, days.
    pub lead_time_days: Option<i32>,
    /// Minimum order amount in cents. 0 = no minimum configured.
    pub minimum_order_amount: i64,
    /// Payment method (e.g., "ACH", "check").
    pub payment_method: Option<String>,
    /// Payment terms (e.g., "net 30").
    pub payment_terms: Option<String>,
    /// Ordering contact email.
    pub contact_email: Option<String>,
    /// How orders are placed (e.g., "email", "portal").
    pub order_method: Option<String>,
    /// Vendor-specific supply-days target, overriding the merchant default.
    pub default_supply_days: Option<i32>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the vendor was created.
    pub created_at: DateTime<Utc>,
    /// When the vendor was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A vendor with purchase-order aggregates for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorWithOrders {
    /// The vendor itself.
    pub vendor: Vendor,
    /// Sum of `total_cents` across DRAFT/SUBMITTED purchase orders.
    pub pending_po_value: i64,
    /// Most recent order date among SUBMITTED/RECEIVED purchase orders.
    pub last_ordered_at: Option<DateTime<Utc>>,
}

/// One row of the vendor dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorStat {
    /// Vendor ID, or [`VendorId::UNASSIGNED`] for the synthetic bucket.
    pub id: VendorId,
    /// Display name.
    pub name: String,
    /// Ordering schedule type.
    pub schedule_type: Option<String>,
    /// Day of week orders are placed.
    pub order_day: Option<i32>,
    /// Day of week deliveries arrive.
    pub receive_day: Option<i32>,
    /// Lead time in days.
    pub lead_time_days: Option<i32>,
    /// Minimum order amount in cents.
    pub minimum_order_amount: i64,
    /// Payment method.
    pub payment_method: Option<String>,
    /// Payment terms.
    pub payment_terms: Option<String>,
    /// Ordering contact email.
    pub contact_email: Option<String>,
    /// How orders are placed.
    pub order_method: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Vendor-specific supply-days target.
    pub default_supply_days: Option<i32>,
    /// Variations linked to this vendor.
    pub total_items: i64,
    /// Distinct linked variations currently out of stock.
    pub oos_count: i64,
    /// Distinct linked variations needing reorder.
    pub reorder_count: i64,
    /// Sum of unit costs for reorderable variations with known cost, cents.
    pub reorder_value: i64,
    /// How many reorderable variations had a known positive cost.
    pub costed_reorder_count: i64,
    /// Sum of pending (DRAFT/SUBMITTED) purchase-order totals, cents.
    pub pending_po_value: i64,
    /// Most recent SUBMITTED/RECEIVED order date.
    pub last_ordered_at: Option<DateTime<Utc>>,
    /// Derived status label.
    pub status: VendorStatus,
}

/// Vendor dashboard response: per-vendor stats plus the merchant-wide
/// deduplicated out-of-stock count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorDashboard {
    /// Per-vendor rollups, synthetic unassigned bucket last when present.
    pub vendors: Vec<VendorStat>,
    /// Distinct variations with an IN_STOCK row at quantity 0, merchant-wide.
    pub global_oos_count: i64,
}

/// Allowlisted partial update of vendor settings.
///
/// The closed field set *is* the allowlist: serde drops unknown keys
/// (including attempts to rename the vendor or inject arbitrary columns)
/// without error, and only these fields ever reach the UPDATE statement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorSettingsPatch {
    /// Ordering schedule type.
    pub schedule_type: Option<String>,
    /// Day of week orders are placed.
    pub order_day: Option<i32>,
    /// Day of week deliveries arrive.
    pub receive_day: Option<i32>,
    /// Lead time in days.
    pub lead_time_days: Option<i32>,
    /// Minimum order amount in cents.
    pub minimum_order_amount: Option<i64>,
    /// Payment method.
    pub payment_method: Option<String>,
    /// Payment terms.
    pub payment_terms: Option<String>,
    /// Ordering contact email.
    pub contact_email: Option<String>,
    /// How orders are placed.
    pub order_method: Option<String>,
    /// Vendor-specific supply-days target.
    pub default_supply_days: Option<i32>,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl VendorSettingsPatch {
    /// True when no allowlisted field is present; a no-op update.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.schedule_type.is_none()
            && self.order_day.is_none()
            && self.receive_day.is_none()
            && self.lead_time_days.is_none()
            && self.minimum_order_amount.is_none()
            && self.payment_method.is_none()
            && self.payment_terms.is_none()
            && self.contact_email.is_none()
            && self.order_method.is_none()
            && self.default_supply_days.is_none()
            && self.notes.is_none()
    }
}

/// Per-merchant reorder defaults, falling back to environment-level
/// configuration when unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MerchantSettings {
    /// Target days of supply when reordering.
    pub default_supply_days: Option<i32>,
    /// Safety buffer in days.
    pub reorder_safety_days: Option<i32>,
}
