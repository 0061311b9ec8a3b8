//! Database operations for inventory, velocity, and catalog facts.
//!
//! Each dashboard/report call issues one batched query per concern - never
//! one query per row. Aggregates are computed in LATERAL subqueries so the
//! outer join shape stays one row per (vendor, variation) or per
//! (variation, location) with no fan-out.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;

use restock_core::{ItemId, LocationId, MerchantId, VariationId, VendorId, coerce};

use super::RepositoryError;
use crate::models::inventory::{
    AuditVariation, CheapestVendor, SnapshotFilter, StockFacts, VariationFact, VelocityWindow,
};

/// Aggregated stock facts shared by the fact/audit queries.
///
/// `on_hand` stays `Option` so a LEFT JOIN miss (no inventory row at all) is
/// distinguishable from a recorded zero.
const INVENTORY_LATERAL: &str = r"
    LEFT JOIN LATERAL (
        SELECT
            SUM(ic.quantity) FILTER (WHERE ic.state = 'IN_STOCK') AS on_hand,
            SUM(ic.quantity) FILTER (WHERE ic.state = 'RESERVED_FOR_SALE') AS committed,
            BOOL_OR(ic.state = 'IN_STOCK' AND ic.quantity = 0) AS has_zero_stock_row
        FROM catalog.inventory_counts ic
        WHERE ic.variation_id = var.id AND ic.merchant_id = $1
    ) inv ON TRUE
    LEFT JOIN LATERAL (
        SELECT
            MAX(s.stock_alert_min) AS alert_min,
            MAX(s.stock_alert_max) AS alert_max
        FROM catalog.variation_location_settings s
        WHERE s.variation_id = var.id AND s.merchant_id = $1
    ) vls ON TRUE
    LEFT JOIN LATERAL (
        SELECT sv.daily_avg_quantity AS daily_avg
        FROM catalog.sales_velocity sv
        WHERE sv.variation_id = var.id AND sv.merchant_id = $1
          AND sv.period_days = 91 AND sv.location_id IS NULL
        LIMIT 1
    ) vel ON TRUE
    LEFT JOIN LATERAL (
        SELECT SUM(poi.quantity_ordered - poi.received_quantity) AS outstanding
        FROM ops.purchase_order_items poi
        INNER JOIN ops.purchase_orders po ON po.id = poi.purchase_order_id
        WHERE poi.variation_id = var.id AND poi.merchant_id = $1
          AND po.status NOT IN ('RECEIVED', 'CANCELLED')
          AND poi.quantity_ordered > poi.received_quantity
    ) po ON TRUE
";

/// Internal row type for dashboard fact queries.
#[derive(Debug, sqlx::FromRow)]
struct VariationFactRow {
    vendor_id: Option<i32>,
    variation_id: String,
    unit_cost_cents: Option<i64>,
    on_hand: Option<Decimal>,
    committed: Option<Decimal>,
    has_zero_stock_row: Option<bool>,
    location_alert_min: Option<i32>,
    location_alert_max: Option<i32>,
    variation_alert_min: Option<i32>,
    variation_alert_max: Option<i32>,
    daily_velocity: Option<Decimal>,
    outstanding_po_qty: Option<Decimal>,
}

impl VariationFactRow {
    fn stock_facts(&self) -> StockFacts {
        StockFacts {
            on_hand: coerce::decimal_to_opt_i64(self.on_hand),
            committed: coerce::decimal_to_i64(self.committed),
            has_zero_stock_row: self.has_zero_stock_row.unwrap_or(false),
            effective_alert_min: self
                .location_alert_min
                .or(self.variation_alert_min)
                .map(i64::from),
            effective_alert_max: self
                .location_alert_max
                .or(self.variation_alert_max)
                .map(i64::from),
            daily_velocity: coerce::decimal_to_f64(self.daily_velocity),
            outstanding_po_qty: coerce::decimal_to_i64(self.outstanding_po_qty),
        }
    }
}

impl From<VariationFactRow> for VariationFact {
    fn from(row: VariationFactRow) -> Self {
        let stock = row.stock_facts();
        Self {
            vendor_id: row.vendor_id.map(VendorId::new),
            variation_id: VariationId::new(row.variation_id),
            unit_cost_cents: row.unit_cost_cents,
            stock,
        }
    }
}

/// Internal row type for the catalog audit query.
#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    variation_id: String,
    item_id: String,
    sku: Option<String>,
    vendor_link_count: Option<i64>,
    has_cost: Option<bool>,
    on_hand: Option<Decimal>,
    committed: Option<Decimal>,
    has_zero_stock_row: Option<bool>,
    location_alert_min: Option<i32>,
    location_alert_max: Option<i32>,
    variation_alert_min: Option<i32>,
    variation_alert_max: Option<i32>,
    daily_velocity: Option<Decimal>,
    outstanding_po_qty: Option<Decimal>,
}

impl From<AuditRow> for AuditVariation {
    fn from(row: AuditRow) -> Self {
        let has_any_floor = row.variation_alert_min.is_some_and(|m| m > 0)
            || row.location_alert_min.is_some_and(|m| m > 0);
        Self {
            variation_id: VariationId::new(row.variation_id),
            item_id: ItemId::new(row.item_id),
            sku: row.sku,
            vendor_link_count: coerce::count(row.vendor_link_count),
            has_cost: row.has_cost.unwrap_or(false),
            has_any_floor,
            stock: StockFacts {
                on_hand: coerce::decimal_to_opt_i64(row.on_hand),
                committed: coerce::decimal_to_i64(row.committed),
                has_zero_stock_row: row.has_zero_stock_row.unwrap_or(false),
                effective_alert_min: row
                    .location_alert_min
                    .or(row.variation_alert_min)
                    .map(i64::from),
                effective_alert_max: row
                    .location_alert_max
                    .or(row.variation_alert_max)
                    .map(i64::from),
                daily_velocity: coerce::decimal_to_f64(row.daily_velocity),
                outstanding_po_qty: coerce::decimal_to_i64(row.outstanding_po_qty),
            },
        }
    }
}

/// Internal row type for the per-(variation, location) snapshot query.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SnapshotRow {
    pub variation_id: String,
    pub item_id: String,
    pub sku: Option<String>,
    pub variation_name: String,
    pub item_name: String,
    pub location_id: String,
    pub location_name: String,
    pub on_hand: Option<Decimal>,
    pub committed: Option<Decimal>,
    pub daily_avg_91: Option<Decimal>,
    pub weekly_avg_91: Option<Decimal>,
    pub total_sold_91: Option<Decimal>,
    pub daily_avg_182: Option<Decimal>,
    pub weekly_avg_182: Option<Decimal>,
    pub total_sold_182: Option<Decimal>,
    pub daily_avg_365: Option<Decimal>,
    pub weekly_avg_365: Option<Decimal>,
    pub total_sold_365: Option<Decimal>,
    pub case_pack_quantity: Option<i32>,
    pub reorder_multiple: Option<i32>,
    pub effective_alert_min: Option<i32>,
    pub effective_alert_max: Option<i32>,
    pub cheapest_vendor_id: Option<i32>,
    pub cheapest_vendor_name: Option<String>,
    pub cheapest_unit_cost_cents: Option<i64>,
    pub cheapest_lead_time_days: Option<i32>,
    pub cheapest_default_supply_days: Option<i32>,
}

impl SnapshotRow {
    pub(crate) fn velocity(&self, period: u16) -> VelocityWindow {
        let (daily, weekly, total) = match period {
            91 => (self.daily_avg_91, self.weekly_avg_91, self.total_sold_91),
            182 => (self.daily_avg_182, self.weekly_avg_182, self.total_sold_182),
            _ => (self.daily_avg_365, self.weekly_avg_365, self.total_sold_365),
        };
        VelocityWindow {
            daily_avg: coerce::decimal_to_f64(daily),
            weekly_avg: coerce::decimal_to_f64(weekly),
            total_sold: coerce::decimal_to_i64(total),
        }
    }

    pub(crate) fn cheapest_vendor(&self) -> Option<CheapestVendor> {
        match (
            self.cheapest_vendor_id,
            self.cheapest_vendor_name.clone(),
            self.cheapest_unit_cost_cents,
        ) {
            (Some(id), Some(name), Some(cost)) => Some(CheapestVendor {
                vendor_id: VendorId::new(id),
                name,
                unit_cost_cents: cost,
                lead_time_days: self.cheapest_lead_time_days,
                default_supply_days: self.cheapest_default_supply_days,
            }),
            _ => None,
        }
    }
}

fn velocity_lateral(alias: &str, period: u16) -> String {
    format!(
        r"
        LEFT JOIN LATERAL (
            SELECT
                sv.daily_avg_quantity AS daily_avg,
                sv.weekly_avg_quantity AS weekly_avg,
                sv.total_quantity_sold AS total_sold
            FROM catalog.sales_velocity sv
            WHERE sv.variation_id = var.id AND sv.merchant_id = $1
              AND sv.period_days = {period}
              AND (sv.location_id = loc.id OR sv.location_id IS NULL)
            ORDER BY sv.location_id NULLS LAST
            LIMIT 1
        ) {alias} ON TRUE
        "
    )
}

/// Repository for inventory and catalog fact queries.
pub struct InventoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fact rows for every (vendor, variation) link of the merchant, one row
    /// per link, tracked and non-deleted/non-discontinued only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn vendor_variation_facts(
        &self,
        merchant_id: &MerchantId,
    ) -> Result<Vec<VariationFact>, RepositoryError> {
        let rows = sqlx::query_as::<_, VariationFactRow>(&format!(
            r"
            SELECT
                vv.vendor_id,
                var.id AS variation_id,
                vv.unit_cost_cents,
                inv.on_hand, inv.committed, inv.has_zero_stock_row,
                vls.alert_min AS location_alert_min,
                vls.alert_max AS location_alert_max,
                var.stock_alert_min AS variation_alert_min,
                var.stock_alert_max AS variation_alert_max,
                vel.daily_avg AS daily_velocity,
                po.outstanding AS outstanding_po_qty
            FROM catalog.variation_vendors vv
            INNER JOIN catalog.variations var
                ON var.id = vv.variation_id AND var.merchant_id = $1
            INNER JOIN catalog.items i
                ON i.id = var.item_id AND i.merchant_id = $1
            {INVENTORY_LATERAL}
            WHERE vv.merchant_id = $1
              AND var.is_deleted = FALSE
              AND var.discontinued = FALSE
              AND var.track_inventory = TRUE
              AND i.is_deleted = FALSE
            ",
        ))
        .bind(merchant_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Fact rows for variations with no vendor link at all (the synthetic
    /// "unassigned" bucket), same aggregate shape as
    /// [`Self::vendor_variation_facts`] with a null vendor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn unassigned_variation_facts(
        &self,
        merchant_id: &MerchantId,
    ) -> Result<Vec<VariationFact>, RepositoryError> {
        let rows = sqlx::query_as::<_, VariationFactRow>(&format!(
            r"
            SELECT
                NULL::int AS vendor_id,
                var.id AS variation_id,
                NULL::bigint AS unit_cost_cents,
                inv.on_hand, inv.committed, inv.has_zero_stock_row,
                vls.alert_min AS location_alert_min,
                vls.alert_max AS location_alert_max,
                var.stock_alert_min AS variation_alert_min,
                var.stock_alert_max AS variation_alert_max,
                vel.daily_avg AS daily_velocity,
                po.outstanding AS outstanding_po_qty
            FROM catalog.variations var
            INNER JOIN catalog.items i
                ON i.id = var.item_id AND i.merchant_id = $1
            {INVENTORY_LATERAL}
            WHERE var.merchant_id = $1
              AND var.is_deleted = FALSE
              AND var.discontinued = FALSE
              AND var.track_inventory = TRUE
              AND i.is_deleted = FALSE
              AND NOT EXISTS (
                  SELECT 1 FROM catalog.variation_vendors vv
                  WHERE vv.variation_id = var.id AND vv.merchant_id = $1
              )
            ",
        ))
        .bind(merchant_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Merchant-wide deduplicated out-of-stock count: distinct variations
    /// with an IN_STOCK row at quantity 0, independent of vendor linkage.
    ///
    /// The inner-join shape (inventory -> variation -> item) is shared with
    /// the catalog dashboard so the two figures can never diverge.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn global_oos_count(
        &self,
        merchant_id: &MerchantId,
    ) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(DISTINCT var.id)
            FROM catalog.inventory_counts ic
            INNER JOIN catalog.variations var ON var.id = ic.variation_id
            INNER JOIN catalog.items i ON i.id = var.item_id
            WHERE ic.merchant_id = $1
              AND ic.state = 'IN_STOCK'
              AND ic.quantity = 0
              AND var.is_deleted = FALSE
              AND var.discontinued = FALSE
              AND i.is_deleted = FALSE
            ",
        )
        .bind(merchant_id.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Per-(variation, location) snapshot rows with velocity at all three
    /// trailing windows and the cheapest-cost vendor.
    ///
    /// Velocity joins are null-safe on location: a location-specific row
    /// wins, the merchant-wide (`NULL` location) row is the fallback, so
    /// variations without a per-location rollup are not lost.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub(crate) async fn snapshot_rows(
        &self,
        merchant_id: &MerchantId,
        filter: &SnapshotFilter,
    ) -> Result<Vec<SnapshotRow>, RepositoryError> {
        let v91 = velocity_lateral("v91", 91);
        let v182 = velocity_lateral("v182", 182);
        let v365 = velocity_lateral("v365", 365);
        let rows = sqlx::query_as::<_, SnapshotRow>(&format!(
            r"
            SELECT
                var.id AS variation_id,
                var.item_id,
                var.sku,
                var.name AS variation_name,
                i.name AS item_name,
                loc.id AS location_id,
                loc.name AS location_name,
                inv.on_hand, inv.committed,
                v91.daily_avg AS daily_avg_91,
                v91.weekly_avg AS weekly_avg_91,
                v91.total_sold AS total_sold_91,
                v182.daily_avg AS daily_avg_182,
                v182.weekly_avg AS weekly_avg_182,
                v182.total_sold AS total_sold_182,
                v365.daily_avg AS daily_avg_365,
                v365.weekly_avg AS weekly_avg_365,
                v365.total_sold AS total_sold_365,
                var.case_pack_quantity,
                var.reorder_multiple,
                COALESCE(vls.stock_alert_min, var.stock_alert_min) AS effective_alert_min,
                COALESCE(vls.stock_alert_max, var.stock_alert_max) AS effective_alert_max,
                cheapest.vendor_id AS cheapest_vendor_id,
                cheapest.name AS cheapest_vendor_name,
                cheapest.unit_cost_cents AS cheapest_unit_cost_cents,
                cheapest.lead_time_days AS cheapest_lead_time_days,
                cheapest.default_supply_days AS cheapest_default_supply_days
            FROM catalog.variations var
            INNER JOIN catalog.items i
                ON i.id = var.item_id AND i.merchant_id = $1
            INNER JOIN catalog.locations loc
                ON loc.merchant_id = $1
            LEFT JOIN catalog.variation_location_settings vls
                ON vls.variation_id = var.id
               AND vls.location_id = loc.id
               AND vls.merchant_id = $1
            LEFT JOIN LATERAL (
                SELECT
                    SUM(ic.quantity) FILTER (WHERE ic.state = 'IN_STOCK') AS on_hand,
                    SUM(ic.quantity) FILTER (WHERE ic.state = 'RESERVED_FOR_SALE') AS committed
                FROM catalog.inventory_counts ic
                WHERE ic.variation_id = var.id
                  AND ic.location_id = loc.id
                  AND ic.merchant_id = $1
            ) inv ON TRUE
            {v91}
            {v182}
            {v365}
            LEFT JOIN LATERAL (
                SELECT
                    vv.vendor_id, ven.name, vv.unit_cost_cents,
                    ven.lead_time_days, ven.default_supply_days
                FROM catalog.variation_vendors vv
                INNER JOIN ops.vendors ven
                    ON ven.id = vv.vendor_id AND ven.merchant_id = $1
                WHERE vv.variation_id = var.id AND vv.merchant_id = $1
                  AND vv.unit_cost_cents IS NOT NULL
                ORDER BY vv.unit_cost_cents ASC, vv.created_at ASC
                LIMIT 1
            ) cheapest ON TRUE
            WHERE var.merchant_id = $1
              AND var.is_deleted = FALSE
              AND var.discontinued = FALSE
              AND var.track_inventory = TRUE
              AND i.is_deleted = FALSE
              AND ($2::text IS NULL OR loc.id = $2)
            ORDER BY i.name ASC, var.name ASC, loc.name ASC
            ",
        ))
        .bind(merchant_id.as_str())
        .bind(filter.location_id.as_ref().map(LocationId::as_str))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Audit inputs for every tracked, live variation of the merchant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn audit_variations(
        &self,
        merchant_id: &MerchantId,
    ) -> Result<Vec<AuditVariation>, RepositoryError> {
        let rows = sqlx::query_as::<_, AuditRow>(&format!(
            r"
            SELECT
                var.id AS variation_id,
                var.item_id,
                var.sku,
                links.vendor_link_count,
                links.has_cost,
                inv.on_hand, inv.committed, inv.has_zero_stock_row,
                vls.alert_min AS location_alert_min,
                vls.alert_max AS location_alert_max,
                var.stock_alert_min AS variation_alert_min,
                var.stock_alert_max AS variation_alert_max,
                vel.daily_avg AS daily_velocity,
                po.outstanding AS outstanding_po_qty
            FROM catalog.variations var
            INNER JOIN catalog.items i
                ON i.id = var.item_id AND i.merchant_id = $1
            LEFT JOIN LATERAL (
                SELECT
                    COUNT(*) AS vendor_link_count,
                    BOOL_OR(vv.unit_cost_cents > 0) AS has_cost
                FROM catalog.variation_vendors vv
                WHERE vv.variation_id = var.id AND vv.merchant_id = $1
            ) links ON TRUE
            {INVENTORY_LATERAL}
            WHERE var.merchant_id = $1
              AND var.is_deleted = FALSE
              AND var.discontinued = FALSE
              AND var.track_inventory = TRUE
              AND i.is_deleted = FALSE
            ORDER BY var.id ASC
            ",
        ))
        .bind(merchant_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Batched image lookup: accepts the full list of variation IDs and
    /// returns primary image URLs keyed by variation, one query total.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn image_urls(
        &self,
        merchant_id: &MerchantId,
        variation_ids: &[VariationId],
    ) -> Result<HashMap<VariationId, String>, RepositoryError> {
        if variation_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<String> = variation_ids
            .iter()
            .map(|id| id.as_str().to_string())
            .collect();

        let rows = sqlx::query_as::<_, (String, String)>(
            r"
            SELECT DISTINCT ON (var.id) var.id, img.url
            FROM catalog.variations var
            INNER JOIN catalog.item_images img
                ON img.item_id = var.item_id AND img.merchant_id = $1
            WHERE var.merchant_id = $1 AND var.id = ANY($2)
            ORDER BY var.id, img.position ASC
            ",
        )
        .bind(merchant_id.as_str())
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, url)| (VariationId::new(id), url))
            .collect())
    }
}
