//! Database operations for vendors.
//!
//! Queries are runtime-checked (`sqlx::query_as::<_, Row>` with bound
//! parameters); row structs convert to domain models via `From` so numeric
//! coercion happens in exactly one place.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use restock_core::{MerchantId, VendorId, coerce};

use super::RepositoryError;
use crate::models::vendor::{Vendor, VendorSettingsPatch, VendorWithOrders};

const VENDOR_COLUMNS: &str = r"
    id, merchant_id, name, status, schedule_type, order_day, receive_day,
    lead_time_days, minimum_order_amount, payment_method, payment_terms,
    contact_email, order_method, default_supply_days, notes,
    created_at, updated_at
";

/// Internal row type for vendor queries.
#[derive(Debug, sqlx::FromRow)]
struct VendorRow {
    id: i32,
    merchant_id: String,
    name: String,
    status: String,
    schedule_type: Option<String>,
    order_day: Option<i32>,
    receive_day: Option<i32>,
    lead_time_days: Option<i32>,
    minimum_order_amount: i64,
    payment_method: Option<String>,
    payment_terms: Option<String>,
    contact_email: Option<String>,
    order_method: Option<String>,
    default_supply_days: Option<i32>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VendorRow> for Vendor {
    fn from(row: VendorRow) -> Self {
        Self {
            id: VendorId::new(row.id),
            merchant_id: MerchantId::new(row.merchant_id),
            name: row.name,
            status: row.status,
            schedule_type: row.schedule_type,
            order_day: row.order_day,
            receive_day: row.receive_day,
            lead_time_days: row.lead_time_days,
            minimum_order_amount: row.minimum_order_amount,
            payment_method: row.payment_method,
            payment_terms: row.payment_terms,
            contact_email: row.contact_email,
            order_method: row.order_method,
            default_supply_days: row.default_supply_days,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for vendors with purchase-order aggregates.
///
/// `SUM(bigint)` comes back as `NUMERIC`, hence the `Decimal` here; it is
/// coerced to `i64` cents on materialization.
#[derive(Debug, sqlx::FromRow)]
struct VendorWithOrdersRow {
    #[sqlx(flatten)]
    vendor: VendorRow,
    pending_po_value: Option<Decimal>,
    last_ordered_at: Option<DateTime<Utc>>,
}

impl From<VendorWithOrdersRow> for VendorWithOrders {
    fn from(row: VendorWithOrdersRow) -> Self {
        Self {
            vendor: row.vendor.into(),
            pending_po_value: coerce::decimal_to_i64(row.pending_po_value),
            last_ordered_at: row.last_ordered_at,
        }
    }
}

/// Repository for vendor database operations.
pub struct VendorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VendorRepository<'a> {
    /// Create a new vendor repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List the merchant's ACTIVE vendors with pending purchase-order value
    /// and last-ordered date, one aggregate pass per vendor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active_with_orders(
        &self,
        merchant_id: &MerchantId,
    ) -> Result<Vec<VendorWithOrders>, RepositoryError> {
        let rows = sqlx::query_as::<_, VendorWithOrdersRow>(
            r"
            SELECT
                v.id, v.merchant_id, v.name, v.status, v.schedule_type,
                v.order_day, v.receive_day, v.lead_time_days,
                v.minimum_order_amount, v.payment_method, v.payment_terms,
                v.contact_email, v.order_method, v.default_supply_days,
                v.notes, v.created_at, v.updated_at,
                pending.value AS pending_po_value,
                ordered.last_ordered_at
            FROM ops.vendors v
            LEFT JOIN (
                SELECT vendor_id, SUM(total_cents) AS value
                FROM ops.purchase_orders
                WHERE merchant_id = $1 AND status IN ('DRAFT', 'SUBMITTED')
                GROUP BY vendor_id
            ) pending ON pending.vendor_id = v.id
            LEFT JOIN (
                SELECT vendor_id, MAX(ordered_at) AS last_ordered_at
                FROM ops.purchase_orders
                WHERE merchant_id = $1 AND status IN ('SUBMITTED', 'RECEIVED')
                GROUP BY vendor_id
            ) ordered ON ordered.vendor_id = v.id
            WHERE v.merchant_id = $1 AND v.status = 'ACTIVE'
            ORDER BY v.name ASC, v.id ASC
            ",
        )
        .bind(merchant_id.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a vendor by ID, scoped to the owning merchant.
    ///
    /// Returns `None` when the vendor does not exist or belongs to another
    /// merchant - the two cases are deliberately indistinguishable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        vendor_id: VendorId,
        merchant_id: &MerchantId,
    ) -> Result<Option<Vendor>, RepositoryError> {
        let row = sqlx::query_as::<_, VendorRow>(&format!(
            "SELECT {VENDOR_COLUMNS} FROM ops.vendors WHERE id = $1 AND merchant_id = $2",
        ))
        .bind(vendor_id.as_i32())
        .bind(merchant_id.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Apply an allowlisted partial update to a vendor's settings.
    ///
    /// The tenancy predicate is on the UPDATE itself, not a prior read, so a
    /// concurrent ownership change cannot slip a write through. An empty
    /// patch skips the mutation and returns the current record (a valid
    /// no-op, not an error). All values are bound parameters.
    ///
    /// Returns `None` when the vendor is not found or not owned by
    /// `merchant_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn update_settings(
        &self,
        vendor_id: VendorId,
        merchant_id: &MerchantId,
        patch: &VendorSettingsPatch,
    ) -> Result<Option<Vendor>, RepositoryError> {
        if patch.is_empty() {
            return self.get(vendor_id, merchant_id).await;
        }

        let row = sqlx::query_as::<_, VendorRow>(&format!(
            r"
            UPDATE ops.vendors
            SET
                schedule_type = COALESCE($3, schedule_type),
                order_day = COALESCE($4, order_day),
                receive_day = COALESCE($5, receive_day),
                lead_time_days = COALESCE($6, lead_time_days),
                minimum_order_amount = COALESCE($7, minimum_order_amount),
                payment_method = COALESCE($8, payment_method),
                payment_terms = COALESCE($9, payment_terms),
                contact_email = COALESCE($10, contact_email),
                order_method = COALESCE($11, order_method),
                default_supply_days = COALESCE($12, default_supply_days),
                notes = COALESCE($13, notes),
                updated_at = NOW()
            WHERE id = $1 AND merchant_id = $2
            RETURNING {VENDOR_COLUMNS}
            ",
        ))
        .bind(vendor_id.as_i32())
        .bind(merchant_id.as_str())
        .bind(patch.schedule_type.as_deref())
        .bind(patch.order_day)
        .bind(patch.receive_day)
        .bind(patch.lead_time_days)
        .bind(patch.minimum_order_amount)
        .bind(patch.payment_method.as_deref())
        .bind(patch.payment_terms.as_deref())
        .bind(patch.contact_email.as_deref())
        .bind(patch.order_method.as_deref())
        .bind(patch.default_supply_days)
        .bind(patch.notes.as_deref())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }
}
