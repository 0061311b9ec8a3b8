//! Merchant settings database operations.

use sqlx::PgPool;

use restock_core::MerchantId;

use super::RepositoryError;
use crate::models::vendor::MerchantSettings;

#[derive(Debug, sqlx::FromRow)]
struct MerchantSettingsRow {
    default_supply_days: Option<i32>,
    reorder_safety_days: Option<i32>,
}

impl From<MerchantSettingsRow> for MerchantSettings {
    fn from(row: MerchantSettingsRow) -> Self {
        Self {
            default_supply_days: row.default_supply_days,
            reorder_safety_days: row.reorder_safety_days,
        }
    }
}

/// Get a merchant's reorder settings.
///
/// Returns the default (all-`None`) settings when the merchant has not
/// configured any - callers fall back to environment-level defaults.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn get_settings(
    pool: &PgPool,
    merchant_id: &MerchantId,
) -> Result<MerchantSettings, RepositoryError> {
    let row = sqlx::query_as::<_, MerchantSettingsRow>(
        r"
        SELECT default_supply_days, reorder_safety_days
        FROM ops.merchant_settings
        WHERE merchant_id = $1
        ",
    )
    .bind(merchant_id.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Into::into).unwrap_or_default())
}
