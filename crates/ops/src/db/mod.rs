//! Database operations for the ops `PostgreSQL`.
//!
//! # Schemas
//!
//! ## `catalog` - Square mirror (written by the external sync, read-only here)
//!
//! - `items` - Product groupings
//! - `variations` - Sellable SKUs with alert thresholds and packaging knobs
//! - `variation_vendors` - Variation/vendor links with unit costs
//! - `inventory_counts` - (variation, location, state) quantity triples
//! - `sales_velocity` - Trailing-window sales rollups (91/182/365 days)
//! - `variation_location_settings` - Per-location alert overrides
//! - `locations` - Merchant locations
//! - `item_images` - Item image URLs
//!
//! ## `ops` - Locally owned
//!
//! - `vendors` - Supplier configuration (mutated only via the allowlisted
//!   settings update)
//! - `purchase_orders` / `purchase_order_items` - Orders placed with vendors
//! - `merchant_settings` - Per-merchant reorder defaults
//!
//! # Tenancy
//!
//! Every query carries an explicit `merchant_id` predicate. There is no
//! ambient tenant filtering; a query without the predicate is a correctness
//! bug.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/ops/migrations/` and run via:
//! ```bash
//! cargo run -p restock-cli -- migrate ops
//! ```

pub mod inventory;
pub mod merchant_settings;
pub mod vendors;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use inventory::InventoryRepository;
pub use vendors::VendorRepository;

const POOL_MAX_CONNECTIONS: u32 = 10;
const POOL_MIN_CONNECTIONS: u32 = 2;
const POOL_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying sqlx failure (connection, statement, decode).
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A row held something the domain model cannot represent.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The requested entity does not exist.
    #[error("not found")]
    NotFound,
}

/// Open the ops connection pool.
///
/// # Errors
///
/// Returns `sqlx::Error` when the initial connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(POOL_MAX_CONNECTIONS)
        .min_connections(POOL_MIN_CONNECTIONS)
        .acquire_timeout(POOL_ACQUIRE_TIMEOUT)
        .connect(database_url.expose_secret())
        .await
}
