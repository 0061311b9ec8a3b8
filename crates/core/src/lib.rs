//! Restock Core - Shared types and reorder math.
//!
//! This crate provides the types and pure computations used across all
//! Restock components:
//! - `ops` - Operational backend (dashboards, vendor settings, audits)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs
//! - [`coerce`] - Driver-boundary numeric coercion helpers
//! - [`reorder`] - Reorder quantity and days-of-stock math
//! - [`status`] - Vendor status classifier

#![cfg_attr(not(test), forbid(unsafe_code))]
#![feature(int_roundings)]

pub mod coerce;
pub mod reorder;
pub mod status;
pub mod types;

pub use reorder::{ReorderParams, calculate_days_of_stock, calculate_reorder_quantity};
pub use status::{VendorStatus, VendorStatusInputs, compute_status};
pub use types::*;
