//! Restock ops service library.
//!
//! Reorder and inventory-health decision engine over a Square POS mirror:
//! vendor dashboard aggregation, inventory snapshots, stock-health
//! predicates, and vendor settings management. Exposed as a library so the
//! services and repositories can be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
