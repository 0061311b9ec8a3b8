//! Read-side services composing repository queries with the pure reorder and
//! status math.

pub mod audit;
pub mod dashboard;
pub mod snapshot;
pub mod stock_health;

pub use snapshot::ImageResolver;
