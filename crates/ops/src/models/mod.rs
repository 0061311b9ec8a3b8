//! Domain models for the ops backend.

pub mod inventory;
pub mod vendor;

pub use inventory::{
    AuditFinding, AuditIssue, AuditVariation, CatalogAuditReport, CheapestVendor,
    InventorySnapshot, SnapshotFilter, StockFacts, VariationFact, VelocityWindow,
};
pub use vendor::{
    MerchantSettings, Vendor, VendorDashboard, VendorSettingsPatch, VendorStat, VendorWithOrders,
};
