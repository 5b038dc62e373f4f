//! Inventory domain module.
//!
//! Stock records, suppliers, and the stock evaluation rules behind the
//! low-stock alerts. Pure domain logic (no IO, no HTTP, no storage).

pub mod item;
pub mod stock;
pub mod supplier;

pub use item::{InventoryItem, NewInventoryItem};
pub use stock::{
    fill_percentage, low_stock_set, low_stock_transition, status, summary, total_inventory_value,
    InventorySummary, LowStockTransition, StockStatus,
};
pub use supplier::{NewSupplier, Supplier};
