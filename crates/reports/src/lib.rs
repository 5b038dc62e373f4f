//! Sales analytics over recorded daily, per-item, hourly and per-category figures.
//!
//! Pure computations; the API layer loads rows from storage and hands them in.

pub mod analytics;
pub mod range;
pub mod records;

pub use analytics::{
    category_distribution, peak_hours, popular_items, summary, CategoryShare, HourCount, PeakHours,
    SalesSummary,
};
pub use range::{DateRange, UnknownRange};
pub use records::{CategorySales, DailySales, HourlyOrders, ItemSales};
