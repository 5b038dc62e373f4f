use serde::Serialize;
use serde::de::DeserializeOwned;

use bistro_core::{Entity, RecordId};
use bistro_inventory::{InventoryItem, Supplier};
use bistro_menu::{MenuCategory, MenuItem};
use bistro_reports::{CategorySales, DailySales, HourlyOrders, ItemSales};
use bistro_resources::InterviewResource;

/// A record type stored in a named table.
pub trait TableRow:
    Entity<Id = RecordId> + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const TABLE: &'static str;
}

macro_rules! table_rows {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl TableRow for $t {
                const TABLE: &'static str = $name;
            }
        )*
    };
}

table_rows! {
    InventoryItem => "inventory_items",
    Supplier => "suppliers",
    MenuCategory => "menu_categories",
    MenuItem => "menu_items",
    InterviewResource => "interview_resources",
    DailySales => "daily_sales",
    ItemSales => "item_sales",
    HourlyOrders => "hourly_orders",
    CategorySales => "category_sales",
}
