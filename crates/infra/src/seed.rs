//! Demo restaurant data for local runs.
//!
//! Amounts are in paise. Sales history is laid out on the seven days ending
//! at `as_of` so the default report window has something to show.

use chrono::{Duration, NaiveDate};

use bistro_core::{DomainResult, Entity, Money, RecordId, TenantId};
use bistro_inventory::{InventoryItem, NewInventoryItem, NewSupplier, Supplier};
use bistro_menu::{MenuCategory, MenuItem, NewMenuCategory, NewMenuItem};
use bistro_reports::{CategorySales, DailySales, HourlyOrders, ItemSales};

use crate::rows::TableRow;
use crate::table::{StoreError, Table};

#[derive(Debug, Clone)]
pub struct DemoData {
    pub suppliers: Vec<Supplier>,
    pub inventory: Vec<InventoryItem>,
    pub categories: Vec<MenuCategory>,
    pub menu_items: Vec<MenuItem>,
    pub daily_sales: Vec<DailySales>,
    pub item_sales: Vec<ItemSales>,
    pub hourly_orders: Vec<HourlyOrders>,
    pub category_sales: Vec<CategorySales>,
}

fn rupees(r: i64) -> Money {
    Money::from_minor(r * 100)
}

pub fn demo_data(as_of: NaiveDate) -> DomainResult<DemoData> {
    let suppliers = [
        ("Fresh Farms", "+91 98765 43210", "orders@freshfarms.com"),
        ("Meat Market", "+91 98765 43211", "sales@meatmarket.com"),
        ("Dairy Co", "+91 98765 43212", "orders@dairyco.com"),
        ("Grain Mills", "+91 98765 43213", "supply@grainmills.com"),
    ]
    .into_iter()
    .map(|(name, contact, email)| {
        Supplier::create(
            RecordId::new(),
            NewSupplier {
                name: name.to_string(),
                contact: contact.to_string(),
                email: email.to_string(),
            },
        )
    })
    .collect::<DomainResult<Vec<_>>>()?;

    let inventory = [
        ("Tomatoes", 15, 20, 100, 60, "Fresh Farms"),
        ("Chicken Breast", 25, 10, 50, 280, "Meat Market"),
        ("Mozzarella Cheese", 8, 5, 30, 450, "Dairy Co"),
        ("Flour", 45, 20, 100, 35, "Grain Mills"),
        ("Onions", 3, 15, 80, 25, "Fresh Farms"),
    ]
    .into_iter()
    .map(|(name, current, min, max, cost, supplier)| {
        InventoryItem::create(
            RecordId::new(),
            NewInventoryItem {
                name: name.to_string(),
                current_stock: current,
                min_stock: min,
                max_stock: max,
                unit: "kg".to_string(),
                cost_per_unit: rupees(cost),
                supplier: supplier.to_string(),
            },
        )
    })
    .collect::<DomainResult<Vec<_>>>()?;

    let categories = [
        ("Main Course", "Pizzas, burgers and mains"),
        ("Appetizers", "Small plates"),
        ("Beverages", "Hot and cold drinks"),
        ("Desserts", "Sweets"),
    ]
    .into_iter()
    .zip(1..)
    .map(|((name, description), sort_order)| {
        MenuCategory::create(
            RecordId::new(),
            NewMenuCategory {
                name: name.to_string(),
                description: description.to_string(),
                is_active: true,
                sort_order,
            },
        )
    })
    .collect::<DomainResult<Vec<_>>>()?;

    let category_id = |name: &str| {
        categories
            .iter()
            .find(|c| c.name() == name)
            .map(|c| *c.id())
            .unwrap_or_default()
    };

    let menu_items = [
        ("Veg Pizza", "Main Course", 250, true, 20),
        ("Chicken Burger", "Main Course", 220, false, 15),
        ("Veg Momos", "Appetizers", 120, true, 12),
        ("Masala Chai", "Beverages", 40, true, 5),
        ("Fresh Lime Soda", "Beverages", 60, true, 5),
        ("Gulab Jamun", "Desserts", 80, true, 5),
    ]
    .into_iter()
    .zip(1..)
    .map(|((name, category, price, veg, prep), sort_order)| {
        MenuItem::create(
            RecordId::new(),
            NewMenuItem {
                name: name.to_string(),
                description: String::new(),
                base_price: rupees(price),
                category_id: category_id(category),
                is_vegetarian: veg,
                is_available: true,
                preparation_time: prep,
                sort_order,
            },
        )
    })
    .collect::<DomainResult<Vec<_>>>()?;

    let week = [
        (12500, 45),
        (18900, 62),
        (15600, 51),
        (22300, 73),
        (19800, 65),
        (25100, 84),
        (27500, 91),
    ];
    let first_day = as_of - Duration::days(week.len() as i64 - 1);
    let daily_sales = week
        .into_iter()
        .enumerate()
        .map(|(offset, (sales, orders))| {
            DailySales::new(
                RecordId::new(),
                first_day + Duration::days(offset as i64),
                rupees(sales),
                orders,
            )
        })
        .collect::<DomainResult<Vec<_>>>()?;

    let item_sales = [
        ("Veg Pizza", 156, 39000),
        ("Chicken Burger", 134, 29480),
        ("Veg Momos", 98, 11760),
        ("Masala Chai", 87, 3480),
        ("Fresh Lime Soda", 76, 4560),
    ]
    .into_iter()
    .map(|(name, orders, revenue)| ItemSales {
        id: RecordId::new(),
        name: name.to_string(),
        orders,
        revenue: rupees(revenue),
    })
    .collect();

    let hourly_orders = [5, 8, 12, 25, 35, 28, 15, 10, 8, 18, 32, 40, 35, 20]
        .into_iter()
        .zip(9u8..)
        .map(|(orders, hour)| HourlyOrders::new(RecordId::new(), hour, orders))
        .collect::<DomainResult<Vec<_>>>()?;

    let category_sales = [("Main Course", 45), ("Appetizers", 25), ("Beverages", 20), ("Desserts", 10)]
        .into_iter()
        .map(|(name, orders)| CategorySales {
            id: RecordId::new(),
            name: name.to_string(),
            orders,
        })
        .collect();

    Ok(DemoData {
        suppliers,
        inventory,
        categories,
        menu_items,
        daily_sales,
        item_sales,
        hourly_orders,
        category_sales,
    })
}

/// Insert `rows` one by one, stopping at the first failure.
pub async fn insert_all<R, T>(table: &T, tenant_id: TenantId, rows: Vec<R>) -> Result<usize, StoreError>
where
    R: TableRow,
    T: Table<R> + ?Sized,
{
    let count = rows.len();
    for row in rows {
        table.insert(tenant_id, row).await?;
    }
    tracing::debug!(table = R::TABLE, %tenant_id, count, "seeded rows");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_inventory::{low_stock_set, summary};
    use bistro_reports::DateRange;

    use crate::table::{InMemoryTable, Query};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 21).unwrap()
    }

    #[test]
    fn demo_inventory_has_two_low_items() {
        let data = demo_data(as_of()).unwrap();
        let low: Vec<_> = low_stock_set(&data.inventory).into_iter().map(|i| i.name()).collect();
        assert_eq!(low, vec!["Tomatoes", "Onions"]);
        assert_eq!(summary(&data.inventory).unwrap().total_items, 5);
    }

    #[test]
    fn every_menu_item_points_at_a_seeded_category() {
        let data = demo_data(as_of()).unwrap();
        for item in &data.menu_items {
            assert!(data.categories.iter().any(|c| *c.id() == item.category_id()));
        }
    }

    #[test]
    fn sales_week_ends_on_as_of() {
        let data = demo_data(as_of()).unwrap();
        let s = bistro_reports::summary(&data.daily_sales, DateRange::LastWeek, as_of()).unwrap();
        assert_eq!(s.active_days, 7);
        assert_eq!(s.total_orders, 471);
        assert_eq!(data.daily_sales[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[tokio::test]
    async fn insert_all_loads_a_table() {
        let table = InMemoryTable::<Supplier>::new();
        let tenant = TenantId::new();
        let data = demo_data(as_of()).unwrap();
        assert_eq!(insert_all(&table, tenant, data.suppliers).await.unwrap(), 4);
        assert_eq!(table.select(tenant, Query::all()).await.unwrap().len(), 4);
    }
}
