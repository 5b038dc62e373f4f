use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bistro_core::{DomainError, DomainResult, Money};

use crate::range::DateRange;
use crate::records::{CategorySales, DailySales, HourlyOrders, ItemSales};

/// Headline cards for a reporting window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub range: DateRange,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_sales: Money,
    pub total_orders: i64,
    /// Rounded to the nearest minor unit; zero when there are no orders.
    pub average_order_value: Money,
    /// Days in the window that have a sales record.
    pub active_days: usize,
}

pub fn summary(days: &[DailySales], range: DateRange, as_of: NaiveDate) -> DomainResult<SalesSummary> {
    let in_range: Vec<&DailySales> = days
        .iter()
        .filter(|d| range.contains(as_of, d.date))
        .collect();

    let total_sales = Money::try_sum(in_range.iter().map(|d| d.sales))?;
    let total_orders = in_range
        .iter()
        .try_fold(0i64, |acc, d| acc.checked_add(d.orders))
        .ok_or_else(|| DomainError::invariant("order count overflow"))?;

    Ok(SalesSummary {
        range,
        from: range.start(as_of),
        to: as_of,
        total_sales,
        total_orders,
        average_order_value: average(total_sales, total_orders),
        active_days: in_range.len(),
    })
}

// Round half away from zero.
fn average(total: Money, orders: i64) -> Money {
    if orders <= 0 {
        return Money::ZERO;
    }
    let total = i128::from(total.minor());
    let orders = i128::from(orders);
    let rounded = if total >= 0 {
        (2 * total + orders) / (2 * orders)
    } else {
        -((-2 * total + orders) / (2 * orders))
    };
    // |rounded| ≤ |total|, so it fits back into i64.
    Money::from_minor(rounded as i64)
}

/// Best sellers: orders descending, then revenue descending, then name.
pub fn popular_items(items: &[ItemSales], limit: Option<usize>) -> Vec<ItemSales> {
    let mut ranked = items.to_vec();
    ranked.sort_by(|a, b| {
        b.orders
            .cmp(&a.orders)
            .then_with(|| b.revenue.cmp(&a.revenue))
            .then_with(|| a.name.cmp(&b.name))
    });
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourCount {
    pub hour: u8,
    pub orders: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakHours {
    /// One entry per hour that has records, ascending.
    pub hours: Vec<HourCount>,
    /// Highest order count; the earliest hour wins ties.
    pub busiest: Option<HourCount>,
}

pub fn peak_hours(rows: &[HourlyOrders]) -> DomainResult<PeakHours> {
    let mut by_hour: BTreeMap<u8, i64> = BTreeMap::new();
    for row in rows {
        let slot = by_hour.entry(row.hour).or_default();
        *slot = slot
            .checked_add(row.orders)
            .ok_or_else(|| DomainError::invariant("order count overflow"))?;
    }

    let hours: Vec<HourCount> = by_hour
        .into_iter()
        .map(|(hour, orders)| HourCount { hour, orders })
        .collect();

    let busiest = hours
        .iter()
        .copied()
        .reduce(|best, h| if h.orders > best.orders { h } else { best });

    Ok(PeakHours { hours, busiest })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub name: String,
    pub orders: i64,
    /// Whole percent of all orders, rounded; 0 when there are no orders.
    pub percent: u32,
}

/// Per-category share of orders, in input order.
pub fn category_distribution(rows: &[CategorySales]) -> Vec<CategoryShare> {
    let total: i128 = rows.iter().map(|r| i128::from(r.orders.max(0))).sum();
    rows.iter()
        .map(|r| {
            let orders = i128::from(r.orders.max(0));
            let percent = if total == 0 {
                0
            } else {
                ((orders * 200 + total) / (2 * total)) as u32
            };
            CategoryShare {
                name: r.name.clone(),
                orders: r.orders,
                percent,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::RecordId;

    fn day(d: u32, sales: i64, orders: i64) -> DailySales {
        DailySales::new(
            RecordId::new(),
            NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            Money::from_minor(sales),
            orders,
        )
        .unwrap()
    }

    fn demo_week() -> Vec<DailySales> {
        vec![
            day(15, 12500, 45),
            day(16, 18900, 62),
            day(17, 15600, 51),
            day(18, 22300, 73),
            day(19, 19800, 65),
            day(20, 25100, 84),
            day(21, 27500, 91),
        ]
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 21).unwrap()
    }

    #[test]
    fn summary_of_demo_week() {
        let s = summary(&demo_week(), DateRange::LastWeek, as_of()).unwrap();
        assert_eq!(s.total_sales, Money::from_minor(141_700));
        assert_eq!(s.total_orders, 471);
        // 141700 / 471 = 300.85…
        assert_eq!(s.average_order_value, Money::from_minor(301));
        assert_eq!(s.active_days, 7);
    }

    #[test]
    fn summary_excludes_days_outside_window() {
        let mut days = demo_week();
        days.push(day(1, 99_999, 1));
        let s = summary(&days, DateRange::LastWeek, as_of()).unwrap();
        assert_eq!(s.active_days, 7);
        let s = summary(&days, DateRange::LastMonth, as_of()).unwrap();
        assert_eq!(s.active_days, 8);
    }

    #[test]
    fn average_is_zero_without_orders() {
        let s = summary(&[], DateRange::LastWeek, as_of()).unwrap();
        assert_eq!(s.total_orders, 0);
        assert_eq!(s.average_order_value, Money::ZERO);

        let s = summary(&[day(21, 500, 0)], DateRange::LastWeek, as_of()).unwrap();
        assert_eq!(s.average_order_value, Money::ZERO);
    }

    #[test]
    fn average_rounds_half_up() {
        assert_eq!(average(Money::from_minor(5), 2), Money::from_minor(3));
        assert_eq!(average(Money::from_minor(4), 3), Money::from_minor(1));
        assert_eq!(average(Money::from_minor(-5), 2), Money::from_minor(-3));
    }

    fn item(name: &str, orders: i64, revenue: i64) -> ItemSales {
        ItemSales {
            id: RecordId::new(),
            name: name.to_string(),
            orders,
            revenue: Money::from_minor(revenue),
        }
    }

    #[test]
    fn popular_items_rank_and_limit() {
        let items = vec![
            item("Masala Chai", 87, 3480),
            item("Veg Pizza", 156, 39000),
            item("Veg Momos", 98, 11760),
            item("Chicken Burger", 134, 29480),
        ];
        let top: Vec<_> = popular_items(&items, Some(2)).into_iter().map(|i| i.name).collect();
        assert_eq!(top, vec!["Veg Pizza", "Chicken Burger"]);
    }

    #[test]
    fn popular_items_break_ties_by_revenue_then_name() {
        let items = vec![item("B", 10, 100), item("A", 10, 100), item("C", 10, 500)];
        let ranked: Vec<_> = popular_items(&items, None).into_iter().map(|i| i.name).collect();
        assert_eq!(ranked, vec!["C", "A", "B"]);
    }

    fn hour(h: u8, orders: i64) -> HourlyOrders {
        HourlyOrders::new(RecordId::new(), h, orders).unwrap()
    }

    #[test]
    fn peak_hours_sorted_with_busiest() {
        let rows = vec![hour(20, 40), hour(9, 5), hour(13, 35), hour(21, 35)];
        let peaks = peak_hours(&rows).unwrap();
        let order: Vec<_> = peaks.hours.iter().map(|h| h.hour).collect();
        assert_eq!(order, vec![9, 13, 20, 21]);
        assert_eq!(peaks.busiest, Some(HourCount { hour: 20, orders: 40 }));
    }

    #[test]
    fn peak_hours_merges_duplicate_hours_and_prefers_earliest_tie() {
        let rows = vec![hour(13, 10), hour(12, 20), hour(13, 10)];
        let peaks = peak_hours(&rows).unwrap();
        assert_eq!(peaks.hours.len(), 2);
        assert_eq!(peaks.busiest, Some(HourCount { hour: 12, orders: 20 }));
        assert_eq!(peak_hours(&[]).unwrap().busiest, None);
    }

    fn category(name: &str, orders: i64) -> CategorySales {
        CategorySales {
            id: RecordId::new(),
            name: name.to_string(),
            orders,
        }
    }

    #[test]
    fn category_shares_in_whole_percent() {
        let rows = vec![
            category("Main Course", 45),
            category("Appetizers", 25),
            category("Beverages", 20),
            category("Desserts", 10),
        ];
        let shares: Vec<_> = category_distribution(&rows).into_iter().map(|c| c.percent).collect();
        assert_eq!(shares, vec![45, 25, 20, 10]);
    }

    #[test]
    fn category_shares_round_and_handle_zero_total() {
        let shares = category_distribution(&[category("A", 1), category("B", 2)]);
        assert_eq!(shares[0].percent, 33);
        assert_eq!(shares[1].percent, 67);
        let empty = category_distribution(&[category("A", 0)]);
        assert_eq!(empty[0].percent, 0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the rounded average sits within half a unit of the exact mean.
            #[test]
            fn average_is_nearest(total in 0i64..10_000_000, orders in 1i64..10_000) {
                let avg = average(Money::from_minor(total), orders).minor();
                let diff = (i128::from(avg) * i128::from(orders) - i128::from(total)).abs();
                prop_assert!(diff * 2 <= i128::from(orders));
            }
        }
    }
}
