//! Stock evaluation: fill level classification and low-stock alerting.
//!
//! Pure functions over [`InventoryItem`]. Alert flapping is not handled here:
//! an item enters and leaves the low-stock set as soon as its stock crosses
//! `min_stock`. [`low_stock_transition`] lets a caller alert on crossings only.

use serde::{Deserialize, Serialize};

use bistro_core::{DomainResult, Money};

use crate::item::InventoryItem;

/// Stock level classification shown on every inventory row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Low,
    Normal,
    High,
}

/// Classify an item's stock level.
///
/// `Low` is checked first, so it wins when `min_stock` is itself at or above
/// 80% of `max_stock`. The 80% comparison is exact: `current × 5 ≥ max × 4`.
pub fn status(item: &InventoryItem) -> StockStatus {
    let current = i128::from(item.current_stock());
    if current <= i128::from(item.min_stock()) {
        return StockStatus::Low;
    }
    if current * 5 >= i128::from(item.max_stock()) * 4 {
        return StockStatus::High;
    }
    StockStatus::Normal
}

/// `current_stock / max_stock × 100`, or `None` when `max_stock` is zero.
pub fn fill_percentage(item: &InventoryItem) -> Option<f64> {
    if item.max_stock() == 0 {
        return None;
    }
    Some(item.current_stock() as f64 / item.max_stock() as f64 * 100.0)
}

/// Items currently at or below their minimum, in input order.
pub fn low_stock_set(items: &[InventoryItem]) -> Vec<&InventoryItem> {
    items
        .iter()
        .filter(|item| status(item) == StockStatus::Low)
        .collect()
}

/// Σ `current_stock × cost_per_unit`, failing on overflow.
pub fn total_inventory_value(items: &[InventoryItem]) -> DomainResult<Money> {
    items
        .iter()
        .try_fold(Money::ZERO, |acc, item| acc.checked_add(item.stock_value()?))
}

/// Dashboard figures for the inventory screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub total_items: usize,
    pub low_stock_count: usize,
    pub total_value: Money,
}

pub fn summary(items: &[InventoryItem]) -> DomainResult<InventorySummary> {
    Ok(InventorySummary {
        total_items: items.len(),
        low_stock_count: low_stock_set(items).len(),
        total_value: total_inventory_value(items)?,
    })
}

/// Direction of a crossing of the low-stock threshold.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowStockTransition {
    Entered,
    Cleared,
}

/// Compare an item before and after a write.
///
/// A newly created item (`previous = None`) counts as entering when it starts
/// out low. Staying low, or staying out of low, yields `None`.
pub fn low_stock_transition(
    previous: Option<&InventoryItem>,
    current: &InventoryItem,
) -> Option<LowStockTransition> {
    let was_low = previous.is_some_and(|p| status(p) == StockStatus::Low);
    let is_low = status(current) == StockStatus::Low;
    match (was_low, is_low) {
        (false, true) => Some(LowStockTransition::Entered),
        (true, false) => Some(LowStockTransition::Cleared),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_core::{Entity, RecordId};

    use crate::item::NewInventoryItem;

    fn item(current: i64, min: i64, max: i64, cost: i64) -> InventoryItem {
        InventoryItem::create(
            RecordId::new(),
            NewInventoryItem {
                name: "Item".to_string(),
                current_stock: current,
                min_stock: min,
                max_stock: max,
                unit: "kg".to_string(),
                cost_per_unit: Money::from_minor(cost),
                supplier: String::new(),
            },
        )
        .unwrap()
    }

    #[test]
    fn classifies_low_normal_high() {
        assert_eq!(status(&item(15, 20, 100, 1)), StockStatus::Low);
        assert_eq!(status(&item(20, 20, 100, 1)), StockStatus::Low);
        assert_eq!(status(&item(45, 20, 100, 1)), StockStatus::Normal);
        assert_eq!(status(&item(80, 20, 100, 1)), StockStatus::High);
        assert_eq!(status(&item(79, 20, 100, 1)), StockStatus::Normal);
    }

    #[test]
    fn low_wins_when_min_is_above_high_threshold() {
        // min 90 ≥ 0.8 × 100; stock 85 hits both thresholds.
        assert_eq!(status(&item(85, 90, 100, 1)), StockStatus::Low);
    }

    #[test]
    fn fill_percentage_guards_zero_max() {
        assert_eq!(fill_percentage(&item(0, 0, 0, 1)), None);
        assert_eq!(fill_percentage(&item(25, 10, 50, 1)), Some(50.0));
    }

    #[test]
    fn low_stock_set_keeps_only_low_items() {
        let items = vec![item(15, 20, 100, 60), item(8, 5, 30, 450)];
        let low = low_stock_set(&items);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].id(), items[0].id());
    }

    #[test]
    fn total_value_sums_stock_times_cost() {
        let items = vec![item(15, 20, 100, 60), item(8, 5, 30, 450)];
        assert_eq!(total_inventory_value(&items).unwrap(), Money::from_minor(15 * 60 + 8 * 450));
    }

    #[test]
    fn summary_over_original_demo_stock() {
        let items = vec![
            item(15, 20, 100, 60),
            item(25, 10, 50, 280),
            item(8, 5, 30, 450),
            item(45, 20, 100, 35),
            item(3, 15, 80, 25),
        ];
        let s = summary(&items).unwrap();
        assert_eq!(s.total_items, 5);
        assert_eq!(s.low_stock_count, 2);
        assert_eq!(s.total_value, Money::from_minor(900 + 7000 + 3600 + 1575 + 75));
    }

    #[test]
    fn transitions_fire_only_on_crossings() {
        let normal = item(30, 20, 100, 1);
        let mut low = normal.clone();
        low.set_stock(10).unwrap();
        let mut still_low = low.clone();
        still_low.set_stock(5).unwrap();

        assert_eq!(low_stock_transition(Some(&normal), &low), Some(LowStockTransition::Entered));
        assert_eq!(low_stock_transition(Some(&low), &still_low), None);
        assert_eq!(low_stock_transition(Some(&low), &normal), Some(LowStockTransition::Cleared));
        assert_eq!(low_stock_transition(Some(&normal), &normal), None);
    }

    #[test]
    fn new_item_that_starts_low_enters() {
        assert_eq!(low_stock_transition(None, &item(3, 15, 80, 25)), Some(LowStockTransition::Entered));
        assert_eq!(low_stock_transition(None, &item(45, 20, 100, 35)), None);
    }

    #[test]
    fn empty_inventory_has_zero_value() {
        assert_eq!(total_inventory_value(&[]).unwrap(), Money::ZERO);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            /// Property: at or below the minimum is always Low, whatever the maximum.
            #[test]
            fn at_or_below_min_is_low(
                min in 0i64..10_000,
                below in 0i64..10_000,
                headroom in 0i64..10_000,
            ) {
                let current = min - (below % (min + 1));
                let it = item(current, min, min + headroom, 1);
                prop_assert_eq!(status(&it), StockStatus::Low);
            }

            /// Property: strictly between the minimum and 80% of the maximum is Normal.
            #[test]
            fn between_min_and_high_threshold_is_normal(
                max in 1i64..10_000,
                min_seed in 0i64..10_000,
                cur_seed in 0i64..10_000,
            ) {
                // Largest stock strictly below 0.8 × max.
                let high_floor = (max * 4 - 1) / 5;
                prop_assume!(high_floor >= 1);
                let min = min_seed % high_floor;
                let span = high_floor - min;
                prop_assume!(span >= 1);
                let current = min + 1 + (cur_seed % span);

                let it = item(current, min, max, 1);
                prop_assert!(current * 5 < max * 4);
                prop_assert_eq!(status(&it), StockStatus::Normal);
            }

            /// Property: fill percentage never decreases as stock grows.
            #[test]
            fn fill_percentage_is_monotonic(
                max in 1i64..100_000,
                a in 0i64..200_000,
                b in 0i64..200_000,
            ) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let p_lo = fill_percentage(&item(lo, 0, max, 1)).unwrap();
                let p_hi = fill_percentage(&item(hi, 0, max, 1)).unwrap();
                prop_assert!(p_lo <= p_hi);
            }

            /// Property: the low-stock set is exactly the items classified Low.
            #[test]
            fn low_stock_set_matches_status(
                rows in prop::collection::vec((0i64..200, 0i64..100, 0i64..100), 0..20)
            ) {
                let items: Vec<InventoryItem> = rows
                    .into_iter()
                    .map(|(cur, min, extra)| item(cur, min, min + extra, 1))
                    .collect();
                let low: Vec<_> = low_stock_set(&items).into_iter().map(|i| *i.id()).collect();
                let expected: Vec<_> = items
                    .iter()
                    .filter(|i| i.current_stock() <= i.min_stock())
                    .map(|i| *i.id())
                    .collect();
                prop_assert_eq!(low, expected);
            }
        }
    }
}
