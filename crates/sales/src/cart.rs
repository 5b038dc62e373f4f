use serde::{Deserialize, Serialize};

use bistro_core::{DomainResult, Entity, Money, RecordId};
use bistro_menu::MenuItem;

/// One aggregated entry per distinct menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: RecordId,
    pub name: String,
    pub unit_price: Money,
    /// Always ≥ 1.
    pub quantity: i64,
}

impl CartLine {
    pub fn line_total(&self) -> DomainResult<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartState {
    Empty,
    NonEmpty,
}

/// Lines in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `item`.
    ///
    /// An item already in the cart has its quantity bumped in place; a new
    /// item is appended with quantity 1. Name and price are captured on first
    /// insertion and not refreshed afterwards.
    pub fn add(&mut self, item: &MenuItem) {
        let id = *item.id();
        match self.lines.iter_mut().find(|line| line.item_id == id) {
            Some(line) => line.quantity += 1,
            None => self.lines.push(CartLine {
                item_id: id,
                name: item.name().to_string(),
                unit_price: item.base_price(),
                quantity: 1,
            }),
        }
    }

    /// Σ `unit_price × quantity`, failing on overflow.
    pub fn total(&self) -> DomainResult<Money> {
        self.lines
            .iter()
            .try_fold(Money::ZERO, |acc, line| acc.checked_add(line.line_total()?))
    }

    /// Σ quantity across lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn state(&self) -> CartState {
        if self.lines.is_empty() {
            CartState::Empty
        } else {
            CartState::NonEmpty
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bistro_menu::NewMenuItem;

    fn menu_item(name: &str, price: i64) -> MenuItem {
        MenuItem::create(
            RecordId::new(),
            NewMenuItem {
                name: name.to_string(),
                description: String::new(),
                base_price: Money::from_minor(price),
                category_id: RecordId::new(),
                is_vegetarian: true,
                is_available: true,
                preparation_time: 15,
                sort_order: 0,
            },
        )
        .unwrap()
    }

    #[test]
    fn new_cart_is_empty() {
        let cart = Cart::new();
        assert_eq!(cart.state(), CartState::Empty);
        assert_eq!(cart.total().unwrap(), Money::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn repeated_item_aggregates_into_one_line() {
        let pizza = menu_item("Veg Pizza", 250);
        let chai = menu_item("Masala Chai", 60);

        let mut cart = Cart::new();
        cart.add(&pizza);
        cart.add(&pizza);
        cart.add(&chai);

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.total().unwrap(), Money::from_minor(560));
        assert_eq!(cart.lines()[0].item_id, *pizza.id());
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.lines()[1].name, "Masala Chai");
        assert_eq!(cart.state(), CartState::NonEmpty);
    }

    #[test]
    fn clear_returns_to_empty() {
        let mut cart = Cart::new();
        cart.add(&menu_item("Veg Pizza", 250));
        cart.clear();
        assert_eq!(cart.state(), CartState::Empty);
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn total_reports_overflow() {
        let mut cart = Cart::new();
        let expensive = menu_item("Gold Thali", i64::MAX);
        cart.add(&expensive);
        cart.add(&expensive);
        assert!(cart.total().is_err());
    }

    #[test]
    fn serializes_lines_in_order() {
        let mut cart = Cart::new();
        cart.add(&menu_item("Veg Pizza", 250));
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["lines"][0]["name"], "Veg Pizza");
        assert_eq!(json["lines"][0]["unit_price"], 250);
        assert_eq!(json["lines"][0]["quantity"], 1);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the same item added twice is one line with quantity 2.
            #[test]
            fn same_item_twice_is_one_line(price in 0i64..1_000_000) {
                let item = menu_item("Dish", price);
                let mut cart = Cart::new();
                cart.add(&item);
                cart.add(&item);
                prop_assert_eq!(cart.line_count(), 1);
                prop_assert_eq!(cart.lines()[0].quantity, 2);
                prop_assert_eq!(cart.total().unwrap(), Money::from_minor(price * 2));
            }

            /// Property: the total does not depend on the order items were added.
            #[test]
            fn total_is_order_independent(
                adds in prop::collection::vec((0usize..5, 1i64..5), 0..30),
                prices in prop::collection::vec(0i64..100_000, 5),
            ) {
                let menu: Vec<MenuItem> = prices.iter().map(|p| menu_item("Dish", *p)).collect();

                let mut forward = Cart::new();
                let mut expected = 0i64;
                for (idx, times) in &adds {
                    for _ in 0..*times {
                        forward.add(&menu[*idx]);
                        expected += prices[*idx];
                    }
                }

                let mut backward = Cart::new();
                for (idx, times) in adds.iter().rev() {
                    for _ in 0..*times {
                        backward.add(&menu[*idx]);
                    }
                }

                prop_assert_eq!(forward.total().unwrap(), Money::from_minor(expected));
                prop_assert_eq!(backward.total().unwrap(), forward.total().unwrap());
                prop_assert_eq!(backward.item_count(), forward.item_count());
            }
        }
    }
}
