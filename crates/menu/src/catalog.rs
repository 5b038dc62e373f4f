//! Read-side views over categories and items.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use bistro_core::{Entity, RecordId};

use crate::category::MenuCategory;
use crate::item::MenuItem;

/// A menu item joined with its category's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemView {
    #[serde(flatten)]
    pub item: MenuItem,
    /// `None` when the category row is missing.
    pub category_name: Option<String>,
}

/// POS category selector: everything, or one category by display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Named(String),
}

impl CategoryFilter {
    /// `"All"` and blank input select everything.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("All") => CategoryFilter::All,
            Some(name) => CategoryFilter::Named(name.to_string()),
        }
    }
}

/// What the order-taking screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosMenu {
    pub categories: Vec<MenuCategory>,
    pub items: Vec<MenuItem>,
}

fn sort_categories(categories: &mut [MenuCategory]) {
    categories.sort_by(|a, b| {
        a.sort_order()
            .cmp(&b.sort_order())
            .then_with(|| a.name().cmp(b.name()))
    });
}

fn sort_items(items: &mut [MenuItem]) {
    items.sort_by(|a, b| {
        a.sort_order()
            .cmp(&b.sort_order())
            .then_with(|| a.name().cmp(b.name()))
    });
}

/// Management listing: every item, optionally restricted to one category id,
/// ordered by `sort_order` then name.
pub fn management_view(
    categories: &[MenuCategory],
    items: &[MenuItem],
    category_id: Option<RecordId>,
) -> Vec<MenuItemView> {
    let names: HashMap<RecordId, &str> = categories
        .iter()
        .map(|c| (*c.id(), c.name()))
        .collect();

    let mut selected: Vec<MenuItem> = items
        .iter()
        .filter(|item| category_id.is_none_or(|id| item.category_id() == id))
        .cloned()
        .collect();
    sort_items(&mut selected);

    selected
        .into_iter()
        .map(|item| {
            let category_name = names.get(&item.category_id()).map(|n| n.to_string());
            MenuItemView { item, category_name }
        })
        .collect()
}

/// Order-taking listing: active categories and available items only.
///
/// `search` matches a case-insensitive substring of the item name. A named
/// category filter matches items whose category is active and has that name.
pub fn pos_view(
    categories: &[MenuCategory],
    items: &[MenuItem],
    search: &str,
    filter: &CategoryFilter,
) -> PosMenu {
    let mut active: Vec<MenuCategory> = categories
        .iter()
        .filter(|c| c.is_active())
        .cloned()
        .collect();
    sort_categories(&mut active);

    let needle = search.trim().to_lowercase();

    let mut shown: Vec<MenuItem> = items
        .iter()
        .filter(|item| item.is_available())
        .filter(|item| needle.is_empty() || item.name().to_lowercase().contains(&needle))
        .filter(|item| match filter {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => active
                .iter()
                .find(|c| *c.id() == item.category_id())
                .is_some_and(|c| c.name() == name),
        })
        .cloned()
        .collect();
    sort_items(&mut shown);

    PosMenu {
        categories: active,
        items: shown,
    }
}
