//! Menu domain module: categories, dishes, and the catalog views the POS and
//! the management screen read from.

pub mod catalog;
pub mod category;
pub mod item;

pub use catalog::{management_view, pos_view, CategoryFilter, MenuItemView, PosMenu};
pub use category::{CategoryPatch, MenuCategory, NewMenuCategory};
pub use item::{MenuItem, MenuItemPatch, NewMenuItem, DEFAULT_PREPARATION_MINUTES};
