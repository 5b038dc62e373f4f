use axum::extract::{FromRequest, Request};
use axum::Json;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use bistro_core::{DomainError, DomainResult, Money, NumericInput, RecordId};
use bistro_inventory::{fill_percentage, status, InventoryItem, NewInventoryItem, StockStatus};
use bistro_menu::{CategoryPatch, MenuItemPatch, NewMenuCategory, NewMenuItem, DEFAULT_PREPARATION_MINUTES};
use bistro_sales::{Cart, CartLine, CartState};

use crate::app::errors;

/// JSON body extractor whose rejections use the API error shape.
///
/// Malformed or mistyped bodies come back as `validation_error`.
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = axum::response::Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| ApiJson(value))
            .map_err(errors::json_rejection)
    }
}

pub fn parse_id(raw: &str, what: &str) -> Result<RecordId, axum::response::Response> {
    raw.parse().map_err(|_| errors::invalid_id(what))
}

// -------------------------
// Numeric helpers
// -------------------------

fn required(field: &str, value: Option<NumericInput>) -> DomainResult<NumericInput> {
    value.ok_or_else(|| DomainError::validation(format!("{field} is required")))
}

fn to_i32(field: &str, value: &NumericInput) -> DomainResult<i32> {
    i32::try_from(value.to_i64(field)?)
        .map_err(|_| DomainError::validation(format!("{field} is out of range")))
}

fn to_u32(field: &str, value: &NumericInput) -> DomainResult<u32> {
    u32::try_from(value.to_non_negative(field)?)
        .map_err(|_| DomainError::validation(format!("{field} is out of range")))
}

fn opt<T>(
    field: &str,
    value: Option<NumericInput>,
    f: impl Fn(&str, &NumericInput) -> DomainResult<T>,
) -> DomainResult<Option<T>> {
    value.map(|v| f(field, &v)).transpose()
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<NumericInput>,
}

impl CreateCategoryRequest {
    pub fn into_new(self) -> DomainResult<NewMenuCategory> {
        Ok(NewMenuCategory {
            name: self.name,
            description: self.description.unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
            sort_order: opt("sort_order", self.sort_order, to_i32)?.unwrap_or(0),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<NumericInput>,
}

impl UpdateCategoryRequest {
    pub fn into_patch(self) -> DomainResult<CategoryPatch> {
        Ok(CategoryPatch {
            name: self.name,
            description: self.description,
            sort_order: opt("sort_order", self.sort_order, to_i32)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMenuItemRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub base_price: Option<NumericInput>,
    pub category_id: Option<String>,
    pub is_vegetarian: Option<bool>,
    pub is_available: Option<bool>,
    pub preparation_time: Option<NumericInput>,
    pub sort_order: Option<NumericInput>,
}

impl CreateMenuItemRequest {
    pub fn into_new(self) -> DomainResult<NewMenuItem> {
        let category_id = self
            .category_id
            .ok_or_else(|| DomainError::validation("category_id is required"))?
            .parse::<RecordId>()?;
        Ok(NewMenuItem {
            name: self.name,
            description: self.description.unwrap_or_default(),
            base_price: required("base_price", self.base_price)?.to_money("base_price")?,
            category_id,
            is_vegetarian: self.is_vegetarian.unwrap_or(false),
            is_available: self.is_available.unwrap_or(true),
            preparation_time: opt("preparation_time", self.preparation_time, to_u32)?
                .unwrap_or(DEFAULT_PREPARATION_MINUTES),
            sort_order: opt("sort_order", self.sort_order, to_i32)?.unwrap_or(0),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<NumericInput>,
    pub category_id: Option<String>,
    pub is_vegetarian: Option<bool>,
    pub preparation_time: Option<NumericInput>,
    pub sort_order: Option<NumericInput>,
}

impl UpdateMenuItemRequest {
    pub fn into_patch(self) -> DomainResult<MenuItemPatch> {
        Ok(MenuItemPatch {
            name: self.name,
            description: self.description,
            base_price: self
                .base_price
                .map(|p| p.to_money("base_price"))
                .transpose()?,
            category_id: self.category_id.map(|c| c.parse::<RecordId>()).transpose()?,
            is_vegetarian: self.is_vegetarian,
            preparation_time: opt("preparation_time", self.preparation_time, to_u32)?,
            sort_order: opt("sort_order", self.sort_order, to_i32)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AddCartItemRequest {
    pub item_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateInventoryItemRequest {
    #[serde(default)]
    pub name: String,
    pub current_stock: Option<NumericInput>,
    pub min_stock: Option<NumericInput>,
    pub max_stock: Option<NumericInput>,
    pub unit: Option<String>,
    pub cost_per_unit: Option<NumericInput>,
    pub supplier: Option<String>,
}

impl CreateInventoryItemRequest {
    pub fn into_new(self) -> DomainResult<NewInventoryItem> {
        Ok(NewInventoryItem {
            name: self.name,
            current_stock: required("current_stock", self.current_stock)?.to_i64("current_stock")?,
            min_stock: required("min_stock", self.min_stock)?.to_i64("min_stock")?,
            max_stock: required("max_stock", self.max_stock)?.to_i64("max_stock")?,
            unit: self.unit.unwrap_or_else(|| "kg".to_string()),
            cost_per_unit: required("cost_per_unit", self.cost_per_unit)?.to_money("cost_per_unit")?,
            supplier: self.supplier.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SetStockRequest {
    pub current_stock: Option<NumericInput>,
}

impl SetStockRequest {
    pub fn level(self) -> DomainResult<i64> {
        required("current_stock", self.current_stock)?.to_non_negative("current_stock")
    }
}

// -------------------------
// Query DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct MenuItemsQuery {
    pub category_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PosMenuQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportsQuery {
    pub range: Option<String>,
    pub as_of: Option<NaiveDate>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResourcesQuery {
    pub stream: Option<String>,
}

// -------------------------
// Response mapping
// -------------------------

/// Inventory row plus its evaluated stock level.
#[derive(Debug, Serialize)]
pub struct InventoryItemView<'a> {
    #[serde(flatten)]
    pub item: &'a InventoryItem,
    pub status: StockStatus,
    pub fill_percentage: Option<f64>,
}

pub fn inventory_item_view(item: &InventoryItem) -> InventoryItemView<'_> {
    InventoryItemView {
        item,
        status: status(item),
        fill_percentage: fill_percentage(item),
    }
}

#[derive(Debug, Serialize)]
pub struct CartView<'a> {
    pub lines: &'a [CartLine],
    pub total: Money,
    pub item_count: i64,
    pub line_count: usize,
    pub state: CartState,
}

pub fn cart_view(cart: &Cart) -> DomainResult<CartView<'_>> {
    Ok(CartView {
        lines: cart.lines(),
        total: cart.total()?,
        item_count: cart.item_count(),
        line_count: cart.line_count(),
        state: cart.state(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_request_accepts_numeric_strings() {
        let req: CreateInventoryItemRequest = serde_json::from_value(serde_json::json!({
            "name": "Flour",
            "current_stock": "45",
            "min_stock": 20,
            "max_stock": "100",
            "cost_per_unit": 3500,
        }))
        .unwrap();
        let new = req.into_new().unwrap();
        assert_eq!(new.current_stock, 45);
        assert_eq!(new.max_stock, 100);
        assert_eq!(new.unit, "kg");
    }

    #[test]
    fn inventory_request_rejects_non_numeric_text() {
        let req: CreateInventoryItemRequest = serde_json::from_value(serde_json::json!({
            "name": "Flour",
            "current_stock": "lots",
            "min_stock": 20,
            "max_stock": 100,
            "cost_per_unit": 35,
        }))
        .unwrap();
        assert_eq!(
            req.into_new().unwrap_err(),
            DomainError::validation("current_stock must be a whole number")
        );
    }

    #[test]
    fn missing_required_number_is_named() {
        let req: CreateInventoryItemRequest =
            serde_json::from_value(serde_json::json!({ "name": "Flour" })).unwrap();
        assert_eq!(
            req.into_new().unwrap_err(),
            DomainError::validation("current_stock is required")
        );
    }

    #[test]
    fn menu_item_request_defaults_preparation_time() {
        let req: CreateMenuItemRequest = serde_json::from_value(serde_json::json!({
            "name": "Veg Pizza",
            "base_price": "250",
            "category_id": RecordId::new().to_string(),
        }))
        .unwrap();
        let new = req.into_new().unwrap();
        assert_eq!(new.preparation_time, DEFAULT_PREPARATION_MINUTES);
        assert!(new.is_available);
        assert_eq!(new.base_price, Money::from_minor(25_000));
    }

    #[test]
    fn menu_prices_accept_paise() {
        let req: UpdateMenuItemRequest =
            serde_json::from_value(serde_json::json!({ "base_price": "249.50" })).unwrap();
        assert_eq!(req.into_patch().unwrap().base_price, Some(Money::from_minor(24_950)));

        let req: UpdateMenuItemRequest =
            serde_json::from_value(serde_json::json!({ "base_price": 249.999 })).unwrap();
        assert!(matches!(req.into_patch().unwrap_err(), DomainError::Validation(_)));
    }

    #[test]
    fn negative_stock_level_is_a_validation_error() {
        let req: SetStockRequest =
            serde_json::from_value(serde_json::json!({ "current_stock": -4 })).unwrap();
        assert_eq!(
            req.level().unwrap_err(),
            DomainError::validation("current_stock cannot be negative")
        );
    }

    #[test]
    fn menu_item_request_with_bad_category_is_invalid_id() {
        let req: CreateMenuItemRequest = serde_json::from_value(serde_json::json!({
            "name": "Veg Pizza",
            "base_price": 250,
            "category_id": "mains",
        }))
        .unwrap();
        assert!(matches!(req.into_new().unwrap_err(), DomainError::InvalidId(_)));
    }
}
