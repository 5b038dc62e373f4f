use serde::{Deserialize, Serialize};

use bistro_core::{DomainError, DomainResult, Entity, Money, RecordId};

/// Validated input for a new inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub name: String,
    pub current_stock: i64,
    pub min_stock: i64,
    pub max_stock: i64,
    pub unit: String,
    pub cost_per_unit: Money,
    pub supplier: String,
}

/// A stocked ingredient or supply.
///
/// `supplier` is the supplier's *name*, not an id: the link is denormalized
/// and nothing checks that a supplier with that name exists.
///
/// Deserialization runs the same validation as [`InventoryItem::create`], so a
/// row read back from storage cannot carry `min_stock > max_stock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InventoryRow")]
pub struct InventoryItem {
    id: RecordId,
    name: String,
    current_stock: i64,
    min_stock: i64,
    max_stock: i64,
    unit: String,
    cost_per_unit: Money,
    supplier: String,
}

impl InventoryItem {
    /// Validate `input` and build the record.
    pub fn create(id: RecordId, input: NewInventoryItem) -> DomainResult<Self> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if input.current_stock < 0 {
            return Err(DomainError::validation("current_stock cannot be negative"));
        }
        if input.min_stock < 0 {
            return Err(DomainError::validation("min_stock cannot be negative"));
        }
        if input.min_stock > input.max_stock {
            return Err(DomainError::validation("min_stock cannot exceed max_stock"));
        }
        if input.cost_per_unit.is_negative() {
            return Err(DomainError::validation("cost_per_unit cannot be negative"));
        }

        Ok(Self {
            id,
            name: name.to_string(),
            current_stock: input.current_stock,
            min_stock: input.min_stock,
            max_stock: input.max_stock,
            unit: input.unit.trim().to_string(),
            cost_per_unit: input.cost_per_unit,
            supplier: input.supplier.trim().to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_stock(&self) -> i64 {
        self.current_stock
    }

    pub fn min_stock(&self) -> i64 {
        self.min_stock
    }

    pub fn max_stock(&self) -> i64 {
        self.max_stock
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn cost_per_unit(&self) -> Money {
        self.cost_per_unit
    }

    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    /// Record a counted stock level.
    pub fn set_stock(&mut self, current_stock: i64) -> DomainResult<()> {
        if current_stock < 0 {
            return Err(DomainError::invariant("stock cannot go negative"));
        }
        self.current_stock = current_stock;
        Ok(())
    }

    /// Value of the stock on hand (`current_stock × cost_per_unit`).
    pub fn stock_value(&self) -> DomainResult<Money> {
        self.cost_per_unit.checked_mul(self.current_stock)
    }
}

/// Raw row shape, validated into [`InventoryItem`].
#[derive(Deserialize)]
struct InventoryRow {
    id: RecordId,
    #[serde(flatten)]
    fields: NewInventoryItem,
}

impl TryFrom<InventoryRow> for InventoryItem {
    type Error = DomainError;

    fn try_from(row: InventoryRow) -> Result<Self, Self::Error> {
        InventoryItem::create(row.id, row.fields)
    }
}

impl Entity for InventoryItem {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> NewInventoryItem {
        NewInventoryItem {
            name: "Tomatoes".to_string(),
            current_stock: 15,
            min_stock: 20,
            max_stock: 100,
            unit: "kg".to_string(),
            cost_per_unit: Money::from_minor(60),
            supplier: "Fresh Farms".to_string(),
        }
    }

    #[test]
    fn create_trims_text_fields() {
        let item = InventoryItem::create(
            RecordId::new(),
            NewInventoryItem {
                name: "  Onions ".to_string(),
                ..input()
            },
        )
        .unwrap();
        assert_eq!(item.name(), "Onions");
        assert_eq!(item.supplier(), "Fresh Farms");
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = InventoryItem::create(
            RecordId::new(),
            NewInventoryItem {
                name: "   ".to_string(),
                ..input()
            },
        )
        .unwrap_err();
        assert_eq!(err, DomainError::validation("name cannot be empty"));
    }

    #[test]
    fn min_above_max_is_rejected() {
        let err = InventoryItem::create(
            RecordId::new(),
            NewInventoryItem {
                min_stock: 120,
                ..input()
            },
        )
        .unwrap_err();
        assert_eq!(err, DomainError::validation("min_stock cannot exceed max_stock"));
    }

    #[test]
    fn negative_stock_is_rejected_on_create_and_update() {
        let err = InventoryItem::create(
            RecordId::new(),
            NewInventoryItem {
                current_stock: -1,
                ..input()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut item = InventoryItem::create(RecordId::new(), input()).unwrap();
        let err = item.set_stock(-5).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
        assert_eq!(item.current_stock(), 15);
    }

    #[test]
    fn stock_value_multiplies_cost_by_quantity() {
        let item = InventoryItem::create(RecordId::new(), input()).unwrap();
        assert_eq!(item.stock_value().unwrap(), Money::from_minor(900));
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let item = InventoryItem::create(RecordId::new(), input()).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["current_stock"], 15);
        assert_eq!(json["cost_per_unit"], 60);
        let back: InventoryItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn invalid_rows_fail_to_deserialize() {
        let item = InventoryItem::create(RecordId::new(), input()).unwrap();
        let mut json = serde_json::to_value(&item).unwrap();
        json["min_stock"] = serde_json::json!(500);
        assert!(serde_json::from_value::<InventoryItem>(json).is_err());
    }
}
