use serde::{Deserialize, Serialize};

use bistro_core::{DomainError, DomainResult, Entity, Money, RecordId};

/// Preparation time assumed when the form leaves it untouched.
pub const DEFAULT_PREPARATION_MINUTES: u32 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub base_price: Money,
    pub category_id: RecordId,
    pub is_vegetarian: bool,
    pub is_available: bool,
    pub preparation_time: u32,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<Money>,
    pub category_id: Option<RecordId>,
    pub is_vegetarian: Option<bool>,
    pub preparation_time: Option<u32>,
    pub sort_order: Option<i32>,
}

/// A dish or drink on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    id: RecordId,
    name: String,
    description: String,
    base_price: Money,
    category_id: RecordId,
    is_vegetarian: bool,
    is_available: bool,
    /// Minutes.
    preparation_time: u32,
    sort_order: i32,
}

impl MenuItem {
    pub fn create(id: RecordId, input: NewMenuItem) -> DomainResult<Self> {
        let name = validated_name(&input.name)?;
        validate_price(input.base_price)?;
        validate_preparation_time(input.preparation_time)?;

        Ok(Self {
            id,
            name,
            description: input.description.trim().to_string(),
            base_price: input.base_price,
            category_id: input.category_id,
            is_vegetarian: input.is_vegetarian,
            is_available: input.is_available,
            preparation_time: input.preparation_time,
            sort_order: input.sort_order,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn base_price(&self) -> Money {
        self.base_price
    }

    pub fn category_id(&self) -> RecordId {
        self.category_id
    }

    pub fn is_vegetarian(&self) -> bool {
        self.is_vegetarian
    }

    pub fn is_available(&self) -> bool {
        self.is_available
    }

    pub fn preparation_time(&self) -> u32 {
        self.preparation_time
    }

    pub fn sort_order(&self) -> i32 {
        self.sort_order
    }

    pub fn apply_patch(&mut self, patch: MenuItemPatch) -> DomainResult<()> {
        let name = patch.name.as_deref().map(validated_name).transpose()?;
        if let Some(price) = patch.base_price {
            validate_price(price)?;
        }
        if let Some(minutes) = patch.preparation_time {
            validate_preparation_time(minutes)?;
        }

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(price) = patch.base_price {
            self.base_price = price;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(veg) = patch.is_vegetarian {
            self.is_vegetarian = veg;
        }
        if let Some(minutes) = patch.preparation_time {
            self.preparation_time = minutes;
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
        Ok(())
    }

    /// Flip `is_available`, returning the new value.
    pub fn toggle_availability(&mut self) -> bool {
        self.is_available = !self.is_available;
        self.is_available
    }
}

impl Entity for MenuItem {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn validated_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(name.to_string())
}

fn validate_price(price: Money) -> DomainResult<()> {
    if price.is_negative() {
        return Err(DomainError::validation("base_price cannot be negative"));
    }
    Ok(())
}

fn validate_preparation_time(minutes: u32) -> DomainResult<()> {
    if minutes == 0 {
        return Err(DomainError::validation("preparation_time must be at least one minute"));
    }
    Ok(())
}
