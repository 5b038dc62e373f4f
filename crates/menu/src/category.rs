use serde::{Deserialize, Serialize};

use bistro_core::{DomainError, DomainResult, Entity, RecordId};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMenuCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// Partial update; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
}

/// A menu section (Main Course, Beverages, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuCategory {
    id: RecordId,
    name: String,
    description: String,
    is_active: bool,
    sort_order: i32,
}

impl MenuCategory {
    pub fn create(id: RecordId, input: NewMenuCategory) -> DomainResult<Self> {
        Ok(Self {
            id,
            name: validated_name(&input.name)?,
            description: input.description.trim().to_string(),
            is_active: input.is_active,
            sort_order: input.sort_order,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn sort_order(&self) -> i32 {
        self.sort_order
    }

    pub fn apply_patch(&mut self, patch: CategoryPatch) -> DomainResult<()> {
        // Validate everything before touching state.
        let name = patch.name.as_deref().map(validated_name).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description.trim().to_string();
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
        Ok(())
    }

    /// Flip `is_active`, returning the new value.
    pub fn toggle_active(&mut self) -> bool {
        self.is_active = !self.is_active;
        self.is_active
    }
}

impl Entity for MenuCategory {
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
