use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque strings (e.g. `"inventory.read"`). The wildcard
/// `"*"` grants everything within the tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: &'static str = "*";

    pub const POS_USE: &'static str = "pos.use";
    pub const MENU_READ: &'static str = "menu.read";
    pub const MENU_MANAGE: &'static str = "menu.manage";
    pub const INVENTORY_READ: &'static str = "inventory.read";
    pub const INVENTORY_MANAGE: &'static str = "inventory.manage";
    pub const REPORTS_READ: &'static str = "reports.read";
    pub const RESOURCES_READ: &'static str = "resources.read";
    pub const RESOURCES_CREATE: &'static str = "resources.create";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == Self::WILDCARD
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
