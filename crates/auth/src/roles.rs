use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Staff role used for RBAC.
///
/// Roles stay opaque strings so tokens can carry roles this build does not
/// know about; the well-known ones get constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const CASHIER: &'static str = "cashier";
    pub const WAITER: &'static str = "waiter";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    pub fn cashier() -> Self {
        Self::new(Self::CASHIER)
    }

    pub fn waiter() -> Self {
        Self::new(Self::WAITER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Floor staff who take orders at the POS.
    pub fn is_floor_staff(&self) -> bool {
        matches!(self.as_str(), Self::CASHIER | Self::WAITER)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
