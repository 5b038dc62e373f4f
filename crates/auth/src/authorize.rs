use std::collections::HashSet;

use thiserror::Error;

use bistro_core::TenantId;

use crate::{Permission, PrincipalId, Role, TenantMembership};

/// A fully resolved principal for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub active_tenant_id: TenantId,
    pub membership: TenantMembership,
}

impl Principal {
    /// Resolve a principal from token roles using [`permissions_for_roles`].
    pub fn from_roles(principal_id: PrincipalId, tenant_id: TenantId, roles: &[Role]) -> Self {
        Self {
            principal_id,
            active_tenant_id: tenant_id,
            membership: TenantMembership {
                tenant_id,
                roles: roles.to_vec(),
                permissions: permissions_for_roles(roles),
            },
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("tenant mismatch")]
    TenantMismatch,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Authorize a principal within its active tenant context.
///
/// - No IO
/// - No panics
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    if principal.active_tenant_id != principal.membership.tenant_id {
        return Err(AuthzError::TenantMismatch);
    }

    let perms: HashSet<&str> = principal
        .membership
        .permissions
        .iter()
        .map(|p| p.as_str())
        .collect();

    if perms.contains(Permission::WILDCARD) || perms.contains(required.as_str()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

/// Static role → permission policy.
///
/// - `admin` runs the restaurant: everything.
/// - `cashier` / `waiter` work the POS and can read the menu.
/// - Every authenticated principal may use the shared resource board.
pub fn permissions_for_roles(roles: &[Role]) -> Vec<Permission> {
    if roles.iter().any(|r| r.as_str() == Role::ADMIN) {
        return vec![Permission::new(Permission::WILDCARD)];
    }

    let mut perms = vec![
        Permission::new(Permission::RESOURCES_READ),
        Permission::new(Permission::RESOURCES_CREATE),
    ];

    if roles.iter().any(Role::is_floor_staff) {
        perms.push(Permission::new(Permission::POS_USE));
        perms.push(Permission::new(Permission::MENU_READ));
    }

    perms
}
