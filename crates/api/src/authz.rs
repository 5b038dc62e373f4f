//! Route-level permission guard.
//!
//! Handlers call [`require`] before touching storage, so a forbidden request
//! never reads or writes anything.

use axum::http::StatusCode;
use axum::response::Response;

use bistro_auth::{authorize, Permission};

use crate::app::errors;
use crate::context::{PrincipalContext, TenantContext};

pub fn require(
    tenant: &TenantContext,
    principal: &PrincipalContext,
    permission: &'static str,
) -> Result<(), Response> {
    let resolved = principal.resolve(tenant);
    authorize(&resolved, &Permission::new(permission)).map_err(|e| {
        tracing::debug!(
            principal_id = %principal.principal_id(),
            permission,
            "authorization denied"
        );
        errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
    })
}
