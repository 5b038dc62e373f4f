use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use bistro_auth::Permission;
use bistro_core::RecordId;
use bistro_infra::Query as TableQuery;
use bistro_inventory::{NewSupplier, Supplier};

use crate::app::dto::ApiJson;
use crate::app::errors::{self, ApiResult};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new().route("/", get(list_suppliers).post(create_supplier))
}

pub async fn list_suppliers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> ApiResult<Json<Vec<Supplier>>> {
    authz::require(&tenant, &principal, Permission::INVENTORY_READ)?;

    let query = TableQuery::all().order_by(|a: &Supplier, b: &Supplier| a.name().cmp(b.name()));
    services
        .suppliers
        .select(tenant.tenant_id(), query)
        .await
        .map(Json)
        .map_err(errors::store_error_to_response)
}

pub async fn create_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<NewSupplier>,
) -> ApiResult<impl IntoResponse> {
    authz::require(&tenant, &principal, Permission::INVENTORY_MANAGE)?;

    let supplier = Supplier::create(RecordId::new(), body).map_err(errors::domain_error_to_response)?;
    let row = services
        .suppliers
        .insert(tenant.tenant_id(), supplier)
        .await
        .map_err(errors::store_error_to_response)?;

    Ok((StatusCode::CREATED, Json(row)))
}
