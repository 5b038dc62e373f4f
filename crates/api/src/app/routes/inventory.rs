use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};

use bistro_auth::Permission;
use bistro_core::{RecordId, TenantId};
use bistro_infra::Query as TableQuery;
use bistro_inventory::{low_stock_set, low_stock_transition, summary, InventoryItem, InventorySummary};

use crate::app::dto::{self, ApiJson};
use crate::app::errors::{self, ApiResult};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/:id", get(get_item))
        .route("/items/:id/stock", put(set_stock))
        .route("/alerts", get(alerts))
        .route("/summary", get(dashboard_summary))
}

async fn load_items(services: &AppServices, tenant_id: TenantId) -> ApiResult<Vec<InventoryItem>> {
    let query = TableQuery::all().order_by(|a: &InventoryItem, b: &InventoryItem| a.name().cmp(b.name()));
    services
        .inventory
        .select(tenant_id, query)
        .await
        .map_err(errors::store_error_to_response)
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> ApiResult<Response> {
    authz::require(&tenant, &principal, Permission::INVENTORY_READ)?;

    let items = load_items(&services, tenant.tenant_id()).await?;
    let views: Vec<_> = items.iter().map(dto::inventory_item_view).collect();
    Ok(Json(views).into_response())
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<dto::CreateInventoryItemRequest>,
) -> ApiResult<Response> {
    authz::require(&tenant, &principal, Permission::INVENTORY_MANAGE)?;

    let item = body
        .into_new()
        .and_then(|new| InventoryItem::create(RecordId::new(), new))
        .map_err(errors::domain_error_to_response)?;
    let row = services
        .inventory
        .insert(tenant.tenant_id(), item)
        .await
        .map_err(errors::store_error_to_response)?;

    Ok((StatusCode::CREATED, Json(dto::inventory_item_view(&row))).into_response())
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    authz::require(&tenant, &principal, Permission::INVENTORY_READ)?;

    let id = dto::parse_id(&id, "inventory item")?;
    let item = services
        .inventory
        .get(tenant.tenant_id(), id)
        .await
        .map_err(errors::store_error_to_response)?
        .ok_or_else(|| errors::not_found("inventory item"))?;

    Ok(Json(dto::inventory_item_view(&item)).into_response())
}

pub async fn set_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::SetStockRequest>,
) -> ApiResult<Response> {
    authz::require(&tenant, &principal, Permission::INVENTORY_MANAGE)?;

    let id = dto::parse_id(&id, "inventory item")?;
    let level = body.level().map_err(errors::domain_error_to_response)?;
    let updated = services
        .inventory
        .update(tenant.tenant_id(), id, Box::new(move |i: &mut InventoryItem| i.set_stock(level)))
        .await
        .map_err(errors::store_error_to_response)?;

    if let Some(transition) = low_stock_transition(Some(&updated.previous), &updated.current) {
        tracing::info!(
            item_id = %id,
            item = updated.current.name(),
            current_stock = level,
            ?transition,
            "low-stock threshold crossed"
        );
    }

    Ok(Json(dto::inventory_item_view(&updated.current)).into_response())
}

pub async fn alerts(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> ApiResult<Response> {
    authz::require(&tenant, &principal, Permission::INVENTORY_READ)?;

    let items = load_items(&services, tenant.tenant_id()).await?;
    let low: Vec<_> = low_stock_set(&items)
        .into_iter()
        .map(dto::inventory_item_view)
        .collect();
    Ok(Json(low).into_response())
}

pub async fn dashboard_summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> ApiResult<Json<InventorySummary>> {
    authz::require(&tenant, &principal, Permission::INVENTORY_READ)?;

    let items = load_items(&services, tenant.tenant_id()).await?;
    summary(&items)
        .map(Json)
        .map_err(errors::domain_error_to_response)
}
