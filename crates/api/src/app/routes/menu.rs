use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};

use bistro_auth::Permission;
use bistro_core::{DomainError, RecordId, TenantId};
use bistro_infra::Query as TableQuery;
use bistro_menu::{management_view, MenuCategory, MenuItem, MenuItemView};

use crate::app::dto::{self, ApiJson};
use crate::app::errors::{self, ApiResult};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/:id", patch(update_category))
        .route("/categories/:id/toggle-active", post(toggle_category))
        .route("/items", get(list_items).post(create_item))
        .route("/items/:id", patch(update_item))
        .route("/items/:id/toggle-availability", post(toggle_item))
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> ApiResult<Json<Vec<MenuCategory>>> {
    authz::require(&tenant, &principal, Permission::MENU_READ)?;

    let query = TableQuery::all().order_by(|a: &MenuCategory, b: &MenuCategory| {
        a.sort_order()
            .cmp(&b.sort_order())
            .then_with(|| a.name().cmp(b.name()))
    });
    let rows = services
        .categories
        .select(tenant.tenant_id(), query)
        .await
        .map_err(errors::store_error_to_response)?;
    Ok(Json(rows))
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<dto::CreateCategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    authz::require(&tenant, &principal, Permission::MENU_MANAGE)?;

    let category = body
        .into_new()
        .and_then(|new| MenuCategory::create(RecordId::new(), new))
        .map_err(errors::domain_error_to_response)?;
    let row = services
        .categories
        .insert(tenant.tenant_id(), category)
        .await
        .map_err(errors::store_error_to_response)?;

    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::UpdateCategoryRequest>,
) -> ApiResult<Json<MenuCategory>> {
    authz::require(&tenant, &principal, Permission::MENU_MANAGE)?;

    let id = dto::parse_id(&id, "category")?;
    let changes = body.into_patch().map_err(errors::domain_error_to_response)?;
    let updated = services
        .categories
        .update(tenant.tenant_id(), id, Box::new(move |c: &mut MenuCategory| c.apply_patch(changes)))
        .await
        .map_err(errors::store_error_to_response)?;
    Ok(Json(updated.current))
}

pub async fn toggle_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<MenuCategory>> {
    authz::require(&tenant, &principal, Permission::MENU_MANAGE)?;

    let id = dto::parse_id(&id, "category")?;
    let updated = services
        .categories
        .update(
            tenant.tenant_id(),
            id,
            Box::new(|c: &mut MenuCategory| {
                c.toggle_active();
                Ok(())
            }),
        )
        .await
        .map_err(errors::store_error_to_response)?;
    tracing::info!(category_id = %id, active = updated.current.is_active(), "category toggled");
    Ok(Json(updated.current))
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    query: Result<Query<dto::MenuItemsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<MenuItemView>>> {
    authz::require(&tenant, &principal, Permission::MENU_READ)?;

    let Query(query) = query.map_err(errors::query_rejection)?;
    let category_id = match query.category_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(dto::parse_id(raw, "category")?),
    };

    let categories = services
        .categories
        .select(tenant.tenant_id(), TableQuery::all())
        .await
        .map_err(errors::store_error_to_response)?;
    let items = services
        .menu_items
        .select(tenant.tenant_id(), TableQuery::all())
        .await
        .map_err(errors::store_error_to_response)?;

    Ok(Json(management_view(&categories, &items, category_id)))
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<dto::CreateMenuItemRequest>,
) -> ApiResult<impl IntoResponse> {
    authz::require(&tenant, &principal, Permission::MENU_MANAGE)?;

    let item = body
        .into_new()
        .and_then(|new| MenuItem::create(RecordId::new(), new))
        .map_err(errors::domain_error_to_response)?;
    ensure_category(&services, tenant.tenant_id(), item.category_id()).await?;

    let row = services
        .menu_items
        .insert(tenant.tenant_id(), item)
        .await
        .map_err(errors::store_error_to_response)?;

    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<dto::UpdateMenuItemRequest>,
) -> ApiResult<Json<MenuItem>> {
    authz::require(&tenant, &principal, Permission::MENU_MANAGE)?;

    let id = dto::parse_id(&id, "menu item")?;
    let changes = body.into_patch().map_err(errors::domain_error_to_response)?;
    if let Some(category_id) = changes.category_id {
        ensure_category(&services, tenant.tenant_id(), category_id).await?;
    }

    let updated = services
        .menu_items
        .update(tenant.tenant_id(), id, Box::new(move |i: &mut MenuItem| i.apply_patch(changes)))
        .await
        .map_err(errors::store_error_to_response)?;
    Ok(Json(updated.current))
}

pub async fn toggle_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> ApiResult<Json<MenuItem>> {
    authz::require(&tenant, &principal, Permission::MENU_MANAGE)?;

    let id = dto::parse_id(&id, "menu item")?;
    let updated = services
        .menu_items
        .update(
            tenant.tenant_id(),
            id,
            Box::new(|i: &mut MenuItem| {
                i.toggle_availability();
                Ok(())
            }),
        )
        .await
        .map_err(errors::store_error_to_response)?;
    tracing::info!(item_id = %id, available = updated.current.is_available(), "menu item toggled");
    Ok(Json(updated.current))
}

async fn ensure_category(services: &AppServices, tenant_id: TenantId, id: RecordId) -> ApiResult<()> {
    let found = services
        .categories
        .get(tenant_id, id)
        .await
        .map_err(errors::store_error_to_response)?;
    match found {
        Some(_) => Ok(()),
        None => Err(errors::domain_error_to_response(DomainError::validation(
            "category_id does not match a menu category",
        ))),
    }
}
