//! Order-taking screen: filtered menu and the signed-in principal's cart.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use bistro_auth::Permission;
use bistro_core::DomainError;
use bistro_infra::Query as TableQuery;
use bistro_menu::{pos_view, CategoryFilter, PosMenu};
use bistro_sales::Cart;

use crate::app::dto::{self, ApiJson};
use crate::app::errors::{self, ApiResult};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/menu", get(menu))
        .route("/cart", get(get_cart).delete(clear_cart))
        .route("/cart/items", post(add_to_cart))
}

pub async fn menu(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    query: Result<Query<dto::PosMenuQuery>, QueryRejection>,
) -> ApiResult<Json<PosMenu>> {
    authz::require(&tenant, &principal, Permission::POS_USE)?;

    let Query(query) = query.map_err(errors::query_rejection)?;
    let filter = CategoryFilter::parse(query.category.as_deref());

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

    Ok(Json(pos_view(
        &categories,
        &items,
        query.search.as_deref().unwrap_or_default(),
        &filter,
    )))
}

pub async fn get_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> ApiResult<Response> {
    authz::require(&tenant, &principal, Permission::POS_USE)?;

    let cart = services.carts.get(tenant.tenant_id(), principal.principal_id());
    Ok(cart_response(&cart))
}

pub async fn add_to_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<dto::AddCartItemRequest>,
) -> ApiResult<Response> {
    authz::require(&tenant, &principal, Permission::POS_USE)?;

    let item_id = dto::parse_id(&body.item_id, "menu item")?;
    let item = services
        .menu_items
        .get(tenant.tenant_id(), item_id)
        .await
        .map_err(errors::store_error_to_response)?
        .ok_or_else(|| errors::not_found("menu item"))?;

    if !item.is_available() {
        return Err(errors::domain_error_to_response(DomainError::conflict(format!(
            "{} is not available",
            item.name()
        ))));
    }

    let cart = services
        .carts
        .update(tenant.tenant_id(), principal.principal_id(), |cart| {
            cart.add(&item);
            cart.total().map(|_| ())
        })
        .map_err(errors::domain_error_to_response)?;
    Ok(cart_response(&cart))
}

pub async fn clear_cart(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> ApiResult<Response> {
    authz::require(&tenant, &principal, Permission::POS_USE)?;

    let cart = services
        .carts
        .update(tenant.tenant_id(), principal.principal_id(), |cart| {
            cart.clear();
            Ok(())
        })
        .map_err(errors::domain_error_to_response)?;
    Ok(cart_response(&cart))
}

fn cart_response(cart: &Cart) -> Response {
    match dto::cart_view(cart) {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
