//! Sales analytics over the recorded sales figures.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    routing::get,
    Json, Router,
};
use chrono::Utc;

use bistro_auth::Permission;
use bistro_infra::Query as TableQuery;
use bistro_reports::{
    category_distribution, peak_hours, popular_items, summary, CategoryShare, DateRange, ItemSales,
    PeakHours, SalesSummary,
};

use crate::app::dto;
use crate::app::errors::{self, ApiResult};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/summary", get(sales_summary))
        .route("/popular-items", get(popular))
        .route("/peak-hours", get(peak))
        .route("/categories", get(categories))
}

fn read_query(
    tenant: &TenantContext,
    principal: &PrincipalContext,
    query: Result<Query<dto::ReportsQuery>, QueryRejection>,
) -> ApiResult<dto::ReportsQuery> {
    authz::require(tenant, principal, Permission::REPORTS_READ)?;
    let Query(query) = query.map_err(errors::query_rejection)?;
    Ok(query)
}

pub async fn sales_summary(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    query: Result<Query<dto::ReportsQuery>, QueryRejection>,
) -> ApiResult<Json<SalesSummary>> {
    let query = read_query(&tenant, &principal, query)?;
    let range = match query.range.as_deref() {
        None | Some("") => DateRange::default(),
        Some(raw) => raw
            .parse::<DateRange>()
            .map_err(|e| errors::validation(e.to_string()))?,
    };
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());

    let days = services
        .daily_sales
        .select(tenant.tenant_id(), TableQuery::all())
        .await
        .map_err(errors::store_error_to_response)?;

    summary(&days, range, as_of)
        .map(Json)
        .map_err(errors::domain_error_to_response)
}

pub async fn popular(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    query: Result<Query<dto::ReportsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ItemSales>>> {
    let query = read_query(&tenant, &principal, query)?;

    let rows = services
        .item_sales
        .select(tenant.tenant_id(), TableQuery::all())
        .await
        .map_err(errors::store_error_to_response)?;

    Ok(Json(popular_items(&rows, query.limit)))
}

pub async fn peak(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    query: Result<Query<dto::ReportsQuery>, QueryRejection>,
) -> ApiResult<Json<PeakHours>> {
    read_query(&tenant, &principal, query)?;

    let rows = services
        .hourly_orders
        .select(tenant.tenant_id(), TableQuery::all())
        .await
        .map_err(errors::store_error_to_response)?;

    peak_hours(&rows)
        .map(Json)
        .map_err(errors::domain_error_to_response)
}

pub async fn categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    query: Result<Query<dto::ReportsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<CategoryShare>>> {
    read_query(&tenant, &principal, query)?;

    let rows = services
        .category_sales
        .select(tenant.tenant_id(), TableQuery::all())
        .await
        .map_err(errors::store_error_to_response)?;

    Ok(Json(category_distribution(&rows)))
}
