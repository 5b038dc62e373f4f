//! Shared interview-prep link board.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use bistro_auth::Permission;
use bistro_core::{Entity, RecordId};
use bistro_infra::Query as TableQuery;
use bistro_resources::{InterviewResource, NewResource, ResourceFeed, StreamFilter};

use crate::app::dto::{self, ApiJson};
use crate::app::errors::{self, ApiResult};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new().route("/", get(list_resources).post(create_resource))
}

/// Newest first, optionally narrowed to one stream.
pub async fn list_resources(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    query: Result<Query<dto::ResourcesQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<InterviewResource>>> {
    authz::require(&tenant, &principal, Permission::RESOURCES_READ)?;

    let Query(query) = query.map_err(errors::query_rejection)?;
    let filter = StreamFilter::parse(query.stream.as_deref()).map_err(|e| errors::validation(e.to_string()))?;

    let rows = services
        .resources
        .select(tenant.tenant_id(), TableQuery::all())
        .await
        .map_err(errors::store_error_to_response)?;

    Ok(Json(ResourceFeed::from_rows(rows).into_filtered(filter)))
}

pub async fn create_resource(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    ApiJson(body): ApiJson<NewResource>,
) -> ApiResult<impl IntoResponse> {
    authz::require(&tenant, &principal, Permission::RESOURCES_CREATE)?;

    let resource = InterviewResource::create(
        RecordId::new(),
        body,
        Some(principal.principal_id().as_user_id()),
        Utc::now(),
    )
    .map_err(errors::domain_error_to_response)?;

    let row = services
        .resources
        .insert(tenant.tenant_id(), resource)
        .await
        .map_err(errors::store_error_to_response)?;
    tracing::info!(resource_id = %row.id(), stream = %row.stream(), "resource shared");

    Ok((StatusCode::CREATED, Json(row)))
}
