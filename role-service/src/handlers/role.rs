//! Role endpoint: versioned routes that shape each request into a use-case
//! input and relay the port's result, or its error, unchanged.
//!
//! Capabilities are enforced by the route layer in `build_router`, so every
//! handler body here runs only for an authorized caller.

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
};
use service_core::error::AppError;

use crate::dtos::*;
use crate::models::{Role, RoleId};
use crate::services::metrics::record_role_operation;
use crate::services::UseCase;
use crate::utils::{coerce_number, AppJson, AppPath, Search, Sort};
use crate::AppState;

pub const ROLE_CREATE: &str = "role:create";
pub const ROLE_UPDATE: &str = "role:update";
pub const ROLE_GET_BY_ID: &str = "role:getbyid";
pub const ROLE_LIST: &str = "role:list";
pub const ROLE_DELETE: &str = "role:delete";
pub const ROLE_ADD_PERMISSION: &str = "role:addpermission";
pub const ROLE_DELETE_PERMISSION: &str = "role:deletepermission";

fn observe<T>(operation: &'static str, result: Result<T, AppError>) -> Result<T, AppError> {
    record_role_operation(operation, result.is_ok());
    result
}

/// Parse the raw list query into the list port's input.
pub fn parse_list_query(query: &RoleListQuery) -> Result<RoleListInput, AppError> {
    Ok(RoleListInput {
        sort: Sort::parse(query.sort.as_deref())?,
        search: Search::parse(query.search.as_deref())?,
        limit: coerce_number(query.limit.as_deref()),
        page: coerce_number(query.page.as_deref()),
    })
}

/// Create a role.
#[utoipa::path(
    post,
    path = "/v1/roles",
    request_body = RoleCreateInput,
    responses(
        (status = 200, description = "Role created", body = Role),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing role:create permission", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn create_role(
    State(state): State<AppState>,
    AppJson(body): AppJson<RoleCreateInput>,
) -> Result<Json<RoleCreateOutput>, AppError> {
    let result = state.use_cases.create.execute(body).await;
    observe("create", result).map(Json)
}

/// Update a role; the path id replaces any id in the body.
#[utoipa::path(
    put,
    path = "/v1/roles/{id}",
    params(("id" = String, Path, description = "Role ID")),
    request_body = RoleUpdateBody,
    responses(
        (status = 200, description = "Role updated", body = Role),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing role:update permission", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn update_role(
    State(state): State<AppState>,
    AppPath(id): AppPath<RoleId>,
    AppJson(body): AppJson<RoleUpdateBody>,
) -> Result<Json<RoleUpdateOutput>, AppError> {
    tracing::debug!(role_id = %id, "Updating role");
    let result = state.use_cases.update.execute(body.with_id(id)).await;
    observe("update", result).map(Json)
}

/// Get a role by ID.
#[utoipa::path(
    get,
    path = "/v1/roles/{id}",
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role found", body = Role),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing role:getbyid permission", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn get_role(
    State(state): State<AppState>,
    AppPath(id): AppPath<RoleId>,
) -> Result<Json<RoleGetByIdOutput>, AppError> {
    let result = state
        .use_cases
        .get_by_id
        .execute(RoleGetByIdInput { id })
        .await;
    observe("get_by_id", result).map(Json)
}

/// List roles.
///
/// `limit` and `page` are forwarded as loosely coerced numbers; values that do
/// not read as numbers reach the list port as NaN.
#[utoipa::path(
    get,
    path = "/v1/roles",
    params(RoleListQuery),
    responses(
        (status = 200, description = "Page of roles", body = RoleListOutput),
        (status = 400, description = "Malformed sort or search", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing role:list permission", body = ErrorResponse)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn list_roles(
    State(state): State<AppState>,
    Query(query): Query<RoleListQuery>,
) -> Result<Json<RoleListOutput>, AppError> {
    let input = parse_list_query(&query)?;
    let result = state.use_cases.list.execute(input).await;
    observe("list", result).map(Json)
}

/// Delete a role.
#[utoipa::path(
    delete,
    path = "/v1/roles/{id}",
    params(("id" = String, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role deleted", body = Role),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing role:delete permission", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn delete_role(
    State(state): State<AppState>,
    AppPath(id): AppPath<RoleId>,
) -> Result<Json<RoleDeleteOutput>, AppError> {
    tracing::debug!(role_id = %id, "Deleting role");
    let result = state.use_cases.delete.execute(RoleDeleteInput { id }).await;
    observe("delete", result).map(Json)
}

/// Grant permissions to a role.
#[utoipa::path(
    put,
    path = "/v1/roles/add-permissions/{id}",
    params(("id" = String, Path, description = "Role ID")),
    request_body = RolePermissionsBody,
    responses(
        (status = 200, description = "Permissions added", body = Role),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing role:addpermission permission", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn add_permissions(
    State(state): State<AppState>,
    AppPath(id): AppPath<RoleId>,
    AppJson(body): AppJson<RolePermissionsBody>,
) -> Result<Json<RoleAddPermissionOutput>, AppError> {
    tracing::debug!(role_id = %id, count = body.permissions.len(), "Adding permissions");
    let result = state.use_cases.add_permission.execute(body.add_to(id)).await;
    observe("add_permission", result).map(Json)
}

/// Revoke permissions from a role. Always answers 200 on success.
#[utoipa::path(
    put,
    path = "/v1/roles/remove-permissions/{id}",
    params(("id" = String, Path, description = "Role ID")),
    request_body = RolePermissionsBody,
    responses(
        (status = 200, description = "Permissions removed", body = Role),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing role:deletepermission permission", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn remove_permissions(
    State(state): State<AppState>,
    AppPath(id): AppPath<RoleId>,
    AppJson(body): AppJson<RolePermissionsBody>,
) -> Result<(StatusCode, Json<RoleDeletePermissionOutput>), AppError> {
    tracing::debug!(role_id = %id, count = body.permissions.len(), "Removing permissions");
    let result = state
        .use_cases
        .delete_permission
        .execute(body.remove_from(id))
        .await;
    observe("delete_permission", result).map(|role| (StatusCode::OK, Json(role)))
}
