use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tracing::info;
use warden_application::UpdateRoleInput;
use warden_core::{AppError, AppResult, UserIdentity};
use warden_domain::{PermissionId, RoleId};

use crate::dto::{
    CreateRoleRequest, ListQuery, RoleDetailResponse, RolePageResponse, RolePermissionRequest,
    RolePermissionResponse, RoleResponse, UpdateRoleRequest,
};
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

fn permission_id_from(payload: RolePermissionRequest) -> AppResult<PermissionId> {
    let value = payload
        .permission_id
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Validation("permissionId is required".to_owned()))?;

    PermissionId::from_str(value.as_str())
}

pub async fn list_roles_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<RolePageResponse>> {
    let page = state.role_service.find_all(query.into()).await?;

    Ok(Json(page.into()))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiJson(payload): ApiJson<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state.role_service.create(payload.name.as_str()).await?;
    info!(subject = user.subject(), role_id = %role.role.id, "role created");

    Ok((StatusCode::CREATED, Json(role.into())))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
) -> ApiResult<Json<RoleDetailResponse>> {
    let role = state
        .role_service
        .find_by_id(RoleId::from_str(role_id.as_str())?)
        .await?;

    Ok(Json(role.into()))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
    ApiJson(payload): ApiJson<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role_id = RoleId::from_str(role_id.as_str())?;
    let role = state
        .role_service
        .update(role_id, UpdateRoleInput { name: payload.name })
        .await?;
    info!(subject = user.subject(), %role_id, "role updated");

    Ok(Json(role.into()))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
) -> ApiResult<StatusCode> {
    let role_id = RoleId::from_str(role_id.as_str())?;
    state.role_service.delete(role_id).await?;
    info!(subject = user.subject(), %role_id, "role deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn attach_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
    ApiJson(payload): ApiJson<RolePermissionRequest>,
) -> ApiResult<(StatusCode, Json<RolePermissionResponse>)> {
    let role_id = RoleId::from_str(role_id.as_str())?;
    let permission_id = permission_id_from(payload)?;

    let link = state
        .role_service
        .add_permission(role_id, permission_id)
        .await?;
    info!(subject = user.subject(), %role_id, %permission_id, "permission attached");

    Ok((StatusCode::CREATED, Json(link.into())))
}

pub async fn detach_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
    ApiJson(payload): ApiJson<RolePermissionRequest>,
) -> ApiResult<StatusCode> {
    let role_id = RoleId::from_str(role_id.as_str())?;
    let permission_id = permission_id_from(payload)?;

    state
        .role_service
        .remove_permission(role_id, permission_id)
        .await?;
    info!(subject = user.subject(), %role_id, %permission_id, "permission detached");

    Ok(StatusCode::NO_CONTENT)
}
