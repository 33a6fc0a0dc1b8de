use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use tracing::info;
use warden_core::UserIdentity;
use warden_domain::PermissionId;

use crate::dto::{
    CreatePermissionRequest, ListQuery, PermissionDetailResponse, PermissionPageResponse,
    PermissionResponse, UpdatePermissionRequest,
};
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<Json<PermissionPageResponse>> {
    let page = state.permission_service.find_all(query.into()).await?;

    Ok(Json(page.into()))
}

pub async fn create_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    ApiJson(payload): ApiJson<CreatePermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    let permission = state
        .permission_service
        .create(payload.name.as_str(), payload.description)
        .await?;
    info!(subject = user.subject(), permission_id = %permission.id, "permission created");

    Ok((StatusCode::CREATED, Json(permission.into())))
}

pub async fn get_permission_handler(
    State(state): State<AppState>,
    Path(permission_id): Path<String>,
) -> ApiResult<Json<PermissionDetailResponse>> {
    let permission = state
        .permission_service
        .find_by_id(PermissionId::from_str(permission_id.as_str())?)
        .await?;

    Ok(Json(permission.into()))
}

pub async fn update_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permission_id): Path<String>,
    ApiJson(payload): ApiJson<UpdatePermissionRequest>,
) -> ApiResult<Json<PermissionResponse>> {
    let permission_id = PermissionId::from_str(permission_id.as_str())?;
    let permission = state
        .permission_service
        .update(
            permission_id,
            warden_application::UpdatePermissionRequest {
                name: payload.name,
                description: payload.description,
            },
        )
        .await?;
    info!(subject = user.subject(), %permission_id, "permission updated");

    Ok(Json(permission.into()))
}

pub async fn delete_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(permission_id): Path<String>,
) -> ApiResult<StatusCode> {
    let permission_id = PermissionId::from_str(permission_id.as_str())?;
    state.permission_service.delete(permission_id).await?;
    info!(subject = user.subject(), %permission_id, "permission deleted");

    Ok(StatusCode::NO_CONTENT)
}
