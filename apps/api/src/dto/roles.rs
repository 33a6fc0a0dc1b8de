use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::permissions::PermissionResponse;

mod conversions;

/// Incoming payload for role creation.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-request.ts"
)]
#[serde(default)]
pub struct CreateRoleRequest {
    pub name: String,
}

/// Incoming payload for role rename.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-role-request.ts"
)]
#[serde(default)]
pub struct UpdateRoleRequest {
    #[ts(optional)]
    pub name: Option<String>,
}

/// Incoming payload for attaching or detaching a permission.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-permission-request.ts"
)]
#[serde(default, rename_all = "camelCase")]
pub struct RolePermissionRequest {
    #[ts(optional)]
    pub permission_id: Option<String>,
}

/// Role columns without relations.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-summary-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct RoleSummaryResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Permission attached to a role.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/attached-permission-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct AttachedPermissionResponse {
    pub permission: PermissionResponse,
    pub assigned_at: String,
}

/// Role with its permissions.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    pub permissions: Vec<AttachedPermissionResponse>,
}

/// User holding a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-member-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct RoleMemberResponse {
    pub user_id: String,
    pub email: String,
    pub username: Option<String>,
    pub assigned_at: String,
}

/// Role with its permissions and members.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-detail-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct RoleDetailResponse {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    pub permissions: Vec<AttachedPermissionResponse>,
    pub users: Vec<RoleMemberResponse>,
}

/// One page of roles.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-page-response.ts"
)]
pub struct RolePageResponse {
    pub data: Vec<RoleResponse>,
    #[ts(type = "number")]
    pub total: u64,
    #[ts(type = "number")]
    pub skip: u64,
    #[ts(type = "number")]
    pub take: u64,
}

/// Newly created role/permission association.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-permission-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct RolePermissionResponse {
    pub role: RoleSummaryResponse,
    pub permission: PermissionResponse,
    pub assigned_at: String,
}

/// Association removed by a detach command.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/detached-permission-response.ts"
)]
pub struct DetachedPermissionResponse {
    pub role: RoleSummaryResponse,
    pub permission: PermissionResponse,
}
