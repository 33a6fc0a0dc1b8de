use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::roles::RoleSummaryResponse;

mod conversions;

/// Incoming payload for permission creation.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-permission-request.ts"
)]
#[serde(default)]
pub struct CreatePermissionRequest {
    pub name: String,
    #[ts(optional)]
    pub description: Option<String>,
}

/// Incoming payload for a partial permission update.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-permission-request.ts"
)]
#[serde(default)]
pub struct UpdatePermissionRequest {
    #[ts(optional)]
    pub name: Option<String>,
    #[ts(optional)]
    pub description: Option<String>,
}

/// API representation of a permission.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct PermissionResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Role holding a permission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-role-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRoleResponse {
    pub role: RoleSummaryResponse,
    pub assigned_at: String,
}

/// Permission with the roles holding it.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-detail-response.ts"
)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDetailResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub roles: Vec<PermissionRoleResponse>,
}

/// One page of permissions.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-page-response.ts"
)]
pub struct PermissionPageResponse {
    pub data: Vec<PermissionResponse>,
    #[ts(type = "number")]
    pub total: u64,
    #[ts(type = "number")]
    pub skip: u64,
    #[ts(type = "number")]
    pub take: u64,
}
