use warden_application::{Page, PermissionDetail, PermissionRecord, PermissionRoleLink};

use super::{
    PermissionDetailResponse, PermissionPageResponse, PermissionResponse, PermissionRoleResponse,
};
use crate::dto::common::timestamp;

impl From<PermissionRecord> for PermissionResponse {
    fn from(value: PermissionRecord) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            description: value.description,
            created_at: timestamp(value.created_at),
            updated_at: timestamp(value.updated_at),
        }
    }
}

impl From<PermissionRoleLink> for PermissionRoleResponse {
    fn from(value: PermissionRoleLink) -> Self {
        Self {
            role: value.role.into(),
            assigned_at: timestamp(value.assigned_at),
        }
    }
}

impl From<PermissionDetail> for PermissionDetailResponse {
    fn from(value: PermissionDetail) -> Self {
        let permission = PermissionResponse::from(value.permission);
        Self {
            id: permission.id,
            name: permission.name,
            description: permission.description,
            created_at: permission.created_at,
            updated_at: permission.updated_at,
            roles: value.roles.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Page<PermissionRecord>> for PermissionPageResponse {
    fn from(value: Page<PermissionRecord>) -> Self {
        Self {
            data: value.data.into_iter().map(Into::into).collect(),
            total: value.total,
            skip: value.skip,
            take: value.take,
        }
    }
}
