use warden_application::{
    AttachedPermission, DetachedPermission, Page, RoleDetail, RoleMember, RolePermissionRecord,
    RoleRecord, RoleSummary,
};

use super::{
    AttachedPermissionResponse, DetachedPermissionResponse, RoleDetailResponse,
    RoleMemberResponse, RolePageResponse, RolePermissionResponse, RoleResponse,
    RoleSummaryResponse,
};
use crate::dto::common::timestamp;

impl From<RoleSummary> for RoleSummaryResponse {
    fn from(value: RoleSummary) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            created_at: timestamp(value.created_at),
            updated_at: timestamp(value.updated_at),
        }
    }
}

impl From<AttachedPermission> for AttachedPermissionResponse {
    fn from(value: AttachedPermission) -> Self {
        Self {
            permission: value.permission.into(),
            assigned_at: timestamp(value.assigned_at),
        }
    }
}

impl From<RoleRecord> for RoleResponse {
    fn from(value: RoleRecord) -> Self {
        let role = RoleSummaryResponse::from(value.role);
        Self {
            id: role.id,
            name: role.name,
            created_at: role.created_at,
            updated_at: role.updated_at,
            permissions: value.permissions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<RoleMember> for RoleMemberResponse {
    fn from(value: RoleMember) -> Self {
        Self {
            user_id: value.user_id.to_string(),
            email: value.email,
            username: value.username,
            assigned_at: timestamp(value.assigned_at),
        }
    }
}

impl From<RoleDetail> for RoleDetailResponse {
    fn from(value: RoleDetail) -> Self {
        let role = RoleResponse::from(value.role);
        Self {
            id: role.id,
            name: role.name,
            created_at: role.created_at,
            updated_at: role.updated_at,
            permissions: role.permissions,
            users: value.users.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Page<RoleRecord>> for RolePageResponse {
    fn from(value: Page<RoleRecord>) -> Self {
        Self {
            data: value.data.into_iter().map(Into::into).collect(),
            total: value.total,
            skip: value.skip,
            take: value.take,
        }
    }
}

impl From<RolePermissionRecord> for RolePermissionResponse {
    fn from(value: RolePermissionRecord) -> Self {
        Self {
            role: value.role.into(),
            permission: value.permission.into(),
            assigned_at: timestamp(value.assigned_at),
        }
    }
}

impl From<DetachedPermission> for DetachedPermissionResponse {
    fn from(value: DetachedPermission) -> Self {
        Self {
            role: value.role.into(),
            permission: value.permission.into(),
        }
    }
}
