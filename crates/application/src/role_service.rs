//! Role lifecycle and role-permission association rules.

use std::sync::Arc;

use warden_core::{AppError, AppResult};
use warden_domain::{PermissionId, RoleId, RoleName};

use crate::rbac_ports::{
    Page, PageRequest, PermissionRecord, PermissionRepository, RoleDetail, RolePermissionRecord,
    RoleRecord, RoleRepository, RoleSummary,
};

/// Message returned when a role name is already taken.
pub const ROLE_NAME_TAKEN: &str = "Role with this name already exists";

/// Partial update for a role. `None` leaves the name unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// Replacement name.
    pub name: Option<String>,
}

/// Role and permission pair affected by a detach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachedPermission {
    /// Role the permission was removed from.
    pub role: RoleSummary,
    /// Removed permission.
    pub permission: PermissionRecord,
}

/// Application service for role administration.
#[derive(Clone)]
pub struct RoleService {
    role_repository: Arc<dyn RoleRepository>,
    permission_repository: Arc<dyn PermissionRepository>,
}

impl RoleService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        role_repository: Arc<dyn RoleRepository>,
        permission_repository: Arc<dyn PermissionRepository>,
    ) -> Self {
        Self {
            role_repository,
            permission_repository,
        }
    }

    /// Creates a role with a unique name.
    pub async fn create(&self, name: &str) -> AppResult<RoleRecord> {
        let name = RoleName::new(name)?;

        if self
            .role_repository
            .find_role_by_name(name.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(ROLE_NAME_TAKEN.to_owned()));
        }

        self.role_repository.create_role(&name).await
    }

    /// Returns a role with its permissions and members.
    pub async fn find_by_id(&self, role_id: RoleId) -> AppResult<RoleDetail> {
        self.role_repository
            .find_role(role_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Role not found".to_owned()))
    }

    /// Returns one page of roles with the total count.
    pub async fn find_all(&self, page: PageRequest) -> AppResult<Page<RoleRecord>> {
        let data = self.role_repository.list_roles(page).await?;
        let total = self.role_repository.count_roles().await?;

        Ok(Page {
            data,
            total,
            skip: page.skip,
            take: page.take,
        })
    }

    /// Renames a role. The new name must not belong to another role.
    pub async fn update(&self, role_id: RoleId, input: UpdateRoleInput) -> AppResult<RoleRecord> {
        let current = self.find_by_id(role_id).await?;

        let Some(name) = input.name else {
            return Ok(current.role);
        };
        let name = RoleName::new(name)?;

        if let Some(existing) = self
            .role_repository
            .find_role_by_name(name.as_str())
            .await?
            && existing.id != role_id
        {
            return Err(AppError::Conflict(ROLE_NAME_TAKEN.to_owned()));
        }

        self.role_repository.rename_role(role_id, &name).await
    }

    /// Deletes a role and its permission attachments.
    pub async fn delete(&self, role_id: RoleId) -> AppResult<()> {
        self.find_by_id(role_id).await?;
        self.role_repository.delete_role(role_id).await
    }

    /// Attaches an existing permission to an existing role.
    pub async fn add_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RolePermissionRecord> {
        let role = self.find_by_id(role_id).await?;
        self.require_permission(permission_id).await?;

        if role.role.has_permission(permission_id) {
            return Err(AppError::Conflict(
                "Permission already attached to this role".to_owned(),
            ));
        }

        self.role_repository
            .attach_permission(role_id, permission_id)
            .await
    }

    /// Detaches a permission from a role.
    pub async fn remove_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<DetachedPermission> {
        let role = self.find_by_id(role_id).await?;
        let permission = self.require_permission(permission_id).await?;

        let removed = self
            .role_repository
            .detach_permission(role_id, permission_id)
            .await?;
        if !removed {
            return Err(AppError::NotFound(
                "Permission is not attached to this role".to_owned(),
            ));
        }

        Ok(DetachedPermission {
            role: role.role.role,
            permission,
        })
    }

    async fn require_permission(&self, permission_id: PermissionId) -> AppResult<PermissionRecord> {
        self.permission_repository
            .find_permission(permission_id)
            .await?
            .map(|detail| detail.permission)
            .ok_or_else(|| AppError::NotFound("Permission not found".to_owned()))
    }
}
