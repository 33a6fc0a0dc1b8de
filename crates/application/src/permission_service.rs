//! Permission lifecycle rules.

use std::sync::Arc;

use warden_core::{AppError, AppResult};
use warden_domain::{PermissionId, PermissionName};

use crate::rbac_ports::{
    CreatePermissionInput, Page, PageRequest, PermissionDetail, PermissionRecord,
    PermissionRepository, UpdatePermissionInput,
};

/// Message returned when a permission name is already taken.
pub const PERMISSION_NAME_TAKEN: &str = "Permission with this name already exists";

/// Partial update for a permission as received from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePermissionRequest {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
}

/// Application service for permission administration.
#[derive(Clone)]
pub struct PermissionService {
    repository: Arc<dyn PermissionRepository>,
}

impl PermissionService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(repository: Arc<dyn PermissionRepository>) -> Self {
        Self { repository }
    }

    /// Creates a permission with a unique name.
    pub async fn create(
        &self,
        name: &str,
        description: Option<String>,
    ) -> AppResult<PermissionRecord> {
        let name = PermissionName::new(name)?;

        if self
            .repository
            .find_permission_by_name(name.as_str())
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(PERMISSION_NAME_TAKEN.to_owned()));
        }

        self.repository
            .create_permission(CreatePermissionInput { name, description })
            .await
    }

    /// Returns a permission with the roles holding it.
    pub async fn find_by_id(&self, permission_id: PermissionId) -> AppResult<PermissionDetail> {
        self.repository
            .find_permission(permission_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Permission not found".to_owned()))
    }

    /// Returns one page of permissions with the total count.
    pub async fn find_all(&self, page: PageRequest) -> AppResult<Page<PermissionRecord>> {
        let data = self.repository.list_permissions(page).await?;
        let total = self.repository.count_permissions().await?;

        Ok(Page {
            data,
            total,
            skip: page.skip,
            take: page.take,
        })
    }

    /// Applies a partial update. A new name must not belong to another permission.
    pub async fn update(
        &self,
        permission_id: PermissionId,
        request: UpdatePermissionRequest,
    ) -> AppResult<PermissionRecord> {
        let current = self.find_by_id(permission_id).await?;

        let name = request.name.map(PermissionName::new).transpose()?;
        if let Some(name) = &name
            && let Some(existing) = self
                .repository
                .find_permission_by_name(name.as_str())
                .await?
            && existing.id != permission_id
        {
            return Err(AppError::Conflict(PERMISSION_NAME_TAKEN.to_owned()));
        }

        if name.is_none() && request.description.is_none() {
            return Ok(current.permission);
        }

        self.repository
            .update_permission(
                permission_id,
                UpdatePermissionInput {
                    name,
                    description: request.description,
                },
            )
            .await
    }

    /// Deletes a permission and its role attachments.
    pub async fn delete(&self, permission_id: PermissionId) -> AppResult<()> {
        self.find_by_id(permission_id).await?;
        self.repository.delete_permission(permission_id).await
    }
}
