use async_trait::async_trait;

use warden_core::AppResult;
use warden_domain::{PermissionId, RoleId, RoleName};

use super::records::{
    CreatePermissionInput, PageRequest, PermissionDetail, PermissionRecord, RoleDetail,
    RolePermissionRecord, RoleRecord, RoleSummary, UpdatePermissionInput,
};

/// Repository port for roles and the role-permission association.
///
/// Listings are ordered by creation time, then identifier.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Inserts a role. A duplicate name is a conflict.
    async fn create_role(&self, name: &RoleName) -> AppResult<RoleRecord>;

    /// Finds a role with its permissions and members.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<RoleDetail>>;

    /// Finds a role by exact name.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<RoleSummary>>;

    /// Lists one page of roles with their permissions.
    async fn list_roles(&self, page: PageRequest) -> AppResult<Vec<RoleRecord>>;

    /// Counts all roles.
    async fn count_roles(&self) -> AppResult<u64>;

    /// Renames a role. A duplicate name is a conflict.
    async fn rename_role(&self, role_id: RoleId, name: &RoleName) -> AppResult<RoleRecord>;

    /// Deletes a role and its association rows.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<()>;

    /// Attaches a permission. An existing pair is a conflict.
    async fn attach_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<RolePermissionRecord>;

    /// Detaches a permission. Returns `false` when the pair was not attached.
    async fn detach_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> AppResult<bool>;
}

/// Repository port for permissions.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Inserts a permission. A duplicate name is a conflict.
    async fn create_permission(&self, input: CreatePermissionInput) -> AppResult<PermissionRecord>;

    /// Finds a permission with the roles holding it.
    async fn find_permission(
        &self,
        permission_id: PermissionId,
    ) -> AppResult<Option<PermissionDetail>>;

    /// Finds a permission by exact name.
    async fn find_permission_by_name(&self, name: &str) -> AppResult<Option<PermissionRecord>>;

    /// Lists one page of permissions.
    async fn list_permissions(&self, page: PageRequest) -> AppResult<Vec<PermissionRecord>>;

    /// Counts all permissions.
    async fn count_permissions(&self) -> AppResult<u64>;

    /// Applies a partial update. A duplicate name is a conflict.
    async fn update_permission(
        &self,
        permission_id: PermissionId,
        input: UpdatePermissionInput,
    ) -> AppResult<PermissionRecord>;

    /// Deletes a permission and its association rows.
    async fn delete_permission(&self, permission_id: PermissionId) -> AppResult<()>;
}
