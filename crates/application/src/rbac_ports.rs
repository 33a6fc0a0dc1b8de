mod records;
mod repositories;

pub use records::{
    AttachedPermission, CreatePermissionInput, DEFAULT_PAGE_TAKE, Page, PageRequest,
    PermissionDetail, PermissionRecord, PermissionRoleLink, RoleDetail, RoleMember, RoleRecord,
    RolePermissionRecord, RoleSummary, UpdatePermissionInput,
};
pub use repositories::{PermissionRepository, RoleRepository};
