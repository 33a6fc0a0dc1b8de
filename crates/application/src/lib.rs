//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_ports;
mod auth_service;
mod command_ports;
mod command_service;
mod permission_service;
mod rbac_ports;
mod role_service;

#[cfg(test)]
mod test_support;

pub use auth_ports::{
    CredentialService, IssueCredential, NewUser, PasswordHasher, UserRecord, UserRepository,
};
pub use auth_service::{AuthService, AuthSession, SessionUser, SignupInput};
pub use command_ports::CommandModel;
pub use command_service::{
    CommandFailure, CommandOutcome, CommandResult, CommandService, NO_OP_MESSAGE,
    RESOLUTION_PAGE_SIZE, build_prompt, extract_command,
};
pub use permission_service::{PERMISSION_NAME_TAKEN, PermissionService, UpdatePermissionRequest};
pub use rbac_ports::{
    AttachedPermission, CreatePermissionInput, DEFAULT_PAGE_TAKE, Page, PageRequest,
    PermissionDetail, PermissionRecord, PermissionRepository, PermissionRoleLink, RoleDetail,
    RoleMember, RoleRecord, RolePermissionRecord, RoleRepository, RoleSummary,
    UpdatePermissionInput,
};
pub use role_service::{DetachedPermission, ROLE_NAME_TAKEN, RoleService, UpdateRoleInput};
