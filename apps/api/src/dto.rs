mod auth;
mod command;
mod common;
mod permissions;
mod roles;

pub use auth::{AuthRequest, AuthSessionResponse, MeResponse, SessionUserResponse};
pub use command::{
    CommandResultResponse, ParseCommandRequest, ParseCommandResponse, ParsedCommandResponse,
};
pub use common::{HealthResponse, ListQuery, MessageResponse, StorageStatusResponse};
pub use permissions::{
    CreatePermissionRequest, PermissionDetailResponse, PermissionPageResponse, PermissionResponse,
    PermissionRoleResponse, UpdatePermissionRequest,
};
pub use roles::{
    AttachedPermissionResponse, CreateRoleRequest, DetachedPermissionResponse,
    RoleDetailResponse, RoleMemberResponse, RolePageResponse, RolePermissionRequest,
    RolePermissionResponse, RoleResponse, RoleSummaryResponse, UpdateRoleRequest,
};
