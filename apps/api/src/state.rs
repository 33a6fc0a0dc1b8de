use sqlx::PgPool;
use warden_application::{AuthService, CommandService, PermissionService, RoleService};

/// Backing store as seen by the readiness check.
#[derive(Clone)]
pub enum StorageProbe {
    Postgres(PgPool),
    Memory,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub role_service: RoleService,
    pub permission_service: PermissionService,
    pub command_service: CommandService,
    pub storage: StorageProbe,
}
