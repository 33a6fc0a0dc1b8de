use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};
use warden_application::{
    AuthService, CommandModel, CommandService, CredentialService, PermissionRepository,
    PermissionService, RoleRepository, RoleService, UserRepository,
};
use warden_core::AppError;
use warden_infrastructure::{
    Argon2PasswordHasher, GeminiCommandModel, InMemoryRbacRepository, JwtCredentialService,
    PostgresPermissionRepository, PostgresRoleRepository, PostgresUserRepository,
};

use crate::api_config::{ApiConfig, StorageBackend};
use crate::state::{AppState, StorageProbe};

use super::database::connect_and_migrate;

/// Opened backing store.
pub enum StorageHandle {
    Postgres(PgPool),
    Memory(Arc<InMemoryRbacRepository>),
}

struct RepositorySet {
    role_repository: Arc<dyn RoleRepository>,
    permission_repository: Arc<dyn PermissionRepository>,
    user_repository: Arc<dyn UserRepository>,
}

pub async fn open_storage(backend: &StorageBackend) -> Result<StorageHandle, AppError> {
    match backend {
        StorageBackend::Postgres { database_url } => {
            let pool = connect_and_migrate(database_url).await?;
            info!("connected to postgres storage");
            Ok(StorageHandle::Postgres(pool))
        }
        StorageBackend::Memory => {
            warn!("using in-memory storage; all data is lost on restart");
            Ok(StorageHandle::Memory(Arc::new(InMemoryRbacRepository::new())))
        }
    }
}

pub fn build_app_state(storage: StorageHandle, config: &ApiConfig) -> Result<AppState, AppError> {
    let credential_service =
        JwtCredentialService::new(config.jwt_secret.as_str(), config.jwt_expiry)?;
    let command_model = GeminiCommandModel::new(config.gemini.clone())?;

    Ok(assemble_app_state(
        storage,
        Arc::new(credential_service),
        Arc::new(command_model),
    ))
}

pub fn assemble_app_state(
    storage: StorageHandle,
    credential_service: Arc<dyn CredentialService>,
    command_model: Arc<dyn CommandModel>,
) -> AppState {
    let (repositories, probe) = match storage {
        StorageHandle::Postgres(pool) => (
            RepositorySet {
                role_repository: Arc::new(PostgresRoleRepository::new(pool.clone())),
                permission_repository: Arc::new(PostgresPermissionRepository::new(pool.clone())),
                user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
            },
            StorageProbe::Postgres(pool),
        ),
        StorageHandle::Memory(store) => (
            RepositorySet {
                role_repository: store.clone(),
                permission_repository: store.clone(),
                user_repository: store,
            },
            StorageProbe::Memory,
        ),
    };

    let role_service = RoleService::new(
        repositories.role_repository,
        repositories.permission_repository.clone(),
    );
    let permission_service = PermissionService::new(repositories.permission_repository);

    AppState {
        auth_service: AuthService::new(
            repositories.user_repository,
            Arc::new(Argon2PasswordHasher::new()),
            credential_service,
        ),
        command_service: CommandService::new(
            command_model,
            role_service.clone(),
            permission_service.clone(),
        ),
        role_service,
        permission_service,
        storage: probe,
    }
}
