//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod gemini_command_model;
mod in_memory_rbac_repository;
mod jwt_credential_service;
mod postgres_errors;
mod postgres_permission_repository;
mod postgres_role_repository;
mod postgres_user_repository;

#[cfg(test)]
mod test_database;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use gemini_command_model::{GeminiCommandModel, GeminiSettings};
pub use in_memory_rbac_repository::InMemoryRbacRepository;
pub use jwt_credential_service::{
    DEFAULT_CREDENTIAL_LIFETIME, JWT_SECRET_MIN_LENGTH, JwtCredentialService,
    parse_credential_lifetime,
};
pub use postgres_permission_repository::PostgresPermissionRepository;
pub use postgres_role_repository::PostgresRoleRepository;
pub use postgres_user_repository::PostgresUserRepository;
