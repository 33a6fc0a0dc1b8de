use warden_application::{CreatePermissionInput, PermissionRepository, UpdatePermissionInput};
use warden_core::{AppError, AppResult};
use warden_domain::{PermissionId, PermissionName};

use crate::test_database::{test_pool, unique_name};

use super::PostgresPermissionRepository;

fn permission_name(prefix: &str) -> AppResult<PermissionName> {
    PermissionName::new(unique_name(prefix))
}

#[tokio::test]
async fn create_permission_maps_duplicate_name_to_conflict() -> AppResult<()> {
    let Some(pool) = test_pool().await else {
        return Ok(());
    };
    let repository = PostgresPermissionRepository::new(pool);
    let name = permission_name("users.read")?;

    let created = repository
        .create_permission(CreatePermissionInput {
            name: name.clone(),
            description: Some("Read users".to_owned()),
        })
        .await;
    assert!(created.is_ok());

    let duplicate = repository
        .create_permission(CreatePermissionInput {
            name,
            description: None,
        })
        .await;
    assert!(matches!(
        duplicate,
        Err(AppError::Conflict(message)) if message == "Permission with this name already exists"
    ));
    Ok(())
}

#[tokio::test]
async fn update_keeps_fields_that_were_not_supplied() -> AppResult<()> {
    let Some(pool) = test_pool().await else {
        return Ok(());
    };
    let repository = PostgresPermissionRepository::new(pool);
    let created = repository
        .create_permission(CreatePermissionInput {
            name: permission_name("users.write")?,
            description: Some("Write users".to_owned()),
        })
        .await?;

    let renamed = permission_name("users.manage")?;
    let updated = repository
        .update_permission(
            created.id,
            UpdatePermissionInput {
                name: Some(renamed.clone()),
                description: None,
            },
        )
        .await?;

    assert_eq!(updated.name, renamed.as_str());
    assert_eq!(updated.description.as_deref(), Some("Write users"));
    assert!(updated.updated_at >= created.updated_at);
    Ok(())
}

#[tokio::test]
async fn find_by_name_is_exact() -> AppResult<()> {
    let Some(pool) = test_pool().await else {
        return Ok(());
    };
    let repository = PostgresPermissionRepository::new(pool);
    let name = permission_name("Reports.Export")?;
    let created = repository
        .create_permission(CreatePermissionInput {
            name: name.clone(),
            description: None,
        })
        .await;
    assert!(created.is_ok());

    let exact = repository.find_permission_by_name(name.as_str()).await;
    let lowered = repository.find_permission_by_name(name.as_str().to_lowercase().as_str()).await;

    assert!(matches!(exact, Ok(Some(_))));
    assert!(matches!(lowered, Ok(None)));
    Ok(())
}

#[tokio::test]
async fn missing_permission_is_none() -> AppResult<()> {
    let Some(pool) = test_pool().await else {
        return Ok(());
    };
    let repository = PostgresPermissionRepository::new(pool);

    let result = repository.find_permission(PermissionId::new()).await;

    assert!(matches!(result, Ok(None)));
    Ok(())
}
